pub mod store;
pub mod svg;
