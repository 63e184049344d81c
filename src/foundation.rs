pub mod barrier;
pub mod core;
pub mod error;
pub mod math;
