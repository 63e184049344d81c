//! Time-driven path position state.

pub mod clock;
pub mod motion;
