//! Camera transform composition.

pub mod camera;
