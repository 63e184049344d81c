//! A presentation instance: path, cached geometries, motion state and the hooks it
//! drives.

pub mod controller;
pub mod hooks;
pub mod path;
