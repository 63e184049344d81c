//! Offscreen rendering of the canvas through the camera.

/// Canvas rasterizer driven as a presentation renderer.
pub mod raster;
