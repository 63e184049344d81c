use std::{path::Path, sync::Arc};

use anyhow::Context;
use resvg::tiny_skia;

use crate::{
    content::texts::CaptionBlend,
    foundation::{
        core::ViewportSize,
        error::{FramecamError, FramecamResult},
    },
    geometry::svg::SvgCanvas,
    presentation::{hooks::Renderer, path::FramePath},
    transform::camera::CameraTransform,
};

/// Straight-alpha RGBA8 pixels, row-major.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

/// CPU renderer that rasterizes the whole canvas through each camera transform.
pub struct SvgRasterizer {
    tree: Arc<usvg::Tree>,
    pixmap: tiny_skia::Pixmap,
    background: tiny_skia::Color,
    last_transform: Option<CameraTransform>,
    frames_drawn: u64,
}

impl SvgRasterizer {
    /// Rasterizer for `canvas` with the outlines of every frame on `path` hidden.
    pub fn new(
        canvas: &SvgCanvas,
        path: &FramePath,
        width: u32,
        height: u32,
        background_rgba8: [u8; 4],
    ) -> FramecamResult<Self> {
        let [r, g, b, a] = background_rgba8;
        Ok(Self {
            tree: canvas.display_tree(path.ids())?,
            pixmap: alloc_pixmap(width, height)?,
            background: tiny_skia::Color::from_rgba8(r, g, b, a),
            last_transform: None,
            frames_drawn: 0,
        })
    }

    /// Change the viewport size. The pixmap is cleared; call `redraw` afterwards.
    pub fn resize(&mut self, width: u32, height: u32) -> FramecamResult<()> {
        if width != self.pixmap.width() || height != self.pixmap.height() {
            self.pixmap = alloc_pixmap(width, height)?;
        }
        Ok(())
    }

    /// Transform used by the last draw.
    pub fn last_transform(&self) -> Option<&CameraTransform> {
        self.last_transform.as_ref()
    }

    /// Draws since construction.
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Clear to the background and draw the canvas through `transform`.
    pub fn draw(&mut self, transform: &CameraTransform) {
        let [a, b, c, d, e, f] = transform.to_affine().as_coeffs();
        let ts = tiny_skia::Transform::from_row(
            a as f32, b as f32, c as f32, d as f32, e as f32, f as f32,
        );
        self.pixmap.fill(self.background);
        resvg::render(&self.tree, ts, &mut self.pixmap.as_mut());
        self.last_transform = Some(*transform);
        self.frames_drawn += 1;
    }

    /// Current pixels with alpha un-premultiplied.
    pub fn frame(&self) -> FrameRgba {
        let mut data = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        FrameRgba {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
            data,
        }
    }

    /// Write the current pixels as a PNG, creating parent directories.
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    pub fn save_png(&self, path: &Path) -> FramecamResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let frame = self.frame();
        image::save_buffer_with_format(
            path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

fn alloc_pixmap(width: u32, height: u32) -> FramecamResult<tiny_skia::Pixmap> {
    tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        FramecamError::validation(format!("viewport must be non-empty, got {width}x{height}"))
    })
}

impl Renderer for SvgRasterizer {
    fn viewport_size(&self) -> ViewportSize {
        ViewportSize::new(
            f64::from(self.pixmap.width()),
            f64::from(self.pixmap.height()),
        )
    }

    fn apply_transform(&mut self, transform: &CameraTransform) {
        self.draw(transform);
    }

    fn show_captions(&mut self, captions: &CaptionBlend<'_>) {
        tracing::trace!(
            current = captions.current_opacity,
            next = captions.next_opacity,
            "captions"
        );
    }
}

impl std::fmt::Debug for SvgRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgRasterizer")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("last_transform", &self.last_transform)
            .field("frames_drawn", &self.frames_drawn)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
