use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    foundation::core::{Affine, FrameGeometry, Point},
    foundation::error::{FramecamError, FramecamResult},
    geometry::store::GeometryProvider,
};

/// Parsed canvas document. Frames are elements (polygons, rects, paths) addressed by id.
#[derive(Clone)]
pub struct SvgCanvas {
    tree: Arc<usvg::Tree>,
    source: Arc<[u8]>,
    resources_dir: Option<PathBuf>,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SvgCanvas {
    /// Read and parse a canvas file. Text is shaped with the system fonts plus any
    /// fonts found in a `fonts/` directory next to the canvas.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> FramecamResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read canvas '{}'", path.display()))
            .map_err(|e| {
                tracing::warn!(error = %e, "canvas unreadable");
                FramecamError::resource_load(path.display().to_string())
            })?;
        let resources_dir = path.parent().map(Path::to_path_buf);
        let fontdb = canvas_fontdb(resources_dir.as_deref());
        Self::parse(bytes.into(), resources_dir, fontdb).map_err(|e| {
            tracing::warn!(error = %e, "canvas unparseable");
            FramecamError::resource_load(path.display().to_string())
        })
    }

    /// Parse canvas bytes. A document without any drawable content counts as unloadable.
    pub fn from_data(bytes: &[u8]) -> FramecamResult<Self> {
        Self::parse(bytes.into(), None, Arc::new(usvg::fontdb::Database::new()))
    }

    fn parse(
        source: Arc<[u8]>,
        resources_dir: Option<PathBuf>,
        fontdb: Arc<usvg::fontdb::Database>,
    ) -> FramecamResult<Self> {
        let tree = parse_tree(&source, resources_dir.as_deref(), &fontdb, None)?;
        if tree.root().children().is_empty() {
            return Err(FramecamError::resource_load("<canvas>"));
        }
        Ok(Self {
            tree: Arc::new(tree),
            source,
            resources_dir,
            fontdb,
        })
    }

    /// Parsed document with every element visible.
    pub fn tree(&self) -> &usvg::Tree {
        &self.tree
    }

    /// The canvas as it is shown on screen: every element whose id is in `frame_ids`
    /// is hidden, so frame outlines never appear. Geometry lookups keep using
    /// [`Self::tree`].
    pub fn display_tree(&self, frame_ids: &[String]) -> FramecamResult<Arc<usvg::Tree>> {
        let style_sheet = hidden_frames_style(frame_ids);
        if style_sheet.is_empty() {
            return Ok(Arc::clone(&self.tree));
        }
        let tree = parse_tree(
            &self.source,
            self.resources_dir.as_deref(),
            &self.fontdb,
            Some(style_sheet),
        )?;
        Ok(Arc::new(tree))
    }

    /// Canvas size in user units.
    pub fn size(&self) -> (f64, f64) {
        let size = self.tree.size();
        (f64::from(size.width()), f64::from(size.height()))
    }
}

impl std::fmt::Debug for SvgCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgCanvas")
            .field("size", &self.size())
            .field("source_bytes", &self.source.len())
            .field("resources_dir", &self.resources_dir)
            .finish_non_exhaustive()
    }
}

fn parse_tree(
    source: &[u8],
    resources_dir: Option<&Path>,
    fontdb: &Arc<usvg::fontdb::Database>,
    style_sheet: Option<String>,
) -> FramecamResult<usvg::Tree> {
    let opts = usvg::Options {
        resources_dir: resources_dir.map(Path::to_path_buf),
        fontdb: Arc::clone(fontdb),
        style_sheet,
        ..Default::default()
    };
    Ok(usvg::Tree::from_data(source, &opts).context("parse svg tree")?)
}

// Ids with a double quote cannot be written as a quoted attribute selector.
fn hidden_frames_style(frame_ids: &[String]) -> String {
    let mut seen = std::collections::BTreeSet::new();
    let mut css = String::new();
    for id in frame_ids {
        if id.contains('"') || !seen.insert(id.as_str()) {
            continue;
        }
        css.push_str(&format!("[id=\"{id}\"]{{visibility:hidden}}\n"));
    }
    css
}

impl GeometryProvider for SvgCanvas {
    fn frame_geometry(&self, frame_id: &str) -> FramecamResult<Option<FrameGeometry>> {
        let Some(node) = self.tree.node_by_id(frame_id) else {
            return Ok(None);
        };
        let usvg::Node::Path(path) = node else {
            return Err(FramecamError::degenerate_geometry(frame_id));
        };

        let points = path.data().points();
        if points.len() < 3 {
            return Err(FramecamError::degenerate_geometry(frame_id));
        }

        let ctm = to_affine(path.abs_transform());
        let corner =
            |i: usize| ctm * Point::new(f64::from(points[i].x), f64::from(points[i].y));
        FrameGeometry::from_reference_points(frame_id, [corner(0), corner(1), corner(2)])
            .map(Some)
    }
}

fn canvas_fontdb(resources_dir: Option<&Path>) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    if let Some(dir) = resources_dir {
        let fonts = dir.join("fonts");
        if fonts.is_dir() {
            db.load_fonts_dir(&fonts);
        }
    }
    Arc::new(db)
}

/// Convert a tiny-skia style row-major transform into a kurbo affine.
pub(crate) fn to_affine(t: usvg::Transform) -> Affine {
    Affine::new([
        f64::from(t.sx),
        f64::from(t.ky),
        f64::from(t.kx),
        f64::from(t.sy),
        f64::from(t.tx),
        f64::from(t.ty),
    ])
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/svg.rs"]
mod tests;
