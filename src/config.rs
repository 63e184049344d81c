use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    animation::motion::AnimationSpeed,
    content::overlay::OverlayConfig,
    foundation::error::{FramecamError, FramecamResult},
    geometry::store::PresetGeometries,
    presentation::{controller::PresentationSettings, path::FramePath},
    sync::peer::PollPolicy,
};

/// Presentation document: canvas, path and playback settings.
///
/// Relative paths are resolved against the directory the document was read from.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PresentationConfig {
    /// Canvas SVG.
    pub svg: PathBuf,
    /// Frame ids in presentation order.
    pub path: FramePath,
    /// Directory of `<frame id>.md` texts.
    #[serde(default)]
    pub texts_dir: Option<PathBuf>,
    /// Positions per second; see [`AnimationSpeed`].
    #[serde(default)]
    pub animation_speed: AnimationSpeed,
    /// Starting position, clamped to the path.
    #[serde(default)]
    pub initial_position: f64,
    /// Peer synchronization polling.
    #[serde(default)]
    pub sync: PollPolicy,
    /// Per-frame media overlay.
    #[serde(default)]
    pub overlay: OverlayConfig,
    /// Precomputed geometries; when present the canvas is not searched for frames.
    #[serde(default)]
    pub geometries: Option<PresetGeometries>,
    /// Fill behind the canvas when rasterizing.
    #[serde(default = "default_background")]
    pub background_rgba8: [u8; 4],
    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_background() -> [u8; 4] {
    [255, 255, 255, 255]
}

impl PresentationConfig {
    /// Read and validate a JSON document.
    pub fn from_path(path: &Path) -> FramecamResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open presentation config '{}'", path.display()))?;
        let mut cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse presentation config '{}'", path.display()))?;
        cfg.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a JSON document whose relative paths resolve against `base_dir`.
    pub fn from_json(json: &str, base_dir: impl Into<PathBuf>) -> FramecamResult<Self> {
        let mut cfg: Self =
            serde_json::from_str(json).map_err(|e| FramecamError::serde(e.to_string()))?;
        cfg.base_dir = base_dir.into();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the values serde cannot: a non-empty svg path, finite numbers, positive
    /// attempt limits, usable preset geometries and non-empty video ids.
    pub fn validate(&self) -> FramecamResult<()> {
        if self.svg.as_os_str().is_empty() {
            return Err(FramecamError::validation("svg must be set"));
        }
        if !self.initial_position.is_finite() {
            return Err(FramecamError::validation(
                "initial_position must be a finite number",
            ));
        }
        if self.sync.max_attempts == Some(0) {
            return Err(FramecamError::validation("sync.max_attempts must be > 0"));
        }
        if let Some(presets) = &self.geometries {
            for (id, g) in &presets.0 {
                g.validate(id).map_err(|_| {
                    FramecamError::validation(format!(
                        "geometry for frame '{id}' must be finite with width/height > 0"
                    ))
                })?;
            }
        }
        for (frame, video) in &self.overlay.videos {
            if video.trim().is_empty() {
                return Err(FramecamError::validation(format!(
                    "overlay video for frame '{frame}' must be non-empty"
                )));
            }
        }
        Ok(())
    }

    /// Directory relative paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Canvas path resolved against [`Self::base_dir`].
    pub fn svg_path(&self) -> PathBuf {
        self.base_dir.join(&self.svg)
    }

    /// Texts directory resolved against [`Self::base_dir`].
    pub fn texts_path(&self) -> Option<PathBuf> {
        self.texts_dir.as_ref().map(|d| self.base_dir.join(d))
    }

    /// Settings for [`crate::Presentation::new`].
    pub fn settings(&self) -> PresentationSettings {
        PresentationSettings {
            speed: self.animation_speed,
            initial_position: self.initial_position,
            poll: self.sync,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
