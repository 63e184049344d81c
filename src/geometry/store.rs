use std::collections::{BTreeMap, HashMap};

use crate::{
    foundation::core::FrameGeometry,
    foundation::error::{FramecamError, FramecamResult},
    presentation::path::FramePath,
};

/// Source of per-frame geometry, typically backed by the canvas document.
pub trait GeometryProvider {
    /// Geometry of `frame_id`, or `None` when the canvas has no such frame.
    ///
    /// Implementations return [`FramecamError::DegenerateGeometry`] when the frame
    /// exists but its geometry cannot be derived.
    fn frame_geometry(&self, frame_id: &str) -> FramecamResult<Option<FrameGeometry>>;
}

/// Precomputed geometries, e.g. carried over from an earlier load or a config file.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PresetGeometries(pub BTreeMap<String, FrameGeometry>);

impl GeometryProvider for PresetGeometries {
    fn frame_geometry(&self, frame_id: &str) -> FramecamResult<Option<FrameGeometry>> {
        match self.0.get(frame_id) {
            Some(g) => {
                g.validate(frame_id)?;
                Ok(Some(*g))
            }
            None => Ok(None),
        }
    }
}

/// Write-once cache of frame geometries keyed by frame id.
///
/// A geometry is computed at most once per id. Later lookups are always cache hits,
/// even if the underlying region has since moved on the canvas.
#[derive(Clone, Debug, Default)]
pub struct GeometryStore {
    by_id: HashMap<String, FrameGeometry>,
}

impl GeometryStore {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate geometries for every frame in `path`, in path order.
    ///
    /// Ids already cached are skipped. The first missing or degenerate frame stops the
    /// pass and is returned; geometries gathered before it stay cached.
    #[tracing::instrument(skip_all, fields(frames = path.len()))]
    pub fn populate(
        &mut self,
        path: &FramePath,
        provider: &dyn GeometryProvider,
    ) -> FramecamResult<()> {
        for id in path.ids() {
            if self.by_id.contains_key(id) {
                continue;
            }
            let geometry = provider
                .frame_geometry(id)?
                .ok_or_else(|| FramecamError::missing_frame(id))?;
            tracing::debug!(frame = %id, ?geometry, "frame geometry cached");
            self.by_id.insert(id.clone(), geometry);
        }
        Ok(())
    }

    /// Insert a geometry unless `id` is already cached. Returns whether it was stored.
    pub fn insert(&mut self, id: impl Into<String>, geometry: FrameGeometry) -> bool {
        let id = id.into();
        if self.by_id.contains_key(&id) {
            return false;
        }
        self.by_id.insert(id, geometry);
        true
    }

    /// Cached geometry of `id`.
    pub fn get(&self, id: &str) -> Option<&FrameGeometry> {
        self.by_id.get(id)
    }

    /// Geometry of `id`, or [`FramecamError::MissingFrame`].
    pub fn require(&self, id: &str) -> FramecamResult<FrameGeometry> {
        self.by_id
            .get(id)
            .copied()
            .ok_or_else(|| FramecamError::missing_frame(id))
    }

    /// Whether `id` is cached.
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Number of cached frames.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// True before any frame is cached.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Snapshot of the cache, suitable for reuse by another instance of the same canvas.
    pub fn to_presets(&self) -> PresetGeometries {
        PresetGeometries(
            self.by_id
                .iter()
                .map(|(id, g)| (id.clone(), *g))
                .collect(),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/store.rs"]
mod tests;
