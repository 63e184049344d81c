use crate::foundation::error::{FramecamError, FramecamResult};

/// Authored, ordered sequence of frame ids. Duplicates are allowed; never empty.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FramePath {
    ids: Vec<String>,
}

/// Resolved location on a path: the two frames around a position and the blend
/// between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Index of the frame at or before the position.
    pub from: usize,
    /// Index of the following frame; equal to `from` at the last frame.
    pub to: usize,
    /// Blend fraction in `[0, 1)`; always 0 when `from == to`.
    pub fraction: f64,
}

impl Segment {
    /// Exactly at a frame (no transition in progress).
    pub fn is_at_frame(&self) -> bool {
        self.fraction == 0.0
    }
}

impl FramePath {
    /// Path over `ids`. Fails on an empty list or a blank id.
    pub fn new(ids: Vec<String>) -> FramecamResult<Self> {
        if ids.is_empty() {
            return Err(FramecamError::validation("missing or empty path"));
        }
        if let Some(pos) = ids.iter().position(|id| id.trim().is_empty()) {
            return Err(FramecamError::validation(format!(
                "path entry {pos} has an empty frame id"
            )));
        }
        Ok(Self { ids })
    }

    /// Number of entries, counting duplicates.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Frame ids in path order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Id at `index`.
    pub fn frame_id(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    /// Largest valid position (`len - 1`).
    pub fn max_position(&self) -> f64 {
        (self.ids.len() - 1) as f64
    }

    /// Clamp `pos` into `[0, len - 1]`. NaN maps to 0.
    pub fn clamp(&self, pos: f64) -> f64 {
        if pos.is_nan() {
            return 0.0;
        }
        pos.clamp(0.0, self.max_position())
    }

    /// Frame ids in first-appearance order, without duplicates.
    pub fn unique_ids(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.ids.len());
        for id in &self.ids {
            if !out.contains(&id.as_str()) {
                out.push(id);
            }
        }
        out
    }

    /// Frames surrounding `pos` (clamped first).
    pub fn segment(&self, pos: f64) -> Segment {
        let pos = self.clamp(pos);
        let from = pos.floor() as usize;
        let last = self.ids.len() - 1;
        if from >= last {
            return Segment {
                from: last,
                to: last,
                fraction: 0.0,
            };
        }
        Segment {
            from,
            to: from + 1,
            fraction: pos - from as f64,
        }
    }

    /// Position of the previous frame: `ceil(pos) - 1`, not below 0.
    pub fn previous_frame_position(&self, pos: f64) -> f64 {
        let i = self.clamp(pos).ceil();
        if i >= 1.0 { i - 1.0 } else { i }
    }

    /// Position of the next frame: `floor(pos) + 1`, not past the last frame.
    pub fn next_frame_position(&self, pos: f64) -> f64 {
        let i = self.clamp(pos).floor();
        if i < self.max_position() { i + 1.0 } else { i }
    }
}

impl TryFrom<Vec<String>> for FramePath {
    type Error = FramecamError;

    fn try_from(ids: Vec<String>) -> FramecamResult<Self> {
        Self::new(ids)
    }
}

impl From<FramePath> for Vec<String> {
    fn from(path: FramePath) -> Self {
        path.ids
    }
}

#[cfg(test)]
#[path = "../../tests/unit/presentation/path.rs"]
mod tests;
