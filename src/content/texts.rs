use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
};

use anyhow::Context;

use crate::{
    foundation::barrier::JoinBarrier,
    foundation::error::{FramecamError, FramecamResult},
    presentation::path::{FramePath, Segment},
};

/// Rendered descriptive markup per frame id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameTexts(HashMap<String, String>);

impl FrameTexts {
    /// Empty set; every frame shows no caption.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the markup for `id`, replacing any earlier value.
    pub fn insert(&mut self, id: impl Into<String>, markup: impl Into<String>) {
        self.0.insert(id.into(), markup.into());
    }

    /// Markup for `id`, if loaded.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    /// Number of frames with markup.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no frame has markup.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FrameTexts {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Where frame texts come from. Fetches may run on worker threads.
pub trait TextSource: Sync {
    /// Human-readable location of a frame's text, used in placeholder messages.
    fn locator(&self, frame_id: &str) -> String;

    /// Rendered markup for `frame_id`. Errors become placeholder markup.
    fn fetch(&self, frame_id: &str) -> FramecamResult<String>;
}

/// Reads `<root>/<frame id>.md` as UTF-8.
#[derive(Clone, Debug)]
pub struct DirTextSource {
    root: PathBuf,
}

impl DirTextSource {
    /// Source reading from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn file_for(&self, frame_id: &str) -> PathBuf {
        self.root.join(format!("{frame_id}.md"))
    }
}

impl TextSource for DirTextSource {
    fn locator(&self, frame_id: &str) -> String {
        self.file_for(frame_id).display().to_string()
    }

    fn fetch(&self, frame_id: &str) -> FramecamResult<String> {
        let file = self.file_for(frame_id);
        let text = std::fs::read_to_string(&file)
            .with_context(|| format!("read frame text '{}'", file.display()))?;
        Ok(text)
    }
}

/// In-memory texts; ids without an entry fail to load.
#[derive(Clone, Debug, Default)]
pub struct StaticTextSource(pub BTreeMap<String, String>);

impl TextSource for StaticTextSource {
    fn locator(&self, frame_id: &str) -> String {
        frame_id.to_string()
    }

    fn fetch(&self, frame_id: &str) -> FramecamResult<String> {
        self.0
            .get(frame_id)
            .cloned()
            .ok_or_else(|| FramecamError::resource_load(frame_id))
    }
}

/// Load the text of every distinct frame in `path`.
///
/// Fetches run on the rayon pool and report back over a channel that is drained on
/// the calling thread as results arrive; the batch completes once every distinct id
/// has reported. A failed fetch is replaced by a visible placeholder and never fails
/// the batch.
#[tracing::instrument(skip_all, fields(frames = path.len()))]
pub fn load_texts(path: &FramePath, source: &dyn TextSource) -> FrameTexts {
    let ids = path.unique_ids();
    let (tx, rx) = crossbeam_channel::unbounded::<(String, FramecamResult<String>)>();
    let mut barrier = JoinBarrier::new(ids.len());
    let mut texts = FrameTexts::new();

    rayon::in_place_scope(|s| {
        for &id in &ids {
            let tx = tx.clone();
            s.spawn(move |_| {
                if tx.send((id.to_string(), source.fetch(id))).is_err() {
                    tracing::debug!(frame = %id, "text batch closed before fetch finished");
                }
            });
        }
        drop(tx);

        while !barrier.is_complete() {
            let Ok((id, result)) = rx.recv() else {
                break;
            };
            let markup = result.unwrap_or_else(|err| {
                tracing::warn!(frame = %id, error = %err, "frame text unavailable; using placeholder");
                not_loaded_message(&source.locator(&id))
            });
            texts.insert(id, markup);
            barrier.arrive();
        }
    });

    let (arrived, total) = barrier.progress();
    if arrived < total {
        tracing::warn!(arrived, total, "text batch ended early");
    }
    texts
}

/// Placeholder markup shown in place of a text that could not be loaded.
pub fn not_loaded_message(locator: &str) -> String {
    format!(
        "<p class=\"notLoadedMessage\">Could not load: <code>{}</code></p>",
        escape_html(locator)
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Two superimposed captions for a position between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptionBlend<'a> {
    /// Caption of the frame being left.
    pub current: Option<&'a str>,
    /// Opacity of `current` in `[0, 1]`.
    pub current_opacity: f64,
    /// Caption of the frame being approached.
    pub next: Option<&'a str>,
    /// Opacity of `next` in `[0, 1]`.
    pub next_opacity: f64,
    /// Scroll the caption container back to the top (a caption is fully shown).
    pub reset_scroll: bool,
}

/// Cross-fade the captions of `segment.from` (fading out) and `segment.to` (fading in).
///
/// Fully transparent captions are omitted so long hidden texts do not affect layout.
pub fn caption_blend<'a>(
    path: &FramePath,
    texts: &'a FrameTexts,
    segment: Segment,
) -> CaptionBlend<'a> {
    let from_id = path.frame_id(segment.from).unwrap_or_default();
    let to_id = path.frame_id(segment.to).unwrap_or_default();
    let current_opacity = 1.0 - segment.fraction;
    let next_opacity = segment.fraction;

    let current = texts.get(from_id).filter(|_| current_opacity > 0.0);
    let next = texts
        .get(to_id)
        .filter(|_| from_id != to_id && next_opacity > 0.0);

    CaptionBlend {
        current,
        current_opacity,
        next,
        next_opacity,
        reset_scroll: current_opacity == 1.0 || next_opacity == 1.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/texts.rs"]
mod tests;
