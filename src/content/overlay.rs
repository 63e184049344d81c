use std::collections::BTreeMap;

use crate::{foundation::core::ViewportSize, presentation::hooks::OverlayProvider};

/// How a frame's video is presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayMode {
    /// Embedded video player.
    #[default]
    Player,
    /// Text description with a link, e.g. for static or printed views.
    Description,
}

/// Overlay settings: which frames carry a video and how it is shown.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayConfig {
    /// Video id per frame id.
    #[serde(default)]
    pub videos: BTreeMap<String, String>,
    /// Player or description.
    #[serde(default)]
    pub mode: OverlayMode,
    /// Start playback when shown (player mode only).
    #[serde(default)]
    pub autoplay: bool,
}

/// What the overlay currently displays, centered over the viewport.
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayState {
    /// Nothing shown.
    Hidden,
    /// Media for `frame_id` is on screen.
    Shown {
        /// Frame the media belongs to.
        frame_id: String,
        /// Configured video id.
        video_id: String,
        /// Embed or watch link for the video.
        url: String,
        /// Presentation style.
        mode: OverlayMode,
        /// On-screen width in whole pixels.
        width: u32,
        /// On-screen height in whole pixels.
        height: u32,
    },
}

/// Media overlay that follows the current frame.
#[derive(Clone, Debug)]
pub struct MediaOverlay {
    config: OverlayConfig,
    state: OverlayState,
}

impl MediaOverlay {
    /// Hidden overlay using `config`.
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            state: OverlayState::Hidden,
        }
    }

    /// What is shown right now.
    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    /// Video id configured for `frame_id`.
    pub fn video_for(&self, frame_id: &str) -> Option<&str> {
        self.config.videos.get(frame_id).map(String::as_str)
    }

    fn url_for(&self, video_id: &str) -> String {
        match self.config.mode {
            OverlayMode::Player => {
                let mut url = format!("https://www.youtube.com/embed/{video_id}?rel=0");
                if self.config.autoplay {
                    url.push_str("&autoplay=1");
                }
                url
            }
            OverlayMode::Description => format!("https://youtu.be/{video_id}"),
        }
    }
}

impl OverlayProvider for MediaOverlay {
    fn update(&mut self, frame_id: &str, on_screen: ViewportSize) {
        let Some(video_id) = self.video_for(frame_id).map(str::to_string) else {
            self.hide();
            return;
        };
        let url = self.url_for(&video_id);
        self.state = OverlayState::Shown {
            frame_id: frame_id.to_string(),
            video_id,
            url,
            mode: self.config.mode,
            width: on_screen.width.round().max(0.0) as u32,
            height: on_screen.height.round().max(0.0) as u32,
        };
    }

    fn hide(&mut self) {
        self.state = OverlayState::Hidden;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/overlay.rs"]
mod tests;
