use super::*;

fn overlay(mode: OverlayMode, autoplay: bool) -> MediaOverlay {
    let mut videos = BTreeMap::new();
    videos.insert("demo".to_string(), "abc123".to_string());
    MediaOverlay::new(OverlayConfig {
        videos,
        mode,
        autoplay,
    })
}

#[test]
fn frame_with_video_shows_a_sized_player() {
    let mut o = overlay(OverlayMode::Player, true);
    o.update("demo", ViewportSize::new(320.4, 179.6));
    assert_eq!(
        *o.state(),
        OverlayState::Shown {
            frame_id: "demo".to_string(),
            video_id: "abc123".to_string(),
            url: "https://www.youtube.com/embed/abc123?rel=0&autoplay=1".to_string(),
            mode: OverlayMode::Player,
            width: 320,
            height: 180,
        }
    );
}

#[test]
fn description_mode_links_to_the_video() {
    let mut o = overlay(OverlayMode::Description, false);
    o.update("demo", ViewportSize::new(10.0, 10.0));
    let OverlayState::Shown { url, .. } = o.state() else {
        panic!("expected overlay to be shown");
    };
    assert_eq!(url, "https://youtu.be/abc123");
}

#[test]
fn frame_without_video_hides_the_overlay() {
    let mut o = overlay(OverlayMode::Player, false);
    o.update("demo", ViewportSize::new(10.0, 10.0));
    o.update("plain", ViewportSize::new(10.0, 10.0));
    assert_eq!(*o.state(), OverlayState::Hidden);
}

#[test]
fn config_parses_with_defaults() {
    let cfg: OverlayConfig = serde_json::from_str(r#"{"videos":{"f":"v"}}"#).unwrap();
    assert_eq!(cfg.mode, OverlayMode::Player);
    assert!(!cfg.autoplay);
    let cfg: OverlayConfig = serde_json::from_str(r#"{"mode":"description"}"#).unwrap();
    assert_eq!(cfg.mode, OverlayMode::Description);
}
