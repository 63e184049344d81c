use std::sync::Mutex;

use super::*;

fn path(ids: &[&str]) -> FramePath {
    FramePath::new(ids.iter().map(|s| (*s).to_string()).collect()).unwrap()
}

struct RecordingSource {
    inner: StaticTextSource,
    fetched: Mutex<Vec<String>>,
}

impl TextSource for RecordingSource {
    fn locator(&self, frame_id: &str) -> String {
        format!("texts/{frame_id}.md")
    }

    fn fetch(&self, frame_id: &str) -> FramecamResult<String> {
        self.fetched.lock().unwrap().push(frame_id.to_string());
        self.inner.fetch(frame_id)
    }
}

#[test]
fn each_distinct_frame_is_fetched_once() {
    let mut map = BTreeMap::new();
    map.insert("a".to_string(), "<p>A</p>".to_string());
    map.insert("b".to_string(), "<p>B</p>".to_string());
    let source = RecordingSource {
        inner: StaticTextSource(map),
        fetched: Mutex::new(Vec::new()),
    };

    let texts = load_texts(&path(&["a", "b", "a", "b", "a"]), &source);
    assert_eq!(texts.len(), 2);
    assert_eq!(texts.get("a"), Some("<p>A</p>"));
    let mut fetched = source.fetched.lock().unwrap().clone();
    fetched.sort();
    assert_eq!(fetched, vec!["a", "b"]);
}

#[test]
fn failed_fetch_becomes_an_escaped_placeholder() {
    let source = RecordingSource {
        inner: StaticTextSource::default(),
        fetched: Mutex::new(Vec::new()),
    };
    let texts = load_texts(&path(&["x<y"]), &source);
    assert_eq!(
        texts.get("x<y"),
        Some("<p class=\"notLoadedMessage\">Could not load: <code>texts/x&lt;y.md</code></p>")
    );
}

struct SlowSource;

impl TextSource for SlowSource {
    fn locator(&self, frame_id: &str) -> String {
        frame_id.to_string()
    }

    fn fetch(&self, frame_id: &str) -> FramecamResult<String> {
        let n: u64 = frame_id[1..].parse().unwrap();
        std::thread::sleep(std::time::Duration::from_millis((16 - n % 16) * 2));
        if n % 5 == 0 {
            return Err(FramecamError::resource_load(frame_id));
        }
        Ok(format!("<p>{frame_id}</p>"))
    }
}

#[test]
fn out_of_order_results_all_land_in_the_batch() {
    let ids: Vec<String> = (0..40).map(|i| format!("f{i}")).collect();
    let texts = load_texts(&FramePath::new(ids).unwrap(), &SlowSource);
    assert_eq!(texts.len(), 40);
    assert_eq!(texts.get("f7"), Some("<p>f7</p>"));
    assert_eq!(texts.get("f10"), Some(not_loaded_message("f10").as_str()));
}

#[test]
fn escape_covers_markup_characters() {
    assert_eq!(escape_html("a&b<c>d"), "a&amp;b&lt;c&gt;d");
}

#[test]
fn dir_source_reads_markdown_files() {
    let dir = std::env::temp_dir().join(format!("framecam_texts_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("intro.md"), "# Intro").unwrap();

    let source = DirTextSource::new(&dir);
    assert_eq!(source.fetch("intro").unwrap(), "# Intro");
    assert!(source.fetch("missing").is_err());
    assert!(source.locator("missing").ends_with("missing.md"));

    let texts = load_texts(&path(&["intro", "missing"]), &source);
    assert_eq!(texts.get("intro"), Some("# Intro"));
    assert!(texts.get("missing").unwrap().contains("notLoadedMessage"));

    std::fs::remove_dir_all(&dir).ok();
}

fn sample_texts() -> FrameTexts {
    [("a", "A"), ("b", "B")].into_iter().collect()
}

#[test]
fn captions_cross_fade_between_frames() {
    let p = path(&["a", "b"]);
    let texts = sample_texts();
    let blend = caption_blend(&p, &texts, p.segment(0.25));
    assert_eq!(blend.current, Some("A"));
    assert_eq!(blend.current_opacity, 0.75);
    assert_eq!(blend.next, Some("B"));
    assert_eq!(blend.next_opacity, 0.25);
    assert!(!blend.reset_scroll);
}

#[test]
fn caption_at_a_frame_shows_only_that_frame() {
    let p = path(&["a", "b"]);
    let texts = sample_texts();
    let blend = caption_blend(&p, &texts, p.segment(0.0));
    assert_eq!(blend.current, Some("A"));
    assert_eq!(blend.next, None);
    assert!(blend.reset_scroll);
}

#[test]
fn repeated_frame_does_not_double_its_caption() {
    let p = path(&["a", "a"]);
    let texts = sample_texts();
    let blend = caption_blend(&p, &texts, p.segment(0.5));
    assert_eq!(blend.current, Some("A"));
    assert_eq!(blend.next, None);
}
