use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use framecam::{
    CameraTransform, DirTextSource, FrameTexts, GeometryProvider, GeometryStore, Hooks,
    ManualClock, MediaOverlay, MotionPhase, OverlayState, PositionObserver, Presentation,
    PresentationConfig, Renderer, SvgCanvas, SvgRasterizer, ViewportSize, compute_transform,
    load_texts,
};

#[derive(Parser, Debug)]
#[command(name = "framecam", version)]
struct Cli {
    /// Log debug events to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the geometry of every path entry as JSON.
    Inspect(InspectArgs),
    /// Print the camera transform at a path position as JSON.
    Transform(ViewArgs),
    /// Render the view at a path position as a PNG.
    Frame(FrameArgs),
    /// Animate to a position with a synthetic clock and print each step.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input presentation JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ViewArgs {
    /// Input presentation JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Path position (fractional values are mid-transition).
    #[arg(long)]
    pos: f64,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    view: ViewArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input presentation JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Destination position.
    #[arg(long)]
    to: f64,

    /// Ticks per second of the synthetic clock.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Stop after this many ticks even if still moving.
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Transform(args) => cmd_transform(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

struct Loaded {
    config: PresentationConfig,
    canvas: SvgCanvas,
}

impl Loaded {
    fn open(path: &std::path::Path) -> anyhow::Result<Self> {
        let config = PresentationConfig::from_path(path)?;
        let canvas = SvgCanvas::from_path(&config.svg_path())
            .with_context(|| format!("load canvas for '{}'", path.display()))?;
        Ok(Self { config, canvas })
    }

    fn provider(&self) -> &dyn GeometryProvider {
        if let Some(presets) = &self.config.geometries {
            return presets;
        }
        &self.canvas
    }

    fn texts(&self) -> FrameTexts {
        match self.config.texts_path() {
            Some(dir) => load_texts(&self.config.path, &DirTextSource::new(dir)),
            None => FrameTexts::new(),
        }
    }

    fn geometries(&self) -> anyhow::Result<GeometryStore> {
        let mut store = GeometryStore::new();
        store.populate(&self.config.path, self.provider())?;
        Ok(store)
    }
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let loaded = Loaded::open(&args.in_path)?;
    let store = loaded.geometries()?;

    let mut entries = Vec::with_capacity(loaded.config.path.len());
    for (index, id) in loaded.config.path.ids().iter().enumerate() {
        let geometry = store.require(id)?;
        entries.push(serde_json::json!({
            "index": index,
            "id": id,
            "geometry": geometry,
        }));
    }
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn transform_at(
    loaded: &Loaded,
    store: &GeometryStore,
    args: &ViewArgs,
) -> anyhow::Result<CameraTransform> {
    let path = &loaded.config.path;
    let segment = path.segment(args.pos);
    let from = store.require(path.frame_id(segment.from).unwrap_or_default())?;
    let to = store.require(path.frame_id(segment.to).unwrap_or_default())?;
    let viewport = ViewportSize::new(f64::from(args.width), f64::from(args.height));
    Ok(compute_transform(&from, &to, segment.fraction, viewport))
}

fn cmd_transform(args: ViewArgs) -> anyhow::Result<()> {
    let loaded = Loaded::open(&args.in_path)?;
    let store = loaded.geometries()?;
    let transform = transform_at(&loaded, &store, &args)?;
    let out = serde_json::json!({
        "position": loaded.config.path.clamp(args.pos),
        "transform": transform,
        "affine": transform.to_affine().as_coeffs(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let loaded = Loaded::open(&args.view.in_path)?;
    let rasterizer = Rc::new(RefCell::new(SvgRasterizer::new(
        &loaded.canvas,
        &loaded.config.path,
        args.view.width,
        args.view.height,
        loaded.config.background_rgba8,
    )?));
    let overlay = Rc::new(RefCell::new(MediaOverlay::new(loaded.config.overlay.clone())));

    let mut settings = loaded.config.settings();
    settings.initial_position = args.view.pos;
    let hooks = Hooks::new(rasterizer.clone()).with_overlay(overlay.clone());
    let mut presentation = Presentation::new(
        loaded.config.path.clone(),
        settings,
        hooks,
        Rc::new(ManualClock::new(0.0)),
    );
    presentation.load_geometries(loaded.provider())?;
    presentation.deliver_texts(loaded.texts());

    rasterizer.borrow().save_png(&args.out)?;
    if let OverlayState::Shown {
        frame_id, url, width, height, ..
    } = overlay.borrow().state()
    {
        eprintln!("overlay for '{frame_id}': {url} ({width}x{height})");
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

/// Renderer that only reports a fixed viewport; used when no pixels are needed.
struct HeadlessViewport(ViewportSize);

impl Renderer for HeadlessViewport {
    fn viewport_size(&self) -> ViewportSize {
        self.0
    }

    fn apply_transform(&mut self, _transform: &CameraTransform) {}
}

#[derive(Default)]
struct Positions(Rc<RefCell<Vec<f64>>>);

impl PositionObserver for Positions {
    fn position_changed(&mut self, position: f64) {
        self.0.borrow_mut().push(position);
    }
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be > 0");
    }
    let loaded = Loaded::open(&args.in_path)?;
    let clock = Rc::new(ManualClock::new(0.0));
    let positions = Positions::default();
    let seen = Rc::clone(&positions.0);
    let hooks = Hooks::new(HeadlessViewport(ViewportSize::new(1280.0, 720.0)))
        .with_observer(positions);
    let mut presentation = Presentation::new(
        loaded.config.path.clone(),
        loaded.config.settings(),
        hooks,
        clock.clone(),
    );
    presentation.load_geometries(loaded.provider())?;
    presentation.deliver_texts(FrameTexts::new());

    presentation.animate_to(args.to);
    let step_ms = 1000.0 / args.fps;
    let mut ticks = 0u64;
    presentation.tick();
    while presentation.phase() == MotionPhase::Animating && ticks < args.max_ticks {
        clock.advance_ms(step_ms);
        presentation.tick();
        ticks += 1;
        if let Some(pos) = seen.borrow_mut().pop() {
            println!(
                "{}",
                serde_json::json!({ "t_ms": ticks as f64 * step_ms, "position": pos })
            );
        }
    }
    eprintln!(
        "{} after {ticks} ticks at position {}",
        if presentation.phase() == MotionPhase::Idle {
            "arrived"
        } else {
            "stopped"
        },
        presentation.position()
    );
    Ok(())
}
