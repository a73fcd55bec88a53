use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use color_chooser::{
    Argb, Bitmap, ChooserConfig, Coordinator, DrawingRegion, Geometry, Orientation, PoolSpawner,
    Presenter, View,
};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Writes every presented bitmap to `<out>/<view>-<n>.png`.
struct PngPresenter {
    out_dir: PathBuf,
    frames: HashMap<View, usize>,
    last_color: Option<Argb>,
}

impl PngPresenter {
    fn new(out_dir: PathBuf) -> Self {
        Self {
            out_dir,
            frames: HashMap::new(),
            last_color: None,
        }
    }

    fn save(&mut self, view: View, bitmap: Bitmap) {
        let frame = self.frames.entry(view).or_default();
        *frame += 1;
        let path = self.out_dir.join(format!("{}-{:03}.png", view_name(view), frame));
        match bitmap.save_png(&path) {
            Ok(()) => tracing::debug!("wrote {}", path.display()),
            Err(err) => tracing::error!("failed to write {}: {err}", path.display()),
        }
    }
}

impl Presenter for PngPresenter {
    fn apply_bitmap(&mut self, view: View, bitmap: Bitmap) {
        self.save(view, bitmap);
    }

    fn apply_background(&mut self, view: View, bitmap: Bitmap) {
        self.save(view, bitmap);
    }

    fn notify_color_changed(&mut self, argb: Argb) {
        self.last_color = Some(argb);
    }
}

fn view_name(view: View) -> &'static str {
    match view {
        View::HueTrack => "hue-track",
        View::Gradient => "gradient",
        View::OpacityTrack => "opacity-track",
        View::Swatch => "swatch",
    }
}

fn load_config(path: Option<&Path>) -> Result<ChooserConfig> {
    match path {
        Some(path) => ChooserConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ChooserConfig::default()),
    }
}

fn layout(config: &ChooserConfig) -> [(View, Geometry); 4] {
    let portion = config.background_portion;
    let thumb = 12;
    [
        (
            View::HueTrack,
            Geometry::new(
                40,
                320,
                DrawingRegion::for_track(40, 320, thumb, Orientation::Vertical, portion),
            )
            .orientation(Orientation::Vertical),
        ),
        (View::Gradient, Geometry::new(320, 320, DrawingRegion::full(320, 320))),
        (
            View::OpacityTrack,
            Geometry::new(
                320,
                40,
                DrawingRegion::for_track(320, 40, thumb, Orientation::Horizontal, portion),
            ),
        ),
        (
            View::Swatch,
            Geometry::new(120, 60, DrawingRegion::for_swatch(120, 60, portion)),
        ),
    ]
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("color_chooser=debug".parse()?),
        )
        .init();

    // Parse `cargo run -- [config.json] [out_dir]`
    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "target/chooser-frames".into()));

    let config = load_config(config_path.as_deref())?;
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let mut coordinator = Coordinator::new(
        config.clone(),
        Arc::new(PoolSpawner),
        PngPresenter::new(out_dir.clone()),
    )?;

    for (view, geometry) in layout(&config) {
        coordinator.on_geometry_resolved(view, geometry);
    }
    smol::block_on(coordinator.settle());

    // A fast hue drag: most of these renders are superseded before they finish.
    for step in 0..12 {
        coordinator.on_hue_input(step as f32 * 30.0);
    }
    smol::block_on(coordinator.settle());

    // Drag the marker across the gradient, applying results as they arrive.
    for step in 0..=10 {
        let t = step as f32 / 10.0;
        coordinator.on_saturation_value_input(t, 1.0 - t * 0.5);
        coordinator.pump();
    }
    smol::block_on(coordinator.settle());

    let fields = coordinator.on_component_text_input("128", "32", "160", "224");
    tracing::info!("text fields sanitised to {fields:?}");
    coordinator.set_background_color(Argb(0xff30_3030));
    smol::block_on(coordinator.settle());

    let presenter = coordinator.presenter();
    let frames: usize = presenter.frames.values().sum();
    println!(
        "final color {} ({} frames in {})",
        presenter.last_color.unwrap_or(coordinator.color()),
        frames,
        out_dir.display()
    );
    Ok(())
}
