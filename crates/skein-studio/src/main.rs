mod scenes;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use skein_engine::backend::raster::RasterBackend;
use skein_engine::core::{App, AppControl, FrameCtx};
use skein_engine::device::GpuInit;
use skein_engine::logging::{init_logging, LoggingConfig};
use skein_engine::render::{RenderConfig, SceneRenderer};
use skein_engine::window::{Runtime, RuntimeConfig};

use scenes::{SceneKind, SCENE_SIZE};

/// Skein scene viewer.
#[derive(Debug, Parser)]
#[command(name = "skein-studio", version, about)]
struct Cli {
    /// Scene to show.
    #[arg(long, value_enum, default_value_t = SceneKind::Gallery)]
    scene: SceneKind,

    /// Render one frame to this PNG file instead of opening a window.
    #[arg(long, value_name = "PNG")]
    snapshot: Option<PathBuf>,

    /// Logical width.
    #[arg(long, default_value_t = SCENE_SIZE.0)]
    width: f32,

    /// Logical height.
    #[arg(long, default_value_t = SCENE_SIZE.1)]
    height: f32,

    /// Device pixel ratio for snapshots.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Scene time, in seconds, captured by a snapshot.
    #[arg(long, default_value_t = 0.0)]
    time: f32,

    /// How long a snapshot waits for images before the second pass.
    #[arg(long, value_name = "MS", default_value_t = 3000)]
    wait_images: u64,

    /// Directory relative image sources resolve against.
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Log filter in env_logger syntax; overrides RUST_LOG.
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

impl Cli {
    /// Text follows each canvas's own pixel ratio, so the config keeps the
    /// default one.
    fn render_config(&self) -> RenderConfig {
        let mut config = RenderConfig::default();
        let assets = self
            .assets
            .clone()
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"));
        config.image.fallback_dir = Some(assets.clone());
        config.image.asset_root = Some(assets);
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(match &cli.log {
        Some(filter) => LoggingConfig::with_filter(filter.clone()),
        None => LoggingConfig::default(),
    });

    match &cli.snapshot {
        Some(out) => snapshot(&cli, out),
        None => windowed(&cli),
    }
}

/// Headless render: one pass to start image loads, a bounded wait, then the
/// frame that gets written.
fn snapshot(cli: &Cli, out: &PathBuf) -> Result<()> {
    let backend = RasterBackend::new();
    let renderer = SceneRenderer::new(cli.render_config());
    let root = scenes::build(cli.scene, cli.time);

    let mut canvas = backend
        .canvas(cli.width, cli.height, cli.scale)
        .with_context(|| format!("cannot allocate a {}x{} canvas", cli.width, cli.height))?;
    renderer
        .render_frame(&root, &backend, &mut canvas)
        .context("first pass failed")?;

    let wait = Duration::from_millis(cli.wait_images);
    if renderer.wait_for_resources(&backend, wait) {
        log::debug!("images arrived; rendering again");
        renderer
            .render_frame(&root, &backend, &mut canvas)
            .context("second pass failed")?;
    }

    canvas
        .pixmap()
        .save_png(out)
        .with_context(|| format!("failed to write {}", out.display()))?;
    log::info!(
        "wrote {} ({}x{})",
        out.display(),
        canvas.width(),
        canvas.height()
    );
    Ok(())
}

fn windowed(cli: &Cli) -> Result<()> {
    let config = RuntimeConfig {
        title: format!("skein studio: {:?}", cli.scene).to_lowercase(),
        initial_size: LogicalSize::new(cli.width as f64, cli.height as f64),
    };
    let studio = Studio {
        scene: cli.scene,
        backend: RasterBackend::new(),
        renderer: SceneRenderer::new(cli.render_config()),
        failed: false,
    };
    Runtime::run(config, GpuInit::default(), studio)
}

/// Windowed viewer: rasterizes the scene at the window's size every frame and
/// hands the pixels to the GPU presenter.
struct Studio {
    scene: SceneKind,
    backend: RasterBackend,
    renderer: SceneRenderer<RasterBackend>,
    /// Set after the first render error so a broken scene logs once.
    failed: bool,
}

impl App for Studio {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if event.state.is_pressed() && event.logical_key == Key::Named(NamedKey::Escape) {
                return AppControl::Exit;
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let (width, height) = ctx.window.logical_size();
        let scale = ctx.window.scale_factor();
        let Some(mut canvas) = self.backend.canvas(width, height, scale) else {
            return AppControl::Continue;
        };

        if self.renderer.poll_resources(&self.backend) {
            log::trace!("image loads finished");
        }

        let root = scenes::build(self.scene, ctx.time.elapsed);
        match self.renderer.render_frame(&root, &self.backend, &mut canvas) {
            Ok(()) => self.failed = false,
            Err(err) if !self.failed => {
                log::warn!("frame {} not rendered: {err}", ctx.time.frame_index);
                self.failed = true;
            }
            Err(_) => {}
        }

        ctx.present_rgba(canvas.width(), canvas.height(), canvas.pixmap().data())
    }
}

impl Drop for Studio {
    fn drop(&mut self) {
        self.renderer.cleanup();
    }
}
