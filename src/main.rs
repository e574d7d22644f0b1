use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use ray_tracing_lib::{
    application::{AppState, Application, Layer, Viewport},
    camera::Camera,
    config::Config,
    renderer::Renderer,
    scene::Scene,
    util::math::degree_to_radian,
    Error,
};
use tracing_subscriber::EnvFilter;

/// Render a sphere scene on the CPU and write it as a PNG.
#[derive(Debug, Parser)]
#[command(name = "ray_tracing", version)]
struct Args {
    /// TOML scene and render settings. The stock scene is used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Number of frames to render; the camera orbits between frames
    #[arg(long)]
    frames: Option<u32>,

    /// Output image path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render rows on all cores
    #[arg(short, long)]
    multithreaded: bool,

    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(width) = self.width {
            config.render.width = width;
        }
        if let Some(height) = self.height {
            config.render.height = height;
        }
        if let Some(frames) = self.frames {
            config.render.frames = frames;
        }
        if let Some(output) = self.output {
            config.render.output = output;
        }
        config.render.multithreaded |= self.multithreaded;

        config.validate()?;
        Ok(config)
    }
}

struct RayTracingCPU {
    config: Config,
    scene: Scene,
    camera: Camera,
    renderer: Renderer,
}

impl Layer for RayTracingCPU {
    type Config = Config;
    type LayerErr = Error;

    fn start(config: Config, _viewport: Viewport, _app: &AppState) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            scene: config.scene(),
            camera: config.camera(),
            renderer: Renderer::new(config.settings()),
            config,
        })
    }

    fn resize(&mut self, viewport: Viewport, _app: &AppState) {
        self.renderer.on_resize(viewport.width, viewport.height);
        self.camera.resize(viewport.width, viewport.height);
    }

    fn update(&mut self, app: &AppState) {
        let orbit = self.config.camera.orbit_degrees_per_frame;
        if app.frame_index > 0 && orbit != 0.0 {
            self.camera
                .orbit(degree_to_radian(orbit), self.config.camera_target());
        }
    }

    fn render(&mut self, app: &AppState) -> Result<(), Error> {
        let started = Instant::now();
        self.renderer.render(&self.scene, &self.camera);
        tracing::info!(
            frame = app.frame_index,
            "rendered in {:.2} ms",
            started.elapsed().as_secs_f32() * 1000.0
        );
        Ok(())
    }

    fn shutdown(&mut self, _app: &AppState) -> Result<(), Error> {
        match self.renderer.final_image() {
            Some(image) => image.save(&self.config.render.output),
            None => Err(Error::InvalidConfig("no frame was rendered".into())),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        width = config.render.width,
        height = config.render.height,
        spheres = config.spheres.len(),
        multithreaded = config.render.multithreaded,
        "starting"
    );

    let viewport = Viewport::new(config.render.width, config.render.height);
    let frames = config.render.frames;

    match Application::<RayTracingCPU>::new(viewport).run(config, frames) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
