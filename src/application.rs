use std::time::Instant;

#[derive(Debug)]
pub struct AppState {
    previous_time: Instant,
    /// Seconds spent on the previous frame.
    pub elapsed_time: f32,
    /// Seconds since the application started.
    pub total_time: f32,
    pub frame_index: u32,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            elapsed_time: 0.0,
            total_time: 0.0,
            frame_index: 0,
        }
    }

    pub fn update(&mut self) {
        let current_time = Instant::now();
        self.elapsed_time = current_time
            .duration_since(self.previous_time)
            .as_secs_f32();
        self.total_time += self.elapsed_time;
        self.previous_time = current_time;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Size of the image the application presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Headless driver: runs a [`Layer`] for a fixed number of frames.
pub struct Application<L: Layer> {
    layer: Option<L>,
    viewport: Viewport,
    state: AppState,
}

impl<L: Layer> Application<L> {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            layer: None,
            viewport,
            state: AppState::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn layer(&self) -> Option<&L> {
        self.layer.as_ref()
    }

    /// Start the layer, size it, then update and render `frames` times.
    ///
    /// The first error stops the loop; `shutdown` only runs after every
    /// frame succeeded.
    pub fn run(&mut self, config: L::Config, frames: u32) -> Result<(), L::LayerErr> {
        let layer = self.layer.insert(L::start(config, self.viewport, &self.state)?);
        layer.resize(self.viewport, &self.state);

        for frame_index in 0..frames {
            self.state.frame_index = frame_index;
            self.state.update();

            layer.update(&self.state);
            layer.render(&self.state)?;
            tracing::debug!(
                frame = frame_index,
                elapsed_ms = self.state.elapsed_time * 1000.0,
                "frame finished"
            );
        }

        tracing::info!("exiting");
        layer.shutdown(&self.state)
    }

    /// Change the viewport; the running layer is told before the next frame.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(layer) = self.layer.as_mut() {
            layer.resize(viewport, &self.state);
        }
    }
}

pub trait Layer: Sized {
    /// Handed to [`Layer::start`] once.
    type Config;
    type LayerErr: std::error::Error + 'static;

    fn start(
        config: Self::Config,
        viewport: Viewport,
        app: &AppState,
    ) -> Result<Self, Self::LayerErr>;
    fn resize(&mut self, viewport: Viewport, app: &AppState);
    fn update(&mut self, app: &AppState);
    fn render(&mut self, app: &AppState) -> Result<(), Self::LayerErr>;
    fn shutdown(&mut self, app: &AppState) -> Result<(), Self::LayerErr>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("render failed on frame {0}")]
    struct FrameError(u32);

    struct Recorder {
        calls: Vec<String>,
        fail_on: Option<u32>,
    }

    impl Layer for Recorder {
        type Config = Option<u32>;
        type LayerErr = FrameError;

        fn start(
            fail_on: Option<u32>,
            viewport: Viewport,
            _app: &AppState,
        ) -> Result<Self, FrameError> {
            Ok(Self {
                calls: vec![format!("start {}x{}", viewport.width, viewport.height)],
                fail_on,
            })
        }

        fn resize(&mut self, viewport: Viewport, _app: &AppState) {
            self.calls
                .push(format!("resize {}x{}", viewport.width, viewport.height));
        }

        fn update(&mut self, app: &AppState) {
            self.calls.push(format!("update {}", app.frame_index));
        }

        fn render(&mut self, app: &AppState) -> Result<(), FrameError> {
            if self.fail_on == Some(app.frame_index) {
                return Err(FrameError(app.frame_index));
            }
            self.calls.push(format!("render {}", app.frame_index));
            Ok(())
        }

        fn shutdown(&mut self, _app: &AppState) -> Result<(), FrameError> {
            self.calls.push("shutdown".to_owned());
            Ok(())
        }
    }

    #[test]
    fn run_drives_the_layer_in_order() {
        let mut app = Application::<Recorder>::new(Viewport::new(4, 3));
        app.run(None, 2).expect("no layer errors");

        let calls = &app.layer().expect("started").calls;
        assert_eq!(
            calls,
            &[
                "start 4x3",
                "resize 4x3",
                "update 0",
                "render 0",
                "update 1",
                "render 1",
                "shutdown"
            ]
        );
        assert_eq!(app.state().frame_index, 1);
    }

    #[test]
    fn render_error_stops_before_shutdown() {
        let mut app = Application::<Recorder>::new(Viewport::new(4, 3));
        let err = app.run(Some(1), 3).expect_err("frame 1 fails");
        assert_eq!(err.to_string(), "render failed on frame 1");

        let calls = &app.layer().expect("started").calls;
        assert_eq!(calls.last().map(String::as_str), Some("update 1"));
        assert!(!calls.iter().any(|call| call == "shutdown"));
    }

    #[test]
    fn resize_reaches_a_started_layer() {
        let mut app = Application::<Recorder>::new(Viewport::new(4, 3));
        app.resize(Viewport::new(8, 8));
        assert!(app.layer().is_none());

        app.run(None, 0).expect("no frames");
        app.resize(Viewport::new(2, 2));
        let calls = &app.layer().expect("started").calls;
        assert_eq!(calls, &["start 8x8", "resize 8x8", "shutdown", "resize 2x2"]);
    }

    #[test]
    fn app_state_accumulates_time() {
        let mut state = AppState::new();
        state.update();
        state.update();
        assert!(state.elapsed_time >= 0.0);
        assert!(state.total_time >= state.elapsed_time);
    }
}
