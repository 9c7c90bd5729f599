use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{Engine, EngineConfig, Sketch};
use crate::device::{Gpu, GpuInit};
use crate::error::{EngineError, InitError};
use crate::input::platform::winit::{to_logical_size, EventTranslator};
use crate::input::Event;
use crate::render::GpuRasterizer;

/// Entry point for the windowed runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, runs `sketch` until quit, then releases everything.
    ///
    /// Returns the first initialization or frame error; the loop stops on it.
    pub fn run<S>(config: EngineConfig, gpu_init: GpuInit, sketch: S) -> Result<(), EngineError>
    where
        S: Sketch + 'static,
    {
        let event_loop = EventLoop::new().map_err(|e| InitError::Platform(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut state = AppState::new(config, gpu_init, sketch);
        event_loop
            .run_app(&mut state)
            .map_err(|e| InitError::Platform(format!("event loop terminated: {e}")))?;

        state.finish()
    }
}

struct AppState<S: Sketch> {
    config: EngineConfig,
    gpu_init: GpuInit,
    sketch: S,

    window: Option<Arc<Window>>,
    engine: Option<Engine>,
    translator: EventTranslator,

    failure: Option<EngineError>,
}

impl<S: Sketch> AppState<S> {
    fn new(config: EngineConfig, gpu_init: GpuInit, sketch: S) -> Self {
        Self {
            config,
            gpu_init,
            sketch,
            window: None,
            engine: None,
            translator: EventTranslator::default(),
            failure: None,
        }
    }

    fn create_engine(&mut self, event_loop: &ActiveEventLoop) -> Result<(), InitError> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
            .with_resizable(self.config.resizable);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| InitError::Window(e.to_string()))?,
        );
        log::info!(
            "window created: \"{}\" {}x{}",
            self.config.title,
            self.config.width,
            self.config.height
        );

        let gpu = pollster::block_on(Gpu::new(window.clone(), self.gpu_init.clone()))?;
        log::info!("render surface ready ({:?})", gpu.surface_format());

        let raster = GpuRasterizer::new(window.clone(), gpu);
        let mut engine = Engine::new(&self.config, Box::new(raster));

        // The platform may round or scale the requested size.
        let (width, height) = to_logical_size(&window, window.inner_size());
        engine.handle_event(&Event::Resized { width, height });

        self.sketch.setup(&mut engine);
        window.request_redraw();

        self.window = Some(window);
        self.engine = Some(engine);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: EngineError) {
        log::error!("{err}");
        if self.failure.is_none() {
            self.failure = Some(err);
        }
        event_loop.exit();
    }

    /// Releases the engine before the window and reports the stored failure.
    fn finish(mut self) -> Result<(), EngineError> {
        if let Some(mut engine) = self.engine.take() {
            engine.shutdown();
        }
        self.window = None;

        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<S: Sketch> ApplicationHandler for AppState<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() {
            return;
        }

        if let Err(e) = self.create_engine(event_loop) {
            self.fail(event_loop, e.into());
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Continuous redraw; the interval timer decides when `update` runs.
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(engine)) = (self.window.as_ref(), self.engine.as_mut()) else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        match &event {
            WindowEvent::Resized(size) => engine.resize_surface(size.width, size.height),
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = window.inner_size();
                engine.resize_surface(size.width, size.height);
            }
            _ => {}
        }

        let mut close_requested = false;
        if let Some(ev) = self.translator.translate(window, &event) {
            close_requested = ev == Event::Quit;
            engine.dispatch_event(&mut self.sketch, &ev);
        }

        if close_requested || engine.quit_requested() {
            log::info!("quit requested");
            event_loop.exit();
            return;
        }

        if let WindowEvent::RedrawRequested = event {
            if let Err(e) = engine.frame(&mut self.sketch) {
                self.fail(event_loop, e.into());
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(engine) = self.engine.as_mut() {
            engine.shutdown();
        }
    }
}
