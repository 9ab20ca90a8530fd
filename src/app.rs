use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::Config;
use crate::core::{ClockScheduler, Command, HostClock, KeyboardControls, Session};
use crate::engine::RotationCipher;
use crate::renderer::{PanelStatus, SurfaceRenderer};

type PlayerSession = Session<RotationCipher, SurfaceRenderer>;

/// Window, GPU surface and playback session wired together
pub struct App {
    config: Config,
    window: Option<Arc<Window>>,
    session: Option<PlayerSession>,
    controls: KeyboardControls,
    clock: HostClock,
    last_error: Option<String>,
    fatal: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let controls = KeyboardControls::new(config.rate_control());
        Self {
            config,
            window: None,
            session: None,
            controls,
            clock: HostClock::new(),
            last_error: None,
            fatal: None,
        }
    }

    /// Error that stopped the event loop, if any
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.fatal.take()
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title("Frame Scrubber")
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        self.config.window_width,
                        self.config.window_height,
                    )),
            )
            .map(Arc::new)
            .context("Failed to create window")?;

        let renderer = pollster::block_on(SurfaceRenderer::new(window.clone(), self.config.show_ui))
            .context("Failed to initialize renderer")?;

        let dimensions = self.config.frame_dimensions()?;
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let source = RotationCipher::seeded(dimensions, self.config.steps, seed)?;
        info!("animation {} with {} steps, seed {}", dimensions, self.config.steps, seed);

        let scheduler = ClockScheduler::with_catch_up(self.config.max_catch_up_ticks);
        let mut session = Session::new(source, renderer, scheduler, self.config.playback_rate()?)
            .context("Failed to set up playback")?;
        session.redraw().context("Failed to draw the first frame")?;

        self.clock.restart();
        self.window = Some(window);
        self.session = Some(session);
        Ok(())
    }

    fn record(&mut self, result: crate::core::Result<()>) {
        match result {
            Ok(()) => self.last_error = None,
            Err(err) => self.last_error = Some(err.to_string()),
        }
    }

    fn dispatch(&mut self, command: Command) {
        if let Some(session) = self.session.as_mut() {
            let result = session.dispatch(command);
            self.record(result);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let delta = self.clock.delta();
        let (Some(session), Some(window)) = (self.session.as_mut(), self.window.as_ref()) else {
            return;
        };

        if let Err(err) = session.advance(delta) {
            self.last_error = Some(err.to_string());
        }

        let status = PanelStatus {
            state: session.state(),
            progress: session.progress(),
            rate: session.rate(),
            error: self.last_error.as_deref(),
        };
        let rate = self.controls.rate_mut();

        let commands = match session.target_mut().render(window, status, rate) {
            Ok(commands) => commands,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                session.target_mut().reconfigure();
                Vec::new()
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("surface out of memory");
                event_loop.exit();
                Vec::new()
            }
            Err(e) => {
                warn!("Render error: {}", e);
                Vec::new()
            }
        };

        for command in commands {
            self.dispatch(command);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                error!("{:#}", e);
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(session), Some(window)) = (&mut self.session, &self.window) {
            if session.target_mut().handle_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(session) = self.session.as_mut() {
                    session.target_mut().resize(size);
                    let result = session.refresh();
                    self.record(result);
                }
            }
            WindowEvent::KeyboardInput { .. } => {
                if let Some(command) = self.controls.process_event(&event) {
                    self.dispatch(command);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
