//! Application shell and resource lifecycle
//!
//! Hosts the winit event loop, owns the configuration state that outlives
//! render sessions (quality, antialiasing, colors, camera pose) and drives
//! the teardown/rebuild cycle when rebuild-relevant configuration changes.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::config::{CategoryColors, ConfigEvent, RoomConfig};
use crate::gfx::camera::orbit_camera::CameraPose;
use crate::session::{LifecycleState, RenderSession};
use crate::ui::ControlPanel;

pub struct GalleyApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

impl GalleyApp {
    /// Creates the application with default configuration
    pub fn new() -> Result<Self, winit::error::EventLoopError> {
        let event_loop = EventLoop::new()?;
        let config = RoomConfig::default();

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                session: None,
                lifecycle: LifecycleState::Uninitialized,
                panel: ControlPanel::new(&config),
                config,
                colors: CategoryColors::default(),
                camera_pose: CameraPose::default(),
            },
        })
    }

    /// Runs the application (consumes self and starts the event loop)
    pub fn run(mut self) {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .expect("Failed to run event loop");
    }
}

struct AppState {
    window: Option<Arc<Window>>,
    session: Option<RenderSession>,
    lifecycle: LifecycleState,
    panel: ControlPanel,

    // State that outlives build generations
    config: RoomConfig,
    colors: CategoryColors,
    camera_pose: CameraPose,
}

impl AppState {
    fn set_lifecycle(&mut self, state: LifecycleState) {
        if self.lifecycle != state {
            log::debug!("lifecycle: {} -> {}", self.lifecycle, state);
            self.lifecycle = state;
        }
    }

    /// Tears down the current generation (if any) and builds a new one for
    /// `new_config`. Exactly one teardown precedes exactly one build.
    fn rebuild_session(&mut self, new_config: RoomConfig) {
        let Some(window) = self.window.clone() else {
            // Mount point not ready; do not allocate anything
            log::warn!("rebuild requested before a window exists");
            return;
        };

        if let Some(session) = self.session.take() {
            self.set_lifecycle(LifecycleState::TearingDown);
            self.camera_pose = session.camera_pose();
            session.dispose("configuration change");
        }

        self.config = new_config.clamped();
        self.panel.sync_quality(self.config.quality);

        self.set_lifecycle(LifecycleState::Building);
        match RenderSession::build(window.clone(), &self.config, &self.colors, self.camera_pose) {
            Ok(session) => {
                self.session = Some(session);
                self.set_lifecycle(LifecycleState::Running);
            }
            Err(error) => {
                // Fatal for this build attempt; reported, never retried
                log::error!("failed to build render session: {error}");
                window.set_title(&format!("galley — unable to render: {error}"));
                self.set_lifecycle(LifecycleState::Uninitialized);
            }
        }
    }

    /// Final teardown; safe to call repeatedly
    fn teardown(&mut self, reason: &str) {
        if let Some(session) = self.session.take() {
            self.set_lifecycle(LifecycleState::TearingDown);
            self.camera_pose = session.camera_pose();
            session.dispose(reason);
        }
    }

    /// Applies panel events after the frame that produced them
    ///
    /// Color changes and screenshots act on the live session; quality and
    /// antialiasing changes are batched into a single rebuild.
    fn apply_events(&mut self, events: Vec<ConfigEvent>) {
        let mut pending = self.config;

        for event in events {
            match event {
                ConfigEvent::SetQuality(quality) => pending.quality = quality,
                ConfigEvent::SetAntialias(antialias) => pending.antialias = antialias,
                ConfigEvent::SetColor(category, color) => {
                    // The color map is authoritative and updated first; a
                    // recolor landing mid-rebuild is deferred by seeding
                    // the next build from the map
                    self.colors.set(category, color);
                    if let Some(session) = self.session.as_mut() {
                        session.scene_mut().recolor(category, color);
                    }
                }
                ConfigEvent::CaptureScreenshot => match self.session.as_ref() {
                    Some(session) => match session.capture_screenshot() {
                        Ok(path) => self.panel.set_status(format!("Saved {}", path.display())),
                        Err(error) => {
                            log::warn!("screenshot failed: {error}");
                            self.panel.set_status(format!("Screenshot failed: {error}"));
                        }
                    },
                    None => {
                        log::warn!("screenshot requested without a live session");
                        self.panel.set_status("Screenshot unavailable");
                    }
                },
            }
        }

        if pending.clamped().needs_rebuild(&self.config) {
            self.rebuild_session(pending);
        }
    }

    /// One step of the render loop, reached via `RedrawRequested`
    ///
    /// Only a live session can be stepped, so a frame can never observe a
    /// partially torn-down generation.
    fn frame(&mut self) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let (events, pose_changed) =
            session.frame(&window, &mut self.panel, &self.config, &self.colors);

        if pose_changed {
            self.camera_pose = session.camera_pose();
        }
        if !events.is_empty() {
            self.apply_events(events);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match event_loop.create_window(
            WindowAttributes::default()
                .with_title("galley — kitchen configurator")
                .with_inner_size(winit::dpi::LogicalSize::new(1280, 800)),
        ) {
            Ok(window) => {
                self.window = Some(Arc::new(window));
                let config = self.config;
                self.rebuild_session(config);
            }
            Err(error) => {
                log::error!("failed to create window: {error}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // The overlay gets first refusal on input
        if let Some(session) = self.session.as_mut() {
            if session.handle_window_event(&window, window_id, &event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if matches!(
                    key_event.physical_key,
                    winit::keyboard::PhysicalKey::Code(winit::keyboard::KeyCode::Escape)
                ) {
                    event_loop.exit();
                    return;
                }
                if let Some(session) = self.session.as_mut() {
                    session.handle_keyboard_event(&key_event);
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(session) = self.session.as_mut() {
                    session.handle_resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.frame();
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        if let Some(session) = self.session.as_mut() {
            session.handle_device_event(&event);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Continuous loop: schedule the next vsync-paced frame
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown("unmount");
        self.set_lifecycle(LifecycleState::Disposed);
    }
}
