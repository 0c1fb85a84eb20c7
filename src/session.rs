//! Render session: one build generation of GPU resources
//!
//! A [`RenderSession`] is the atomically replaceable set of resources the
//! viewer runs on: render engine, scene graph, UI manager and frame timer.
//! At most one session is live at a time. Quality or antialiasing changes
//! tear the whole generation down and build a fresh one; the camera pose is
//! the only state carried across (by value, through the app).
//!
//! Teardown ordering is structural: the session must be taken out of the
//! app before disposal, so no scheduled frame can reach freed resources,
//! and `dispose` consumes the session so it cannot be disposed twice.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    event::{DeviceEvent, KeyEvent, WindowEvent},
    window::{Window, WindowId},
};

use crate::config::{CategoryColors, ConfigEvent, RoomConfig};
use crate::error::GalleyError;
use crate::gfx::{
    camera::{camera_utils::CameraManager, orbit_camera::CameraPose},
    rendering::{render_engine::RenderEngine, screenshot},
    scene::scene::Scene,
};
use crate::performance::FrameTimer;
use crate::ui::{ControlPanel, UiManager};

/// Lifecycle of the resource manager
///
/// Cycles `Uninitialized -> Building -> Running -> TearingDown ->
/// Uninitialized` on every configuration change; `Disposed` is terminal on
/// unmount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Building,
    Running,
    TearingDown,
    Disposed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Building => "building",
            LifecycleState::Running => "running",
            LifecycleState::TearingDown => "tearing-down",
            LifecycleState::Disposed => "disposed",
        };
        f.write_str(name)
    }
}

/// One complete, atomically replaceable build generation
///
/// Field order is teardown order: the UI overlay goes first, then the scene
/// (geometry and materials), then the renderer that owns the device and
/// surface — so nothing outlives the resources it references.
pub struct RenderSession {
    ui_manager: UiManager,
    scene: Scene,
    timer: FrameTimer,
    renderer: RenderEngine,
}

impl RenderSession {
    /// Allocates a full generation: renderer, scene graph (uploaded),
    /// camera restored from `pose`, UI manager and frame timer
    pub fn build(
        window: Arc<Window>,
        config: &RoomConfig,
        colors: &CategoryColors,
        pose: CameraPose,
    ) -> Result<Self, GalleyError> {
        let (width, height): (u32, u32) = window.inner_size().into();

        let renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            config.antialias,
        ))?;

        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let camera_manager = CameraManager::restore(pose, aspect);

        let mut scene = Scene::build(config.quality, colors, camera_manager);
        scene.init_gpu_resources(renderer.device(), renderer.queue());

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );

        let stats = scene.statistics();
        log::info!(
            "session built: quality={} antialias={} objects={} triangles={}",
            config.quality,
            config.antialias,
            stats.object_count,
            stats.total_triangles
        );

        Ok(Self {
            ui_manager,
            scene,
            timer: FrameTimer::new(),
            renderer,
        })
    }

    /// One render loop step: timing, camera damping, uniform sync, scene
    /// pass, UI overlay pass
    ///
    /// Returns the panel's requested configuration changes and whether the
    /// camera pose moved this frame.
    pub fn frame(
        &mut self,
        window: &Window,
        panel: &mut ControlPanel,
        config: &RoomConfig,
        colors: &CategoryColors,
    ) -> (Vec<ConfigEvent>, bool) {
        self.timer.begin_frame();

        let pose_changed = self.scene.update();
        self.renderer
            .update(self.scene.camera_manager.camera.uniform, &self.scene.lights);
        self.scene
            .sync_materials(self.renderer.device(), self.renderer.queue());

        let mut events = Vec::new();
        let triangle_count = self.scene.statistics().total_triangles;

        let ui_manager = &mut self.ui_manager;
        let timer = &self.timer;
        let scene = &self.scene;
        let draw_calls = self
            .renderer
            .render_frame(scene, |device, queue, encoder, view| {
                ui_manager.draw(device, queue, encoder, window, view, |ui| {
                    panel.draw(ui, config, colors, &mut events);
                    timer.render_overlay(ui);
                });
            });

        self.timer.set_render_stats(draw_calls, triangle_count);
        self.timer.end_frame();

        (events, pose_changed)
    }

    /// Routes a window event through the UI first; true when consumed
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        window_id: WindowId,
        event: &WindowEvent,
    ) -> bool {
        let wrapped: winit::event::Event<()> = winit::event::Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        self.ui_manager.handle_input(window, &wrapped)
    }

    /// Camera input, suppressed while a UI widget has focus
    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if self.ui_manager.wants_input() {
            return;
        }
        self.scene.camera_manager.process_event(event);
    }

    pub fn handle_keyboard_event(&mut self, event: &KeyEvent) {
        if self.ui_manager.wants_input() {
            return;
        }
        self.scene.camera_manager.process_keyboard_event(event);
    }

    /// Resize never rebuilds: reconfigure the surface, recreate the
    /// size-dependent attachments and fix the camera aspect
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
        self.scene
            .camera_manager
            .camera
            .resize_projection(width, height);
    }

    pub fn camera_pose(&self) -> CameraPose {
        self.scene.camera_manager.pose()
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Captures the scene to `kitchen-screenshot.png`
    pub fn capture_screenshot(&self) -> Result<PathBuf, GalleyError> {
        screenshot::capture(&self.renderer, &self.scene)
    }

    /// Tears the generation down in dependency order
    ///
    /// Consuming `self` makes a second disposal unrepresentable; the
    /// caller's `Option::take` makes repeated teardown requests no-ops.
    pub fn dispose(self, reason: &str) {
        log::info!("tearing down render session ({reason})");

        let RenderSession {
            ui_manager,
            scene,
            timer,
            renderer,
        } = self;

        // Overlay and input plumbing first, so nothing can draw or capture
        drop(ui_manager);
        // Scene geometry and materials next
        drop(scene);
        drop(timer);
        // The renderer owns device, queue and surface; it goes last
        drop(renderer);

        log::debug!("render session disposed");
    }
}
