//! Standalone viewer window backed by winit.
//!
//! ```no_run
//! # use glint::Viewer;
//! Viewer::builder()
//!     .with_title("glint")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```
//!
//! Controls: WASD moves in the view plane, Space/Ctrl moves up/down,
//! arrow keys look around, C toggles accumulation, R restarts it.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::engine::RenderEngine;
use crate::error::GlintError;
use crate::options::Options;
use crate::scene::obj_mesh::TriangleMesh;
use crate::scene::Scene;

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    obj_path: Option<String>,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            obj_path: None,
            options: None,
            title: "glint".into(),
        }
    }

    /// Load an OBJ mesh into the scene at startup.
    #[must_use]
    pub fn with_obj_path(mut self, path: impl Into<String>) -> Self {
        self.obj_path = Some(path.into());
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            obj_path: self.obj_path,
            options: self.options,
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window running the path tracer.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    obj_path: Option<String>,
    options: Option<Options>,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window
    /// is closed.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Viewer`] if the event loop fails, or a mesh
    /// load error before the window opens.
    pub fn run(self) -> Result<(), GlintError> {
        let mut scene = Scene::default();
        if let Some(ref path) = self.obj_path {
            let mesh = TriangleMesh::load(std::path::Path::new(path))?;
            log::info!("loaded '{path}': {} triangles", mesh.triangle_count());
            scene.set_mesh(mesh);
        }

        let event_loop =
            EventLoop::new().map_err(|e| GlintError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            scene: Some(scene),
            options: self.options,
            title: self.title,
            held_keys: HashSet::new(),
            last_frame_time: Instant::now(),
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| GlintError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<RenderEngine>,
    scene: Option<Scene>,
    options: Option<Options>,
    title: String,
    held_keys: HashSet<KeyCode>,
    last_frame_time: Instant,
}

impl ViewerApp {
    /// Translate held keys into camera motion for this frame.
    fn drive_camera(&mut self, dt: f32) {
        let Some(engine) = &mut self.engine else {
            return;
        };

        let key =
            |code| if self.held_keys.contains(&code) { 1.0 } else { 0.0 };
        let direction = Vec3::new(
            key(KeyCode::KeyD) - key(KeyCode::KeyA),
            key(KeyCode::Space) - key(KeyCode::ControlLeft),
            key(KeyCode::KeyW) - key(KeyCode::KeyS),
        );
        if direction != Vec3::ZERO {
            engine.move_camera(direction, dt);
        }

        let pitch = key(KeyCode::ArrowDown) - key(KeyCode::ArrowUp);
        let yaw = key(KeyCode::ArrowRight) - key(KeyCode::ArrowLeft);
        if pitch != 0.0 || yaw != 0.0 {
            engine.look_camera(pitch, yaw, dt);
        }
    }

    /// One-shot key actions, on press only.
    fn handle_key_pressed(&mut self, code: KeyCode) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        match code {
            KeyCode::KeyC => {
                let enabled = !engine.options().accumulation.enabled;
                engine.set_accumulation(enabled);
                log::info!("accumulation {}", if enabled { "on" } else { "off" });
            }
            KeyCode::KeyR => engine.reset_accumulation(),
            _ => {}
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            let logical_w = (mon_size.width as f64 / scale * 0.75) as u32;
            let logical_h = (mon_size.height as f64 / scale * 0.75) as u32;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let inner = window.inner_size();
        let size = (inner.width.max(1), inner.height.max(1));
        let scene = self.scene.take().unwrap_or_default();
        let options = self.options.take().unwrap_or_default();

        let engine = match pollster::block_on(RenderEngine::new(
            window.clone(),
            size,
            scene,
            options,
        )) {
            Ok(e) => e,
            Err(e) => {
                log::error!("failed to initialize engine: {e}");
                event_loop.exit();
                return;
            }
        };

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(event_size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(event_size.width, event_size.height);
                }
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(self.last_frame_time).as_secs_f32();
                self.last_frame_time = now;
                self.drive_camera(dt);

                if let (Some(window), Some(engine)) =
                    (&self.window, &mut self.engine)
                {
                    match engine.render() {
                        Ok(()) => {}
                        Err(
                            wgpu::SurfaceError::Outdated
                            | wgpu::SurfaceError::Lost,
                        ) => {
                            let inner = window.inner_size();
                            engine.resize(inner.width, inner.height);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("out of GPU memory, exiting");
                            event_loop.exit();
                        }
                        Err(e) => {
                            log::error!("render error: {e:?}");
                        }
                    }
                    window.request_redraw();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                match event.state {
                    ElementState::Pressed => {
                        if self.held_keys.insert(code) {
                            self.handle_key_pressed(code);
                        }
                    }
                    ElementState::Released => {
                        let _ = self.held_keys.remove(&code);
                    }
                }
            }

            _ => (),
        }
    }
}
