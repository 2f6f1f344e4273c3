use anyhow::{Context, Result};
use ouroboros::self_referencing;
use std::collections::HashMap;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "skein".to_string(),
            initial_size: LogicalSize::new(960.0, 640.0),
        }
    }
}

/// Requests an app can make from `on_frame`; applied once the callback
/// returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    /// Opens another window driven by the same app.
    pub fn create_window(&mut self, config: RuntimeConfig) {
        self.commands.push(Command::Open(config));
    }

    pub fn close_window(&mut self, id: WindowId) {
        self.commands.push(Command::Close(id));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    Open(RuntimeConfig),
    Close(WindowId),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop until every window is closed or the app exits.
    ///
    /// Windows redraw continuously: scenes animate off `FrameTime::elapsed`
    /// and image loads finish between frames.
    pub fn run<A>(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut host = Host {
            initial,
            gpu_init,
            app,
            windows: HashMap::new(),
            exiting: false,
        };
        event_loop
            .run_app(&mut host)
            .context("winit event loop terminated with error")
    }
}

/// A window and the surface that borrows it.
#[self_referencing]
struct Surface {
    clock: FrameClock,
    window: Window,
    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl Surface {
    fn open(event_loop: &ActiveEventLoop, config: RuntimeConfig, gpu_init: GpuInit) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title)
            .with_inner_size(config.initial_size);
        let window = event_loop.create_window(attrs).context("failed to create window")?;

        SurfaceTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")
    }

    fn fit_to_window(&mut self) {
        self.with_mut(|f| f.gpu.resize(f.window.inner_size()));
    }

    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }
}

struct Host<A> {
    initial: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    windows: HashMap<WindowId, Surface>,
    exiting: bool,
}

impl<A: CoreApp> Host<A> {
    fn open(&mut self, event_loop: &ActiveEventLoop, config: RuntimeConfig) {
        match Surface::open(event_loop, config, self.gpu_init.clone()) {
            Ok(surface) => {
                let id = surface.with_window(|w| w.id());
                log::debug!("window {id:?} opened");
                surface.request_redraw();
                self.windows.insert(id, surface);
            }
            Err(e) => {
                log::error!("{e:#}");
                self.exiting = true;
            }
        }
    }

    fn close(&mut self, id: WindowId) {
        self.windows.remove(&id);
        if self.windows.is_empty() {
            self.exiting = true;
        }
    }

    fn frame(&mut self, window_id: WindowId) -> RuntimeCtx {
        let mut runtime = RuntimeCtx::default();
        let Some(surface) = self.windows.get_mut(&window_id) else {
            return runtime;
        };
        let app = &mut self.app;
        let control = surface.with_mut(|f| {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: f.window,
                },
                gpu: f.gpu,
                time: f.clock.tick(),
                runtime: &mut runtime,
            };
            app.on_frame(&mut ctx)
        });
        if control == AppControl::Exit {
            runtime.exit();
        }
        runtime
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, runtime: RuntimeCtx) {
        for cmd in runtime.commands {
            match cmd {
                Command::Open(config) => self.open(event_loop, config),
                Command::Close(id) => self.close(id),
                Command::Exit => self.exiting = true,
            }
        }
    }
}

impl<A: CoreApp> ApplicationHandler for Host<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.windows.is_empty() {
            self.open(event_loop, self.initial.clone());
        }
        if self.exiting {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exiting {
            event_loop.exit();
            return;
        }
        event_loop.set_control_flow(ControlFlow::Wait);
        for surface in self.windows.values() {
            surface.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.exiting = true;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => self.close(window_id),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(surface) = self.windows.get_mut(&window_id) {
                    surface.fit_to_window();
                    surface.request_redraw();
                }
            }
            WindowEvent::RedrawRequested if !self.exiting => {
                let runtime = self.frame(window_id);
                self.apply(event_loop, runtime);
            }
            _ => {}
        }

        if self.exiting {
            event_loop.exit();
        }
    }
}
