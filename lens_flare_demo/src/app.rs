/// Windowed demo runtime
///
/// Opens the fixed-size window, creates the Vulkan renderer, lets a `Scene`
/// build its resources and record one command list per swapchain image,
/// then renders continuously until the window closes or Escape is pressed.
/// The window is never resized, so any swapchain error ends the run.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use lens_flare_engine::lensflare::config::LensFlareConfig;
use lens_flare_engine::lensflare::graph::FrameOrchestrator;
use lens_flare_engine::lensflare::render::{CommandList, Renderer};
use lens_flare_engine::{engine_info, engine_error};
use lens_flare_renderer_vulkan::{VulkanRenderer, validation_stats};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

/// GPU content of one demo
///
/// `setup` runs once the renderer exists. It returns the scene, which owns
/// every resource the command lists reference, and the lists themselves in
/// swapchain image order.
pub trait Scene: Sized {
    fn setup(
        renderer: &mut VulkanRenderer,
        config: &LensFlareConfig,
    ) -> Result<(Self, Vec<Box<dyn CommandList>>)>;

    /// Called before each frame, after the previous frame's fence wait
    fn update(&mut self, _elapsed: Duration) -> Result<()> {
        Ok(())
    }
}

/// Run `S` in a window until it is closed
pub fn run_scene<S: Scene>(config: LensFlareConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DemoApp::<S>::new(config);
    event_loop
        .run_app(&mut app)
        .context("event loop terminated with error")?;

    app.shutdown();
    match app.error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Print `error: <message>` and exit with status 1 on failure
pub fn exit_on_error(result: Result<()>) {
    if let Err(error) = result {
        eprintln!("error: {:#}", error);
        std::process::exit(1);
    }
}

/// Live state. Fields drop in declaration order: command lists, scene
/// resources, device, window.
struct Running<S> {
    orchestrator: FrameOrchestrator,
    scene: S,
    renderer: VulkanRenderer,
    window: Window,
}

impl<S> Drop for Running<S> {
    fn drop(&mut self) {
        if let Err(e) = self.renderer.wait_idle() {
            engine_error!("lensflare::demo", "wait_idle before shutdown failed: {}", e);
        }
    }
}

struct DemoApp<S: Scene> {
    config: LensFlareConfig,
    running: Option<Running<S>>,
    start: Instant,
    error: Option<anyhow::Error>,
}

impl<S: Scene> DemoApp<S> {
    fn new(config: LensFlareConfig) -> Self {
        Self {
            config,
            running: None,
            start: Instant::now(),
            error: None,
        }
    }

    fn launch(&self, event_loop: &ActiveEventLoop) -> Result<Running<S>> {
        let window_config = &self.config.window;
        let attributes = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height))
            .with_resizable(window_config.resizable);
        let window = event_loop
            .create_window(attributes)
            .context("failed to create window")?;

        let mut renderer = VulkanRenderer::new(&window, &self.config.renderer)
            .context("failed to initialize Vulkan")?;
        let (scene, command_lists) = S::setup(&mut renderer, &self.config)?;
        let orchestrator = FrameOrchestrator::new(command_lists, &renderer)?;

        let info = renderer.swapchain_info();
        engine_info!("lensflare::demo", "Rendering {}x{} with {} swapchain images",
            info.width, info.height, info.image_count);

        Ok(Running { orchestrator, scene, renderer, window })
    }

    fn frame(&mut self) -> Result<()> {
        let elapsed = self.start.elapsed();
        if let Some(running) = self.running.as_mut() {
            running.scene.update(elapsed)?;
            running.orchestrator.render_frame(&mut running.renderer)?;
        }
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        engine_error!("lensflare::demo", "{:#}", error);
        if self.error.is_none() {
            self.error = Some(error);
        }
        event_loop.exit();
    }

    /// Release GPU state and report counters; safe to call twice
    fn shutdown(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        let stats = running.orchestrator.stats();
        let seconds = self.start.elapsed().as_secs_f64();
        engine_info!("lensflare::demo", "{} frames in {:.1}s", stats.frames_rendered, seconds);
        drop(running);

        if self.config.renderer.enable_validation {
            validation_stats().print_report();
        }
    }
}

impl<S: Scene> ApplicationHandler for DemoApp<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() || self.error.is_some() {
            return;
        }

        match self.launch(event_loop) {
            Ok(running) => {
                self.start = Instant::now();
                self.running = Some(running);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let ours = self.running.as_ref().is_some_and(|r| r.window.id() == window_id);
        if !ours {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event: KeyEvent { logical_key: Key::Named(NamedKey::Escape), state: ElementState::Pressed, .. },
                ..
            } => event_loop.exit(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if event_loop.exiting() {
            return;
        }
        if let Err(e) = self.frame() {
            self.fail(event_loop, e);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}
