//! Gridsong - a grid of bobbing movers, each column singing one tone
//!
//! Movers rise and fall under sine + noise motion; the front mover of each
//! column sets its voice's loudness every frame.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use gridsong::audio::{AudioSystem, HeadlessVoices};
use gridsong::camera::OrbitCamera;
use gridsong::cli::Args;
use gridsong::error::SimError;
use gridsong::params::{OrbitParams, RenderConfig, SimConfig};
use gridsong::rendering::RenderSystem;
use gridsong::scene::ScenePresenter;
use gridsong::scheduler::{FrameClock, NullPresenter, Presenter, Scheduler, TickOutcome};

/// Main application state
struct App {
    args: Args,
    config: SimConfig,
    render_config: RenderConfig,

    // Window and presentation
    window: Option<Arc<Window>>,
    scene: ScenePresenter,

    // Simulation (present once started)
    scheduler: Option<Scheduler>,
    audio: Option<AudioSystem>,
    clock: FrameClock,

    // Mouse orbit state
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
}

impl App {
    fn new(args: Args) -> Self {
        let config = args.sim_config();
        let render_config = RenderConfig::default();
        let scene = ScenePresenter::new(
            OrbitCamera::new(OrbitParams::default()),
            render_config.clone(),
        );

        Self {
            args,
            config,
            render_config,
            window: None,
            scene,
            scheduler: None,
            audio: None,
            clock: FrameClock::new(),
            dragging: false,
            last_cursor: None,
        }
    }

    /// Start trigger: open audio and initialize the simulation exactly once
    fn start(&mut self) -> Result<(), SimError> {
        if self.scheduler.is_some() {
            return Err(SimError::AlreadyInitialized);
        }

        let mut audio = AudioSystem::new(
            self.config.motion.columns,
            &self.config.voices,
            &self.args.drone_params(),
            self.args.recording_config(),
        )?;
        let scheduler = Scheduler::initialize(&self.config, &mut audio)?;

        self.audio = Some(audio);
        self.scheduler = Some(scheduler);
        self.clock = FrameClock::new();
        log::info!("Started. Drag to orbit, scroll to zoom, Esc to quit");
        Ok(())
    }

    /// Run a single frame
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.clock.delta();

        let result = match (self.scheduler.as_mut(), self.audio.as_mut()) {
            (Some(scheduler), Some(audio)) => scheduler.tick(dt, audio, &mut self.scene).map(|_| ()),
            // Before the start trigger the empty scene still orbits
            _ => {
                self.scene.update_camera(dt);
                self.scene.draw()
            }
        };

        if let Err(e) = result {
            log::error!("Frame failed: {}", e);
            self.shutdown(event_loop);
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.stop();
        }
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        match code {
            KeyCode::Escape => self.shutdown(event_loop),
            KeyCode::Space | KeyCode::Enter => match self.start() {
                Ok(()) => {}
                Err(SimError::AlreadyInitialized) => {}
                Err(e) => {
                    log::error!("Initialization failed: {}", e);
                    self.shutdown(event_loop);
                }
            },
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("Gridsong")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        // Initialize rendering system
        let instances = self.config.motion.mover_count() + 64;
        match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.render_config,
            instances,
        )) {
            Ok(renderer) => self.scene.attach(renderer),
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        }

        let size = window.inner_size();
        self.scene.resize(size.width, size.height);
        self.window = Some(window);

        if self.args.autostart {
            self.handle_key(event_loop, KeyCode::Space);
        } else {
            log::info!("Press Space or Enter to start");
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code),
            WindowEvent::Resized(size) => self.scene.resize(size.width, size.height),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let (true, Some((x, y))) = (self.dragging, self.last_cursor) {
                    self.scene
                        .camera_mut()
                        .drag((position.x - x) as f32, (position.y - y) as f32);
                }
                self.last_cursor = Some((position.x, position.y));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / 40.0) as f32,
                };
                self.scene.camera_mut().scroll(lines);
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }
}

/// Run the core without window or audio device, logging column levels
fn run_headless(config: &SimConfig, ticks: u64) -> anyhow::Result<()> {
    let mut voices = HeadlessVoices::new(config.motion.columns);
    let mut scheduler = Scheduler::initialize(config, &mut voices)?;
    let dt = 1.0 / 60.0;

    for _ in 0..ticks {
        let outcome = scheduler.tick(dt, &mut voices, &mut NullPresenter)?;
        if let TickOutcome::Advanced { tick, .. } = outcome {
            if tick % 60 == 0 {
                let levels: Vec<String> = (0..config.motion.columns.min(6))
                    .filter_map(|c| voices.level_db(c))
                    .map(|db| format!("{:.1}", db))
                    .collect();
                log::info!("tick {}: column dB [{} ...]", tick, levels.join(", "));
            }
        }
    }

    scheduler.stop();
    if let Some(walker) = &scheduler.context().walker {
        log::info!(
            "Walker at {:?} after {} steps",
            walker.position(),
            walker.markers_spawned()
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Some(ticks) = args.headless {
        return run_headless(&args.sim_config(), ticks);
    }

    // Fail fast on configuration before opening any device
    args.sim_config()
        .validate()
        .context("invalid configuration")?;

    log::info!("Gridsong - initializing window...");

    let mut app = App::new(args);
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;
    Ok(())
}
