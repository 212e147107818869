use std::any::Any;
use std::env;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use glam::Mat4;
use log::info;
use pollster::block_on;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyboardInput, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::WindowBuilder;

use cratewalk::app::{advance_frame, frame_draw_items, print_final_state};
use cratewalk::{
    camera, AssetPaths, CameraRig, InitError, InputState, KeyCode, Lighting, NamedKey, Renderer,
};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;

    if options.headless {
        return run_headless(options.frames);
    }

    match run_interactive(&options) {
        Ok(()) => Ok(()),
        Err(err) => {
            if should_fall_back(&err) {
                eprintln!(
                    "{err}. Falling back to --headless mode (set DISPLAY or install GPU drivers to enable rendering)."
                );
                run_headless(options.frames)
            } else {
                Err(err)
            }
        }
    }
}

/// Window and device failures are recoverable by simulating instead;
/// everything else (shader, texture, out-of-memory) stays fatal.
fn should_fall_back(err: &anyhow::Error) -> bool {
    if err.downcast_ref::<WindowInitError>().is_some() {
        return true;
    }
    matches!(
        err.downcast_ref::<InitError>(),
        Some(InitError::NoAdapter(_) | InitError::Surface(_))
    )
}

fn run_headless(frames: u32) -> Result<()> {
    let input = InputState::new();
    let mut rig = CameraRig::new();
    for _ in 0..frames {
        advance_frame(&mut rig, &input);
    }
    println!("Simulated {frames} frame(s) without a window");
    print_final_state(&rig);
    Ok(())
}

fn run_interactive(options: &CliOptions) -> Result<()> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop =
        event_loop.map_err(|panic| WindowInitError::from_panic("event loop", panic))?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("cratewalk")
            .with_inner_size(LogicalSize::new(1920.0, 1080.0))
            .build(&event_loop)
            .map_err(|err| WindowInitError::from_error("window", err))?,
    );

    let assets = AssetPaths::new(&options.assets_dir);
    let renderer = block_on(Renderer::new(Arc::clone(&window), &assets))?;

    // Fixed for the whole session: projection from the initial size,
    // lighting from the authored constants.
    let size = window.inner_size();
    let projection = camera::projection(size.width, size.height);
    let lighting = Lighting::default();
    info!(
        "window {}x{}, projection locked to that aspect",
        size.width, size.height
    );

    let mut app = AppState {
        renderer,
        rig: CameraRig::new(),
        input: InputState::new(),
        projection,
        lighting,
        last_error: None,
    };

    let mut event_loop = event_loop;
    event_loop.run_return(|event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        if let Err(err) = app.process_event(&event, control_flow) {
            app.last_error = Some(err);
            control_flow.set_exit();
        }
    });

    print_final_state(&app.rig);

    if let Some(err) = app.last_error {
        return Err(err);
    }

    Ok(())
}

struct AppState {
    renderer: Renderer,
    rig: CameraRig,
    input: InputState,
    projection: Mat4,
    lighting: Lighting,
    last_error: Option<anyhow::Error>,
}

impl AppState {
    fn process_event(&mut self, event: &Event<()>, control_flow: &mut ControlFlow) -> Result<()> {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.renderer.window_id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        control_flow.set_exit();
                    }
                    WindowEvent::Resized(size) => {
                        self.renderer.resize(*size);
                    }
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        self.renderer.resize(**new_inner_size);
                    }
                    WindowEvent::KeyboardInput { input, .. } => {
                        self.handle_keyboard(input);
                    }
                    _ => {}
                }
            }
            Event::RedrawRequested(window_id) if *window_id == self.renderer.window_id() => {
                advance_frame(&mut self.rig, &self.input);
                self.renderer
                    .update_frame(self.rig.view_matrix(), self.projection, &self.lighting);
                if let Err(err) = self.renderer.render(&frame_draw_items(&self.rig)) {
                    match err {
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                            let size = self.renderer.window().inner_size();
                            self.renderer.resize(size);
                        }
                        wgpu::SurfaceError::OutOfMemory => {
                            return Err(anyhow!("GPU is out of memory"));
                        }
                        wgpu::SurfaceError::Timeout => {
                            info!("Surface timeout; retrying next frame");
                        }
                    }
                }
            }
            Event::MainEventsCleared => {
                self.renderer.window().request_redraw();
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_keyboard(&self, input: &KeyboardInput) {
        let Some(keycode) = input.virtual_keycode.and_then(map_keycode) else {
            return;
        };
        match input.state {
            ElementState::Pressed => self.input.set_key_down(keycode),
            ElementState::Released => self.input.set_key_up(keycode),
        }
    }
}

fn map_keycode(code: winit::event::VirtualKeyCode) -> Option<KeyCode> {
    use winit::event::VirtualKeyCode as Key;
    Some(match code {
        Key::Up => KeyCode::Named(NamedKey::Up),
        Key::Down => KeyCode::Named(NamedKey::Down),
        Key::Left => KeyCode::Named(NamedKey::Left),
        Key::Right => KeyCode::Named(NamedKey::Right),
        Key::Space => KeyCode::Named(NamedKey::Space),
        Key::Key0 | Key::Numpad0 => KeyCode::Digit(0),
        Key::Key1 | Key::Numpad1 => KeyCode::Digit(1),
        Key::Key2 | Key::Numpad2 => KeyCode::Digit(2),
        Key::Key3 | Key::Numpad3 => KeyCode::Digit(3),
        _ => return None,
    })
}

#[derive(Debug)]
struct WindowInitError {
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {}", panic_message(panic)),
        }
    }

    fn from_error(stage: &str, err: impl fmt::Display) -> Self {
        Self {
            message: format!("failed to initialize {stage}: {err}"),
        }
    }
}

impl fmt::Display for WindowInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for WindowInitError {}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

struct CliOptions {
    assets_dir: PathBuf,
    headless: bool,
    frames: u32,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut assets_dir = PathBuf::from("assets");
        let mut headless = false;
        let mut frames = 60u32;

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--assets" => {
                    let Some(dir) = args.next() else {
                        return Err(anyhow!("--assets expects a directory path"));
                    };
                    assets_dir = PathBuf::from(dir);
                }
                "--headless" => headless = true,
                "--frames" => {
                    let Some(count) = args.next() else {
                        return Err(anyhow!("--frames expects a frame count"));
                    };
                    frames = count
                        .parse()
                        .map_err(|_| anyhow!("--frames expects a number, got {count}"))?;
                    headless = true;
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Usage: cratewalk [--assets DIR] [--headless] [--frames N]"
                    ));
                }
            }
        }

        Ok(Self {
            assets_dir,
            headless,
            frames,
        })
    }
}
