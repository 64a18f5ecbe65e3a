//! Same demo as the main binary, but with the shader pair embedded in the
//! executable instead of loaded from a file.

use std::path::Path;
use std::process;

use anyhow::Result;
use log::{error, LevelFilter};
use simple_logger::SimpleLogger;
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoopBuilder,
    keyboard::{KeyCode, PhysicalKey},
};

use trigon::render::shaders::basic_shaders;
use trigon::{AppConfig, EngineError, GlContext, ShaderError, ShaderSource};

const TRIANGLE: [[f32; 3]; 3] = [[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]];

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        process::exit(exit_code(&err));
    }
}

fn run() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Info).init()?;

    let config = AppConfig::load_or_create(Path::new("config.toml"))?;

    let event_loop = EventLoopBuilder::new().build()?;
    let ctx = GlContext::new(&event_loop, &config)?;

    let source = ShaderSource::new(basic_shaders::VERTEX_SRC, basic_shaders::FRAGMENT_SRC);
    let program = ctx.build_program(&source)?;
    let mesh = ctx.upload_mesh(&TRIANGLE);

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => elwt.exit(),
            WindowEvent::Resized(size) => ctx.resize(size),
            WindowEvent::RedrawRequested => {
                ctx.clear();
                ctx.draw(&program, &mesh);
                if let Err(err) = ctx.swap_buffers() {
                    error!("Failed to swap buffers: {}", err);
                }
            }
            _ => (),
        },
        Event::AboutToWait => ctx.request_redraw(),
        _ => (),
    })?;

    Ok(())
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<EngineError>() {
        Some(EngineError::Window(_)) => return 2,
        Some(EngineError::Context(_)) | Some(EngineError::Surface(_)) => return 3,
        None => {}
    }
    if err.is::<ShaderError>() {
        5
    } else {
        1
    }
}
