use std::process::ExitCode;

use winit::event_loop::{ControlFlow, EventLoop};

mod app;
mod gpu;
mod vertex;

fn main() -> ExitCode {
    env_logger::init();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {e}");
            return ExitCode::from(1);
        }
    };

    // ControlFlow::Poll keeps the loop spinning even when the OS has no
    // events for us; redraws are re-requested every frame.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::default();
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop terminated with error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::from(app.exit_code())
}
