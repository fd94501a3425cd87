use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use crate::gpu::Renderer;

#[derive(Default)]
pub struct App {
    renderer: Option<Renderer>,
    fatal_exit: Option<u8>,
}

impl App {
    /// 0 on a normal close; the failing step's code after a fatal init error.
    pub fn exit_code(&self) -> u8 {
        self.fatal_exit.unwrap_or(0)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // `resumed` can fire again on some platforms; the renderer is built once.
        if self.renderer.is_some() {
            return;
        }

        match Renderer::new(event_loop) {
            Ok(renderer) => {
                renderer.window().request_redraw();
                self.renderer = Some(renderer);
            }
            Err(e) => {
                self.fatal_exit = Some(e.exit_code());
                log::error!("{:#}", anyhow::Error::new(e));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(renderer) = self.renderer.as_ref() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                renderer.resize(size);
            }
            WindowEvent::RedrawRequested => {
                renderer.draw();
                renderer.window().request_redraw();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_shutdown_reports_success() {
        assert_eq!(App::default().exit_code(), 0);
    }
}
