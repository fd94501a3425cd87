use std::num::NonZeroU32;

use anyhow::{Context as _, Result, anyhow, ensure};
use glow::HasContext as _;
use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext as _,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay as _, GlDisplay as _};
use glutin::surface::{GlSurface as _, Surface, SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use raw_window_handle::HasWindowHandle as _;
use thiserror::Error;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::vertex;

mod shader;

use shader::ShaderProgram;

const WINDOW_TITLE: &str = "OpenGL";
const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;

/// Environment failures that leave nothing to render into. Each class maps
/// to its own process exit code so callers can tell them apart.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Failed to create window")]
    Window(#[source] anyhow::Error),
    #[error("Failed to initialize OpenGL")]
    Gl(#[source] anyhow::Error),
}

impl InitError {
    pub fn exit_code(&self) -> u8 {
        match self {
            InitError::Window(_) => 1,
            InitError::Gl(_) => 2,
        }
    }
}

/// Everything the draw loop touches, window included. GPU objects are not
/// deleted individually; they die with the context when this is dropped.
pub struct Renderer {
    gl: glow::Context,
    program: ShaderProgram,
    vao: glow::VertexArray,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl Renderer {
    pub fn new(event_loop: &ActiveEventLoop) -> Result<Self, InitError> {
        let (window, gl_config) = create_window(event_loop).map_err(InitError::Window)?;
        let (surface, context) = create_context(&window, &gl_config).map_err(InitError::Window)?;
        let gl = load_gl(&gl_config).map_err(InitError::Gl)?;

        let program = ShaderProgram::link(&gl).map_err(InitError::Gl)?;
        let vao = upload_triangle(&gl).map_err(InitError::Gl)?;

        let renderer = Renderer {
            gl,
            program,
            vao,
            surface,
            context,
            window,
        };

        let size = renderer.window.inner_size();
        renderer.resize(size);

        Ok(renderer)
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Tracks framebuffer size changes; also called once at startup to
    /// establish the initial viewport.
    pub fn resize(&self, size: PhysicalSize<u32>) {
        let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            // minimized
            return;
        };

        self.surface.resize(&self.context, width, height);
        unsafe { self.gl.viewport(0, 0, size.width as i32, size.height as i32) };
    }

    pub fn draw(&self) {
        let gl = &self.gl;
        unsafe {
            gl.use_program(Some(self.program.raw()));
            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(glow::TRIANGLES, 0, vertex::VERTICES.len() as i32);
            gl.bind_vertex_array(None);
        }

        if let Err(e) = self.surface.swap_buffers(&self.context) {
            log::error!("Failed to present frame: {e}");
        }
    }
}

fn create_window(event_loop: &ActiveEventLoop) -> Result<(Window, Config)> {
    let attrs = Window::default_attributes()
        .with_title(WINDOW_TITLE)
        .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

    let (window, gl_config) = DisplayBuilder::new()
        .with_window_attributes(Some(attrs))
        .build(event_loop, ConfigTemplateBuilder::new(), |mut configs| {
            configs
                .next()
                .expect("display offered no framebuffer configs")
        })
        .map_err(|e| anyhow!("{e}"))?;

    let window = window.context("display builder returned no window")?;
    Ok((window, gl_config))
}

fn create_context(
    window: &Window,
    gl_config: &Config,
) -> Result<(Surface<WindowSurface>, PossiblyCurrentContext)> {
    let raw_handle = window
        .window_handle()
        .context("failed to get window handle")?
        .as_raw();
    let display = gl_config.display();

    let context_attrs = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .with_profile(GlProfile::Core)
        .build(Some(raw_handle));

    let context = unsafe { display.create_context(gl_config, &context_attrs) }
        .context("failed to create a 3.3 core-profile context")?;

    let surface_attrs = window
        .build_surface_attributes(SurfaceAttributesBuilder::<WindowSurface>::new())
        .context("failed to build surface attributes")?;
    let surface = unsafe { display.create_window_surface(gl_config, &surface_attrs) }
        .context("failed to create window surface")?;

    let context = context
        .make_current(&surface)
        .context("failed to make context current")?;

    Ok((surface, context))
}

/// A null lookup for a core entry point means the driver handed us nothing
/// usable, so fail here instead of at the first GL call.
fn load_gl(gl_config: &Config) -> Result<glow::Context> {
    let display = gl_config.display();

    ensure!(
        !display.get_proc_address(c"glCreateShader").is_null(),
        "glCreateShader entry point did not resolve"
    );

    Ok(unsafe { glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name)) })
}

fn upload_triangle(gl: &glow::Context) -> Result<glow::VertexArray> {
    unsafe {
        let vao = gl
            .create_vertex_array()
            .map_err(|e| anyhow!("failed to create vertex array: {e}"))?;
        let vbo = gl
            .create_buffer()
            .map_err(|e| anyhow!("failed to create vertex buffer: {e}"))?;

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(vertex::VERTICES),
            glow::STATIC_DRAW,
        );

        for attribute in &vertex::ATTRIBUTES {
            gl.vertex_attrib_pointer_f32(
                attribute.location,
                attribute.components,
                glow::FLOAT,
                false,
                vertex::STRIDE,
                attribute.offset,
            );
            gl.enable_vertex_attrib_array(attribute.location);
        }

        gl.bind_vertex_array(None);

        Ok(vao)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_failure_class_has_its_own_exit_code() {
        assert_eq!(InitError::Window(anyhow!("boom")).exit_code(), 1);
        assert_eq!(InitError::Gl(anyhow!("boom")).exit_code(), 2);
    }

    #[test]
    fn error_text_names_the_failing_step() {
        assert_eq!(
            InitError::Window(anyhow!("boom")).to_string(),
            "Failed to create window"
        );
        assert_eq!(
            InitError::Gl(anyhow!("boom")).to_string(),
            "Failed to initialize OpenGL"
        );
    }
}
