use anyhow::{Result, anyhow};
use glow::HasContext as _;

const VERTEX_SOURCE: &str = include_str!("../shaders/triangle.vert");
const FRAGMENT_SOURCE: &str = include_str!("../shaders/triangle.frag");

/// Driver info logs are unbounded; clamp what gets printed.
const MAX_INFO_LOG_BYTES: usize = 512;

/// The one linked program this crate ever uses.
pub struct ShaderProgram(glow::Program);

impl ShaderProgram {
    /// Compiles both stages and links them into a program. Compile and link
    /// failures are logged but not fatal: the (possibly invalid) program is
    /// still returned and used, which at worst draws nothing. Only failure
    /// to create the GL objects themselves is an error.
    pub fn link(gl: &glow::Context) -> Result<Self> {
        let vertex = Stage::compile(gl, glow::VERTEX_SHADER, VERTEX_SOURCE)?;
        let fragment = Stage::compile(gl, glow::FRAGMENT_SHADER, FRAGMENT_SOURCE)?;

        let program = unsafe { gl.create_program() }
            .map_err(|e| anyhow!("failed to create program object: {e}"))?;

        unsafe {
            gl.attach_shader(program, vertex.raw);
            gl.attach_shader(program, fragment.raw);
            gl.link_program(program);
        }

        if !unsafe { gl.get_program_link_status(program) } {
            let info = unsafe { gl.get_program_info_log(program) };
            log::error!("Failed to link program: {}", bounded_info_log(&info));
        }

        // `vertex` and `fragment` drop here, releasing the stage objects.
        Ok(ShaderProgram(program))
    }

    pub fn raw(&self) -> glow::Program {
        self.0
    }
}

/// A compiled stage object, deleted on drop. Deleting a stage that is still
/// attached only flags it; the linked program keeps working.
struct Stage<'gl> {
    gl: &'gl glow::Context,
    raw: glow::Shader,
}

impl<'gl> Stage<'gl> {
    fn compile(gl: &'gl glow::Context, stage_type: u32, source: &str) -> Result<Self> {
        let raw = unsafe { gl.create_shader(stage_type) }
            .map_err(|e| anyhow!("failed to create shader object: {e}"))?;
        let stage = Stage { gl, raw };

        unsafe {
            gl.shader_source(stage.raw, source);
            gl.compile_shader(stage.raw);
        }

        if !unsafe { gl.get_shader_compile_status(stage.raw) } {
            let info = unsafe { gl.get_shader_info_log(stage.raw) };
            log::error!("Failed to compile shader: {}", bounded_info_log(&info));
        }

        Ok(stage)
    }
}

impl Drop for Stage<'_> {
    fn drop(&mut self) {
        unsafe { self.gl.delete_shader(self.raw) };
    }
}

/// Clamp an info log to `MAX_INFO_LOG_BYTES`, cutting on a character
/// boundary. Some drivers include the terminating NUL in the log; strip it.
fn bounded_info_log(info: &str) -> &str {
    let info = info.trim_end_matches('\0');
    if info.len() <= MAX_INFO_LOG_BYTES {
        return info;
    }

    let mut end = MAX_INFO_LOG_BYTES;
    while !info.is_char_boundary(end) {
        end -= 1;
    }
    &info[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_target_glsl_330_core() {
        assert!(VERTEX_SOURCE.starts_with("#version 330 core"));
        assert!(FRAGMENT_SOURCE.starts_with("#version 330 core"));
    }

    #[test]
    fn vertex_source_declares_both_input_slots() {
        assert!(VERTEX_SOURCE.contains("layout (location = 0) in vec2 vertInPos;"));
        assert!(VERTEX_SOURCE.contains("layout (location = 1) in vec3 vertInColor;"));
    }

    #[test]
    fn short_logs_pass_through_unchanged() {
        assert_eq!(bounded_info_log(""), "");
        assert_eq!(
            bounded_info_log("0:1(10): error: syntax error"),
            "0:1(10): error: syntax error"
        );
    }

    #[test]
    fn trailing_nul_is_stripped() {
        assert_eq!(bounded_info_log("error\0"), "error");
    }

    #[test]
    fn long_logs_clamp_to_the_limit() {
        let long = "e".repeat(MAX_INFO_LOG_BYTES + 100);
        assert_eq!(bounded_info_log(&long).len(), MAX_INFO_LOG_BYTES);
    }

    #[test]
    fn clamp_lands_on_a_char_boundary() {
        // One ASCII byte followed by two-byte chars puts the byte limit in
        // the middle of a character.
        let long = format!("x{}", "é".repeat(MAX_INFO_LOG_BYTES));
        let clamped = bounded_info_log(&long);
        assert_eq!(clamped.len(), MAX_INFO_LOG_BYTES - 1);
        assert!(long.starts_with(clamped));
    }
}
