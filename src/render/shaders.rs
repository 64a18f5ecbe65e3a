use gl::types::*;
use std::ffi::{CString, NulError};
use std::fmt;
use std::ptr;

use thiserror::Error;

use crate::assets::shaders::ShaderSource;
use crate::engine::GlContext;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage} shader compilation failed: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("Program linking failed: {0}")]
    Link(String),
    #[error("Null byte in shader source: {0}")]
    Nul(#[from] NulError),
}

/// One of the two programmable pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// A compiled shader object for a single stage. Only lives for the duration
/// of a program build; the GL object is released on drop.
struct CompiledShader {
    id: GLuint,
    stage: ShaderStage,
}

impl CompiledShader {
    fn compile(stage: ShaderStage, source: &str) -> Result<Self, ShaderError> {
        let c_source = CString::new(source.as_bytes())?;

        let shader = CompiledShader {
            id: unsafe { gl::CreateShader(stage.gl_enum()) },
            stage,
        };

        unsafe {
            gl::ShaderSource(shader.id, 1, &c_source.as_ptr(), ptr::null());
            gl::CompileShader(shader.id);
        }

        let mut success = 1;
        unsafe {
            gl::GetShaderiv(shader.id, gl::COMPILE_STATUS, &mut success);
        }

        if success == 0 {
            return Err(ShaderError::Compile {
                stage: shader.stage,
                log: shader_info_log(shader.id),
            });
        }

        Ok(shader)
    }
}

impl Drop for CompiledShader {
    fn drop(&mut self) {
        unsafe { gl::DeleteShader(self.id) };
    }
}

/// A linked, GPU-resident shader program.
pub struct ShaderProgram {
    id: GLuint,
}

impl GlContext {
    /// Compiles both stages of `source` and links them into a program.
    ///
    /// A failed stage aborts the build before linking; the compiler and
    /// linker diagnostics are carried in the returned error.
    pub fn build_program(&self, source: &ShaderSource) -> Result<ShaderProgram, ShaderError> {
        let vertex = CompiledShader::compile(ShaderStage::Vertex, &source.vertex)?;
        let fragment = CompiledShader::compile(ShaderStage::Fragment, &source.fragment)?;

        let program = ShaderProgram {
            id: unsafe { gl::CreateProgram() },
        };

        unsafe {
            gl::AttachShader(program.id, vertex.id);
            gl::AttachShader(program.id, fragment.id);
            gl::LinkProgram(program.id);
        }

        // The stage objects are no longer needed once the program is linked.
        drop(vertex);
        drop(fragment);

        let mut success = 1;
        unsafe {
            gl::GetProgramiv(program.id, gl::LINK_STATUS, &mut success);
        }

        if success == 0 {
            return Err(ShaderError::Link(program_info_log(program.id)));
        }

        unsafe {
            gl::ValidateProgram(program.id);
        }

        let mut valid = 1;
        unsafe {
            gl::GetProgramiv(program.id, gl::VALIDATE_STATUS, &mut valid);
        }

        if valid == 0 {
            log::warn!("Program validation reported: {}", program_info_log(program.id));
        }

        Ok(program)
    }
}

impl ShaderProgram {
    pub fn id(&self) -> GLuint {
        self.id
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) };
    }
}

fn shader_info_log(id: GLuint) -> String {
    let mut len = 0;
    unsafe {
        gl::GetShaderiv(id, gl::INFO_LOG_LENGTH, &mut len);
    }

    let buffer = whitespace_cstring_with_len(len as usize);
    unsafe {
        gl::GetShaderInfoLog(id, len, ptr::null_mut(), buffer.as_ptr() as *mut GLchar);
    }

    buffer.to_string_lossy().into_owned()
}

fn program_info_log(id: GLuint) -> String {
    let mut len = 0;
    unsafe {
        gl::GetProgramiv(id, gl::INFO_LOG_LENGTH, &mut len);
    }

    let buffer = whitespace_cstring_with_len(len as usize);
    unsafe {
        gl::GetProgramInfoLog(id, len, ptr::null_mut(), buffer.as_ptr() as *mut GLchar);
    }

    buffer.to_string_lossy().into_owned()
}

fn whitespace_cstring_with_len(len: usize) -> CString {
    // Allocate buffer of correct size
    let mut buffer: Vec<u8> = Vec::with_capacity(len + 1);
    // Fill it with spaces
    buffer.extend([b' '].iter().cycle().take(len));
    // Convert buffer to CString
    unsafe { CString::from_vec_unchecked(buffer) }
}

/// Built-in shader pair for the embedded demo variant.
pub mod basic_shaders {
    pub const VERTEX_SRC: &str = "\
#version 330 core

layout(location = 0) in vec4 position;

void main()
{
    gl_Position = position;
}
";

    pub const FRAGMENT_SRC: &str = "\
#version 330 core

layout(location = 0) out vec4 color;

void main()
{
    color = vec4(1.0, 0.0, 0.0, 1.0);
}
";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }

    #[test]
    fn test_compile_error_reports_stage() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Vertex,
            log: "0:3: syntax error".to_string(),
        };
        let message = err.to_string();
        assert!(message.starts_with("vertex shader compilation failed"));
        assert!(message.contains("syntax error"));
    }

    #[test]
    fn test_basic_shaders_are_well_formed() {
        assert!(basic_shaders::VERTEX_SRC.starts_with("#version 330 core"));
        assert!(basic_shaders::FRAGMENT_SRC.starts_with("#version 330 core"));
        assert!(basic_shaders::VERTEX_SRC.contains("gl_Position"));
        assert!(basic_shaders::FRAGMENT_SRC.contains("out vec4 color"));
    }
}
