use gl::types::*;
use std::mem;
use std::ptr;

use crate::engine::GlContext;
use crate::render::shaders::ShaderProgram;

/// A vertex buffer and its attribute layout, ready to draw.
pub struct Mesh {
    vao: GLuint,
    vbo: GLuint,
    vertex_count: GLsizei,
}

impl GlContext {
    /// Uploads a list of positions as a static vertex buffer with a single
    /// vec3 attribute at location 0.
    pub fn upload_mesh(&self, positions: &[[f32; 3]]) -> Mesh {
        let mut vao = 0;
        let mut vbo = 0;

        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                mem::size_of_val(positions) as GLsizeiptr,
                positions.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            gl::VertexAttribPointer(
                0,
                3,
                gl::FLOAT,
                gl::FALSE,
                (3 * mem::size_of::<f32>()) as GLsizei,
                ptr::null(),
            );
            gl::EnableVertexAttribArray(0);

            gl::BindVertexArray(0);
        }

        Mesh {
            vao,
            vbo,
            vertex_count: positions.len() as GLsizei,
        }
    }

    /// Draws `mesh` with `program` as plain triangles.
    pub fn draw(&self, program: &ShaderProgram, mesh: &Mesh) {
        unsafe {
            gl::UseProgram(program.id());
            gl::BindVertexArray(mesh.vao);
            gl::DrawArrays(gl::TRIANGLES, 0, mesh.vertex_count);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}
