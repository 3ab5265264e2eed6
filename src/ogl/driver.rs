use std::ffi::{CStr, CString};

use gl::types::{GLbitfield, GLchar, GLenum};

/// Every OpenGL call the crate makes goes through this trait.
///
/// The native implementation is [`Gl`]. Wrappers (programs, buffers, textures, ...)
/// are generic over the driver so they can be exercised without a GL context.
///
/// All methods assume that a context is current on the calling thread.
pub trait Driver: Clone {
    // Shader objects
    fn create_shader(&self, typ: GLenum) -> u32;
    fn shader_source(&self, shader: u32, src: &str);
    fn compile_shader(&self, shader: u32);
    fn shader_compile_status(&self, shader: u32) -> bool;
    fn shader_info_log(&self, shader: u32) -> String;
    fn delete_shader(&self, shader: u32);

    // Program objects
    fn create_program(&self) -> u32;
    fn attach_shader(&self, program: u32, shader: u32);
    fn link_program(&self, program: u32);
    fn program_link_status(&self, program: u32) -> bool;
    fn validate_program(&self, program: u32);
    fn program_validate_status(&self, program: u32) -> bool;
    fn program_info_log(&self, program: u32) -> String;
    fn delete_program(&self, program: u32);
    fn use_program(&self, program: u32);

    // Uniforms
    fn uniform_location(&self, program: u32, name: &str) -> i32;
    fn uniform_1i(&self, loc: i32, v: i32);
    fn uniform_1ui(&self, loc: i32, v: u32);
    fn uniform_1f(&self, loc: i32, v: f32);
    fn uniform_2f(&self, loc: i32, x: f32, y: f32);
    fn uniform_3f(&self, loc: i32, x: f32, y: f32, z: f32);
    fn uniform_4f(&self, loc: i32, x: f32, y: f32, z: f32, w: f32);
    /// `data` holds `count` column-major 2x2 matrices
    fn uniform_matrix_2fv(&self, loc: i32, count: i32, data: &[f32]);
    /// `data` holds `count` column-major 3x3 matrices
    fn uniform_matrix_3fv(&self, loc: i32, count: i32, data: &[f32]);
    /// `data` holds `count` column-major 4x4 matrices
    fn uniform_matrix_4fv(&self, loc: i32, count: i32, data: &[f32]);

    // Compute
    fn dispatch_compute(&self, x: u32, y: u32, z: u32);
    fn memory_barrier(&self, barriers: GLbitfield);

    // Buffers
    fn gen_buffer(&self) -> u32;
    fn bind_buffer(&self, target: GLenum, buffer: u32);
    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum);
    fn delete_buffer(&self, buffer: u32);

    // Vertex arrays
    fn gen_vertex_array(&self) -> u32;
    fn bind_vertex_array(&self, vao: u32);
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        typ: GLenum,
        normalized: bool,
        stride: i32,
        offset: usize,
    );
    fn enable_vertex_attrib_array(&self, index: u32);
    fn delete_vertex_array(&self, vao: u32);

    // Textures
    fn gen_texture(&self) -> u32;
    fn bind_texture(&self, target: GLenum, texture: u32);
    fn tex_parameter_i(&self, target: GLenum, pname: GLenum, param: i32);
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: GLenum,
        internal_format: GLenum,
        width: u32,
        height: u32,
        format: GLenum,
        typ: GLenum,
        pixels: &[u8],
    );
    fn generate_mipmap(&self, target: GLenum);
    fn delete_texture(&self, texture: u32);

    // Render state
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: GLbitfield);
    fn enable(&self, cap: GLenum);
    fn disable(&self, cap: GLenum);
    fn polygon_mode(&self, face: GLenum, mode: GLenum);
    fn draw_elements(&self, mode: GLenum, count: i32, typ: GLenum, offset: usize);

    // Context queries
    /// `glGetString`, empty if the driver returns nothing for `name`
    fn get_string(&self, name: GLenum) -> String;
}

/// The native OpenGL driver.
///
/// The function pointers have to be loaded with `gl::load_with` before any method is called.
#[derive(Clone, Copy, Debug, Default)]
pub struct Gl;

impl Gl {
    fn read_info_log(len: i32, read: impl FnOnce(i32, *mut i32, *mut GLchar)) -> String {
        if len <= 0 {
            return String::new();
        }

        let mut info_log = vec![0u8; len as usize];
        let mut written = 0;
        read(len, &mut written, info_log.as_mut_ptr() as *mut GLchar);
        info_log.truncate(written.max(0) as usize);

        String::from_utf8_lossy(&info_log).trim_end().to_string()
    }
}

impl Driver for Gl {
    fn create_shader(&self, typ: GLenum) -> u32 {
        unsafe { gl::CreateShader(typ) }
    }

    fn shader_source(&self, shader: u32, src: &str) {
        // Explicit length, the source doesn't need a null-terminator
        let len = src.len() as i32;
        unsafe {
            gl::ShaderSource(shader, 1, &(src.as_ptr() as *const GLchar), &len);
        }
    }

    fn compile_shader(&self, shader: u32) {
        unsafe { gl::CompileShader(shader) }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        let mut res = 0;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut res) };
        res != gl::FALSE as i32
    }

    fn shader_info_log(&self, shader: u32) -> String {
        let mut len = 0;
        unsafe { gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len) };

        Self::read_info_log(len, |len, written, buf| unsafe {
            gl::GetShaderInfoLog(shader, len, written, buf);
        })
    }

    fn delete_shader(&self, shader: u32) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> u32 {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn link_program(&self, program: u32) {
        unsafe { gl::LinkProgram(program) }
    }

    fn program_link_status(&self, program: u32) -> bool {
        let mut res = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut res) };
        res != gl::FALSE as i32
    }

    fn validate_program(&self, program: u32) {
        unsafe { gl::ValidateProgram(program) }
    }

    fn program_validate_status(&self, program: u32) -> bool {
        let mut res = 0;
        unsafe { gl::GetProgramiv(program, gl::VALIDATE_STATUS, &mut res) };
        res != gl::FALSE as i32
    }

    fn program_info_log(&self, program: u32) -> String {
        let mut len = 0;
        unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len) };

        Self::read_info_log(len, |len, written, buf| unsafe {
            gl::GetProgramInfoLog(program, len, written, buf);
        })
    }

    fn delete_program(&self, program: u32) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn use_program(&self, program: u32) {
        unsafe { gl::UseProgram(program) }
    }

    fn uniform_location(&self, program: u32, name: &str) -> i32 {
        let name = match CString::new(name) {
            Ok(name) => name,
            Err(_) => {
                tracing::warn!("uniform name '{}' contains a NUL byte", name.escape_debug());
                return -1;
            }
        };

        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }

    fn uniform_1i(&self, loc: i32, v: i32) {
        unsafe { gl::Uniform1i(loc, v) }
    }

    fn uniform_1ui(&self, loc: i32, v: u32) {
        unsafe { gl::Uniform1ui(loc, v) }
    }

    fn uniform_1f(&self, loc: i32, v: f32) {
        unsafe { gl::Uniform1f(loc, v) }
    }

    fn uniform_2f(&self, loc: i32, x: f32, y: f32) {
        unsafe { gl::Uniform2f(loc, x, y) }
    }

    fn uniform_3f(&self, loc: i32, x: f32, y: f32, z: f32) {
        unsafe { gl::Uniform3f(loc, x, y, z) }
    }

    fn uniform_4f(&self, loc: i32, x: f32, y: f32, z: f32, w: f32) {
        unsafe { gl::Uniform4f(loc, x, y, z, w) }
    }

    fn uniform_matrix_2fv(&self, loc: i32, count: i32, data: &[f32]) {
        assert!(data.len() >= count as usize * 4);
        unsafe { gl::UniformMatrix2fv(loc, count, gl::FALSE, data.as_ptr()) }
    }

    fn uniform_matrix_3fv(&self, loc: i32, count: i32, data: &[f32]) {
        assert!(data.len() >= count as usize * 9);
        unsafe { gl::UniformMatrix3fv(loc, count, gl::FALSE, data.as_ptr()) }
    }

    fn uniform_matrix_4fv(&self, loc: i32, count: i32, data: &[f32]) {
        assert!(data.len() >= count as usize * 16);
        unsafe { gl::UniformMatrix4fv(loc, count, gl::FALSE, data.as_ptr()) }
    }

    fn dispatch_compute(&self, x: u32, y: u32, z: u32) {
        unsafe { gl::DispatchCompute(x, y, z) }
    }

    fn memory_barrier(&self, barriers: GLbitfield) {
        unsafe { gl::MemoryBarrier(barriers) }
    }

    fn gen_buffer(&self) -> u32 {
        let mut id = 0;
        unsafe { gl::GenBuffers(1, &mut id) };
        id
    }

    fn bind_buffer(&self, target: GLenum, buffer: u32) {
        unsafe { gl::BindBuffer(target, buffer) }
    }

    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum) {
        unsafe {
            gl::BufferData(target, data.len() as isize, data.as_ptr() as _, usage);
        }
    }

    fn delete_buffer(&self, buffer: u32) {
        unsafe { gl::DeleteBuffers(1, &buffer) }
    }

    fn gen_vertex_array(&self) -> u32 {
        let mut id = 0;
        unsafe { gl::GenVertexArrays(1, &mut id) };
        id
    }

    fn bind_vertex_array(&self, vao: u32) {
        unsafe { gl::BindVertexArray(vao) }
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        typ: GLenum,
        normalized: bool,
        stride: i32,
        offset: usize,
    ) {
        let normalized = if normalized { gl::TRUE } else { gl::FALSE };
        unsafe {
            gl::VertexAttribPointer(index, size, typ, normalized, stride, offset as _);
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { gl::EnableVertexAttribArray(index) }
    }

    fn delete_vertex_array(&self, vao: u32) {
        unsafe { gl::DeleteVertexArrays(1, &vao) }
    }

    fn gen_texture(&self) -> u32 {
        let mut id = 0;
        unsafe { gl::GenTextures(1, &mut id) };
        id
    }

    fn bind_texture(&self, target: GLenum, texture: u32) {
        unsafe { gl::BindTexture(target, texture) }
    }

    fn tex_parameter_i(&self, target: GLenum, pname: GLenum, param: i32) {
        unsafe { gl::TexParameteri(target, pname, param) }
    }

    fn tex_image_2d(
        &self,
        target: GLenum,
        internal_format: GLenum,
        width: u32,
        height: u32,
        format: GLenum,
        typ: GLenum,
        pixels: &[u8],
    ) {
        unsafe {
            // Rows of RGB images aren't necessarily 4-byte aligned
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                target,
                0,
                internal_format as i32,
                width as i32,
                height as i32,
                0,
                format,
                typ,
                pixels.as_ptr() as _,
            );
        }
    }

    fn generate_mipmap(&self, target: GLenum) {
        unsafe { gl::GenerateMipmap(target) }
    }

    fn delete_texture(&self, texture: u32) {
        unsafe { gl::DeleteTextures(1, &texture) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { gl::Viewport(x, y, width, height) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { gl::ClearColor(r, g, b, a) }
    }

    fn clear(&self, mask: GLbitfield) {
        unsafe { gl::Clear(mask) }
    }

    fn enable(&self, cap: GLenum) {
        unsafe { gl::Enable(cap) }
    }

    fn disable(&self, cap: GLenum) {
        unsafe { gl::Disable(cap) }
    }

    fn polygon_mode(&self, face: GLenum, mode: GLenum) {
        unsafe { gl::PolygonMode(face, mode) }
    }

    fn draw_elements(&self, mode: GLenum, count: i32, typ: GLenum, offset: usize) {
        unsafe { gl::DrawElements(mode, count, typ, offset as _) }
    }

    fn get_string(&self, name: GLenum) -> String {
        let ptr = unsafe { gl::GetString(name) };
        if ptr.is_null() {
            return String::new();
        }

        unsafe { CStr::from_ptr(ptr as *const GLchar) }
            .to_string_lossy()
            .into_owned()
    }
}
