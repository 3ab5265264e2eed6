//! A fake driver that records every call, used by the unit tests.

use std::{
    cell::{Ref, RefCell},
    collections::{HashMap, HashSet},
    rc::Rc,
};

use gl::types::{GLbitfield, GLenum};

use super::driver::Driver;

#[derive(Debug, Clone, PartialEq)]
pub struct AttribCall {
    pub index: u32,
    pub size: i32,
    pub typ: GLenum,
    pub normalized: bool,
    pub stride: i32,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TexImageCall {
    pub internal_format: GLenum,
    pub width: u32,
    pub height: u32,
    pub format: GLenum,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UniformCall {
    I32(i32, i32),
    U32(i32, u32),
    F32(i32, f32),
    Vec(i32, Vec<f32>),
    Mat(i32, i32, Vec<f32>),
}

#[derive(Default)]
pub struct StubState {
    next_id: u32,
    calls: HashMap<&'static str, usize>,

    /// Shader handle -> (stage enum, source)
    pub shaders: HashMap<u32, (GLenum, String)>,
    compiled: HashSet<u32>,
    /// Program handle -> attached shaders
    pub programs: HashMap<u32, Vec<u32>>,
    pub deleted_shaders: Vec<u32>,
    pub deleted_programs: Vec<u32>,
    pub deleted_buffers: Vec<u32>,
    pub deleted_vertex_arrays: Vec<u32>,
    pub deleted_textures: Vec<u32>,

    /// Compilation fails for sources containing this text
    pub fail_compile_containing: Option<String>,
    pub fail_link: bool,
    pub fail_validate: bool,
    /// Uniforms known to every program; everything else is `-1`
    pub uniforms: HashMap<String, i32>,

    pub bound_program: u32,
    pub bound_vertex_array: u32,
    pub bound_buffers: HashMap<GLenum, u32>,
    pub bound_texture: u32,
    pub location_queries: Vec<String>,
    pub uniform_calls: Vec<UniformCall>,
    pub uploads: Vec<(GLenum, usize, GLenum)>,
    pub attribs: Vec<AttribCall>,
    pub enabled_attribs: Vec<u32>,
    pub tex_params: Vec<(GLenum, i32)>,
    pub tex_images: Vec<TexImageCall>,
    pub dispatches: Vec<(u32, u32, u32)>,
    pub barriers: Vec<GLbitfield>,
    pub draws: Vec<(GLenum, i32, GLenum)>,
    pub polygon_modes: Vec<GLenum>,
    pub viewports: Vec<(i32, i32, i32, i32)>,
}

impl StubState {
    fn next_handle(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn track(&mut self, call: &'static str) {
        *self.calls.entry(call).or_insert(0) += 1;
    }

    pub fn calls(&self, call: &str) -> usize {
        self.calls.get(call).copied().unwrap_or(0)
    }

    pub fn compiled_sources(&self) -> Vec<(GLenum, String)> {
        let mut compiled: Vec<_> = self
            .compiled
            .iter()
            .map(|id| self.shaders[id].clone())
            .collect();
        compiled.sort_by_key(|(typ, _)| *typ);
        compiled
    }

    fn compile_ok(&self, shader: u32) -> bool {
        let (_, src) = &self.shaders[&shader];
        match &self.fail_compile_containing {
            Some(needle) => !src.contains(needle.as_str()),
            None => true,
        }
    }

    fn delete(list: &mut Vec<u32>, id: u32, what: &str) {
        assert_ne!(id, 0, "deleting the zero {what} handle");
        assert!(!list.contains(&id), "{what} {id} deleted twice");
        list.push(id);
    }
}

#[derive(Clone, Default)]
pub struct StubDriver {
    state: Rc<RefCell<StubState>>,
}

impl StubDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uniforms(uniforms: &[(&str, i32)]) -> Self {
        let driver = Self::new();
        driver.state.borrow_mut().uniforms = uniforms
            .iter()
            .map(|(name, loc)| (name.to_string(), *loc))
            .collect();
        driver
    }

    pub fn failing_compile(needle: &str) -> Self {
        let driver = Self::new();
        driver.state.borrow_mut().fail_compile_containing = Some(needle.to_string());
        driver
    }

    pub fn failing_link() -> Self {
        let driver = Self::new();
        driver.state.borrow_mut().fail_link = true;
        driver
    }

    pub fn failing_validate() -> Self {
        let driver = Self::new();
        driver.state.borrow_mut().fail_validate = true;
        driver
    }

    pub fn state(&self) -> Ref<'_, StubState> {
        self.state.borrow()
    }

    pub fn calls(&self, call: &str) -> usize {
        self.state.borrow().calls(call)
    }

    fn with<R>(&self, call: &'static str, f: impl FnOnce(&mut StubState) -> R) -> R {
        let mut state = self.state.borrow_mut();
        state.track(call);
        f(&mut state)
    }
}

impl Driver for StubDriver {
    fn create_shader(&self, typ: GLenum) -> u32 {
        self.with("create_shader", |s| {
            let id = s.next_handle();
            s.shaders.insert(id, (typ, String::new()));
            id
        })
    }

    fn shader_source(&self, shader: u32, src: &str) {
        self.with("shader_source", |s| {
            s.shaders.get_mut(&shader).expect("unknown shader").1 = src.to_string();
        })
    }

    fn compile_shader(&self, shader: u32) {
        self.with("compile_shader", |s| {
            s.compiled.insert(shader);
        })
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.with("shader_compile_status", |s| {
            s.compiled.contains(&shader) && s.compile_ok(shader)
        })
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.with("shader_info_log", |_| {
            format!("0:1(1): error: stub rejected shader {shader}")
        })
    }

    fn delete_shader(&self, shader: u32) {
        self.with("delete_shader", |s| {
            StubState::delete(&mut s.deleted_shaders, shader, "shader")
        })
    }

    fn create_program(&self) -> u32 {
        self.with("create_program", |s| {
            let id = s.next_handle();
            s.programs.insert(id, Vec::new());
            id
        })
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.with("attach_shader", |s| {
            assert_ne!(shader, 0, "attaching the zero shader handle");
            s.programs
                .get_mut(&program)
                .expect("unknown program")
                .push(shader);
        })
    }

    fn link_program(&self, _program: u32) {
        self.with("link_program", |_| ())
    }

    fn program_link_status(&self, _program: u32) -> bool {
        self.with("program_link_status", |s| !s.fail_link)
    }

    fn validate_program(&self, _program: u32) {
        self.with("validate_program", |_| ())
    }

    fn program_validate_status(&self, _program: u32) -> bool {
        self.with("program_validate_status", |s| !s.fail_validate)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.with("program_info_log", |_| {
            format!("error: stub rejected program {program}")
        })
    }

    fn delete_program(&self, program: u32) {
        self.with("delete_program", |s| {
            StubState::delete(&mut s.deleted_programs, program, "program")
        })
    }

    fn use_program(&self, program: u32) {
        self.with("use_program", |s| s.bound_program = program)
    }

    fn uniform_location(&self, _program: u32, name: &str) -> i32 {
        self.with("uniform_location", |s| {
            s.location_queries.push(name.to_string());
            s.uniforms.get(name).copied().unwrap_or(-1)
        })
    }

    fn uniform_1i(&self, loc: i32, v: i32) {
        self.with("uniform_1i", |s| s.uniform_calls.push(UniformCall::I32(loc, v)))
    }

    fn uniform_1ui(&self, loc: i32, v: u32) {
        self.with("uniform_1ui", |s| s.uniform_calls.push(UniformCall::U32(loc, v)))
    }

    fn uniform_1f(&self, loc: i32, v: f32) {
        self.with("uniform_1f", |s| s.uniform_calls.push(UniformCall::F32(loc, v)))
    }

    fn uniform_2f(&self, loc: i32, x: f32, y: f32) {
        self.with("uniform_2f", |s| {
            s.uniform_calls.push(UniformCall::Vec(loc, vec![x, y]))
        })
    }

    fn uniform_3f(&self, loc: i32, x: f32, y: f32, z: f32) {
        self.with("uniform_3f", |s| {
            s.uniform_calls.push(UniformCall::Vec(loc, vec![x, y, z]))
        })
    }

    fn uniform_4f(&self, loc: i32, x: f32, y: f32, z: f32, w: f32) {
        self.with("uniform_4f", |s| {
            s.uniform_calls.push(UniformCall::Vec(loc, vec![x, y, z, w]))
        })
    }

    fn uniform_matrix_2fv(&self, loc: i32, count: i32, data: &[f32]) {
        self.with("uniform_matrix_2fv", |s| {
            s.uniform_calls.push(UniformCall::Mat(loc, count, data.to_vec()))
        })
    }

    fn uniform_matrix_3fv(&self, loc: i32, count: i32, data: &[f32]) {
        self.with("uniform_matrix_3fv", |s| {
            s.uniform_calls.push(UniformCall::Mat(loc, count, data.to_vec()))
        })
    }

    fn uniform_matrix_4fv(&self, loc: i32, count: i32, data: &[f32]) {
        self.with("uniform_matrix_4fv", |s| {
            s.uniform_calls.push(UniformCall::Mat(loc, count, data.to_vec()))
        })
    }

    fn dispatch_compute(&self, x: u32, y: u32, z: u32) {
        self.with("dispatch_compute", |s| s.dispatches.push((x, y, z)))
    }

    fn memory_barrier(&self, barriers: GLbitfield) {
        self.with("memory_barrier", |s| s.barriers.push(barriers))
    }

    fn gen_buffer(&self) -> u32 {
        self.with("gen_buffer", |s| s.next_handle())
    }

    fn bind_buffer(&self, target: GLenum, buffer: u32) {
        self.with("bind_buffer", |s| {
            s.bound_buffers.insert(target, buffer);
        })
    }

    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum) {
        self.with("buffer_data", |s| s.uploads.push((target, data.len(), usage)))
    }

    fn delete_buffer(&self, buffer: u32) {
        self.with("delete_buffer", |s| {
            StubState::delete(&mut s.deleted_buffers, buffer, "buffer")
        })
    }

    fn gen_vertex_array(&self) -> u32 {
        self.with("gen_vertex_array", |s| s.next_handle())
    }

    fn bind_vertex_array(&self, vao: u32) {
        self.with("bind_vertex_array", |s| s.bound_vertex_array = vao)
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
        self.with("vertex_attrib_pointer", |s| {
            s.attribs.push(AttribCall {
                index,
                size,
                typ,
                normalized,
                stride,
                offset,
            })
        })
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.with("enable_vertex_attrib_array", |s| s.enabled_attribs.push(index))
    }

    fn delete_vertex_array(&self, vao: u32) {
        self.with("delete_vertex_array", |s| {
            StubState::delete(&mut s.deleted_vertex_arrays, vao, "vertex array")
        })
    }

    fn gen_texture(&self) -> u32 {
        self.with("gen_texture", |s| s.next_handle())
    }

    fn bind_texture(&self, _target: GLenum, texture: u32) {
        self.with("bind_texture", |s| s.bound_texture = texture)
    }

    fn tex_parameter_i(&self, _target: GLenum, pname: GLenum, param: i32) {
        self.with("tex_parameter_i", |s| s.tex_params.push((pname, param)))
    }

    fn tex_image_2d(
        &self,
        _target: GLenum,
        internal_format: GLenum,
        width: u32,
        height: u32,
        format: GLenum,
        _typ: GLenum,
        pixels: &[u8],
    ) {
        self.with("tex_image_2d", |s| {
            s.tex_images.push(TexImageCall {
                internal_format,
                width,
                height,
                format,
                len: pixels.len(),
            })
        })
    }

    fn generate_mipmap(&self, _target: GLenum) {
        self.with("generate_mipmap", |_| ())
    }

    fn delete_texture(&self, texture: u32) {
        self.with("delete_texture", |s| {
            StubState::delete(&mut s.deleted_textures, texture, "texture")
        })
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.with("viewport", |s| s.viewports.push((x, y, width, height)))
    }

    fn clear_color(&self, _r: f32, _g: f32, _b: f32, _a: f32) {
        self.with("clear_color", |_| ())
    }

    fn clear(&self, _mask: GLbitfield) {
        self.with("clear", |_| ())
    }

    fn enable(&self, _cap: GLenum) {
        self.with("enable", |_| ())
    }

    fn disable(&self, _cap: GLenum) {
        self.with("disable", |_| ())
    }

    fn polygon_mode(&self, _face: GLenum, mode: GLenum) {
        self.with("polygon_mode", |s| s.polygon_modes.push(mode))
    }

    fn draw_elements(&self, mode: GLenum, count: i32, typ: GLenum, _offset: usize) {
        self.with("draw_elements", |s| s.draws.push((mode, count, typ)))
    }

    fn get_string(&self, name: GLenum) -> String {
        self.with("get_string", |_| match name {
            gl::VENDOR => "Stub".to_string(),
            gl::RENDERER => "Stub Renderer".to_string(),
            gl::VERSION => "4.6.0 Stub".to_string(),
            gl::SHADING_LANGUAGE_VERSION => "4.60 Stub".to_string(),
            _ => String::new(),
        })
    }
}
