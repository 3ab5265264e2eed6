use std::{marker::PhantomData, path::Path};

use eyre::{eyre, Result};
use gl::types::GLbitfield;
use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::ogl::{Driver, Gl};

/// Compiling single stages and linking them into programs.
pub mod compile;
/// Program families (graphics, compute, ray tracing).
pub mod kind;
/// Splitting combined `#shader <stage>` files.
pub mod source;
/// Uniform values and the location cache.
pub mod uniform;

pub use self::{
    kind::{Compute, Graphics, ProgramKind, RayTracing},
    source::{parse_shader_file, ShaderSourceProgram, ShaderStage},
    uniform::{Uniform, UniformCache, INVALID_LOCATION},
};

pub type GraphicsProgram<D = Gl> = Program<Graphics, D>;
pub type ComputeProgram<D = Gl> = Program<Compute, D>;
pub type RayTracingProgram<D = Gl> = Program<RayTracing, D>;

/// Owns a linked OpenGL shader program.
///
/// Compilation or link errors don't fail construction: they are logged and the program
/// stays invalid (`id() == 0`). Check [`Program::is_valid`] or use [`Program::require_valid`].
/// The program is deleted when this is dropped.
pub struct Program<K: ProgramKind, D: Driver = Gl> {
    id: u32,
    driver: D,
    uniforms: UniformCache,
    _kind: PhantomData<K>,
}

impl<K: ProgramKind, D: Driver> Program<K, D> {
    /// A program that owns no GPU object
    pub fn invalid(driver: D) -> Self {
        Self {
            id: 0,
            driver,
            uniforms: UniformCache::new(K::CACHE_UNIFORMS),
            _kind: PhantomData,
        }
    }

    /// Reads a combined `#shader <stage>` file and builds the program from it.
    ///
    /// Only a file that can't be read is an error.
    pub fn from_file(driver: D, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let sources = parse_shader_file(path)?;

        let program = Self::from_sources(driver, &sources);
        if program.is_valid() {
            tracing::info!("loaded {} program '{}'", K::NAME, path.display());
        } else {
            tracing::error!("{} program '{}' is invalid", K::NAME, path.display());
        }

        Ok(program)
    }

    pub fn from_sources(driver: D, sources: &ShaderSourceProgram) -> Self {
        let id = Self::create(&driver, sources);

        Self {
            id,
            driver,
            uniforms: UniformCache::new(K::CACHE_UNIFORMS),
            _kind: PhantomData,
        }
    }

    fn create(driver: &D, sources: &ShaderSourceProgram) -> u32 {
        let missing: Vec<&str> = K::REQUIRED
            .iter()
            .filter(|stage| sources.stage(**stage).is_empty())
            .map(|stage| stage.name())
            .collect();

        if !missing.is_empty() {
            tracing::error!(
                "{} program is missing the {} stage(s)",
                K::NAME,
                missing.join(", ")
            );
            return 0;
        }

        let mut failed = false;
        let mut stages = Vec::with_capacity(K::STAGES.len());
        for &stage in K::STAGES {
            let src = sources.stage(stage);
            let shader = compile::compile_stage(driver, stage, src);
            failed |= shader == 0 && !src.is_empty();
            stages.push(shader);
        }

        if failed {
            for &shader in stages.iter().filter(|&&s| s != 0) {
                driver.delete_shader(shader);
            }
            return 0;
        }

        compile::link_program(driver, &stages)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_valid(&self) -> bool {
        self.id != 0
    }

    /// Turns an invalid program into an error, for callers that can't continue without it
    pub fn require_valid(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(eyre!("Failed to create a {} shader program", K::NAME))
        }
    }

    pub fn bind(&self) {
        self.driver.use_program(self.id);
    }

    pub fn unbind(&self) {
        self.driver.use_program(0);
    }

    /// Location of a uniform, -1 if it doesn't exist (or the program is invalid)
    pub fn uniform_location(&self, name: &str) -> i32 {
        if !self.is_valid() {
            return INVALID_LOCATION;
        }

        self.uniforms.location(&self.driver, self.id, name)
    }

    /// Sets a uniform of the currently bound program
    pub fn set_uniform<U: Uniform + ?Sized>(&self, name: &str, value: &U) {
        let loc = self.uniform_location(name);
        if loc != INVALID_LOCATION {
            value.set(&self.driver, loc);
        }
    }

    pub fn set_bool(&self, v: bool, name: &str) {
        self.set_uniform(name, &v);
    }

    pub fn set_i32(&self, v: i32, name: &str) {
        self.set_uniform(name, &v);
    }

    pub fn set_u32(&self, v: u32, name: &str) {
        self.set_uniform(name, &v);
    }

    pub fn set_f32(&self, v: f32, name: &str) {
        self.set_uniform(name, &v);
    }

    pub fn set_vec2(&self, vec: Vec2, name: &str) {
        self.set_uniform(name, &vec);
    }

    pub fn set_vec3(&self, vec: Vec3, name: &str) {
        self.set_uniform(name, &vec);
    }

    pub fn set_vec4(&self, vec: Vec4, name: &str) {
        self.set_uniform(name, &vec);
    }

    pub fn set_mat2(&self, mat: Mat2, name: &str) {
        self.set_uniform(name, &mat);
    }

    pub fn set_mat3(&self, mat: Mat3, name: &str) {
        self.set_uniform(name, &mat);
    }

    pub fn set_mat4(&self, mat: Mat4, name: &str) {
        self.set_uniform(name, &mat);
    }

    pub fn set_mat4_arr(&self, mats: &[Mat4], name: &str) {
        self.set_uniform(name, mats);
    }
}

impl<D: Driver> Program<Graphics, D> {
    /// Graphics program from separate vertex and pixel shader sources
    pub fn from_vertex_pixel(driver: D, vertex: &str, pixel: &str) -> Self {
        Self::from_sources(driver, &ShaderSourceProgram::from_vertex_pixel(vertex, pixel))
    }
}

impl<D: Driver> Program<Compute, D> {
    /// Binds the program and launches `x * y * z` work groups
    pub fn dispatch(&self, x: u32, y: u32, z: u32) {
        if !self.is_valid() {
            tracing::warn!("dispatch on an invalid compute program");
            return;
        }

        self.bind();
        self.driver.dispatch_compute(x, y, z);
    }

    /// Like [`Program::dispatch`], followed by a `glMemoryBarrier(barriers)`
    pub fn dispatch_with_barrier(&self, x: u32, y: u32, z: u32, barriers: GLbitfield) {
        if !self.is_valid() {
            tracing::warn!("dispatch on an invalid compute program");
            return;
        }

        self.dispatch(x, y, z);
        self.driver.memory_barrier(barriers);
    }
}

impl<D: Driver> Program<RayTracing, D> {
    pub fn trace_rays(&self, width: u32, height: u32, depth: u32) {
        tracing::warn!(
            width,
            height,
            depth,
            "trace_rays is not implemented for OpenGL ray tracing programs"
        );
    }
}

impl<K: ProgramKind, D: Driver> Drop for Program<K, D> {
    fn drop(&mut self) {
        if self.id != 0 {
            tracing::debug!(program = self.id, "deleting {} program", K::NAME);
            self.driver.delete_program(self.id);
            self.id = 0;
        }
    }
}
