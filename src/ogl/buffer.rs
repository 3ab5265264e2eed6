use bytemuck::Pod;
use gl::types::GLenum;

use super::driver::{Driver, Gl};

/// Expected usage pattern of a buffer's data store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferUsage {
    #[default]
    Static,
    Dynamic,
    Stream,
}

impl BufferUsage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            BufferUsage::Static => gl::STATIC_DRAW,
            BufferUsage::Dynamic => gl::DYNAMIC_DRAW,
            BufferUsage::Stream => gl::STREAM_DRAW,
        }
    }
}

/// A buffer object, usually bound to `GL_ARRAY_BUFFER`.
///
/// Deleted on drop.
pub struct VertexBuffer<D: Driver = Gl> {
    id: u32,
    driver: D,
}

impl<D: Driver> VertexBuffer<D> {
    pub fn new(driver: D) -> Self {
        let id = driver.gen_buffer();
        Self { id, driver }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn bind(&self, target: GLenum) {
        self.driver.bind_buffer(target, self.id);
    }

    pub fn unbind(&self, target: GLenum) {
        self.driver.bind_buffer(target, 0);
    }

    /// Uploads `data` to the buffer currently bound to `target`.
    pub fn upload<T: Pod>(&self, target: GLenum, data: &[T], usage: BufferUsage) {
        self.driver
            .buffer_data(target, bytemuck::cast_slice(data), usage.gl_enum());
    }
}

impl<D: Driver> Drop for VertexBuffer<D> {
    fn drop(&mut self) {
        self.driver.delete_buffer(self.id);
    }
}

/// An index buffer (`GL_ELEMENT_ARRAY_BUFFER`).
///
/// Deleted on drop.
pub struct ElementBuffer<D: Driver = Gl> {
    id: u32,
    len: usize,
    driver: D,
}

impl<D: Driver> ElementBuffer<D> {
    pub fn new(driver: D) -> Self {
        let id = driver.gen_buffer();
        Self { id, len: 0, driver }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Number of indices uploaded last
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bind(&self) {
        self.driver.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, self.id);
    }

    pub fn unbind(&self) {
        self.driver.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, 0);
    }

    /// Uploads indices, the buffer has to be bound.
    pub fn upload<T: Pod>(&mut self, indices: &[T], usage: BufferUsage) {
        self.len = indices.len();
        self.driver.buffer_data(
            gl::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(indices),
            usage.gl_enum(),
        );
    }
}

impl<D: Driver> Drop for ElementBuffer<D> {
    fn drop(&mut self) {
        self.driver.delete_buffer(self.id);
    }
}
