use crate::vertex::{VertexAttrib, VertexLayout};

use super::driver::{Driver, Gl};

/// Owns a vertex array object (VAO).
///
/// There is no global VAO, every mesh creates and binds its own.
pub struct VertexArray<D: Driver = Gl> {
    id: u32,
    driver: D,
}

impl<D: Driver> VertexArray<D> {
    pub fn new(driver: D) -> Self {
        let id = driver.gen_vertex_array();
        Self { id, driver }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn bind(&self) {
        self.driver.bind_vertex_array(self.id);
    }

    pub fn unbind(&self) {
        self.driver.bind_vertex_array(0);
    }

    pub fn attach_vertex_buffer(&self, vbo: u32) {
        self.driver.bind_buffer(gl::ARRAY_BUFFER, vbo);
    }

    pub fn attach_element_buffer(&self, ebo: u32) {
        self.driver.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
    }

    /// Sets up the attribute pointer and enables the attribute.
    ///
    /// The VAO and the source vertex buffer have to be bound.
    pub fn enable_attribute(&self, attrib: &VertexAttrib) {
        self.driver.vertex_attrib_pointer(
            attrib.index,
            attrib.size,
            attrib.ty,
            attrib.normalized,
            attrib.stride,
            attrib.offset,
        );
        self.driver.enable_vertex_attrib_array(attrib.index);
    }

    /// Enables every attribute of the vertex format `V`
    pub fn enable_layout<V: VertexLayout>(&self) {
        for attrib in V::ATTRIBUTES {
            self.enable_attribute(attrib);
        }
    }
}

impl<D: Driver> Drop for VertexArray<D> {
    fn drop(&mut self) {
        self.driver.delete_vertex_array(self.id);
    }
}
