use glam::{Vec2, Vec3};

use crate::{
    ogl::{
        buffer::{BufferUsage, ElementBuffer, VertexBuffer},
        vertex_array::VertexArray,
        Driver, Gl,
    },
    vertex::VertexPosNormalTangentUV3D,
};

/// Half of the side length
const H: f32 = 0.5;

pub const CUBE_INDICES: [u32; 36] = [
    0, 1, 2, 0, 2, 3, // +Z
    4, 5, 6, 4, 6, 7, // -Z
    8, 9, 10, 8, 10, 11, // -X
    12, 13, 14, 12, 14, 15, // +X
    16, 17, 18, 16, 18, 19, // +Y
    20, 21, 22, 20, 22, 23, // -Y
];

/// 4 vertices per face so that every face gets its own normal, tangent and UVs
pub fn cube_vertices() -> [VertexPosNormalTangentUV3D; 24] {
    let v = |pos: [f32; 3], normal: [f32; 3], tangent: [f32; 3], uv: [f32; 2]| {
        VertexPosNormalTangentUV3D {
            pos: Vec3::from(pos),
            normal: Vec3::from(normal),
            tangent: Vec3::from(tangent),
            uv: Vec2::from(uv),
        }
    };

    [
        // +Z
        v([-H, -H, H], [0., 0., 1.], [1., 0., 0.], [0., 0.]),
        v([H, -H, H], [0., 0., 1.], [1., 0., 0.], [1., 0.]),
        v([H, H, H], [0., 0., 1.], [1., 0., 0.], [1., 1.]),
        v([-H, H, H], [0., 0., 1.], [1., 0., 0.], [0., 1.]),
        // -Z
        v([H, -H, -H], [0., 0., -1.], [-1., 0., 0.], [0., 0.]),
        v([-H, -H, -H], [0., 0., -1.], [-1., 0., 0.], [1., 0.]),
        v([-H, H, -H], [0., 0., -1.], [-1., 0., 0.], [1., 1.]),
        v([H, H, -H], [0., 0., -1.], [-1., 0., 0.], [0., 1.]),
        // -X
        v([-H, -H, -H], [-1., 0., 0.], [0., 0., 1.], [0., 0.]),
        v([-H, -H, H], [-1., 0., 0.], [0., 0., 1.], [1., 0.]),
        v([-H, H, H], [-1., 0., 0.], [0., 0., 1.], [1., 1.]),
        v([-H, H, -H], [-1., 0., 0.], [0., 0., 1.], [0., 1.]),
        // +X
        v([H, -H, H], [1., 0., 0.], [0., 0., -1.], [0., 0.]),
        v([H, -H, -H], [1., 0., 0.], [0., 0., -1.], [1., 0.]),
        v([H, H, -H], [1., 0., 0.], [0., 0., -1.], [1., 1.]),
        v([H, H, H], [1., 0., 0.], [0., 0., -1.], [0., 1.]),
        // +Y
        v([-H, H, H], [0., 1., 0.], [1., 0., 0.], [0., 0.]),
        v([H, H, H], [0., 1., 0.], [1., 0., 0.], [1., 0.]),
        v([H, H, -H], [0., 1., 0.], [1., 0., 0.], [1., 1.]),
        v([-H, H, -H], [0., 1., 0.], [1., 0., 0.], [0., 1.]),
        // -Y
        v([-H, -H, -H], [0., -1., 0.], [1., 0., 0.], [0., 0.]),
        v([H, -H, -H], [0., -1., 0.], [1., 0., 0.], [1., 0.]),
        v([H, -H, H], [0., -1., 0.], [1., 0., 0.], [1., 1.]),
        v([-H, -H, H], [0., -1., 0.], [1., 0., 0.], [0., 1.]),
    ]
}

/// A unit cube with its own VAO, vertex and index buffers
pub struct Cube<D: Driver = Gl> {
    pub position: Vec3,
    vao: VertexArray<D>,
    // Kept alive for the VAO
    _vbo: VertexBuffer<D>,
    ebo: ElementBuffer<D>,
    driver: D,
}

impl<D: Driver> Cube<D> {
    pub fn new(driver: D) -> Self {
        let vao = VertexArray::new(driver.clone());
        let vbo = VertexBuffer::new(driver.clone());
        let mut ebo = ElementBuffer::new(driver.clone());

        vao.bind();

        vbo.bind(gl::ARRAY_BUFFER);
        vbo.upload(gl::ARRAY_BUFFER, &cube_vertices(), BufferUsage::Static);
        vao.enable_layout::<VertexPosNormalTangentUV3D>();

        ebo.bind();
        ebo.upload(&CUBE_INDICES, BufferUsage::Static);

        vao.unbind();

        Self {
            position: Vec3::ZERO,
            vao,
            _vbo: vbo,
            ebo,
            driver,
        }
    }

    /// Draws the cube with the currently bound program
    pub fn draw(&self) {
        self.vao.bind();
        self.driver.draw_elements(
            gl::TRIANGLES,
            self.ebo.len() as i32,
            gl::UNSIGNED_INT,
            0,
        );
    }
}
