use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use gl::types::GLenum;
use glam::{Vec2, Vec3};

/// Describes one vertex attribute, same meaning as the glVertexAttribPointer arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttrib {
    /// Attribute location in the vertex shader
    pub index: u32,
    /// Number of components
    pub size: i32,
    pub ty: GLenum,
    pub normalized: bool,
    /// Size of the whole vertex
    pub stride: i32,
    /// Offset of the attribute inside the vertex
    pub offset: usize,
}

impl VertexAttrib {
    const fn float(index: u32, size: i32, stride: usize, offset: usize) -> Self {
        Self {
            index,
            size,
            ty: gl::FLOAT,
            normalized: false,
            stride: stride as i32,
            offset,
        }
    }
}

/// Every vertex format that can be uploaded to a VertexBuffer has to describe its layout
pub trait VertexLayout: Pod {
    const ATTRIBUTES: &'static [VertexAttrib];
}

macro_rules! vertex_format {
    ($(#[$doc:meta])* $name:ident { $($field:ident: $ty:ty => $size:expr),+ $(,)? }) => {
        $(#[$doc])*
        #[repr(C)]
        #[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
        pub struct $name {
            $(pub $field: $ty),+
        }

        impl VertexLayout for $name {
            const ATTRIBUTES: &'static [VertexAttrib] = {
                let mut _index = 0;
                &[$({
                    let attrib = VertexAttrib::float(
                        _index,
                        $size,
                        size_of::<$name>(),
                        offset_of!($name, $field),
                    );
                    _index += 1;
                    attrib
                }),+]
            };
        }
    };
}

vertex_format!(VertexPos2D { pos: Vec2 => 2 });
vertex_format!(VertexPosUV2D { pos: Vec2 => 2, uv: Vec2 => 2 });
vertex_format!(
    /// 2D position, RGB color and texture coordinates
    VertexPosColorUV { pos: Vec2 => 2, color: Vec3 => 3, uv: Vec2 => 2 }
);
vertex_format!(VertexPosUV3D { pos: Vec3 => 3, uv: Vec2 => 2 });
vertex_format!(VertexPos3D { pos: Vec3 => 3 });
vertex_format!(VertexPosNormal3D { pos: Vec3 => 3, normal: Vec3 => 3 });
vertex_format!(VertexPosNormalUV3D { pos: Vec3 => 3, normal: Vec3 => 3, uv: Vec2 => 2 });
vertex_format!(VertexPosColor3D { pos: Vec3 => 3, color: Vec3 => 3 });
vertex_format!(VertexPosColorUV3D { pos: Vec3 => 3, color: Vec3 => 3, uv: Vec2 => 2 });
vertex_format!(
    /// The format used for normal-mapped meshes
    VertexPosNormalTangentUV3D {
        pos: Vec3 => 3,
        normal: Vec3 => 3,
        tangent: Vec3 => 3,
        uv: Vec2 => 2,
    }
);
