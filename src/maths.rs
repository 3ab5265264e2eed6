use glam::{Mat4, Vec3};

/// Axis conventions, named as forward, right, up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSystem {
    XYZ,
    XZY,
    YXZ,
    YZX,
    ZXY,
    ZYX,
}

/// Rotation that takes vectors from one convention to another.
///
/// Only conversions out of `XYZ` are known, every other pair (and `from == to`) is the identity.
pub fn transformation_matrix(from: CoordinateSystem, to: CoordinateSystem) -> Mat4 {
    use CoordinateSystem::*;

    match (from, to) {
        (XYZ, XZY) => Mat4::from_rotation_x((-90f32).to_radians()),
        (XYZ, YXZ) => Mat4::from_rotation_z(90f32.to_radians()),
        (XYZ, YZX) => Mat4::from_rotation_y(90f32.to_radians()),
        (XYZ, ZXY) => Mat4::from_rotation_y((-90f32).to_radians()),
        (XYZ, ZYX) => Mat4::from_rotation_y(180f32.to_radians()),
        _ => Mat4::IDENTITY,
    }
}

pub fn convert_coordinate_system(v: Vec3, from: CoordinateSystem, to: CoordinateSystem) -> Vec3 {
    transformation_matrix(from, to).transform_point3(v)
}

#[cfg(test)]
mod tests {
    use super::{CoordinateSystem::*, *};

    fn assert_converts(v: Vec3, from: CoordinateSystem, to: CoordinateSystem, expected: Vec3) {
        let res = convert_coordinate_system(v, from, to);
        assert!(res.abs_diff_eq(expected, 1e-6), "{res} != {expected}");
    }

    #[test]
    fn conversions_from_xyz() {
        assert_converts(Vec3::Y, XYZ, XZY, Vec3::new(0., 0., -1.));
        assert_converts(Vec3::X, XYZ, YXZ, Vec3::Y);
        assert_converts(Vec3::Z, XYZ, YZX, Vec3::X);
        assert_converts(Vec3::X, XYZ, ZXY, Vec3::Z);
        assert_converts(Vec3::new(1., 2., 3.), XYZ, ZYX, Vec3::new(-1., 2., -3.));
    }

    #[test]
    fn unknown_pairs_are_identity() {
        assert_eq!(transformation_matrix(XYZ, XYZ), Mat4::IDENTITY);
        assert_eq!(transformation_matrix(XZY, XYZ), Mat4::IDENTITY);
        assert_converts(Vec3::ONE, ZYX, YXZ, Vec3::ONE);
    }
}
