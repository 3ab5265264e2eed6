use glam::{Mat4, Quat, Vec3};
use rand::Rng;
use rayon::prelude::*;

/// An object spinning in place around its own axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    pub position: Vec3,
    /// Unit length rotation axis
    pub axis: Vec3,
    /// Radians per second
    pub speed: f32,
}

impl Instance {
    pub fn new(position: Vec3, axis: Vec3, speed: f32) -> Self {
        Self {
            position,
            axis: axis.normalize(),
            speed,
        }
    }

    /// Model matrix at `time` seconds
    pub fn model_matrix(&self, time: f32) -> Mat4 {
        let rotation = Quat::from_axis_angle(self.axis, self.speed * time);
        Mat4::from_rotation_translation(rotation, self.position)
    }
}

/// Lays out `count` instances on a square grid in the XZ plane, `spacing` apart.
///
/// Axes and speeds are random.
pub fn scatter<R: Rng>(rng: &mut R, count: usize, spacing: f32) -> Vec<Instance> {
    let side = (count as f32).sqrt().ceil() as usize;
    let offset = (side as f32 - 1.) * spacing / 2.;

    (0..count)
        .map(|i| {
            let x = (i % side) as f32 * spacing - offset;
            let z = (i / side) as f32 * spacing - offset;

            let axis = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            // A zero axis can't be normalized
            let axis = if axis.length_squared() < 1e-6 { Vec3::Y } else { axis };

            Instance::new(Vec3::new(x, 0., z), axis, rng.gen_range(0.2..2.0))
        })
        .collect()
}

/// Recomputes the model matrix of every instance in parallel.
///
/// Panics if the slices have different lengths.
pub fn rotate_instances(instances: &[Instance], time: f32, out: &mut [Mat4]) {
    assert_eq!(
        instances.len(),
        out.len(),
        "every instance needs exactly one output matrix"
    );

    out.par_iter_mut()
        .zip(instances.par_iter())
        .for_each(|(model, instance)| *model = instance.model_matrix(time));
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn matrices_match_serial_computation() {
        let mut rng = StdRng::seed_from_u64(7);
        let instances = scatter(&mut rng, 100, 2.);
        let mut out = vec![Mat4::IDENTITY; instances.len()];

        rotate_instances(&instances, 1.25, &mut out);

        for (instance, model) in instances.iter().zip(&out) {
            assert_eq!(*model, instance.model_matrix(1.25));
        }
    }

    #[test]
    fn rotation_keeps_position() {
        let instance = Instance::new(Vec3::new(1., 2., 3.), Vec3::new(0., 5., 0.), 1.);
        assert_eq!(instance.axis, Vec3::Y);

        let model = instance.model_matrix(10.);
        assert!(model
            .transform_point3(Vec3::ZERO)
            .abs_diff_eq(instance.position, 1e-6));

        let quarter = Instance::new(Vec3::ZERO, Vec3::Y, std::f32::consts::FRAC_PI_2);
        assert!(quarter
            .model_matrix(1.)
            .transform_point3(Vec3::X)
            .abs_diff_eq(Vec3::new(0., 0., -1.), 1e-6));
    }

    #[test]
    fn scatter_is_centered() {
        let mut rng = StdRng::seed_from_u64(1);
        let instances = scatter(&mut rng, 9, 1.);

        assert_eq!(instances.len(), 9);
        assert_eq!(instances[0].position, Vec3::new(-1., 0., -1.));
        assert_eq!(instances[8].position, Vec3::new(1., 0., 1.));
        assert!(instances
            .iter()
            .all(|i| (i.axis.length() - 1.).abs() < 1e-5));
    }

    #[test]
    #[should_panic]
    fn length_mismatch_panics() {
        let instances = [Instance::new(Vec3::ZERO, Vec3::Y, 1.)];
        let mut out = [Mat4::IDENTITY; 2];
        rotate_instances(&instances, 0., &mut out);
    }
}
