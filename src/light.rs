use glam::Vec3;

use crate::{ogl::Driver, shader::GraphicsProgram};

/// Color and intensity shared by every light type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightColor {
    pub color: Vec3,
    pub intensity: f32,
}

impl LightColor {
    /// Color premultiplied by the intensity, as the shaders expect it
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

impl Default for LightColor {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 1.,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: LightColor,
    direction: Vec3,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, color: LightColor) -> Self {
        Self {
            color,
            direction: direction.normalize(),
        }
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction.normalize();
    }

    /// Writes the light to the `DirectionalLight` uniform struct of a bound program
    pub fn apply<D: Driver>(&self, program: &GraphicsProgram<D>) {
        program.set_vec3(self.direction, "DirectionalLight.Direction");
        program.set_vec3(self.color.radiance(), "DirectionalLight.Color");
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec3::new(-0.2, -1., -0.3), LightColor::default())
    }
}

/// Distance falloff: 1 / (constant + linear * d + quadratic * d^2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub fn at(&self, distance: f32) -> f32 {
        1. / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointLight {
    pub position: Vec3,
    pub color: LightColor,
    pub attenuation: Attenuation,
}

impl PointLight {
    pub fn apply<D: Driver>(&self, program: &GraphicsProgram<D>) {
        program.set_vec3(self.position, "pointLight.position");
        program.set_vec3(self.color.radiance(), "pointLight.color");
        program.set_f32(self.attenuation.constant, "pointLight.constant");
        program.set_f32(self.attenuation.linear, "pointLight.linear");
        program.set_f32(self.attenuation.quadratic, "pointLight.quadratic");
    }
}

/// A point light limited to a cone.
///
/// The cut-off angles are stored as cosines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub light: PointLight,
    direction: Vec3,
    cut_off: f32,
    outer_cut_off: f32,
}

impl SpotLight {
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction.normalize();
    }

    /// Cosine of the inner cone angle
    pub fn cut_off(&self) -> f32 {
        self.cut_off
    }

    pub fn set_cut_off(&mut self, degrees: f32) {
        self.cut_off = degrees.to_radians().cos();
    }

    /// Cosine of the outer cone angle
    pub fn outer_cut_off(&self) -> f32 {
        self.outer_cut_off
    }

    pub fn set_outer_cut_off(&mut self, degrees: f32) {
        self.outer_cut_off = degrees.to_radians().cos();
    }

    pub fn apply<D: Driver>(&self, program: &GraphicsProgram<D>) {
        let light = &self.light;
        program.set_vec3(light.position, "spotLight.position");
        program.set_vec3(self.direction, "spotLight.direction");
        program.set_vec3(light.color.radiance(), "spotLight.color");
        program.set_f32(light.attenuation.constant, "spotLight.constant");
        program.set_f32(light.attenuation.linear, "spotLight.linear");
        program.set_f32(light.attenuation.quadratic, "spotLight.quadratic");
        program.set_f32(self.cut_off, "spotLight.cutOff");
        program.set_f32(self.outer_cut_off, "spotLight.outerCutOff");
    }
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            light: PointLight::default(),
            direction: Vec3::new(0., -1., 0.),
            cut_off: 12.5f32.to_radians().cos(),
            outer_cut_off: 17.5f32.to_radians().cos(),
        }
    }
}
