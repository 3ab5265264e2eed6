pub mod camera;
pub mod config;
pub mod cube;
pub mod input;
pub mod instances;
pub mod light;
pub mod maths;
pub mod memory;
pub mod ogl;
pub mod shader;
pub mod vertex;
pub mod window;
