use std::{env, path::PathBuf, str::FromStr};

use eyre::{eyre, Result};

const PREFIX: &str = "GLSANDBOX_";

/// Settings of the demo application
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub gl_major: u8,
    pub gl_minor: u8,
    pub vsync: bool,
    /// Shader of the textured quad
    pub shader_path: PathBuf,
    pub cube_shader_path: PathBuf,
    pub texture_path: PathBuf,
    pub cube_count: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Learn OpenGL".to_string(),
            width: 1920,
            height: 1080,
            gl_major: 4,
            gl_minor: 6,
            vsync: false,
            shader_path: PathBuf::from("resources/shaders/quad.shader"),
            cube_shader_path: PathBuf::from("resources/shaders/cube.shader"),
            texture_path: PathBuf::from("resources/textures/wall.jpg"),
            cube_count: 100,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by the `GLSANDBOX_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`AppConfig::from_env`], with `lookup` in place of the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let var = |name: &str| lookup(&format!("{PREFIX}{name}"));

        if let Some(title) = var("TITLE") {
            config.title = title;
        }

        override_parsed(&var, "WIDTH", &mut config.width)?;
        override_parsed(&var, "HEIGHT", &mut config.height)?;
        override_parsed(&var, "GL_MAJOR", &mut config.gl_major)?;
        override_parsed(&var, "GL_MINOR", &mut config.gl_minor)?;
        override_parsed(&var, "CUBE_COUNT", &mut config.cube_count)?;

        if let Some(vsync) = var("VSYNC") {
            config.vsync = parse_bool(&vsync)
                .ok_or_else(|| eyre!("{PREFIX}VSYNC: expected a boolean, got '{vsync}'"))?;
        }

        if let Some(path) = var("SHADER") {
            config.shader_path = path.into();
        }
        if let Some(path) = var("CUBE_SHADER") {
            config.cube_shader_path = path.into();
        }
        if let Some(path) = var("TEXTURE") {
            config.texture_path = path.into();
        }

        if config.width == 0 || config.height == 0 {
            return Err(eyre!(
                "Window dimensions must be non-zero, got {}x{}",
                config.width,
                config.height
            ));
        }

        Ok(config)
    }
}

fn override_parsed<T: FromStr>(
    var: impl Fn(&str) -> Option<String>,
    name: &str,
    field: &mut T,
) -> Result<()>
where
    T::Err: std::fmt::Display,
{
    if let Some(value) = var(name) {
        *field = value
            .trim()
            .parse()
            .map_err(|e| eyre!("{PREFIX}{name}: invalid value '{value}': {e}"))?;
    }

    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
