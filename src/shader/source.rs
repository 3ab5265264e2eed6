use std::{fs, path::Path};

use eyre::{Context, Result};
use gl::types::GLenum;

/// Token that starts a section switch in a combined shader file
pub const MARKER: &str = "#shader";

/// One step of the programmable pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Compute,
    Vertex,
    TessControl,
    TessEval,
    Geometry,
    Fragment,
}

impl ShaderStage {
    /// Stages in the order their keywords are matched on a marker line
    pub const ALL: [ShaderStage; 6] = [
        ShaderStage::Compute,
        ShaderStage::Vertex,
        ShaderStage::TessControl,
        ShaderStage::TessEval,
        ShaderStage::Geometry,
        ShaderStage::Fragment,
    ];

    /// Keywords that select this stage after the `#shader` marker
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            ShaderStage::Compute => &["compute"],
            ShaderStage::Vertex => &["vertex"],
            ShaderStage::TessControl => &["hull", "tess_control"],
            ShaderStage::TessEval => &["domain", "tess_eval"],
            ShaderStage::Geometry => &["geometry"],
            ShaderStage::Fragment => &["pixel", "fragment"],
        }
    }

    pub fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Compute => gl::COMPUTE_SHADER,
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::TessControl => gl::TESS_CONTROL_SHADER,
            ShaderStage::TessEval => gl::TESS_EVALUATION_SHADER,
            ShaderStage::Geometry => gl::GEOMETRY_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Compute => "compute",
            ShaderStage::Vertex => "vertex",
            ShaderStage::TessControl => "tessellation control",
            ShaderStage::TessEval => "tessellation evaluation",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Fragment => "pixel",
        }
    }

    /// Finds the stage selected by a marker line.
    ///
    /// This is a plain substring search, the first stage (in [`ShaderStage::ALL`] order)
    /// with a matching keyword wins.
    pub fn from_marker_line(line: &str) -> Option<ShaderStage> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.keywords().iter().any(|kw| line.contains(kw)))
    }
}

/// The source text of every pipeline stage found in a shader file.
///
/// A stage is empty when its marker didn't appear in the file, or when the marker was
/// followed directly by another marker or the end of the file. Both cases mean the stage
/// is left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSourceProgram {
    pub compute_shader: String,
    pub vertex_shader: String,
    pub hull_shader: String,
    pub domain_shader: String,
    pub geometry_shader: String,
    pub pixel_shader: String,
}

impl ShaderSourceProgram {
    /// Graphics sources from a vertex and a pixel (fragment) shader.
    pub fn from_vertex_pixel(vertex: impl Into<String>, pixel: impl Into<String>) -> Self {
        Self {
            vertex_shader: vertex.into(),
            pixel_shader: pixel.into(),
            ..Default::default()
        }
    }

    /// Splits a combined shader text into per-stage sources.
    ///
    /// Lines before the first marker are dropped. Every other non-marker line is appended
    /// (with a newline) to the section selected by the last marker.
    pub fn parse(text: &str) -> Self {
        let mut program = Self::default();
        let mut current: Option<ShaderStage> = None;

        for line in text.lines() {
            if line.contains(MARKER) {
                match ShaderStage::from_marker_line(line) {
                    Some(stage) => current = Some(stage),
                    None => tracing::warn!("unknown shader stage marker: '{line}'"),
                }
                continue;
            }

            if let Some(stage) = current {
                let section = program.stage_mut(stage);
                section.push_str(line);
                section.push('\n');
            }
        }

        program
    }

    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Compute => &self.compute_shader,
            ShaderStage::Vertex => &self.vertex_shader,
            ShaderStage::TessControl => &self.hull_shader,
            ShaderStage::TessEval => &self.domain_shader,
            ShaderStage::Geometry => &self.geometry_shader,
            ShaderStage::Fragment => &self.pixel_shader,
        }
    }

    pub fn stage_mut(&mut self, stage: ShaderStage) -> &mut String {
        match stage {
            ShaderStage::Compute => &mut self.compute_shader,
            ShaderStage::Vertex => &mut self.vertex_shader,
            ShaderStage::TessControl => &mut self.hull_shader,
            ShaderStage::TessEval => &mut self.domain_shader,
            ShaderStage::Geometry => &mut self.geometry_shader,
            ShaderStage::Fragment => &mut self.pixel_shader,
        }
    }

    /// True if no stage has any source
    pub fn is_empty(&self) -> bool {
        ShaderStage::ALL.iter().all(|s| self.stage(*s).is_empty())
    }
}

/// Reads and splits a combined shader file.
///
/// Failing to read the file is the only error, the content itself is never rejected.
pub fn parse_shader_file(path: impl AsRef<Path>) -> Result<ShaderSourceProgram> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("Couldn't load the shader file '{}'", path.display()))?;

    Ok(ShaderSourceProgram::parse(&text))
}
