use super::source::ShaderStage;

/// Describes a family of programs at compile time.
///
/// The kind decides which stages are compiled, which of them must be present and
/// whether uniform locations are cached. Behaviour specific to a kind lives in
/// `impl Program<Kind, D>` blocks.
pub trait ProgramKind {
    const NAME: &'static str;
    /// Stages compiled for this kind (others are ignored even if present in the source)
    const STAGES: &'static [ShaderStage];
    /// Stages that have to be present, otherwise no program is created
    const REQUIRED: &'static [ShaderStage];
    const CACHE_UNIFORMS: bool;
}

/// Rasterization pipeline (vertex -> tessellation -> geometry -> pixel)
pub struct Graphics;

impl ProgramKind for Graphics {
    const NAME: &'static str = "graphics";
    const STAGES: &'static [ShaderStage] = &[
        ShaderStage::Vertex,
        ShaderStage::TessControl,
        ShaderStage::TessEval,
        ShaderStage::Geometry,
        ShaderStage::Fragment,
    ];
    const REQUIRED: &'static [ShaderStage] = &[ShaderStage::Vertex, ShaderStage::Fragment];
    const CACHE_UNIFORMS: bool = true;
}

/// Compute program, uniform locations aren't cached.
pub struct Compute;

impl ProgramKind for Compute {
    const NAME: &'static str = "compute";
    const STAGES: &'static [ShaderStage] = &[ShaderStage::Compute];
    const REQUIRED: &'static [ShaderStage] = &[ShaderStage::Compute];
    const CACHE_UNIFORMS: bool = false;
}

/// Ray tracing program, emulated on top of a compute stage.
pub struct RayTracing;

impl ProgramKind for RayTracing {
    const NAME: &'static str = "ray tracing";
    const STAGES: &'static [ShaderStage] = &[ShaderStage::Compute];
    const REQUIRED: &'static [ShaderStage] = &[ShaderStage::Compute];
    const CACHE_UNIFORMS: bool = true;
}
