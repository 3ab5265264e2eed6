use crate::ogl::Driver;

use super::source::ShaderStage;

/// Compiles a single stage.
///
/// Returns 0 if `src` is empty (the stage is simply left out) or if compilation failed.
/// On failure the info log is reported and the shader object is deleted.
pub fn compile_stage<D: Driver>(driver: &D, stage: ShaderStage, src: &str) -> u32 {
    if src.is_empty() {
        return 0;
    }

    let shader = driver.create_shader(stage.gl_enum());
    driver.shader_source(shader, src);
    driver.compile_shader(shader);

    if !driver.shader_compile_status(shader) {
        let info_msg = driver.shader_info_log(shader);
        tracing::error!("Failed to compile {} shader: '{}'", stage.name(), info_msg);
        driver.delete_shader(shader);
        return 0;
    }

    tracing::debug!(shader, "compiled {} shader", stage.name());
    shader
}

/// Links the non-zero `stages` into a program.
///
/// Returns the program handle, or 0 if linking failed. The stage objects are deleted
/// in every case.
pub fn link_program<D: Driver>(driver: &D, stages: &[u32]) -> u32 {
    let program = driver.create_program();
    for &shader in stages.iter().filter(|&&s| s != 0) {
        driver.attach_shader(program, shader);
    }

    driver.link_program(program);

    if !driver.program_link_status(program) {
        let info_msg = driver.program_info_log(program);
        tracing::error!("Failed to link a shader program: '{}'", info_msg);
        delete_stages(driver, stages);
        driver.delete_program(program);
        return 0;
    }

    // Validation failures are only reported
    driver.validate_program(program);
    if !driver.program_validate_status(program) {
        let info_msg = driver.program_info_log(program);
        tracing::warn!(program, "Shader program validation failed: '{}'", info_msg);
    }

    delete_stages(driver, stages);
    program
}

fn delete_stages<D: Driver>(driver: &D, stages: &[u32]) {
    for &shader in stages.iter().filter(|&&s| s != 0) {
        driver.delete_shader(shader);
    }
}
