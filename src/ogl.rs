use std::{
    ffi::{c_void, CStr},
    ptr,
};

use gl::types::GLchar;

/// The seam between the wrappers and the OpenGL API.
pub mod driver;

/// RAII wrappers for vertex and element buffers.
pub mod buffer;

/// RAII wrapper for vertex array objects.
pub mod vertex_array;

/// 2D textures loaded from image files.
pub mod texture;

#[cfg(test)]
pub(crate) mod stub;

pub use driver::{Driver, Gl};

/// Strings describing the current context, as reported by the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextInfo {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
    pub glsl_version: String,
}

impl ContextInfo {
    pub fn query<D: Driver>(driver: &D) -> Self {
        Self {
            vendor: driver.get_string(gl::VENDOR),
            renderer: driver.get_string(gl::RENDERER),
            version: driver.get_string(gl::VERSION),
            glsl_version: driver.get_string(gl::SHADING_LANGUAGE_VERSION),
        }
    }

    pub fn log(&self) {
        tracing::info!("OpenGL {} on {} ({})", self.version, self.renderer, self.vendor);
        tracing::info!("GLSL {}", self.glsl_version);
    }
}

/// SIMD extensions the CPU supports, from the ones glam can make use of
pub fn cpu_features() -> Vec<&'static str> {
    let mut features = Vec::new();

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if is_x86_feature_detected!("sse2") {
            features.push("sse2");
        }
        if is_x86_feature_detected!("sse4.1") {
            features.push("sse4.1");
        }
        if is_x86_feature_detected!("avx") {
            features.push("avx");
        }
        if is_x86_feature_detected!("avx2") {
            features.push("avx2");
        }
        if is_x86_feature_detected!("fma") {
            features.push("fma");
        }
    }

    features
}

/// Routes OpenGL debug messages to the `tracing` subscriber.
pub fn init_debug() {
    unsafe {
        gl::Enable(gl::DEBUG_OUTPUT);
        gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
        gl::DebugMessageCallback(Some(gl_debug_callback), ptr::null());
        gl::DebugMessageControl(
            gl::DONT_CARE,
            gl::DONT_CARE,
            gl::DONT_CARE,
            0,
            ptr::null(),
            gl::TRUE,
        );
    };
}

extern "system" fn gl_debug_callback(
    _src: u32,
    _typ: u32,
    id: u32,
    severity: u32,
    _len: i32,
    msg: *const GLchar,
    _user_param: *mut c_void,
) {
    // Buffer creation on NVidia cards
    if id == 131185 {
        return;
    }

    let msg = unsafe { CStr::from_ptr(msg) };
    let msg = msg.to_string_lossy();

    match severity {
        gl::DEBUG_SEVERITY_NOTIFICATION => tracing::trace!(id, "OpenGL: {msg}"),
        gl::DEBUG_SEVERITY_LOW => tracing::debug!(id, "OpenGL: {msg}"),
        gl::DEBUG_SEVERITY_MEDIUM => tracing::warn!(id, "OpenGL: {msg}"),
        gl::DEBUG_SEVERITY_HIGH => tracing::error!(id, "OpenGL: {msg}"),
        _ => tracing::warn!(id, severity, "OpenGL (unknown severity): {msg}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{stub::StubDriver, *};

    #[test]
    fn context_info_reads_driver_strings() {
        let driver = StubDriver::new();
        let info = ContextInfo::query(&driver);

        assert_eq!(info.version, "4.6.0 Stub");
        assert_eq!(info.renderer, "Stub Renderer");
        assert_eq!(info.vendor, "Stub");
        assert_eq!(info.glsl_version, "4.60 Stub");
        assert_eq!(driver.calls("get_string"), 4);
    }

    #[test]
    #[cfg(target_arch = "x86_64")]
    fn sse2_is_always_present_on_x86_64() {
        assert!(cpu_features().contains(&"sse2"));
    }
}
