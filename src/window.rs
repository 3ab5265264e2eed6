use std::time::Instant;

use eyre::{eyre, Result};
use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Scancode,
    video::{GLContext, GLProfile, SwapInterval, Window},
    EventPump, Sdl, VideoSubsystem,
};

use crate::{config::AppConfig, ogl::Driver};

/// What happened since the last frame
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameEvents {
    pub quit: bool,
    /// The window size changed, the new framebuffer size comes from
    /// [`AppWindow::drawable_size`] since the event carries window units
    pub resized: bool,
    /// Keys pressed down this frame, without auto-repeat
    pub key_presses: Vec<Scancode>,
    /// Accumulated vertical wheel motion
    pub scroll: f32,
}

impl FrameEvents {
    pub fn record(&mut self, event: &Event) {
        match *event {
            Event::Quit { .. } => self.quit = true,
            Event::Window {
                win_event: WindowEvent::Resized(..) | WindowEvent::SizeChanged(..),
                ..
            } => self.resized = true,
            Event::KeyDown {
                scancode: Some(scancode),
                repeat: false,
                ..
            } => self.key_presses.push(scancode),
            Event::MouseWheel { y, .. } => self.scroll += y as f32,
            _ => {}
        }
    }
}

/// Sets the viewport to cover a framebuffer of `drawable` pixels and returns its size
pub fn fit_viewport<D: Driver>(driver: &D, drawable: (u32, u32)) -> (i32, i32) {
    let size = (drawable.0.max(1) as i32, drawable.1.max(1) as i32);
    driver.viewport(0, 0, size.0, size.1);
    size
}

/// SDL window with a current OpenGL core context
pub struct AppWindow {
    _sdl_context: Sdl,
    _video_subsystem: VideoSubsystem,
    window: Window,
    _gl_ctx: GLContext,
    pub event_pump: EventPump,
    start_time: Instant,
}

impl AppWindow {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let sdl_context = sdl2::init().map_err(|e| eyre!("{e}"))?;
        let video_subsystem = sdl_context.video().map_err(|e| eyre!("{e}"))?;

        // The attributes only apply to contexts created afterwards
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_major_version(config.gl_major);
        gl_attr.set_context_minor_version(config.gl_minor);
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_flags().debug().set();
        gl_attr.set_double_buffer(true);
        gl_attr.set_depth_size(24);

        let window = video_subsystem
            .window(&config.title, config.width, config.height)
            .opengl()
            .resizable()
            .position_centered()
            .allow_highdpi()
            .build()?;

        let gl_ctx = window.gl_create_context().map_err(|e| eyre!("{e}"))?;
        gl::load_with(|name| video_subsystem.gl_get_proc_address(name) as *const _);

        let interval = if config.vsync {
            SwapInterval::VSync
        } else {
            SwapInterval::Immediate
        };
        video_subsystem
            .gl_set_swap_interval(interval)
            .map_err(|e| eyre!("{e}"))?;

        let event_pump = sdl_context.event_pump().map_err(|e| eyre!("{e}"))?;

        tracing::info!(
            "created a {}x{} window with an OpenGL {}.{} context",
            config.width,
            config.height,
            config.gl_major,
            config.gl_minor
        );

        Ok(Self {
            _sdl_context: sdl_context,
            _video_subsystem: video_subsystem,
            window,
            _gl_ctx: gl_ctx,
            event_pump,
            start_time: Instant::now(),
        })
    }

    /// Drains the event queue
    pub fn poll_events(&mut self) -> FrameEvents {
        let mut events = FrameEvents::default();
        for event in self.event_pump.poll_iter() {
            events.record(&event);
        }

        events
    }

    pub fn is_key_down(&self, key: Scancode) -> bool {
        self.event_pump.keyboard_state().is_scancode_pressed(key)
    }

    /// Mouse position and whether the right button is held
    pub fn mouse(&self) -> (f32, f32, bool) {
        let state = self.event_pump.mouse_state();
        (state.x() as f32, state.y() as f32, state.right())
    }

    /// Framebuffer size in pixels, larger than the window size on HiDPI displays
    pub fn drawable_size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }

    pub fn swap(&self) {
        self.window.gl_swap_window();
    }

    /// Seconds since the window was created
    pub fn elapsed_secs(&self) -> f32 {
        self.start_time.elapsed().as_secs_f32()
    }
}
