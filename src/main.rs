use eyre::Result;
use glam::{Vec2, Vec3};
use image::{DynamicImage, Rgb, RgbImage};
use sdl2::keyboard::Scancode;
use tracing_subscriber::EnvFilter;

use glsandbox::{
    camera::Camera,
    config::AppConfig,
    cube::Cube,
    input::{KeyBindings, PolygonMode},
    instances,
    light::DirectionalLight,
    memory::{self, TrackingAllocator},
    ogl::{
        self,
        buffer::{BufferUsage, ElementBuffer, VertexBuffer},
        texture::Texture,
        vertex_array::VertexArray,
        Driver, Gl,
    },
    shader::GraphicsProgram,
    vertex::VertexPosUV2D,
    window::{fit_viewport, AppWindow},
};

#[global_allocator]
static ALLOCATOR: TrackingAllocator = TrackingAllocator::system();

const NEAR: f32 = 0.1;
const FAR: f32 = 200.;

/// State the key bindings can change
struct Controls {
    camera: Camera,
    polygon_mode: PolygonMode,
    quit: bool,
}

fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env()?;
    let mut window = AppWindow::new(&config)?;
    ogl::init_debug();

    let driver = Gl;
    ogl::ContextInfo::query(&driver).log();
    tracing::info!("CPU features: {}", ogl::cpu_features().join(", "));
    let mut viewport = fit_viewport(&driver, window.drawable_size());

    let quad = Quad::new(driver);
    let quad_shader = GraphicsProgram::from_file(driver, &config.shader_path)?;
    let texture = load_texture(driver, &config)?;

    let cube = Cube::new(driver);
    let cube_shader = GraphicsProgram::from_file(driver, &config.cube_shader_path)?;
    let light = DirectionalLight::default();

    let cubes = instances::scatter(&mut rand::thread_rng(), config.cube_count, 2.5);
    let mut models = vec![glam::Mat4::IDENTITY; cubes.len()];

    let mut controls = Controls {
        camera: Camera::at(Vec3::new(0., 3., 15.)),
        polygon_mode: PolygonMode::Fill,
        quit: false,
    };
    let mut bindings = setup_bindings(driver);

    let mut last_frame = window.elapsed_secs();

    'render_loop: loop {
        let time = window.elapsed_secs();
        let delta_time = time - last_frame;
        last_frame = time;

        let events = window.poll_events();
        if events.quit {
            break 'render_loop;
        }

        if events.resized {
            viewport = fit_viewport(&driver, window.drawable_size());
        }

        for key in &events.key_presses {
            bindings.dispatch(*key, &mut controls);
        }
        if controls.quit {
            break 'render_loop;
        }

        if events.scroll != 0. {
            controls.camera.process_mouse_scroll(events.scroll);
        }
        handle_inputs(&window, &mut controls.camera, delta_time);

        instances::rotate_instances(&cubes, time, &mut models);

        driver.clear_color(0.1, 0.1, 0.12, 1.);
        driver.clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);

        // Background quad
        driver.disable(gl::DEPTH_TEST);
        quad_shader.bind();
        quad_shader.set_f32(time, "time");
        quad_shader.set_i32(0, "wallTexture");
        texture.bind();
        quad.draw();

        // Cubes
        driver.enable(gl::DEPTH_TEST);
        let aspect = Vec2::new(viewport.0 as f32, viewport.1 as f32);
        let view = controls.camera.view_matrix();
        let projection = controls
            .camera
            .projection_matrix(aspect.x, aspect.y, NEAR, FAR);

        cube_shader.bind();
        cube_shader.set_mat4(view, "view");
        cube_shader.set_mat4(projection, "projection");
        cube_shader.set_vec3(controls.camera.pos(), "viewPos");
        light.apply(&cube_shader);

        for model in &models {
            cube_shader.set_mat4(*model, "model");
            cube.draw();
        }

        window.swap();
    }

    memory::report(&ALLOCATOR);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn setup_bindings(driver: Gl) -> KeyBindings<Controls> {
    let mut bindings = KeyBindings::new();

    bindings.subscribe(Scancode::Escape, |c: &mut Controls| c.quit = true);
    bindings.subscribe(Scancode::F, move |c: &mut Controls| {
        let mode = c.polygon_mode.toggle();
        mode.apply(&driver);
        tracing::debug!("polygon mode: {mode:?}");
    });

    bindings.subscribe(Scancode::Num1, |c: &mut Controls| c.camera.set_portrait_mode());
    bindings.subscribe(Scancode::Num2, |c: &mut Controls| c.camera.set_landscape_mode());
    bindings.subscribe(Scancode::Num3, |c: &mut Controls| c.camera.set_sports_mode());
    bindings.subscribe(Scancode::Num4, |c: &mut Controls| c.camera.set_night_mode());

    bindings
}

fn handle_inputs(window: &AppWindow, camera: &mut Camera, delta_time: f32) {
    let axis = |pos: Scancode, neg: Scancode| {
        window.is_key_down(pos) as i32 as f32 - window.is_key_down(neg) as i32 as f32
    };

    let movement = Vec3::new(
        axis(Scancode::D, Scancode::A),
        axis(Scancode::Space, Scancode::LCtrl),
        axis(Scancode::W, Scancode::S),
    );
    camera.process_movement(movement, delta_time);

    let (mouse_x, mouse_y, right) = window.mouse();
    if right {
        camera.process_mouse_movement(mouse_x, mouse_y);
    } else {
        camera.set_mouse_pos(mouse_x, mouse_y);
    }
}

/// Falls back to a checkerboard if the texture can't be loaded
fn load_texture(driver: Gl, config: &AppConfig) -> Result<Texture> {
    match Texture::from_file(driver, &config.texture_path) {
        Ok(texture) => Ok(texture),
        Err(e) => {
            tracing::warn!("{e:#}, using a checkerboard instead");
            let checkerboard = RgbImage::from_fn(64, 64, |x, y| {
                if (x / 8 + y / 8) % 2 == 0 {
                    Rgb([200, 200, 200])
                } else {
                    Rgb([60, 60, 60])
                }
            });

            Ok(Texture::from_image(driver, &DynamicImage::ImageRgb8(checkerboard)))
        }
    }
}

/// Textured quad in the middle of the screen
struct Quad {
    vao: VertexArray,
    _vbo: VertexBuffer,
    ebo: ElementBuffer,
    driver: Gl,
}

impl Quad {
    fn new(driver: Gl) -> Self {
        let vertices = [
            VertexPosUV2D { pos: Vec2::new(-0.5, -0.5), uv: Vec2::new(0., 0.) },
            VertexPosUV2D { pos: Vec2::new(0.5, -0.5), uv: Vec2::new(1., 0.) },
            VertexPosUV2D { pos: Vec2::new(0.5, 0.5), uv: Vec2::new(1., 1.) },
            VertexPosUV2D { pos: Vec2::new(-0.5, 0.5), uv: Vec2::new(0., 1.) },
        ];
        let indices: [u32; 6] = [0, 1, 2, 2, 3, 0];

        let vao = VertexArray::new(driver);
        let vbo = VertexBuffer::new(driver);
        let mut ebo = ElementBuffer::new(driver);

        vao.bind();
        vbo.bind(gl::ARRAY_BUFFER);
        vbo.upload(gl::ARRAY_BUFFER, &vertices, BufferUsage::Static);
        vao.enable_layout::<VertexPosUV2D>();
        ebo.bind();
        ebo.upload(&indices, BufferUsage::Static);
        vao.unbind();

        Self {
            vao,
            _vbo: vbo,
            ebo,
            driver,
        }
    }

    fn draw(&self) {
        self.vao.bind();
        self.driver
            .draw_elements(gl::TRIANGLES, self.ebo.len() as i32, gl::UNSIGNED_INT, 0);
    }
}
