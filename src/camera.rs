use glam::{Mat4, Vec2, Vec3};

const YAW: f32 = -90.;
const PITCH: f32 = 0.;
const SPEED: f32 = 2.5;
const SENSITIVITY: f32 = 0.1;

/// Circle of confusion of the 35mm format in millimeters
const CIRCLE_OF_CONFUSION: f32 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Manual,
    /// `auto_expose` adjusts ISO and aperture
    Auto,
}

/// A fly-through camera modeled after a physical camera body and lens.
///
/// The field of view follows from the focal length and the sensor size.
pub struct Camera {
    /// Position of the camera
    pos: Vec3,
    /// The direction vector
    front: Vec3,
    /// The 'up' vector
    up: Vec3,
    /// The 'right' vector
    right: Vec3,
    world_up: Vec3,
    /// Horizontal angle in degrees
    yaw: f32,
    /// Vertical angle in degrees
    pitch: f32,
    /// Move speed in units per second
    pub move_speed: f32,
    /// Look sensitivity
    pub mouse_sensitivity: f32,
    pub constrain_pitch: bool,
    /// Last x position of the mouse
    last_x: f32,
    /// Last y position of the mouse
    last_y: f32,
    first_mouse: bool,

    /// f-number
    aperture: f32,
    /// In millimeters
    focal_length: f32,
    iso: u32,
    /// In seconds
    shutter_speed: f32,
    /// Sensor width and height in millimeters
    sensor_size: Vec2,
    /// In meters
    focus_distance: f32,
    pub mode: CameraMode,
    pub auto_focus: bool,

    /// Vertical field of view in degrees
    fov: f32,
    exposure_value: f32,

    /// Signals that the view transformation needs to be recomputed
    changed: bool,
    /// Cache of the view matrix
    view_matrix: Mat4,
}

impl Camera {
    /// Creates the camera with a 50mm f/5.6 lens on a full frame sensor
    pub fn new(pos: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            pos,
            front: Vec3::new(0., 0., -1.),
            up: world_up,
            right: Vec3::X,
            world_up,
            yaw,
            pitch,
            move_speed: SPEED,
            mouse_sensitivity: SENSITIVITY,
            constrain_pitch: true,
            last_x: 0.,
            last_y: 0.,
            first_mouse: true,
            aperture: 5.6,
            focal_length: 50.,
            iso: 100,
            shutter_speed: 1. / 125.,
            sensor_size: Vec2::new(36., 24.),
            focus_distance: 10.,
            mode: CameraMode::Manual,
            auto_focus: false,
            fov: 0.,
            exposure_value: 0.,
            changed: true,
            view_matrix: Mat4::IDENTITY,
        };

        camera.update_vectors();
        camera.update_fov();
        camera.update_exposure_value();
        camera
    }

    /// Camera at `pos` looking down -Z
    pub fn at(pos: Vec3) -> Self {
        Self::new(pos, Vec3::Y, YAW, PITCH)
    }

    /// Returns the view matrix (either cached or recomputed)
    pub fn view_matrix(&mut self) -> Mat4 {
        if self.changed {
            self.changed = false;
            self.view_matrix = Mat4::look_at_rh(self.pos, self.pos + self.front, self.up);
        }

        self.view_matrix
    }

    pub fn projection_matrix(&self, width: f32, height: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), width / height, near, far)
    }

    pub fn pos(&self) -> Vec3 {
        self.pos
    }

    pub fn set_pos(&mut self, pos: Vec3) {
        self.pos = pos;
        self.changed = true;
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Moves along the camera axes.
    ///
    /// `movement` is (right, up, forward) and gets normalized, so diagonal moves
    /// aren't faster.
    pub fn process_movement(&mut self, movement: Vec3, delta_time: f32) {
        if movement.length() <= 0. {
            return;
        }

        let m = movement.normalize();
        let velocity = self.move_speed * delta_time;
        self.pos += (m.x * self.right + m.y * self.up + m.z * self.front) * velocity;
        self.changed = true;
    }

    /// Update the (x, y) mouse position and update the yaw and pitch
    pub fn process_mouse_movement(&mut self, x: f32, y: f32) {
        if self.first_mouse {
            self.last_x = x;
            self.last_y = y;
            self.first_mouse = false;
        }

        // Window y grows downwards
        let dx = x - self.last_x;
        let dy = self.last_y - y;
        self.last_x = x;
        self.last_y = y;

        self.yaw += dx * self.mouse_sensitivity;
        self.pitch += dy * self.mouse_sensitivity;

        if self.constrain_pitch {
            self.pitch = self.pitch.clamp(-89., 89.);
        }

        self.update_vectors();
    }

    /// Updates the latest mouse position without turning the camera
    pub fn set_mouse_pos(&mut self, x: f32, y: f32) {
        self.last_x = x;
        self.last_y = y;
        self.first_mouse = false;
    }

    /// Scrolling zooms by changing the focal length
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        let focal_length = self.focal_length - y_offset * 5.;
        self.set_focal_length(focal_length.clamp(14., 200.));
    }

    pub fn aperture(&self) -> f32 {
        self.aperture
    }

    pub fn set_aperture(&mut self, f_stop: f32) {
        self.aperture = f_stop.clamp(1., 22.);
        self.update_exposure_value();
    }

    pub fn focal_length(&self) -> f32 {
        self.focal_length
    }

    pub fn set_focal_length(&mut self, mm: f32) {
        self.focal_length = mm.clamp(14., 600.);
        self.update_fov();
    }

    pub fn iso(&self) -> u32 {
        self.iso
    }

    pub fn set_iso(&mut self, iso: u32) {
        self.iso = iso.clamp(50, 12800);
        self.update_exposure_value();
    }

    pub fn shutter_speed(&self) -> f32 {
        self.shutter_speed
    }

    pub fn set_shutter_speed(&mut self, seconds: f32) {
        self.shutter_speed = seconds.clamp(1. / 8000., 30.);
        self.update_exposure_value();
    }

    pub fn set_sensor_size(&mut self, width: f32, height: f32) {
        self.sensor_size = Vec2::new(width, height);
        self.update_fov();
    }

    pub fn focus_distance(&self) -> f32 {
        self.focus_distance
    }

    pub fn set_focus_distance(&mut self, distance: f32) {
        self.focus_distance = distance.max(0.1);
    }

    /// Vertical field of view in degrees
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn exposure_value(&self) -> f32 {
        self.exposure_value
    }

    /// One step of a simple auto exposure, only active in [`CameraMode::Auto`]
    pub fn auto_expose(&mut self, target_brightness: f32) {
        if self.mode != CameraMode::Auto {
            return;
        }

        let target_ev = (target_brightness * 100.).log2();

        if self.exposure_value < target_ev - 1. {
            if self.iso < 800 {
                self.set_iso(self.iso * 2);
            } else if self.aperture > 2.8 {
                self.set_aperture(self.aperture / 1.4);
            }
        } else if self.exposure_value > target_ev + 1. {
            if self.aperture < 8. {
                self.set_aperture(self.aperture * 1.4);
            } else if self.iso > 100 {
                self.set_iso(self.iso / 2);
            }
        }
    }

    pub fn auto_focus_on_point(&mut self, point: Vec3) {
        if self.auto_focus {
            self.set_focus_distance((point - self.pos).length());
        }
    }

    pub fn set_portrait_mode(&mut self) {
        self.apply_preset(85., 1.8, 1. / 125., 200);
    }

    pub fn set_landscape_mode(&mut self) {
        self.apply_preset(24., 8., 1. / 60., 100);
    }

    pub fn set_sports_mode(&mut self) {
        self.apply_preset(200., 2.8, 1. / 500., 400);
    }

    pub fn set_night_mode(&mut self) {
        self.apply_preset(50., 1.4, 1. / 30., 1600);
    }

    fn apply_preset(&mut self, focal_length: f32, aperture: f32, shutter_speed: f32, iso: u32) {
        self.set_focal_length(focal_length);
        self.set_aperture(aperture);
        self.set_shutter_speed(shutter_speed);
        self.set_iso(iso);
    }

    /// H = f^2 / (N * c) + f, in meters
    pub fn hyperfocal_distance(&self) -> f32 {
        let f = self.focal_length / 1000.;
        let c = CIRCLE_OF_CONFUSION / 1000.;

        f * f / (self.aperture * c) + f
    }

    /// Near and far limits of acceptable sharpness, far is infinite past the hyperfocal distance
    pub fn dof_range(&self) -> Vec2 {
        let h = self.hyperfocal_distance();
        let s = self.focus_distance;

        let near = h * s / (h + s);
        let far = if s >= h { f32::INFINITY } else { h * s / (h - s) };

        Vec2::new(near, far)
    }

    pub fn depth_of_field(&self) -> f32 {
        let range = self.dof_range();
        range.y - range.x
    }

    fn update_vectors(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();

        let front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
        self.front = front.normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
        self.changed = true;
    }

    fn update_fov(&mut self) {
        self.fov = (2. * (self.sensor_size.y / (2. * self.focal_length)).atan()).to_degrees();
    }

    /// EV = log2(N^2 / t) + log2(ISO / 100)
    fn update_exposure_value(&mut self) {
        let base = (self.aperture * self.aperture / self.shutter_speed).log2();
        self.exposure_value = base + (self.iso as f32 / 100.).log2();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}
