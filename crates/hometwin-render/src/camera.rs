//! Camera rig: orbit / first-person navigation and bounds auto-framing.

use glam::{Mat4, Vec2, Vec3};
use hometwin_core::visibility::CameraMode;

/// Fixed diagonal the camera frames a model from.
fn frame_direction() -> Vec3 {
    Vec3::new(1.0, 0.8, 1.0).normalize()
}

/// Minimum framing distance for tiny or empty-ish models.
const MIN_FRAME_DISTANCE: f32 = 2.5;

/// Residual input state of the orbit controller.
#[derive(Debug, Clone, Copy, Default)]
struct OrbitState {
    rotate_velocity: Vec2,
    pan_velocity: Vec2,
    zoom_velocity: f32,
}

impl OrbitState {
    fn clear(&mut self) {
        *self = Self::default();
    }

    fn is_settled(&self) -> bool {
        self.rotate_velocity.length_squared() < 1e-10
            && self.pan_velocity.length_squared() < 1e-10
            && self.zoom_velocity.abs() < 1e-5
    }
}

/// Look direction state of the first-person controller.
#[derive(Debug, Clone, Copy, Default)]
struct FirstPersonState {
    yaw: f32,
    pitch: f32,
}

/// A perspective camera with two mutually exclusive navigation modes.
///
/// Exactly one controller is active at a time; switching modes clears the
/// inactive controller's residual state so it can never keep steering the
/// camera after the switch.
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// Camera position in render (world) space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Movement speed multiplier (first-person).
    pub move_speed: f32,
    /// Orbit velocity decay rate (per second).
    pub damping: f32,

    mode: CameraMode,
    orbit: OrbitState,
    first_person: FirstPersonState,
}

impl CameraRig {
    /// Creates a rig with default settings.
    #[must_use]
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::new(3.0, 2.4, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_4,
            aspect_ratio,
            near: 0.01,
            far: 1000.0,
            move_speed: 1.0,
            damping: 6.0,
            mode: CameraMode::Orbit,
            orbit: OrbitState::default(),
            first_person: FirstPersonState::default(),
        }
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// The active navigation mode.
    #[must_use]
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Switches navigation mode, fully disabling the previous controller.
    pub fn set_mode(&mut self, mode: CameraMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        match mode {
            CameraMode::Orbit => {
                self.orbit.clear();
            }
            CameraMode::FirstPerson => {
                self.orbit.clear();
                // Seed look angles from the current view direction so the
                // switch does not snap the camera.
                let forward = self.forward();
                self.first_person.yaw = forward.x.atan2(forward.z);
                self.first_person.pitch = forward.y.clamp(-1.0, 1.0).asin();
            }
        }
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Returns the camera's forward direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Returns the camera's right direction.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or_zero()
    }

    // === Input (routed by mode; input for the inactive mode is dropped) ===

    /// Orbit rotate input (e.g. pointer drag deltas).
    pub fn rotate_input(&mut self, delta_x: f32, delta_y: f32) {
        if self.mode == CameraMode::Orbit {
            self.orbit.rotate_velocity += Vec2::new(delta_x, delta_y);
        }
    }

    /// Orbit pan input.
    pub fn pan_input(&mut self, delta_x: f32, delta_y: f32) {
        if self.mode == CameraMode::Orbit {
            self.orbit.pan_velocity += Vec2::new(delta_x, delta_y);
        }
    }

    /// Orbit zoom input (scroll).
    pub fn zoom_input(&mut self, delta: f32) {
        if self.mode == CameraMode::Orbit {
            self.orbit.zoom_velocity += delta;
        }
    }

    /// First-person look input.
    pub fn look_input(&mut self, delta_x: f32, delta_y: f32) {
        if self.mode != CameraMode::FirstPerson {
            return;
        }
        let limit = std::f32::consts::FRAC_PI_2 - 0.01;
        self.first_person.yaw -= delta_x;
        self.first_person.pitch = (self.first_person.pitch - delta_y).clamp(-limit, limit);
        self.refresh_first_person_target();
    }

    /// First-person move input (forward/right amounts).
    pub fn move_input(&mut self, forward: f32, right: f32) {
        if self.mode != CameraMode::FirstPerson {
            return;
        }
        // Planar movement: walking, not flying.
        let facing = self.forward();
        let planar_forward = Vec3::new(facing.x, 0.0, facing.z).normalize_or_zero();
        let planar_right = planar_forward.cross(self.up).normalize_or_zero();
        let offset = (planar_forward * forward + planar_right * right) * self.move_speed;
        self.position += offset;
        self.target += offset;
    }

    /// Advances the active controller by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if self.mode != CameraMode::Orbit || self.orbit.is_settled() {
            return;
        }

        let step = self.orbit.rotate_velocity * dt;
        self.apply_orbit(step.x, step.y);
        let pan_step = self.orbit.pan_velocity * dt;
        self.apply_pan(pan_step.x, pan_step.y);
        self.apply_zoom(self.orbit.zoom_velocity * dt);

        // Exponential velocity decay.
        let decay = (-self.damping * dt).exp();
        self.orbit.rotate_velocity *= decay;
        self.orbit.pan_velocity *= decay;
        self.orbit.zoom_velocity *= decay;
        if self.orbit.is_settled() {
            self.orbit.clear();
        }
    }

    /// Frames an axis-aligned bounding box.
    ///
    /// Skipped entirely for non-finite bounds (empty scene) so the camera
    /// never jumps to NaN. Near/far planes scale with the framing distance
    /// so large homes are not clipped.
    pub fn fit_to_bounds(&mut self, min: Vec3, max: Vec3) {
        if !min.is_finite() || !max.is_finite() {
            return;
        }

        let center = (min + max) * 0.5;
        let max_dim = (max - min).max_element();
        let distance = (max_dim * 1.5).max(MIN_FRAME_DISTANCE);

        self.target = center;
        self.position = center + frame_direction() * distance;
        self.near = (distance * 0.001).max(0.001);
        self.far = distance * 100.0;
        self.orbit.clear();
    }

    fn apply_orbit(&mut self, delta_x: f32, delta_y: f32) {
        let radius = (self.position - self.target).length();
        let mut theta = (self.position.x - self.target.x).atan2(self.position.z - self.target.z);
        let mut phi = ((self.position.y - self.target.y) / radius).clamp(-1.0, 1.0).acos();

        theta -= delta_x;
        phi = (phi - delta_y).clamp(0.01, std::f32::consts::PI - 0.01);

        self.position = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
    }

    fn apply_pan(&mut self, delta_x: f32, delta_y: f32) {
        let offset = self.right() * delta_x + self.up * delta_y;
        self.position += offset;
        self.target += offset;
    }

    fn apply_zoom(&mut self, delta: f32) {
        let direction = self.forward();
        let distance = (self.position - self.target).length();
        let new_distance = (distance - delta).max(0.1);
        self.position = self.target - direction * new_distance;
    }

    fn refresh_first_person_target(&mut self) {
        let (yaw, pitch) = (self.first_person.yaw, self.first_person.pitch);
        let direction = Vec3::new(
            pitch.cos() * yaw.sin(),
            pitch.sin(),
            pitch.cos() * yaw.cos(),
        );
        self.target = self.position + direction;
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}
