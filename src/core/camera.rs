use glam::{Mat4, Vec3};
use log::warn;

pub const YAW: f32 = -90.0;
pub const PITCH: f32 = 0.0;
pub const SPEED: f32 = 2.5;
pub const SENSITIVITY: f32 = 0.1;
pub const FOV: f32 = 45.0;

/// Range the field of view is kept in by scrolling, in degrees
pub const MIN_FOV: f32 = 1.0;
pub const MAX_FOV: f32 = 45.0;
/// Pitch limit applied by constrained mouse movement, in degrees
pub const MAX_PITCH: f32 = 89.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Upward,
    Downward,
}

/// A fly camera driven by Euler angles.
///
/// Yaw and pitch (in degrees) are the orientation; `front`, `right` and `up` are derived from
/// them after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    world_up: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,

    movement_speed: f32,
    mouse_sensitivity: f32,
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Camera::builder().build()
    }
}

impl Camera {
    pub fn builder() -> CameraBuilder {
        CameraBuilder {
            position: Vec3::new(0.0, 0.0, 3.0),
            world_up: Vec3::Y,
            yaw: YAW,
            pitch: PITCH,
            movement_speed: SPEED,
            mouse_sensitivity: SENSITIVITY,
            fov: FOV,
            aspect: 800.0 / 600.0,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Moves the camera `movement_speed * delta` units in `direction`
    pub fn process_keyboard(&mut self, direction: Movement, delta: f32) {
        let velocity = self.movement_speed * delta;
        match direction {
            Movement::Forward => self.position += self.front * velocity,
            Movement::Backward => self.position -= self.front * velocity,
            Movement::Left => self.position -= self.right * velocity,
            Movement::Right => self.position += self.right * velocity,
            Movement::Upward => self.position += self.world_up * velocity,
            Movement::Downward => self.position -= self.world_up * velocity,
        }
    }

    /// Turns the camera by a mouse offset; with `constrain_pitch` the pitch stays within ±89°
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch += dy * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-MAX_PITCH, MAX_PITCH);
        }

        self.update_vectors();
    }

    /// Zooms by narrowing the field of view
    pub fn process_mouse_scroll(&mut self, dy: f32) {
        self.fov = (self.fov - dy).clamp(MIN_FOV, MAX_FOV);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

pub struct CameraBuilder {
    position: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    movement_speed: f32,
    mouse_sensitivity: f32,
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl CameraBuilder {
    pub fn position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    pub fn world_up(&mut self, world_up: Vec3) -> &mut Self {
        self.world_up = world_up.try_normalize().unwrap_or_else(|| {
            warn!("World up `{}` has no direction, using +Y", world_up);
            Vec3::Y
        });
        self
    }

    /// Sets yaw and pitch in degrees
    pub fn rotation(&mut self, yaw: f32, pitch: f32) -> &mut Self {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-MAX_PITCH, MAX_PITCH);
        if self.pitch != pitch {
            warn!("Pitch out of bounds: `{}`, clamped to {}", pitch, self.pitch);
        }
        self
    }

    pub fn movement_speed(&mut self, speed: f32) -> &mut Self {
        self.movement_speed = speed;
        self
    }

    pub fn mouse_sensitivity(&mut self, sensitivity: f32) -> &mut Self {
        self.mouse_sensitivity = sensitivity;
        self
    }

    /// Vertical field of view in degrees
    pub fn fov(&mut self, fov: f32) -> &mut Self {
        self.fov = fov.clamp(MIN_FOV, MAX_FOV);
        if self.fov != fov {
            warn!("Fov out of bounds: {} <= `{}` <= {}", MIN_FOV, fov, MAX_FOV);
        }
        self
    }

    pub fn aspect(&mut self, aspect: f32) -> &mut Self {
        self.aspect = aspect;
        self
    }

    pub fn near(&mut self, near: f32) -> &mut Self {
        if near <= 0.0 {
            warn!("Near is negative: `{}`", near);
        }
        self.near = near;
        self
    }

    pub fn far(&mut self, far: f32) -> &mut Self {
        if far <= 0.0 {
            warn!("Far is negative: `{}`", far);
        }
        self.far = far;
        self
    }

    pub fn build(&mut self) -> Camera {
        if self.far < self.near {
            warn!("Far is closer than near: `{}` `{}`", self.far, self.near);
        }

        let mut camera = Camera {
            position: self.position,
            world_up: self.world_up,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            yaw: self.yaw,
            pitch: self.pitch,
            movement_speed: self.movement_speed,
            mouse_sensitivity: self.mouse_sensitivity,
            fov: self.fov,
            aspect: self.aspect,
            near: self.near,
            far: self.far,
        };
        camera.update_vectors();
        camera
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_orthonormal(camera: &Camera) {
        assert!((camera.front().length() - 1.0).abs() < EPSILON);
        assert!((camera.right().length() - 1.0).abs() < EPSILON);
        assert!((camera.up().length() - 1.0).abs() < EPSILON);
        assert!(camera.front().dot(camera.right()).abs() < EPSILON);
        assert!(camera.front().dot(camera.up()).abs() < EPSILON);
        assert!(camera.right().dot(camera.up()).abs() < EPSILON);
    }

    #[test]
    fn test_defaults() {
        let camera = Camera::default();
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 3.0));
        assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, EPSILON));
        assert!(camera.right().abs_diff_eq(Vec3::X, EPSILON));
        assert!(camera.up().abs_diff_eq(Vec3::Y, EPSILON));
        assert_eq!(camera.fov(), 45.0);
        assert_orthonormal(&camera);
    }

    #[test]
    fn test_keyboard() {
        let mut camera = Camera::default();
        camera.process_keyboard(Movement::Forward, 2.0);
        assert!(camera.position().abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), EPSILON));

        camera.process_keyboard(Movement::Right, 1.0);
        camera.process_keyboard(Movement::Upward, 1.0);
        assert!(camera.position().abs_diff_eq(Vec3::new(2.5, 2.5, -2.0), EPSILON));

        camera.process_keyboard(Movement::Left, 1.0);
        camera.process_keyboard(Movement::Downward, 1.0);
        camera.process_keyboard(Movement::Backward, 2.0);
        assert!(camera.position().abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), EPSILON));
    }

    #[test]
    fn test_pitch_is_constrained() {
        let mut camera = Camera::default();
        for _ in 0..100 {
            camera.process_mouse_movement(13.0, 1000.0, true);
            assert!(camera.pitch() <= MAX_PITCH);
            assert_orthonormal(&camera);
        }
        for _ in 0..100 {
            camera.process_mouse_movement(-7.0, -1e6, true);
            assert!(camera.pitch() >= -MAX_PITCH);
            assert_orthonormal(&camera);
        }

        camera.process_mouse_movement(0.0, -2000.0, false);
        assert!(camera.pitch() < -MAX_PITCH);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse_scroll(10.0);
        assert_eq!(camera.fov(), 35.0);
        camera.process_mouse_scroll(1000.0);
        assert_eq!(camera.fov(), MIN_FOV);
        camera.process_mouse_scroll(-1000.0);
        assert_eq!(camera.fov(), MAX_FOV);
    }

    #[test]
    fn test_matrices() {
        let mut camera = Camera::default();
        let view = camera.view_matrix();
        assert!(view
            .transform_point3(Vec3::new(0.0, 0.0, 3.0))
            .abs_diff_eq(Vec3::ZERO, EPSILON));
        assert!(view
            .transform_point3(Vec3::ZERO)
            .abs_diff_eq(Vec3::new(0.0, 0.0, -3.0), EPSILON));

        let before = camera.projection_matrix();
        camera.set_aspect_ratio(2.0);
        assert_eq!(camera.aspect_ratio(), 2.0);
        assert_ne!(before, camera.projection_matrix());
        assert_eq!(
            camera.projection_matrix(),
            Mat4::perspective_rh_gl(45f32.to_radians(), 2.0, 0.1, 100.0)
        );
    }

    #[test]
    fn test_builder_clamps() {
        let camera = Camera::builder().fov(90.0).rotation(0.0, 120.0).build();
        assert_eq!(camera.fov(), MAX_FOV);
        assert_eq!(camera.pitch(), MAX_PITCH);
        assert!(camera.front().z.abs() < EPSILON);
        assert!(camera.front().y > 0.99);
        assert_orthonormal(&camera);
    }
}
