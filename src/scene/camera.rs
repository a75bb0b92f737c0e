use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Camera construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescriptor {
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraDescriptor {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 45f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Free-look perspective camera.
///
/// The camera is a plain value; draws receive it explicitly through a
/// [`FrameContext`](crate::render::FrameContext), there is no global
/// "active camera".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    forward: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    #[must_use]
    pub fn new(desc: &CameraDescriptor) -> Self {
        let forward = (desc.target - desc.position).try_normalize().unwrap_or(Vec3::NEG_Z);
        Self {
            position: desc.position,
            forward,
            up: desc.up,
            fov: desc.fov,
            aspect: desc.aspect,
            near: desc.near,
            far: desc.far,
        }
    }

    /// Unit view direction.
    #[inline]
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.forward.cross(self.up).try_normalize().unwrap_or(Vec3::X)
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Sets the view direction. Zero-length directions are ignored.
    pub fn set_direction(&mut self, direction: Vec3) {
        if let Some(forward) = direction.try_normalize() {
            self.forward = forward;
        }
    }

    /// Points the camera at `target`. Ignored when `target` is the camera position.
    pub fn look_at(&mut self, target: Vec3) {
        self.set_direction(target - self.position);
    }

    /// Translates the camera by `offset` in world space.
    pub fn move_by(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Yaw around the up axis, then pitch around the right axis (radians).
    ///
    /// Pitch is refused when it would align the view with the up axis.
    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        let Some(up) = self.up.try_normalize() else {
            return;
        };

        let yawed = Quat::from_axis_angle(up, yaw) * self.forward;
        let right = yawed.cross(up).try_normalize().unwrap_or(Vec3::X);
        let pitched = (Quat::from_axis_angle(right, pitch) * yawed).normalize();

        self.forward = if pitched.cross(up).length_squared() < 1e-4 {
            yawed.normalize()
        } else {
            pitched
        };
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Right-handed look-at view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, self.up)
    }

    /// Perspective projection with an OpenGL `[-1, 1]` depth range.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, self.aspect, self.near, self.far)
    }

    /// `(view, projection)`.
    #[must_use]
    pub fn matrices(&self) -> (Mat4, Mat4) {
        (self.view_matrix(), self.projection_matrix())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraDescriptor::default())
    }
}
