use glam::Mat4;

use crate::scene::Camera;

/// Per-draw render context.
///
/// Carries the camera and time a draw is made with. Passing it explicitly
/// replaces any notion of a globally "active" camera: each draw names the
/// camera it is seen through, and drawing without one uses identity
/// view/projection (clip-space placement).
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameContext<'a> {
    camera: Option<&'a Camera>,
    time: f32,
}

impl<'a> FrameContext<'a> {
    #[must_use]
    pub fn new(camera: Option<&'a Camera>, time: f32) -> Self {
        Self { camera, time }
    }

    #[must_use]
    pub fn with_camera(camera: &'a Camera) -> Self {
        Self::new(Some(camera), 0.0)
    }

    #[must_use]
    pub fn camera(&self) -> Option<&'a Camera> {
        self.camera
    }

    /// Seconds since the app started, fed to the `uTime` uniform.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// `(view, projection)` of the camera, identity without one.
    #[must_use]
    pub fn view_projection(&self) -> (Mat4, Mat4) {
        self.camera
            .map_or((Mat4::IDENTITY, Mat4::IDENTITY), Camera::matrices)
    }
}
