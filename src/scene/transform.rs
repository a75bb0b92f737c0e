use glam::{Affine3A, EulerRot, Mat3, Mat4, Quat, Vec3};

/// Local TRS state of a transform node.
///
/// Holds position, rotation and scale plus the derived local matrix
/// (`T * R * S`). The matrix is rebuilt by [`update_local_matrix`], which
/// compares the public fields against a shadow copy so unchanged transforms
/// cost nothing. The world matrix is owned by the graph node, not here.
///
/// [`update_local_matrix`]: Transform::update_local_matrix
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    local_matrix: Affine3A,

    // Shadow state for the dirty check
    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: false,
        }
    }

    /// Transform with the given position and scale, local matrix already built.
    #[must_use]
    pub fn from_position_scale(position: Vec3, scale: Vec3) -> Self {
        let mut transform = Self::new();
        transform.position = position;
        transform.scale = scale;
        transform.update_local_matrix();
        transform
    }

    // ========================================================================
    // Local matrix
    // ========================================================================

    /// Rebuilds the local matrix if any TRS field changed since the last call.
    ///
    /// Returns `true` when the matrix was rebuilt.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix =
                Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position);

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    #[inline]
    #[must_use]
    pub fn local_matrix_as_mat4(&self) -> Mat4 {
        Mat4::from(self.local_matrix)
    }

    /// Sets the local matrix directly and decomposes it back into TRS.
    ///
    /// Shear is lost in the decomposition.
    pub fn apply_local_matrix(&mut self, mat: Affine3A) {
        let (scale, rotation, translation) = mat.to_scale_rotation_translation();

        self.local_matrix = mat;
        self.scale = scale;
        self.rotation = rotation;
        self.position = translation;

        self.last_scale = scale;
        self.last_rotation = rotation;
        self.last_position = translation;
        self.force_update = false;
    }

    /// Forces the next [`update_local_matrix`](Self::update_local_matrix) to rebuild.
    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }

    // ========================================================================
    // Rotation helpers
    // ========================================================================

    /// Rotation from Euler angles (XYZ order, radians).
    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }

    pub fn set_rotation_euler_with_order(&mut self, x: f32, y: f32, z: f32, order: EulerRot) {
        self.rotation = Quat::from_euler(order, x, y, z);
    }

    /// Current rotation as XYZ Euler angles.
    #[must_use]
    pub fn rotation_euler(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    /// Rotation of `angle` radians around `axis`.
    ///
    /// Returns `false` and leaves the rotation untouched for a zero-length axis.
    pub fn set_rotation_axis_angle(&mut self, axis: Vec3, angle: f32) -> bool {
        let Some(axis) = axis.try_normalize() else {
            return false;
        };
        self.rotation = Quat::from_axis_angle(axis, angle);
        true
    }

    /// In-plane (roll) rotation around +Z, the usual 2D sprite rotation.
    pub fn set_rotation_z(&mut self, angle: f32) {
        self.rotation = Quat::from_rotation_z(angle);
    }

    /// Orients -Z towards `target`, expressed in the parent's space.
    ///
    /// Degenerate inputs (target on the up axis) leave the rotation untouched.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let Some(forward) = (target - self.position).try_normalize() else {
            return;
        };

        if forward.cross(up).length_squared() < 1e-4 {
            return;
        }

        let right = forward.cross(up).normalize();
        let new_up = right.cross(forward).normalize();

        let rot_mat = Mat3::from_cols(right, new_up, -forward);
        self.rotation = Quat::from_mat3(&rot_mat);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
