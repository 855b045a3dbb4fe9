//! Math type aliases and helper functions.
//!
//! All rendering math is f32. Projection helpers follow the GL clip-space
//! convention (right-handed, depth range `[-1, 1]`) because the consumers are
//! WebGL-style rendering contexts.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

/// 3x3 matrix (f32).
pub type Mat3 = nalgebra::Matrix3<f32>;

/// 4x4 matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Build a right-handed perspective projection with depth range [-1, 1].
///
/// `yfov` is in radians.
pub fn perspective_gl(yfov: f32, aspect: f32, znear: f32, zfar: f32) -> Mat4 {
    Mat4::new_perspective(aspect, yfov, znear, zfar)
}

/// Build a right-handed orthographic projection with depth range [-1, 1].
pub fn orthographic_gl(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    Mat4::new_orthographic(left, right, bottom, top, near, far)
}

/// Right-handed look-at view matrix.
pub fn look_at_rh(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
    let eye_point = nalgebra::Point3::from(*eye);
    let target_point = nalgebra::Point3::from(*target);
    nalgebra::Isometry3::look_at_rh(&eye_point, &target_point, up).to_homogeneous()
}

/// Build a translation-only 4x4 matrix.
pub fn mat4_from_translation(t: Vec3) -> Mat4 {
    Mat4::new_translation(&t)
}

/// Build a rotation matrix around `axis` by `angle` radians.
///
/// Returns `None` when the axis cannot be normalized (zero length or not finite).
pub fn mat4_from_axis_angle(axis: Vec3, angle: f32) -> Option<Mat4> {
    let axis = nalgebra::Unit::try_new(axis, f32::EPSILON)?;
    if !axis.iter().all(|c| c.is_finite()) {
        return None;
    }
    Some(Mat4::from_axis_angle(&axis, angle))
}

/// Column-major `[f32; 16]` view of a matrix, the layout uniform uploads expect.
pub fn mat4_to_array(m: &Mat4) -> [f32; 16] {
    let mut out = [0.0; 16];
    out.copy_from_slice(m.as_slice());
    out
}

/// Upper-left 3x3 block of a 4x4 matrix.
pub fn mat4_upper_3x3(m: &Mat4) -> Mat3 {
    m.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Approximate element-wise equality.
#[cfg(test)]
pub(crate) fn mat4_approx_eq(a: &Mat4, b: &Mat4, epsilon: f32) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= epsilon)
}
