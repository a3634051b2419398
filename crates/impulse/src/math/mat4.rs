use std::ops::{Add, Mul, Sub};

use super::Vec3;

/// Column-major 4×4 matrix, `m[column][row]`.
///
/// Used for body transforms (rotation + translation), inertia tensors (only the
/// upper 3×3 block is meaningful) and camera projections. All operations take
/// and return values, so writing a product back into one of its operands is
/// always safe.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const ZERO: Self = Self { m: [[0.0; 4]; 4] };

    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Builds a matrix from three basis columns and a translation.
    #[must_use]
    pub const fn from_cols(x: Vec3, y: Vec3, z: Vec3, translation: Vec3) -> Self {
        Self {
            m: [
                [x.x, x.y, x.z, 0.0],
                [y.x, y.y, y.z, 0.0],
                [z.x, z.y, z.z, 0.0],
                [translation.x, translation.y, translation.z, 1.0],
            ],
        }
    }

    /// Diagonal matrix, e.g. a principal-axis inertia tensor.
    #[must_use]
    pub const fn from_diagonal(d: Vec3) -> Self {
        Self::from_cols(
            Vec3::new(d.x, 0.0, 0.0),
            Vec3::new(0.0, d.y, 0.0),
            Vec3::new(0.0, 0.0, d.z),
            Vec3::ZERO,
        )
    }

    #[must_use]
    pub const fn translation(t: Vec3) -> Self {
        Self::from_cols(Vec3::X, Vec3::Y, Vec3::Z, t)
    }

    #[must_use]
    pub const fn scale(s: Vec3) -> Self {
        Self::from_diagonal(s)
    }

    /// Rotation of `angle` radians about `axis` (Rodrigues).
    ///
    /// The axis is normalized internally. A zero axis has no direction to
    /// rotate about, so the identity is returned.
    #[must_use]
    pub fn rotation(axis: Vec3, angle: f32) -> Self {
        let n = axis.normalize();
        if n == Vec3::ZERO {
            return Self::IDENTITY;
        }
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (n.x, n.y, n.z);

        Self::from_cols(
            Vec3::new(c + x * x * t, y * x * t + z * s, z * x * t - y * s),
            Vec3::new(x * y * t - z * s, c + y * y * t, z * y * t + x * s),
            Vec3::new(x * z * t + y * s, y * z * t - x * s, c + z * z * t),
            Vec3::ZERO,
        )
    }

    /// Right-handed perspective projection (OpenGL clip space, depth in `[-1, 1]`).
    #[must_use]
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let tan_half = (fov_y * 0.5).tan();
        let mut r = Self::ZERO;
        r.m[0][0] = 1.0 / (aspect * tan_half);
        r.m[1][1] = 1.0 / tan_half;
        r.m[2][2] = -(far + near) / (far - near);
        r.m[2][3] = -1.0;
        r.m[3][2] = -(2.0 * far * near) / (far - near);
        r
    }

    /// View matrix looking from `eye` toward `target`.
    #[must_use]
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let f = (target - eye).normalize();
        let r = f.cross(up).normalize();
        let u = r.cross(f);

        let mut v = Self::IDENTITY;
        v.m[0][0] = r.x;
        v.m[1][0] = r.y;
        v.m[2][0] = r.z;
        v.m[0][1] = u.x;
        v.m[1][1] = u.y;
        v.m[2][1] = u.z;
        v.m[0][2] = -f.x;
        v.m[1][2] = -f.y;
        v.m[2][2] = -f.z;
        v.m[3][0] = -r.dot(eye);
        v.m[3][1] = -u.dot(eye);
        v.m[3][2] = f.dot(eye);
        v
    }

    #[must_use]
    pub fn col(&self, c: usize) -> Vec3 {
        Vec3::new(self.m[c][0], self.m[c][1], self.m[c][2])
    }

    #[must_use]
    pub fn get_translation(&self) -> Vec3 {
        self.col(3)
    }

    /// Copy with the translation column cleared.
    #[must_use]
    pub fn rotation_part(&self) -> Self {
        Self::from_cols(self.col(0), self.col(1), self.col(2), Vec3::ZERO)
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut t = Self::ZERO;
        for c in 0..4 {
            for r in 0..4 {
                t.m[c][r] = self.m[r][c];
            }
        }
        t
    }

    /// Inverse of a rigid transform.
    ///
    /// Precondition: the linear part is a pure rotation (orthonormal, no scale
    /// or shear). The rotation block is transposed and the translation rotated
    /// back and negated; any other matrix gives a meaningless result.
    #[must_use]
    pub fn affine_inverse(&self) -> Self {
        let rt = self.rotation_part().transpose();
        let t = rt.transform_direction(self.get_translation());
        Self::from_cols(rt.col(0), rt.col(1), rt.col(2), -t)
    }

    /// General inverse of the upper 3×3 block, `None` when it is singular.
    #[must_use]
    pub fn inverse3(&self) -> Option<Self> {
        // Row-major names for the 3×3 block.
        let (a, b, c) = (self.m[0][0], self.m[1][0], self.m[2][0]);
        let (d, e, f) = (self.m[0][1], self.m[1][1], self.m[2][1]);
        let (g, h, i) = (self.m[0][2], self.m[1][2], self.m[2][2]);

        let co_a = e * i - f * h;
        let co_b = -(d * i - f * g);
        let co_c = d * h - e * g;
        let det = a * co_a + b * co_b + c * co_c;
        if det.abs() < f32::MIN_POSITIVE || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;

        let rows = [
            [co_a, -(b * i - c * h), b * f - c * e],
            [co_b, a * i - c * g, -(a * f - c * d)],
            [co_c, -(a * h - b * g), a * e - b * d],
        ];
        let mut inv = Self::IDENTITY;
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                inv.m[c][r] = value * inv_det;
            }
        }
        Some(inv)
    }

    /// Gram-Schmidt re-orthonormalization of the rotation block; the
    /// translation is kept.
    #[must_use]
    pub fn orthonormalized(&self) -> Self {
        let x = self.col(0).normalize();
        let y = (self.col(1) - x * x.dot(self.col(1))).normalize();
        let z = x.cross(y);
        Self::from_cols(x, y, z, self.get_translation())
    }

    /// Transforms a point, dividing by `w` (a zero `w` is treated as 1).
    #[must_use]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.m;
        let mut w = m[0][3] * p.x + m[1][3] * p.y + m[2][3] * p.z + m[3][3];
        if w.abs() < f32::MIN_POSITIVE {
            w = 1.0;
        }
        Vec3::new(
            (m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0]) / w,
            (m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1]) / w,
            (m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2]) / w,
        )
    }

    /// Applies only the upper 3×3 block (no translation, no divide).
    #[must_use]
    pub fn transform_direction(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z,
            m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z,
            m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z,
        )
    }
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul(self, b: Self) -> Self {
        let mut out = Self::ZERO;
        for c in 0..4 {
            for r in 0..4 {
                out.m[c][r] = self.m[0][r] * b.m[c][0]
                    + self.m[1][r] * b.m[c][1]
                    + self.m[2][r] * b.m[c][2]
                    + self.m[3][r] * b.m[c][3];
            }
        }
        out
    }
}

impl Mul<f32> for Mat4 {
    type Output = Self;

    fn mul(self, s: f32) -> Self {
        let mut out = self;
        for col in &mut out.m {
            for v in col.iter_mut() {
                *v *= s;
            }
        }
        out
    }
}

impl Add for Mat4 {
    type Output = Self;

    fn add(self, b: Self) -> Self {
        let mut out = self;
        for c in 0..4 {
            for r in 0..4 {
                out.m[c][r] += b.m[c][r];
            }
        }
        out
    }
}

impl Sub for Mat4 {
    type Output = Self;

    fn sub(self, b: Self) -> Self {
        self + b * -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    fn approx_mat(a: &Mat4, b: &Mat4) -> bool {
        a.m.iter()
            .flatten()
            .zip(b.m.iter().flatten())
            .all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn identity_is_neutral_for_multiply() {
        let t = Mat4::translation(Vec3::new(1.0, 2.0, 3.0)) * Mat4::rotation(Vec3::Y, 0.3);
        assert!(approx_mat(&(Mat4::IDENTITY * t), &t));
        assert!(approx_mat(&(t * Mat4::IDENTITY), &t));
    }

    #[test]
    fn rotation_about_z_maps_x_to_y() {
        let r = Mat4::rotation(Vec3::new(0.0, 0.0, 2.0), FRAC_PI_2);
        assert!(approx(r.transform_direction(Vec3::X), Vec3::Y));
    }

    #[test]
    fn zero_axis_rotation_is_identity() {
        assert_eq!(Mat4::rotation(Vec3::ZERO, 1.0), Mat4::IDENTITY);
    }

    #[test]
    fn affine_inverse_undoes_rigid_transform() {
        let t = Mat4::translation(Vec3::new(4.0, -1.0, 2.0))
            * Mat4::rotation(Vec3::new(1.0, 1.0, 0.0), 0.7);
        let p = Vec3::new(0.5, 0.25, -3.0);
        let back = t.affine_inverse().transform_point(t.transform_point(p));
        assert!(approx(back, p));
        assert!(approx_mat(&(t.affine_inverse() * t), &Mat4::IDENTITY));
    }

    #[test]
    fn inverse3_of_diagonal_and_singular() {
        let d = Mat4::from_diagonal(Vec3::new(2.0, 4.0, 0.5));
        let inv = d.inverse3().unwrap();
        assert!(approx(inv.transform_direction(Vec3::ONE), Vec3::new(0.5, 0.25, 2.0)));
        assert!(Mat4::from_diagonal(Vec3::new(1.0, 0.0, 1.0)).inverse3().is_none());
        assert!(Mat4::ZERO.inverse3().is_none());
    }

    #[test]
    fn orthonormalized_keeps_rotation_and_translation() {
        let t = Mat4::translation(Vec3::new(1.0, 2.0, 3.0)) * Mat4::rotation(Vec3::X, 0.4);
        assert!(approx_mat(&t.orthonormalized(), &t));
    }

    #[test]
    fn look_at_puts_target_on_negative_z() {
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        assert!(approx(view.transform_point(Vec3::ZERO), Vec3::new(0.0, 0.0, -10.0)));
    }

    #[test]
    fn perspective_maps_near_and_far_planes() {
        let p = Mat4::perspective(1.0472, 16.0 / 9.0, 0.1, 100.0);
        assert!((p.transform_point(Vec3::new(0.0, 0.0, -0.1)).z + 1.0).abs() < 1e-4);
        assert!((p.transform_point(Vec3::new(0.0, 0.0, -100.0)).z - 1.0).abs() < 1e-3);
    }
}
