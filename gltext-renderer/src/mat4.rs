/// Column-major 4x4 matrix, laid out the way `uniformMatrix4fv` expects it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub data: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::new_identity()
    }
}

impl Mat4 {
    pub fn new_identity() -> Self {
        let mut data = [0.0; 16];
        data[0] = 1.0;
        data[5] = 1.0;
        data[10] = 1.0;
        data[15] = 1.0;
        Self { data }
    }

    /// Pixel-space projection with the origin at the bottom-left corner.
    pub fn orthographic_from_size(width: f32, height: f32) -> Self {
        Self::new_orthographic(0.0, width, 0.0, height, -1.0, 1.0)
    }

    pub fn new_orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let mut result = Self::new_identity();
        let data = &mut result.data;

        data[0] = 2.0 / (right - left);
        data[5] = 2.0 / (top - bottom);
        data[10] = -2.0 / (far - near);

        data[12] = -(right + left) / (right - left);
        data[13] = -(top + bottom) / (top - bottom);
        data[14] = -(far + near) / (far - near);

        result
    }

    /// Perspective projection of the view frustum bounded by the given planes.
    pub fn new_frustum(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let mut data = [0.0; 16];

        data[0] = 2.0 * near / (right - left);
        data[5] = 2.0 * near / (top - bottom);
        data[8] = (right + left) / (right - left);
        data[9] = (top + bottom) / (top - bottom);
        data[10] = -(far + near) / (far - near);
        data[11] = -1.0;
        data[14] = -2.0 * far * near / (far - near);

        Self { data }
    }

    /// View matrix for a camera at `eye` looking at `center`.
    pub fn look_at(eye: [f32; 3], center: [f32; 3], up: [f32; 3]) -> Self {
        let f = normalize(sub(center, eye));
        let s = normalize(cross(f, up));
        let u = cross(s, f);

        #[rustfmt::skip]
        let data = [
            s[0], u[0], -f[0], 0.0,
            s[1], u[1], -f[1], 0.0,
            s[2], u[2], -f[2], 0.0,
            -dot(s, eye), -dot(u, eye), dot(f, eye), 1.0,
        ];

        Self { data }
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut result = Self::new_identity();
        result.data[12] = x;
        result.data[13] = y;
        result.data[14] = z;
        result
    }

    pub fn rotation_x(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        let mut result = Self::new_identity();
        result.data[5] = c;
        result.data[6] = s;
        result.data[9] = -s;
        result.data[10] = c;
        result
    }

    pub fn rotation_y(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        let mut result = Self::new_identity();
        result.data[0] = c;
        result.data[2] = -s;
        result.data[8] = s;
        result.data[10] = c;
        result
    }

    pub fn rotation_z(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        let mut result = Self::new_identity();
        result.data[0] = c;
        result.data[1] = s;
        result.data[4] = -s;
        result.data[5] = c;
        result
    }

    /// Matrix product `self * rhs`; `rhs` is applied first.
    pub fn mul(&self, rhs: &Mat4) -> Mat4 {
        let (a, b) = (&self.data, &rhs.data);
        let mut data = [0.0; 16];

        for col in 0..4 {
            for row in 0..4 {
                data[col * 4 + row] = (0..4).map(|k| a[k * 4 + row] * b[col * 4 + k]).sum();
            }
        }

        Mat4 { data }
    }

    /// Applies the matrix to the point `(x, y, z, 1)`, returning the homogeneous result.
    pub fn transform_point(&self, x: f32, y: f32, z: f32) -> [f32; 4] {
        let m = &self.data;
        [
            m[0] * x + m[4] * y + m[8] * z + m[12],
            m[1] * x + m[5] * y + m[9] * z + m[13],
            m[2] * x + m[6] * y + m[10] * z + m[14],
            m[3] * x + m[7] * y + m[11] * z + m[15],
        ]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[1] * b[2] - a[2] * b[1], a[2] * b[0] - a[0] * b[2], a[0] * b[1] - a[1] * b[0]]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = dot(v, v).sqrt();
    if len == 0.0 {
        return v;
    }
    [v[0] / len, v[1] / len, v[2] / len]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: [f32; 4], expected: [f32; 4]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-5, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_identity_is_neutral() {
        let m = Mat4::translation(1.0, 2.0, 3.0).mul(&Mat4::rotation_z(33.0));
        assert_eq!(Mat4::new_identity().mul(&m), m);
        assert_eq!(m.mul(&Mat4::new_identity()), m);
    }

    #[test]
    fn test_translate_then_rotate_z() {
        let m = Mat4::translation(5.0, 6.0, 7.0).mul(&Mat4::rotation_z(90.0));
        assert_close(m.transform_point(1.0, 0.0, 0.0), [5.0, 7.0, 7.0, 1.0]);
    }

    #[test]
    fn test_rotations_follow_right_hand_rule() {
        assert_close(Mat4::rotation_x(90.0).transform_point(0.0, 1.0, 0.0), [0.0, 0.0, 1.0, 1.0]);
        assert_close(Mat4::rotation_y(90.0).transform_point(0.0, 0.0, 1.0), [1.0, 0.0, 0.0, 1.0]);
        assert_close(Mat4::rotation_z(90.0).transform_point(1.0, 0.0, 0.0), [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_orthographic_maps_corners_to_clip_space() {
        let m = Mat4::new_orthographic(-2.0, 2.0, -1.0, 1.0, 3.0, 7.0);

        assert_close(m.transform_point(-2.0, -1.0, -3.0), [-1.0, -1.0, -1.0, 1.0]);
        assert_close(m.transform_point(2.0, 1.0, -7.0), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_orthographic_from_size_has_bottom_left_origin() {
        let m = Mat4::orthographic_from_size(800.0, 600.0);

        assert_close(m.transform_point(0.0, 0.0, 0.0), [-1.0, -1.0, 0.0, 1.0]);
        assert_close(m.transform_point(800.0, 600.0, 0.0), [1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_frustum_maps_near_plane_corners() {
        let m = Mat4::new_frustum(-1.0, 1.0, -0.5, 0.5, 1.0, 10.0);

        let p = m.transform_point(1.0, 0.5, -1.0);
        assert_close([p[0] / p[3], p[1] / p[3], p[2] / p[3], 1.0], [1.0, 1.0, -1.0, 1.0]);

        let p = m.transform_point(0.0, 0.0, -10.0);
        assert_close([p[0] / p[3], p[1] / p[3], p[2] / p[3], 1.0], [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_look_at_moves_eye_to_origin() {
        let view = Mat4::look_at([0.0, 0.0, 3.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]);

        assert_close(view.transform_point(0.0, 0.0, 3.0), [0.0, 0.0, 0.0, 1.0]);
        assert_close(view.transform_point(0.0, 0.0, 0.0), [0.0, 0.0, -3.0, 1.0]);
        assert_close(view.transform_point(1.0, 1.0, 0.0), [1.0, 1.0, -3.0, 1.0]);
    }
}
