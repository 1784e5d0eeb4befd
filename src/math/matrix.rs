//! 4x4矩阵：构造、应用、乘法与转置
//!
//! 行主序存储，行向量约定：`r = v * M`，`r_i = sum_j v_j * M[j*4+i]`。
//! 平移位于第3行，`apply_matrix3d_mm2(r, s, m)` 计算 `r = s * m`，
//! 即先应用 `s` 再应用 `m`。

use dsp3d_simd::kernels::scalar::{mat4_mul_scalar, mat4_transpose_scalar, vec4_mul_mat4_scalar};

use super::{cross3, dot3, sub3, unit3};
use crate::types::{AxisOrientation, Matrix3D, Point3D, Vector3D, IDENTITY};

pub fn init_matrix3d(dst: &mut Matrix3D, src: &Matrix3D) {
    *dst = *src;
}

pub fn init_matrix3d_zero(m: &mut Matrix3D) {
    m.m = [0.0; 16];
}

/// 16个元素全为1
pub fn init_matrix3d_one(m: &mut Matrix3D) {
    m.m = [1.0; 16];
}

pub fn init_matrix3d_identity(m: &mut Matrix3D) {
    *m = IDENTITY;
}

/// 单位矩阵，第3行为 `[dx, dy, dz, 1]`
pub fn init_matrix3d_translate(m: &mut Matrix3D, dx: f32, dy: f32, dz: f32) {
    *m = IDENTITY;
    m.m[12] = dx;
    m.m[13] = dy;
    m.m[14] = dz;
}

/// 平移到点 `p`（从原点出发）
pub fn init_matrix3d_translate_p1(m: &mut Matrix3D, p: &Point3D) {
    init_matrix3d_translate(m, p.x, p.y, p.z);
}

pub fn init_matrix3d_translate_v1(m: &mut Matrix3D, v: &Vector3D) {
    init_matrix3d_translate(m, v.dx, v.dy, v.dz);
}

/// `diag(sx, sy, sz, 1)`
pub fn init_matrix3d_scale(m: &mut Matrix3D, sx: f32, sy: f32, sz: f32) {
    *m = IDENTITY;
    m.m[0] = sx;
    m.m[5] = sy;
    m.m[10] = sz;
}

pub fn init_matrix3d_rotate_x(m: &mut Matrix3D, angle: f32) {
    let (s, c) = angle.sin_cos();
    m.m = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, c, -s, 0.0, //
        0.0, s, c, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];
}

pub fn init_matrix3d_rotate_y(m: &mut Matrix3D, angle: f32) {
    let (s, c) = angle.sin_cos();
    m.m = [
        c, 0.0, s, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        -s, 0.0, c, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];
}

pub fn init_matrix3d_rotate_z(m: &mut Matrix3D, angle: f32) {
    let (s, c) = angle.sin_cos();
    m.m = [
        c, -s, 0.0, 0.0, //
        s, c, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];
}

/// 绕任意轴 `(x, y, z)` 旋转
///
/// 轴恰好与坐标轴对齐（两个分量严格为0）时直接使用单轴构造，负方向的轴
/// 对应取反的角度；轴为0向量时得到单位矩阵。其余情况先归一化轴，再按
/// Rodrigues公式构造，排布与单轴构造一致。
pub fn init_matrix3d_rotate_xyz(m: &mut Matrix3D, x: f32, y: f32, z: f32, angle: f32) {
    if x == 0.0 && y == 0.0 {
        if z > 0.0 {
            init_matrix3d_rotate_z(m, angle);
        } else if z < 0.0 {
            init_matrix3d_rotate_z(m, -angle);
        } else {
            init_matrix3d_identity(m);
        }
        return;
    }
    if x == 0.0 && z == 0.0 {
        if y > 0.0 {
            init_matrix3d_rotate_y(m, angle);
        } else {
            init_matrix3d_rotate_y(m, -angle);
        }
        return;
    }
    if y == 0.0 && z == 0.0 {
        if x > 0.0 {
            init_matrix3d_rotate_x(m, angle);
        } else {
            init_matrix3d_rotate_x(m, -angle);
        }
        return;
    }

    let len = (x * x + y * y + z * z).sqrt();
    let (x, y, z) = (x / len, y / len, z / len);
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;

    m.m = [
        t * x * x + c,
        t * x * y - z * s,
        t * x * z + y * s,
        0.0,
        t * x * y + z * s,
        t * y * y + c,
        t * y * z - x * s,
        0.0,
        t * x * z - y * s,
        t * y * z + x * s,
        t * z * z + c,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
    ];
}

/// 透视视锥（同glFrustum），按行向量约定存放
pub fn init_matrix3d_frustum(
    m: &mut Matrix3D,
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) {
    let w = right - left;
    let h = top - bottom;
    let d = far - near;

    init_matrix3d_zero(m);
    m.m[0] = 2.0 * near / w;
    m.m[5] = 2.0 * near / h;
    m.m[8] = (right + left) / w;
    m.m[9] = (top + bottom) / h;
    m.m[10] = -(far + near) / d;
    m.m[11] = -1.0;
    m.m[14] = -2.0 * far * near / d;
}

/// 观察矩阵（同gluLookAt）：视点 `pov` 变到原点，`fwd` 方向变到 -Z，
/// `up` 在 YZ 平面内朝 +Y
pub fn init_matrix3d_lookat_p1v2(m: &mut Matrix3D, pov: &Point3D, fwd: &Vector3D, up: &Vector3D) {
    let f = unit3(fwd.lanes());
    let s = unit3(&cross3(&f, up.lanes()));
    let u = cross3(&s, &f);
    let eye = pov.lanes();

    m.m = [
        s[0],
        u[0],
        -f[0],
        0.0,
        s[1],
        u[1],
        -f[1],
        0.0,
        s[2],
        u[2],
        -f[2],
        0.0,
        -dot3(&s, eye),
        -dot3(&u, eye),
        dot3(&f, eye),
        1.0,
    ];
}

/// 观察矩阵：从 `pov` 看向 `pod`
pub fn init_matrix3d_lookat_p2v1(m: &mut Matrix3D, pov: &Point3D, pod: &Point3D, up: &Vector3D) {
    let fwd = Vector3D::from_lanes(sub3(pod.lanes(), pov.lanes()));
    init_matrix3d_lookat_p1v2(m, pov, &fwd, up);
}

/// 坐标系转换：源坐标系的前方轴映射到 +Y，上方轴映射到 +Z，
/// `前方 × 上方` 映射到 +X
pub fn init_matrix3d_orientation(m: &mut Matrix3D, orientation: AxisOrientation) {
    let (fwd, up) = orientation.axes();
    let f = fwd.unit();
    let u = up.unit();
    let r = [
        f[1] * u[2] - f[2] * u[1],
        f[2] * u[0] - f[0] * u[2],
        f[0] * u[1] - f[1] * u[0],
    ];

    init_matrix3d_zero(m);
    for j in 0..3 {
        m.m[j * 4] = r[j];
        m.m[j * 4 + 1] = f[j];
        m.m[j * 4 + 2] = u[j];
    }
    m.m[15] = 1.0;
}

/// 行向量乘矩阵后，w 非零时做齐次除法
fn transform_lanes(v: &[f32; 4], m: &Matrix3D) -> [f32; 4] {
    let mut r = [0.0; 4];
    vec4_mul_mat4_scalar(v, &m.m, &mut r);
    let w = r[3];
    if w != 0.0 {
        for value in r.iter_mut() {
            *value /= w;
        }
    }
    r
}

/// `r = v * m`
pub fn apply_matrix3d_mv2(r: &mut Vector3D, v: &Vector3D, m: &Matrix3D) {
    *r = Vector3D::from_lanes(transform_lanes(v.lanes(), m));
}

/// `r = r * m`
pub fn apply_matrix3d_mv1(r: &mut Vector3D, m: &Matrix3D) {
    *r = Vector3D::from_lanes(transform_lanes(r.lanes(), m));
}

/// `r = p * m`
pub fn apply_matrix3d_mp2(r: &mut Point3D, p: &Point3D, m: &Matrix3D) {
    *r = Point3D::from_lanes(transform_lanes(p.lanes(), m));
}

/// `r = r * m`
pub fn apply_matrix3d_mp1(r: &mut Point3D, m: &Matrix3D) {
    *r = Point3D::from_lanes(transform_lanes(r.lanes(), m));
}

/// `r = s * m`
pub fn apply_matrix3d_mm2(r: &mut Matrix3D, s: &Matrix3D, m: &Matrix3D) {
    mat4_mul_scalar(&s.m, &m.m, &mut r.m);
}

/// `r = r * m`，经临时矩阵中转
pub fn apply_matrix3d_mm1(r: &mut Matrix3D, m: &Matrix3D) {
    let s = *r;
    mat4_mul_scalar(&s.m, &m.m, &mut r.m);
}

pub fn transpose_matrix3d1(r: &mut Matrix3D) {
    for i in 0..4 {
        for j in (i + 1)..4 {
            r.m.swap(i * 4 + j, j * 4 + i);
        }
    }
}

pub fn transpose_matrix3d2(r: &mut Matrix3D, m: &Matrix3D) {
    mat4_transpose_scalar(&m.m, &mut r.m);
}
