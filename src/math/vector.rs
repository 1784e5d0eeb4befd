//! 向量的构造、归一化、翻转、缩放与叉积

use super::{cross3, length3, sub3, unit3};
use crate::types::{Point3D, Vector3D};
use dsp3d_simd::kernels::scalar::normalize3_scalar;

pub fn init_vector_dxyz(v: &mut Vector3D, dx: f32, dy: f32, dz: f32) {
    *v = Vector3D::new(dx, dy, dz);
}

pub fn init_vector(v: &mut Vector3D, s: &Vector3D) {
    *v = *s;
}

/// `v = p2 - p1`
pub fn init_vector_p2(v: &mut Vector3D, p1: &Point3D, p2: &Point3D) {
    *v = Vector3D::from_lanes(sub3(p2.lanes(), p1.lanes()));
}

/// `v = pv[1] - pv[0]`
pub fn init_vector_pv(v: &mut Vector3D, pv: &[Point3D; 2]) {
    init_vector_p2(v, &pv[0], &pv[1]);
}

/// 从 `(x1, y1, z1)` 指向 `(x2, y2, z2)` 的单位向量
pub fn init_normal3d_xyz(v: &mut Vector3D, x1: f32, y1: f32, z1: f32, x2: f32, y2: f32, z2: f32) {
    *v = Vector3D::from_lanes(unit3(&[x2 - x1, y2 - y1, z2 - z1, 0.0]));
}

pub fn init_normal3d_dxyz(v: &mut Vector3D, dx: f32, dy: f32, dz: f32) {
    *v = Vector3D::from_lanes(unit3(&[dx, dy, dz, 0.0]));
}

pub fn init_normal3d(v: &mut Vector3D, s: &Vector3D) {
    *v = Vector3D::from_lanes(unit3(s.lanes()));
}

/// 就地归一化xyz，w 保持不变；长度恰为0时xyz为0
pub fn normalize_vector(v: &mut Vector3D) {
    let s = *v;
    normalize_vector2(v, &s);
}

pub fn normalize_vector2(v: &mut Vector3D, src: &Vector3D) {
    let mut r = [0.0; 4];
    normalize3_scalar(src.lanes(), &mut r);
    *v = Vector3D::from_lanes(r);
}

pub fn flip_vector_v1(v: &mut Vector3D) {
    v.dx = -v.dx;
    v.dy = -v.dy;
    v.dz = -v.dz;
}

pub fn flip_vector_v2(v: &mut Vector3D, sv: &Vector3D) {
    *v = Vector3D {
        dx: -sv.dx,
        dy: -sv.dy,
        dz: -sv.dz,
        dw: sv.dw,
    };
}

/// 就地缩放到长度 `r`
pub fn scale_vector1(v: &mut Vector3D, r: f32) {
    let s = *v;
    scale_vector2(v, &s, r);
}

/// 把 `s` 缩放到长度 `r`；长度为0时得到0向量
pub fn scale_vector2(v: &mut Vector3D, s: &Vector3D, r: f32) {
    let len = length3(s.lanes());
    *v = if len == 0.0 {
        Vector3D::ZERO
    } else {
        let k = r / len;
        Vector3D {
            dx: s.dx * k,
            dy: s.dy * k,
            dz: s.dz * k,
            dw: s.dw,
        }
    };
}

/// 叉积 `r = v1 × v2`
pub fn vector_mul_v2(r: &mut Vector3D, v1: &Vector3D, v2: &Vector3D) {
    *r = Vector3D::from_lanes(cross3(v1.lanes(), v2.lanes()));
}

/// 叉积 `r = vv[0] × vv[1]`
pub fn vector_mul_vv(r: &mut Vector3D, vv: &[Vector3D; 2]) {
    vector_mul_v2(r, &vv[0], &vv[1]);
}
