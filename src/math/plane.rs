//! 平面方程与法线
//!
//! 平面 `{nx, ny, nz, d}`，`k = pl · p`（四个分量）。定向平面约定定向点位于
//! 平面下方，即 `k(sp) >= 0`。

use super::{cross3, dot3, dot4, length3, sub3, unit3};
use crate::types::{Plane3D, Point3D, Vector3D};

/// 由法线（未归一化）与平面上一点构造平面，返回法线长度；长度为0时平面置0
fn plane_from_normal(v: &mut Plane3D, n: &[f32; 4], p: &Point3D) -> f32 {
    let len = length3(n);
    if len == 0.0 {
        *v = Vector3D::plane(0.0, 0.0, 0.0, 0.0);
        return 0.0;
    }
    let n = [n[0] / len, n[1] / len, n[2] / len, 0.0];
    *v = Vector3D::plane(n[0], n[1], n[2], -dot3(&n, p.lanes()));
    len
}

/// 过三点的平面，法线为 `(p1-p0) × (p2-p0)`
///
/// 返回归一化前叉积的长度（三角形面积的两倍）；三点共线时返回0且平面为0。
pub fn calc_plane_p3(v: &mut Plane3D, p0: &Point3D, p1: &Point3D, p2: &Point3D) -> f32 {
    let n = cross3(&sub3(p1.lanes(), p0.lanes()), &sub3(p2.lanes(), p0.lanes()));
    plane_from_normal(v, &n, p0)
}

pub fn calc_plane_pv(v: &mut Plane3D, pv: &[Point3D; 3]) -> f32 {
    calc_plane_p3(v, &pv[0], &pv[1], &pv[2])
}

/// 过 `p0`、`p1` 且平行于 `v0` 的平面，法线为 `(p1-p0) × v0`
pub fn calc_plane_v1p2(v: &mut Plane3D, v0: &Vector3D, p0: &Point3D, p1: &Point3D) -> f32 {
    let n = cross3(&sub3(p1.lanes(), p0.lanes()), v0.lanes());
    plane_from_normal(v, &n, p0)
}

/// 复制 `pl`，必要时翻转四个分量使 `sp` 位于平面下方；返回 `|pl · sp|`
pub fn orient_plane_v1p1(v: &mut Plane3D, sp: &Point3D, pl: &Plane3D) -> f32 {
    let k = dot4(pl.lanes(), sp.lanes());
    if k < 0.0 {
        *v = Vector3D::plane(-pl.dx, -pl.dy, -pl.dz, -pl.dw);
        -k
    } else {
        *v = *pl;
        k
    }
}

/// 同 [`orient_plane_v1p1`]，但使 `sp` 位于平面上方
fn rev_orient_plane_v1p1(v: &mut Plane3D, sp: &Point3D, pl: &Plane3D) -> f32 {
    let k = dot4(pl.lanes(), sp.lanes());
    if k > 0.0 {
        *v = Vector3D::plane(-pl.dx, -pl.dy, -pl.dz, -pl.dw);
        k
    } else {
        *v = *pl;
        -k
    }
}

/// 过三点、`sp` 位于下方的平面；返回叉积长度
pub fn calc_oriented_plane_p3(
    v: &mut Plane3D,
    sp: &Point3D,
    p0: &Point3D,
    p1: &Point3D,
    p2: &Point3D,
) -> f32 {
    let mut pl = Plane3D::default();
    let len = calc_plane_p3(&mut pl, p0, p1, p2);
    orient_plane_v1p1(v, sp, &pl);
    len
}

pub fn calc_oriented_plane_pv(v: &mut Plane3D, sp: &Point3D, pv: &[Point3D; 3]) -> f32 {
    calc_oriented_plane_p3(v, sp, &pv[0], &pv[1], &pv[2])
}

/// 过三点、`sp` 位于上方的平面；返回叉积长度
pub fn calc_rev_oriented_plane_p3(
    v: &mut Plane3D,
    sp: &Point3D,
    p0: &Point3D,
    p1: &Point3D,
    p2: &Point3D,
) -> f32 {
    let mut pl = Plane3D::default();
    let len = calc_plane_p3(&mut pl, p0, p1, p2);
    rev_orient_plane_v1p1(v, sp, &pl);
    len
}

pub fn calc_rev_oriented_plane_pv(v: &mut Plane3D, sp: &Point3D, pv: &[Point3D; 3]) -> f32 {
    calc_rev_oriented_plane_p3(v, sp, &pv[0], &pv[1], &pv[2])
}

/// 过 `sp`、`pp` 且平行于直线 `p0p1` 的平面，直线位于平面下方
///
/// 返回法线 `(p1-p0) × (pp-sp)` 的长度；退化输入返回0且平面为0。
pub fn calc_parallel_plane_p2p2(
    v: &mut Plane3D,
    sp: &Point3D,
    pp: &Point3D,
    p0: &Point3D,
    p1: &Point3D,
) -> f32 {
    let n = cross3(&sub3(p1.lanes(), p0.lanes()), &sub3(pp.lanes(), sp.lanes()));
    let mut pl = Plane3D::default();
    let len = plane_from_normal(&mut pl, &n, pp);
    if len == 0.0 {
        *v = pl;
        return 0.0;
    }
    orient_plane_v1p1(v, p0, &pl);
    len
}

/// 三点的单位法线 `(p2-p1) × (p3-p2)`；退化时为0向量
pub fn calc_normal3d_p3(n: &mut Vector3D, p1: &Point3D, p2: &Point3D, p3: &Point3D) {
    let c = cross3(&sub3(p2.lanes(), p1.lanes()), &sub3(p3.lanes(), p2.lanes()));
    *n = Vector3D::from_lanes(unit3(&c));
}

pub fn calc_normal3d_pv(n: &mut Vector3D, pv: &[Point3D; 3]) {
    calc_normal3d_p3(n, &pv[0], &pv[1], &pv[2]);
}

/// `v1 × v2` 的单位向量；退化时为0向量
pub fn calc_normal3d_v2(n: &mut Vector3D, v1: &Vector3D, v2: &Vector3D) {
    *n = Vector3D::from_lanes(unit3(&cross3(v1.lanes(), v2.lanes())));
}

pub fn calc_normal3d_vv(n: &mut Vector3D, vv: &[Vector3D; 2]) {
    calc_normal3d_v2(n, &vv[0], &vv[1]);
}
