//! 混合积与点在三角形内的判定

use super::{cross3, dot3, sub3};
use crate::types::{Point3D, Vector3D};

/// `n · ((p2-p1) × (p3-p2))`，与法线同向时非负
pub fn check_triplet3d_p3n(p1: &Point3D, p2: &Point3D, p3: &Point3D, n: &Vector3D) -> f32 {
    let c = cross3(&sub3(p2.lanes(), p1.lanes()), &sub3(p3.lanes(), p2.lanes()));
    dot3(&c, n.lanes())
}

pub fn check_triplet3d_pvn(pv: &[Point3D; 3], n: &Vector3D) -> f32 {
    check_triplet3d_p3n(&pv[0], &pv[1], &pv[2], n)
}

/// `n · (v1 × v2)`
pub fn check_triplet3d_v2n(v1: &Vector3D, v2: &Vector3D, n: &Vector3D) -> f32 {
    dot3(&cross3(v1.lanes(), v2.lanes()), n.lanes())
}

pub fn check_triplet3d_vvn(vv: &[Vector3D; 2], n: &Vector3D) -> f32 {
    check_triplet3d_v2n(&vv[0], &vv[1], n)
}

/// `vv[2] · (vv[0] × vv[1])`
pub fn check_triplet3d_vv(vv: &[Vector3D; 3]) -> f32 {
    check_triplet3d_v2n(&vv[0], &vv[1], &vv[2])
}

/// 点 `p` 是否位于三角形内
///
/// 以 `v_i = t_i - p` 两两叉乘得到 `m0, m1, m2`，再求相邻叉积的点积
/// `r0 = m0·m1`、`r1 = m1·m2`、`r2 = m2·m0`。按顺序返回第一个负值；
/// 都不为负时返回乘积：正数在内部，0 在边或顶点上。
pub fn check_point3d_on_triangle_p3p(
    p1: &Point3D,
    p2: &Point3D,
    p3: &Point3D,
    p: &Point3D,
) -> f32 {
    let v0 = sub3(p1.lanes(), p.lanes());
    let v1 = sub3(p2.lanes(), p.lanes());
    let v2 = sub3(p3.lanes(), p.lanes());

    let m0 = cross3(&v0, &v1);
    let m1 = cross3(&v1, &v2);
    let m2 = cross3(&v2, &v0);

    let r0 = dot3(&m0, &m1);
    if r0 < 0.0 {
        return r0;
    }
    let r1 = dot3(&m1, &m2);
    if r1 < 0.0 {
        return r1;
    }
    let r2 = dot3(&m2, &m0);
    if r2 < 0.0 {
        return r2;
    }
    r0 * r1 * r2
}

pub fn check_point3d_on_triangle_pvp(pv: &[Point3D; 3], p: &Point3D) -> f32 {
    check_point3d_on_triangle_p3p(&pv[0], &pv[1], &pv[2], p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> [Point3D; 3] {
        [
            Point3D::new(1.0, 1.0, 1.0),
            Point3D::new(3.0, 1.0, 1.0),
            Point3D::new(2.0, 3.0, 1.0),
        ]
    }

    #[test]
    fn test_triplet_orientation() {
        let [a, b, c] = triangle();
        assert!(check_triplet3d_p3n(&a, &b, &c, &Vector3D::new(1.0, 1.0, 1.0)) >= 0.0);
        assert!(check_triplet3d_p3n(&a, &b, &c, &Vector3D::new(-1.0, -1.0, -1.0)) <= 0.0);
        assert_eq!(
            check_triplet3d_pvn(&triangle(), &Vector3D::new(0.0, 0.0, 1.0)),
            4.0
        );
    }

    #[test]
    fn test_triplet_vectors() {
        let x = Vector3D::new(1.0, 0.0, 0.0);
        let y = Vector3D::new(0.0, 1.0, 0.0);
        let z = Vector3D::new(0.0, 0.0, 1.0);
        assert_eq!(check_triplet3d_v2n(&x, &y, &z), 1.0);
        assert_eq!(check_triplet3d_vvn(&[y, x], &z), -1.0);
        assert_eq!(check_triplet3d_vv(&[x, y, z]), 1.0);
    }

    #[test]
    fn test_point_on_triangle() {
        let t = triangle();
        assert!(check_point3d_on_triangle_pvp(&t, &Point3D::new(2.0, 2.0, 1.0)) > 0.0);
        assert_eq!(check_point3d_on_triangle_pvp(&t, &Point3D::new(2.0, 3.0, 1.0)), 0.0);
        assert!(check_point3d_on_triangle_p3p(&t[0], &t[1], &t[2], &Point3D::new(0.5, 0.0, 1.0)) < 0.0);
    }

    #[test]
    fn test_point_on_edge_is_zero() {
        let t = triangle();
        assert_eq!(check_point3d_on_triangle_pvp(&t, &Point3D::new(2.0, 1.0, 1.0)), 0.0);
    }
}
