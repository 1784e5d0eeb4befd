//! 点相对平面的位置分类
//!
//! `k = pl · p`：`k < -tol` 为上方 (`00`)，`|k| <= tol` 为平面上 (`01`)，
//! `k > tol` 为下方 (`10`)。打包编码中实体0位于最低位。

use super::dot4;
use crate::types::{Colocation, ColocationX2, ColocationX3, Plane3D, Point3D};

#[inline]
pub fn classify_point(pl: &Plane3D, p: &Point3D) -> Colocation {
    Colocation::classify(dot4(pl.lanes(), p.lanes()))
}

/// 三个点相对同一平面的分类
pub fn classify_x3(pl: &Plane3D, pv: &[Point3D; 3]) -> ColocationX3 {
    ColocationX3([
        classify_point(pl, &pv[0]),
        classify_point(pl, &pv[1]),
        classify_point(pl, &pv[2]),
    ])
}

pub fn colocation_x2_v1p2(pl: &Plane3D, p0: &Point3D, p1: &Point3D) -> usize {
    ColocationX2([classify_point(pl, p0), classify_point(pl, p1)]).pack()
}

pub fn colocation_x2_v1pv(pl: &Plane3D, pv: &[Point3D; 2]) -> usize {
    colocation_x2_v1p2(pl, &pv[0], &pv[1])
}

pub fn colocation_x3_v1p3(pl: &Plane3D, p0: &Point3D, p1: &Point3D, p2: &Point3D) -> usize {
    ColocationX3([classify_point(pl, p0), classify_point(pl, p1), classify_point(pl, p2)]).pack()
}

pub fn colocation_x3_v1pv(pl: &Plane3D, pv: &[Point3D; 3]) -> usize {
    classify_x3(pl, pv).pack()
}

/// 一个点相对三个平面的分类，平面0位于最低位
pub fn colocation_x3_v3p1(v0: &Plane3D, v1: &Plane3D, v2: &Plane3D, p: &Point3D) -> usize {
    ColocationX3([classify_point(v0, p), classify_point(v1, p), classify_point(v2, p)]).pack()
}

pub fn colocation_x3_vvp1(vv: &[Plane3D; 3], p: &Point3D) -> usize {
    colocation_x3_v3p1(&vv[0], &vv[1], &vv[2], p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Vector3D, DSP_3D_TOLERANCE};

    // z = 0 平面，z < 0 为上方
    const PL: Plane3D = Vector3D::plane(0.0, 0.0, 1.0, 0.0);

    #[test]
    fn test_x3_round_trip() {
        let pv = [
            Point3D::new(0.0, 0.0, -1.0),
            Point3D::new(0.0, 0.0, DSP_3D_TOLERANCE * 0.5),
            Point3D::new(0.0, 0.0, 1.0),
        ];
        let code = colocation_x3_v1pv(&PL, &pv);
        assert_eq!(code, 0b10_01_00);
        assert_eq!(
            ColocationX3::unpack(code),
            Some(ColocationX3([Colocation::Above, Colocation::On, Colocation::Below]))
        );
        assert_eq!(colocation_x3_v1p3(&PL, &pv[0], &pv[1], &pv[2]), code);
    }

    #[test]
    fn test_x2() {
        let a = Point3D::new(5.0, 5.0, 3.0);
        let b = Point3D::new(-5.0, 0.0, -3.0);
        assert_eq!(colocation_x2_v1p2(&PL, &a, &b), 0b00_10);
        assert_eq!(colocation_x2_v1pv(&PL, &[b, a]), 0b10_00);
    }

    #[test]
    fn test_one_point_three_planes() {
        let planes = [
            Vector3D::plane(1.0, 0.0, 0.0, 0.0),
            Vector3D::plane(0.0, 1.0, 0.0, 0.0),
            Vector3D::plane(0.0, 0.0, 1.0, 0.0),
        ];
        let p = Point3D::new(-1.0, 0.0, 1.0);
        let code = colocation_x3_vvp1(&planes, &p);
        assert_eq!(code, 0b10_01_00);
        assert_eq!(colocation_x3_v3p1(&planes[0], &planes[1], &planes[2], &p), code);
    }

    #[test]
    fn test_plane_offset_uses_w() {
        // z = 2 平面
        let pl = Vector3D::plane(0.0, 0.0, 1.0, -2.0);
        assert_eq!(classify_point(&pl, &Point3D::new(0.0, 0.0, 2.0)), Colocation::On);
        assert_eq!(classify_point(&pl, &Point3D::new(0.0, 0.0, 1.0)), Colocation::Above);
    }
}
