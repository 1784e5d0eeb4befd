//! 点的构造、归一化、缩放与平移

use super::{dot3, length3};
use crate::types::{Point3D, Vector3D};

pub fn init_point_xyz(p: &mut Point3D, x: f32, y: f32, z: f32) {
    *p = Point3D::new(x, y, z);
}

pub fn init_point(p: &mut Point3D, s: &Point3D) {
    *p = *s;
}

/// 把点的径向量归一化为单位长度，w = 1；径向量长度恰为0时得到原点
pub fn normalize_point(p: &mut Point3D) {
    let len = length3(p.lanes());
    *p = if len == 0.0 {
        Point3D::ORIGIN
    } else {
        Point3D::new(p.x / len, p.y / len, p.z / len)
    };
}

/// 就地把径向量缩放到长度 `r`
pub fn scale_point1(p: &mut Point3D, r: f32) {
    let s = *p;
    scale_point2(p, &s, r);
}

/// 把 `s` 的径向量缩放到长度 `r`；长度为0时得到原点
pub fn scale_point2(p: &mut Point3D, s: &Point3D, r: f32) {
    let len = dot3(s.lanes(), s.lanes()).sqrt();
    *p = if len == 0.0 {
        Point3D::ORIGIN
    } else {
        let k = r / len;
        Point3D::new(s.x * k, s.y * k, s.z * k)
    };
}

/// `p += dv`
pub fn add_vector_pv1(p: &mut Point3D, dv: &Vector3D) {
    p.x += dv.dx;
    p.y += dv.dy;
    p.z += dv.dz;
}

/// `p = sp + dv`
pub fn add_vector_pv2(p: &mut Point3D, sp: &Point3D, dv: &Vector3D) {
    *p = Point3D {
        x: sp.x + dv.dx,
        y: sp.y + dv.dy,
        z: sp.z + dv.dz,
        w: sp.w,
    };
}

/// `p += dv * k`
pub fn add_vector_pvk1(p: &mut Point3D, dv: &Vector3D, k: f32) {
    p.x += dv.dx * k;
    p.y += dv.dy * k;
    p.z += dv.dz * k;
}

/// `p = sp + dv * k`
pub fn add_vector_pvk2(p: &mut Point3D, sp: &Point3D, dv: &Vector3D, k: f32) {
    *p = Point3D {
        x: sp.x + dv.dx * k,
        y: sp.y + dv.dy * k,
        z: sp.z + dv.dz * k,
        w: sp.w,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::test_util::*;

    #[test]
    fn test_init_point() {
        let mut p = Point3D::default();
        init_point_xyz(&mut p, 1.0, 2.0, 3.0);
        assert_eq!(p, Point3D { x: 1.0, y: 2.0, z: 3.0, w: 1.0 });

        let mut q = Point3D::default();
        init_point(&mut q, &p);
        assert_eq!(q, p);
    }

    #[test]
    fn test_normalize_point() {
        let mut p = Point3D::new(0.0, 3.0, 4.0);
        normalize_point(&mut p);
        assert_point(&p, 0.0, 0.6, 0.8);
        assert_eq!(p.w, 1.0);

        let mut zero = Point3D { x: 0.0, y: 0.0, z: 0.0, w: 5.0 };
        normalize_point(&mut zero);
        assert_eq!(zero, Point3D::ORIGIN);
    }

    #[test]
    fn test_scale_point() {
        let mut p = Point3D::new(3.0, 0.0, 4.0);
        scale_point1(&mut p, 10.0);
        assert_point(&p, 6.0, 0.0, 8.0);

        let mut q = Point3D::new(9.0, 9.0, 9.0);
        scale_point2(&mut q, &Point3D::ORIGIN, 2.0);
        assert_eq!(q, Point3D::ORIGIN);
        assert!(!q.x.is_nan());
    }

    #[test]
    fn test_add_vector() {
        let dv = Vector3D::new(1.0, 2.0, 3.0);
        let mut p = Point3D::new(1.0, 1.0, 1.0);
        add_vector_pv1(&mut p, &dv);
        assert_point(&p, 2.0, 3.0, 4.0);

        add_vector_pvk1(&mut p, &dv, -2.0);
        assert_point(&p, 0.0, -1.0, -2.0);

        let mut q = Point3D::default();
        add_vector_pv2(&mut q, &p, &dv);
        assert_point(&q, 1.0, 1.0, 1.0);

        add_vector_pvk2(&mut q, &Point3D::ORIGIN, &dv, 0.5);
        assert_point(&q, 0.5, 1.0, 1.5);
        assert_eq!(q.w, 1.0);
    }
}
