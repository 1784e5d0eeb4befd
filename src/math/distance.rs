//! 距离、面积、最长边与分割点

use super::{cross3, dot3, dot4, length3, sub3, unit3};
use crate::types::{Plane3D, Point3D, Vector3D};

/// 平行四边形面积 `|(p1-p0) × (p2-p0)|`，即三角形面积的两倍
pub fn calc_area_p3(p0: &Point3D, p1: &Point3D, p2: &Point3D) -> f32 {
    length3(&cross3(&sub3(p1.lanes(), p0.lanes()), &sub3(p2.lanes(), p0.lanes())))
}

pub fn calc_area_pv(pv: &[Point3D; 3]) -> f32 {
    calc_area_p3(&pv[0], &pv[1], &pv[2])
}

pub fn calc_distance_p2(p1: &Point3D, p2: &Point3D) -> f32 {
    calc_sqr_distance_p2(p1, p2).sqrt()
}

pub fn calc_sqr_distance_p2(p1: &Point3D, p2: &Point3D) -> f32 {
    let d = sub3(p2.lanes(), p1.lanes());
    dot3(&d, &d)
}

pub fn calc_distance_pv(pv: &[Point3D; 2]) -> f32 {
    calc_distance_p2(&pv[0], &pv[1])
}

pub fn calc_sqr_distance_pv(pv: &[Point3D; 2]) -> f32 {
    calc_sqr_distance_p2(&pv[0], &pv[1])
}

/// 向量长度
pub fn calc_distance_v1(v: &Vector3D) -> f32 {
    length3(v.lanes())
}

/// 线段 `ab` 到 `p` 的平方距离
fn sqr_distance_to_segment(p: &[f32; 4], a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let ab = sub3(b, a);
    let ap = sub3(p, a);
    let len2 = dot3(&ab, &ab);
    let t = if len2 > 0.0 {
        (dot3(&ap, &ab) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let d = [ap[0] - ab[0] * t, ap[1] - ab[1] * t, ap[2] - ab[2] * t, 0.0];
    dot3(&d, &d)
}

/// 实心三角形到 `p` 的距离
///
/// 结果不超过到任一边的距离；投影落在三角形内时再与平面距离取小。
fn distance_to_triangle(p: &[f32; 4], a: &[f32; 4], b: &[f32; 4], c: &[f32; 4]) -> f32 {
    let edges = sqr_distance_to_segment(p, a, b)
        .min(sqr_distance_to_segment(p, b, c))
        .min(sqr_distance_to_segment(p, c, a))
        .sqrt();

    let ab = sub3(b, a);
    let bc = sub3(c, b);
    let ca = sub3(a, c);
    let n = cross3(&ab, &sub3(c, a));
    let n2 = dot3(&n, &n);
    if n2 <= 0.0 {
        return edges;
    }

    let ap = sub3(p, a);
    let inside = dot3(&cross3(&ab, &ap), &n) >= 0.0
        && dot3(&cross3(&bc, &sub3(p, b)), &n) >= 0.0
        && dot3(&cross3(&ca, &sub3(p, c)), &n) >= 0.0;
    if !inside {
        return edges;
    }

    (dot3(&n, &ap).abs() / n2.sqrt()).min(edges)
}

/// 点 `sp` 到实心三角形的最短距离
pub fn calc_min_distance_p3(sp: &Point3D, p0: &Point3D, p1: &Point3D, p2: &Point3D) -> f32 {
    distance_to_triangle(sp.lanes(), p0.lanes(), p1.lanes(), p2.lanes())
}

pub fn calc_min_distance_pv(sp: &Point3D, pv: &[Point3D; 3]) -> f32 {
    calc_min_distance_p3(sp, &pv[0], &pv[1], &pv[2])
}

/// 到三个顶点距离的平均值
pub fn calc_avg_distance_p3(sp: &Point3D, p0: &Point3D, p1: &Point3D, p2: &Point3D) -> f32 {
    (calc_distance_p2(sp, p0) + calc_distance_p2(sp, p1) + calc_distance_p2(sp, p2)) / 3.0
}

/// 最长边的下标：0 为 `p0p1`，1 为 `p1p2`，2 为 `p2p0`；相等时靠前的边优先
pub fn longest_edge3d_p3(p0: &Point3D, p1: &Point3D, p2: &Point3D) -> usize {
    let a = calc_sqr_distance_p2(p0, p1);
    let b = calc_sqr_distance_p2(p1, p2);
    let c = calc_sqr_distance_p2(p2, p0);

    if a >= b {
        if a >= c {
            0
        } else {
            2
        }
    } else if b >= c {
        1
    } else {
        2
    }
}

pub fn longest_edge3d_pv(pv: &[Point3D; 3]) -> usize {
    longest_edge3d_p3(&pv[0], &pv[1], &pv[2])
}

/// 直线 `l0 → l1` 与平面 `pl` 的交点
///
/// `ip = l0 - (l1-l0) * (pl·l0) / (n·(l1-l0))`，w 取 `l0.w`。输入在写出前已全部读取。
pub fn calc_split_point_p2v1(ip: &mut Point3D, l0: &Point3D, l1: &Point3D, pl: &Plane3D) {
    let d = sub3(l1.lanes(), l0.lanes());
    let t = dot4(pl.lanes(), l0.lanes()) / dot3(pl.lanes(), &d);
    *ip = Point3D {
        x: l0.x - d[0] * t,
        y: l0.y - d[1] * t,
        z: l0.z - d[2] * t,
        w: l0.w,
    };
}

pub fn calc_split_point_pvv1(ip: &mut Point3D, lv: &[Point3D; 2], pl: &Plane3D) {
    calc_split_point_p2v1(ip, &lv[0], &lv[1], pl);
}

/// 从 `sp` 指向三角形重心的单位向量
pub fn unit_vector_p1p3(v: &mut Vector3D, sp: &Point3D, p0: &Point3D, p1: &Point3D, p2: &Point3D) {
    let center = [
        (p0.x + p1.x + p2.x) / 3.0,
        (p0.y + p1.y + p2.y) / 3.0,
        (p0.z + p1.z + p2.z) / 3.0,
        1.0,
    ];
    *v = Vector3D::from_lanes(unit3(&sub3(&center, sp.lanes())));
}

pub fn unit_vector_p1pv(v: &mut Vector3D, sp: &Point3D, pv: &[Point3D; 3]) {
    unit_vector_p1p3(v, sp, &pv[0], &pv[1], &pv[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::test_util::*;

    fn right_triangle() -> [Point3D; 3] {
        [
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(4.0, 0.0, 0.0),
            Point3D::new(0.0, 3.0, 0.0),
        ]
    }

    #[test]
    fn test_area_is_unhalved() {
        let t = right_triangle();
        assert_close(calc_area_pv(&t), 12.0);
        assert_close(calc_area_p3(&t[0], &t[0], &t[1]), 0.0);
    }

    #[test]
    fn test_distances() {
        let a = Point3D::new(1.0, 2.0, 3.0);
        let b = Point3D::new(4.0, 6.0, 3.0);
        assert_close(calc_distance_p2(&a, &b), 5.0);
        assert_close(calc_sqr_distance_p2(&a, &b), 25.0);
        assert_close(calc_distance_pv(&[a, b]), 5.0);
        assert_close(calc_sqr_distance_pv(&[b, a]), 25.0);
        assert_close(calc_distance_v1(&Vector3D::new(0.0, 3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_min_distance_regions() {
        let t = right_triangle();
        // 投影在内部
        assert_close(calc_min_distance_pv(&Point3D::new(1.0, 1.0, 2.0), &t), 2.0);
        // 最近点为顶点
        assert_close(calc_min_distance_pv(&Point3D::new(-3.0, -4.0, 0.0), &t), 5.0);
        // 最近点在边 p0p1 上
        assert_close(calc_min_distance_pv(&Point3D::new(2.0, -1.0, 0.0), &t), 1.0);
        // 最近点在斜边上
        assert_close(calc_min_distance_pv(&Point3D::new(4.0, 3.0, 0.0), &t), 2.4);
        // 在三角形上
        assert_close(calc_min_distance_p3(&t[1], &t[0], &t[1], &t[2]), 0.0);
    }

    #[test]
    fn test_min_distance_degenerate_triangle() {
        let seg = [
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(2.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
        ];
        assert_close(calc_min_distance_pv(&Point3D::new(1.5, 2.0, 0.0), &seg), 2.0);
    }

    #[test]
    fn test_min_distance_thin_triangle() {
        let sp = Point3D::new(-6.60, 11.20, 43.51);
        let a = Point3D::new(4.97, -84.26, 71.50);
        let b = Point3D::new(-18.22, 77.95, -31.48);
        for offset in [1e-3f32, 1e-4, 1e-6] {
            let c = Point3D::new(
                a.x + (b.x - a.x) * 0.4 + offset,
                a.y + (b.y - a.y) * 0.4,
                a.z + (b.z - a.z) * 0.4,
            );
            let d = calc_min_distance_p3(&sp, &a, &b, &c);

            // 参考值：f64 下到线段 ab 的距离
            let (ax, ay, az) = (a.x as f64, a.y as f64, a.z as f64);
            let (ux, uy, uz) = (b.x as f64 - ax, b.y as f64 - ay, b.z as f64 - az);
            let (px, py, pz) = (sp.x as f64 - ax, sp.y as f64 - ay, sp.z as f64 - az);
            let t = ((px * ux + py * uy + pz * uz) / (ux * ux + uy * uy + uz * uz)).clamp(0.0, 1.0);
            let expected = ((px - ux * t).powi(2) + (py - uy * t).powi(2) + (pz - uz * t).powi(2)).sqrt();

            let nearest = [a, b, c]
                .iter()
                .map(|p| calc_distance_p2(&sp, p))
                .fold(f32::INFINITY, f32::min);
            assert!(d <= nearest + 1e-4, "{d} > {nearest}");
            assert!((d as f64 - expected).abs() < 1e-2, "{d} vs {expected}");
        }
    }

    #[test]
    fn test_avg_distance() {
        let t = right_triangle();
        let d = calc_avg_distance_p3(&t[0], &t[0], &t[1], &t[2]);
        assert_close(d, 7.0 / 3.0);
    }

    #[test]
    fn test_longest_edge_ties() {
        let t = right_triangle();
        // 斜边 p1p2 最长
        assert_eq!(longest_edge3d_pv(&t), 1);

        // 正方形的一半：p0p1 与 p1p2 等长，p2p0 为对角线
        let sq = [
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(1.0, 1.0, 0.0),
        ];
        assert_eq!(longest_edge3d_p3(&sq[0], &sq[1], &sq[2]), 2);

        // 两条最长边相等时取靠前的
        let iso = [
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(2.0, 0.0, 0.0),
            Point3D::new(1.0, 0.5, 0.0),
        ];
        assert_eq!(longest_edge3d_pv(&iso), 0);
        let iso = [
            Point3D::new(1.0, 0.5, 0.0),
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(2.0, 0.0, 0.0),
        ];
        assert_eq!(longest_edge3d_pv(&iso), 1);
    }

    #[test]
    fn test_split_point() {
        let pl = Vector3D::plane(0.0, 0.0, 1.0, -1.0);
        let mut ip = Point3D::default();
        calc_split_point_p2v1(&mut ip, &Point3D::new(0.0, 0.0, 0.0), &Point3D::new(2.0, 4.0, 4.0), &pl);
        assert_point(&ip, 0.5, 1.0, 1.0);
        assert_eq!(ip.w, 1.0);

        let lv = [Point3D::new(1.0, 1.0, 3.0), Point3D::new(1.0, 1.0, -1.0)];
        calc_split_point_pvv1(&mut ip, &lv, &pl);
        assert_point(&ip, 1.0, 1.0, 1.0);
    }

    #[test]
    fn test_unit_vector_to_centroid() {
        let t = [
            Point3D::new(3.0, 0.0, 0.0),
            Point3D::new(3.0, 3.0, 0.0),
            Point3D::new(3.0, -3.0, 0.0),
        ];
        let mut v = Vector3D::default();
        unit_vector_p1pv(&mut v, &Point3D::ORIGIN, &t);
        assert_vector(&v, 1.0, 0.0, 0.0);
        assert_eq!(v.dw, 0.0);

        unit_vector_p1p3(&mut v, &Point3D::new(3.0, 0.0, 0.0), &t[0], &t[1], &t[2]);
        assert_eq!(v, Vector3D::ZERO);
    }
}
