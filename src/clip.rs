//! 三角形按平面切分
//!
//! 三个顶点分别按平面分类后，对 `(c0, c1, c2)` 的全部27种组合逐一匹配：
//! 平面上方的部分写入 `out`，下方的部分写入 `in`。所有输出三角形保持
//! 原三角形的绕序。

use crate::math::{calc_split_point_p2v1, classify_point};
use crate::types::{Colocation, Plane3D, Point3D, RawTriangle};

/// 三角形输出端，长度即已写入的三角形个数
pub trait TriangleSink {
    fn push(&mut self, t: RawTriangle);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TriangleSink for Vec<RawTriangle> {
    #[inline]
    fn push(&mut self, t: RawTriangle) {
        Vec::push(self, t);
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// 调用方提供的定长缓冲区
///
/// 每次切分至多向一侧写入2个三角形，容量需按此预留；写满后继续写入会panic。
pub struct TriangleBuffer<'a> {
    buf: &'a mut [RawTriangle],
    len: usize,
}

impl<'a> TriangleBuffer<'a> {
    pub fn new(buf: &'a mut [RawTriangle]) -> Self {
        Self { buf, len: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn as_slice(&self) -> &[RawTriangle] {
        &self.buf[..self.len]
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl TriangleSink for TriangleBuffer<'_> {
    fn push(&mut self, t: RawTriangle) {
        assert!(
            self.len < self.buf.len(),
            "TriangleBuffer overflow: capacity {}",
            self.buf.len()
        );
        self.buf[self.len] = t;
        self.len += 1;
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// 丢弃输出
struct Discard;

impl TriangleSink for Discard {
    fn push(&mut self, _t: RawTriangle) {}

    fn len(&self) -> usize {
        0
    }
}

#[inline]
fn split_point(l0: &Point3D, l1: &Point3D, pl: &Plane3D) -> Point3D {
    let mut ip = Point3D::default();
    calc_split_point_p2v1(&mut ip, l0, l1, pl);
    ip
}

/// 一个顶点 `po` 在平面上，`pn`、`pm` 分居两侧（`po, pn, pm` 为原绕序）
///
/// 交点位于 `pn-pm` 上，由 `(l0, l1)` 给出计算方向。返回
/// `([pn, S, po], [pm, po, S])`。
#[inline]
fn split_through_vertex(
    po: Point3D,
    pn: Point3D,
    pm: Point3D,
    l0: &Point3D,
    l1: &Point3D,
    pl: &Plane3D,
) -> (RawTriangle, RawTriangle) {
    let s = split_point(l0, l1, pl);
    (RawTriangle::new(pn, s, po), RawTriangle::new(pm, po, s))
}

/// `pa` 独自位于一侧（`pa, pb, pc` 为原绕序）
///
/// 返回 `pa` 一侧的 `[pa, Sb, Sc]` 与另一侧沿 `pb-Sc` 对角线拆分的
/// `[pb, Sc, Sb]`、`[pc, Sc, pb]`。
#[inline]
fn split_lone_vertex(
    pa: Point3D,
    pb: Point3D,
    pc: Point3D,
    pl: &Plane3D,
) -> (RawTriangle, [RawTriangle; 2]) {
    let sb = split_point(&pa, &pb, pl);
    let sc = split_point(&pa, &pc, pl);
    (
        RawTriangle::new(pa, sb, sc),
        [RawTriangle::new(pb, sc, sb), RawTriangle::new(pc, sc, pb)],
    )
}

/// 将三角形按平面 `pl` 切分，上方部分写入 `out`，下方部分写入 `in_`
pub fn split_triangle_raw<O, I>(out: &mut O, in_: &mut I, pl: &Plane3D, pv: &RawTriangle)
where
    O: TriangleSink + ?Sized,
    I: TriangleSink + ?Sized,
{
    use Colocation::{Above as A, Below as B, On as O_};

    let [p0, p1, p2] = pv.p;
    let c = (
        classify_point(pl, &p0),
        classify_point(pl, &p1),
        classify_point(pl, &p2),
    );

    match c {
        // 没有顶点在下方
        (A, A, A) | (A, A, O_) | (A, O_, A) | (O_, A, A) | (A, O_, O_) | (O_, A, O_)
        | (O_, O_, A) | (O_, O_, O_) => out.push(*pv),

        // 没有顶点在上方
        (B, B, B) | (B, B, O_) | (B, O_, B) | (O_, B, B) | (B, O_, O_) | (O_, B, O_)
        | (O_, O_, B) => in_.push(*pv),

        // 一个顶点在平面上
        (O_, A, B) => {
            let (t1, t2) = split_through_vertex(p0, p1, p2, &p1, &p2, pl);
            out.push(t1);
            in_.push(t2);
        }
        (O_, B, A) => {
            let (t1, t2) = split_through_vertex(p0, p1, p2, &p1, &p2, pl);
            in_.push(t1);
            out.push(t2);
        }
        (A, O_, B) => {
            let (t2, t0) = split_through_vertex(p1, p2, p0, &p0, &p2, pl);
            in_.push(t2);
            out.push(t0);
        }
        (B, O_, A) => {
            let (t2, t0) = split_through_vertex(p1, p2, p0, &p0, &p2, pl);
            out.push(t2);
            in_.push(t0);
        }
        (A, B, O_) => {
            let (t0, t1) = split_through_vertex(p2, p0, p1, &p0, &p1, pl);
            out.push(t0);
            in_.push(t1);
        }
        (B, A, O_) => {
            let (t0, t1) = split_through_vertex(p2, p0, p1, &p0, &p1, pl);
            in_.push(t0);
            out.push(t1);
        }

        // 一个顶点独自在上方
        (A, B, B) => {
            let (lone, quad) = split_lone_vertex(p0, p1, p2, pl);
            out.push(lone);
            in_.push(quad[0]);
            in_.push(quad[1]);
        }
        (B, A, B) => {
            let (lone, quad) = split_lone_vertex(p1, p2, p0, pl);
            out.push(lone);
            in_.push(quad[0]);
            in_.push(quad[1]);
        }
        (B, B, A) => {
            let (lone, quad) = split_lone_vertex(p2, p0, p1, pl);
            out.push(lone);
            in_.push(quad[0]);
            in_.push(quad[1]);
        }

        // 一个顶点独自在下方
        (B, A, A) => {
            let (lone, quad) = split_lone_vertex(p0, p1, p2, pl);
            in_.push(lone);
            out.push(quad[0]);
            out.push(quad[1]);
        }
        (A, B, A) => {
            let (lone, quad) = split_lone_vertex(p1, p2, p0, pl);
            in_.push(lone);
            out.push(quad[0]);
            out.push(quad[1]);
        }
        (A, A, B) => {
            let (lone, quad) = split_lone_vertex(p2, p0, p1, pl);
            in_.push(lone);
            out.push(quad[0]);
            out.push(quad[1]);
        }
    }
}

/// 只保留平面下方的部分
pub fn cull_triangle_raw<I>(in_: &mut I, pl: &Plane3D, pv: &RawTriangle)
where
    I: TriangleSink + ?Sized,
{
    split_triangle_raw(&mut Discard, in_, pl, pv);
}
