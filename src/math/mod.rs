//! 标量参考实现
//!
//! 每个操作沿用C风格的命名：目标参数在前（`&mut`），源参数在后（`&`）。
//! 后缀 `1` 表示就地更新，`2` 表示写入单独的目标。所有函数先读取全部输入
//! 再写输出。

pub mod colocation;
pub mod distance;
pub mod matrix;
pub mod plane;
pub mod point;
pub mod triplet;
pub mod vector;

use dsp3d_simd::kernels::scalar::{cross3_scalar, dot3_scalar, dot4_scalar};

/// `a - b` 的xyz，w = 0
#[inline]
pub(crate) fn sub3(a: &[f32; 4], b: &[f32; 4]) -> [f32; 4] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2], 0.0]
}

#[inline]
pub(crate) fn cross3(a: &[f32; 4], b: &[f32; 4]) -> [f32; 4] {
    let mut r = [0.0; 4];
    cross3_scalar(a, b, &mut r);
    r
}

#[inline]
pub(crate) fn dot3(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    dot3_scalar(a, b)
}

#[inline]
pub(crate) fn dot4(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    dot4_scalar(a, b)
}

#[inline]
pub(crate) fn length3(a: &[f32; 4]) -> f32 {
    dot3(a, a).sqrt()
}

/// 归一化xyz，长度恰为0时返回0向量；w置0
#[inline]
pub(crate) fn unit3(a: &[f32; 4]) -> [f32; 4] {
    let len = length3(a);
    if len == 0.0 {
        [0.0; 4]
    } else {
        [a[0] / len, a[1] / len, a[2] / len, 0.0]
    }
}

pub use colocation::*;
pub use distance::*;
pub use matrix::*;
pub use plane::*;
pub use point::*;
pub use triplet::*;
pub use vector::*;
