//! 齐次3D内核与运行时分发
//!
//! [`SimdKernels`] 只能通过检查过CPU支持的构造函数创建，因此其安全方法
//! 可以直接调用对应后端的 `#[target_feature]` 函数。

#[cfg(target_arch = "x86_64")]
pub mod x86;

#[cfg(target_arch = "aarch64")]
pub mod arm;

pub mod scalar;

use crate::{SimdBackend, SimdError};
use scalar::*;

#[cfg(target_arch = "x86_64")]
use x86::*;

#[cfg(target_arch = "aarch64")]
use arm::*;

/// 绑定到某个已验证后端的内核集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimdKernels {
    backend: SimdBackend,
}

impl SimdKernels {
    /// 使用指定后端，当前CPU不支持时返回错误
    pub fn new(backend: SimdBackend) -> Result<Self, SimdError> {
        if backend.is_supported() {
            Ok(Self { backend })
        } else {
            Err(SimdError::Unsupported(backend))
        }
    }

    /// 当前CPU上最优的后端
    pub fn best() -> Self {
        Self {
            backend: SimdBackend::best_available(),
        }
    }

    /// 标量基准实现
    pub const fn scalar() -> Self {
        Self {
            backend: SimdBackend::Scalar,
        }
    }

    pub fn backend(&self) -> SimdBackend {
        self.backend
    }

    /// 三维点积（忽略w）
    #[inline]
    pub fn dot3(&self, a: &[f32; 4], b: &[f32; 4]) -> f32 {
        match self.backend {
            #[cfg(target_arch = "x86_64")]
            SimdBackend::Sse2 | SimdBackend::Avx | SimdBackend::AvxFma3 => unsafe { dot3_sse2(a, b) },
            #[cfg(target_arch = "aarch64")]
            SimdBackend::Neon => unsafe { dot3_neon(a, b) },
            _ => dot3_scalar(a, b),
        }
    }

    /// 四维点积
    #[inline]
    pub fn dot4(&self, a: &[f32; 4], b: &[f32; 4]) -> f32 {
        match self.backend {
            #[cfg(target_arch = "x86_64")]
            SimdBackend::Sse2 | SimdBackend::Avx | SimdBackend::AvxFma3 => unsafe { dot4_sse2(a, b) },
            #[cfg(target_arch = "aarch64")]
            SimdBackend::Neon => unsafe { dot4_neon(a, b) },
            _ => dot4_scalar(a, b),
        }
    }

    /// 叉积，结果 w = 0
    #[inline]
    pub fn cross3(&self, a: &[f32; 4], b: &[f32; 4], out: &mut [f32; 4]) {
        match self.backend {
            #[cfg(target_arch = "x86_64")]
            SimdBackend::Sse2 | SimdBackend::Avx | SimdBackend::AvxFma3 => unsafe {
                cross3_sse2(a, b, out)
            },
            #[cfg(target_arch = "aarch64")]
            SimdBackend::Neon => unsafe { cross3_neon(a, b, out) },
            _ => cross3_scalar(a, b, out),
        }
    }

    /// 归一化xyz，长度恰为0时xyz置0，w保留
    #[inline]
    pub fn normalize3(&self, v: &[f32; 4], out: &mut [f32; 4]) {
        match self.backend {
            #[cfg(target_arch = "x86_64")]
            SimdBackend::Sse2 | SimdBackend::Avx | SimdBackend::AvxFma3 => unsafe {
                normalize3_sse2(v, out)
            },
            #[cfg(target_arch = "aarch64")]
            SimdBackend::Neon => unsafe { normalize3_neon(v, out) },
            _ => normalize3_scalar(v, out),
        }
    }

    /// 行向量乘矩阵 `out = v * m`（不做齐次除法）
    #[inline]
    pub fn vec4_mul_mat4(&self, v: &[f32; 4], m: &[f32; 16], out: &mut [f32; 4]) {
        match self.backend {
            #[cfg(target_arch = "x86_64")]
            SimdBackend::AvxFma3 => unsafe { vec4_mul_mat4_fma(v, m, out) },
            #[cfg(target_arch = "x86_64")]
            SimdBackend::Sse2 | SimdBackend::Avx => unsafe { vec4_mul_mat4_sse2(v, m, out) },
            #[cfg(target_arch = "aarch64")]
            SimdBackend::Neon => unsafe { vec4_mul_mat4_neon(v, m, out) },
            _ => vec4_mul_mat4_scalar(v, m, out),
        }
    }

    /// 行向量乘矩阵，结果 w 非零时做齐次除法
    #[inline]
    pub fn transform_row(&self, v: &[f32; 4], m: &[f32; 16], out: &mut [f32; 4]) {
        self.vec4_mul_mat4(v, m, out);
        let w = out[3];
        if w != 0.0 {
            for value in out.iter_mut() {
                *value /= w;
            }
        }
    }

    /// 批量 [`Self::transform_row`]
    ///
    /// # Panics
    ///
    /// `src` 与 `dst` 长度不同时panic
    pub fn transform_rows(&self, m: &[f32; 16], src: &[[f32; 4]], dst: &mut [[f32; 4]]) {
        assert_eq!(src.len(), dst.len(), "source and destination lengths differ");
        for (v, out) in src.iter().zip(dst.iter_mut()) {
            self.transform_row(v, m, out);
        }
    }

    /// 4x4矩阵乘法 `out = a * b`
    #[inline]
    pub fn mat4_mul(&self, a: &[f32; 16], b: &[f32; 16], out: &mut [f32; 16]) {
        match self.backend {
            #[cfg(target_arch = "x86_64")]
            SimdBackend::AvxFma3 => unsafe { mat4_mul_fma(a, b, out) },
            #[cfg(target_arch = "x86_64")]
            SimdBackend::Avx => unsafe { mat4_mul_avx(a, b, out) },
            #[cfg(target_arch = "x86_64")]
            SimdBackend::Sse2 => unsafe { mat4_mul_sse2(a, b, out) },
            #[cfg(target_arch = "aarch64")]
            SimdBackend::Neon => unsafe { mat4_mul_neon(a, b, out) },
            _ => mat4_mul_scalar(a, b, out),
        }
    }

    /// 4x4矩阵转置
    #[inline]
    pub fn mat4_transpose(&self, m: &[f32; 16], out: &mut [f32; 16]) {
        match self.backend {
            #[cfg(target_arch = "x86_64")]
            SimdBackend::Sse2 | SimdBackend::Avx | SimdBackend::AvxFma3 => unsafe {
                mat4_transpose_sse2(m, out)
            },
            #[cfg(target_arch = "aarch64")]
            SimdBackend::Neon => unsafe { mat4_transpose_neon(m, out) },
            _ => mat4_transpose_scalar(m, out),
        }
    }

    /// 对三个点求平面方程值 `pl · p_i`
    #[inline]
    pub fn plane_eval3(&self, pl: &[f32; 4], p0: &[f32; 4], p1: &[f32; 4], p2: &[f32; 4]) -> [f32; 3] {
        match self.backend {
            #[cfg(target_arch = "x86_64")]
            SimdBackend::Sse2 | SimdBackend::Avx | SimdBackend::AvxFma3 => unsafe {
                plane_eval3_sse2(pl, p0, p1, p2)
            },
            #[cfg(target_arch = "aarch64")]
            SimdBackend::Neon => unsafe { plane_eval3_neon(pl, p0, p1, p2) },
            _ => plane_eval3_scalar(pl, p0, p1, p2),
        }
    }
}

impl Default for SimdKernels {
    fn default() -> Self {
        Self::best()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-5 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_unsupported_backend_rejected() {
        for backend in SimdBackend::ALL {
            match SimdKernels::new(backend) {
                Ok(k) => assert_eq!(k.backend(), backend),
                Err(e) => assert_eq!(e, SimdError::Unsupported(backend)),
            }
        }
    }

    #[test]
    fn test_transform_row_divides_by_w() {
        let k = SimdKernels::scalar();
        let mut m = [0.0f32; 16];
        m[0] = 1.0;
        m[5] = 1.0;
        m[10] = 1.0;
        m[15] = 2.0;
        let mut out = [0.0; 4];
        k.transform_row(&[2.0, 4.0, 6.0, 1.0], &m, &mut out);
        assert_eq!(out, [1.0, 2.0, 3.0, 1.0]);

        // w == 0 时保留原始结果
        k.transform_row(&[2.0, 4.0, 6.0, 0.0], &m, &mut out);
        assert_eq!(out, [2.0, 4.0, 6.0, 0.0]);
    }

    #[test]
    fn test_every_supported_backend_matches_scalar() {
        let oracle = SimdKernels::scalar();
        let m: [f32; 16] = core::array::from_fn(|i| ((i * 7 % 11) as f32 - 5.0) * 0.5);
        let a = [0.3, -1.7, 2.2, 1.0];
        let b = [4.0, 0.25, -3.5, 1.0];

        for backend in SimdBackend::supported() {
            let k = SimdKernels::new(backend).unwrap();

            assert!(close(k.dot3(&a, &b), oracle.dot3(&a, &b)));
            assert!(close(k.dot4(&a, &b), oracle.dot4(&a, &b)));

            let (mut x, mut y) = ([0.0; 4], [0.0; 4]);
            k.cross3(&a, &b, &mut x);
            oracle.cross3(&a, &b, &mut y);
            assert!(x.iter().zip(y.iter()).all(|(p, q)| close(*p, *q)));

            k.transform_row(&a, &m, &mut x);
            oracle.transform_row(&a, &m, &mut y);
            assert!(x.iter().zip(y.iter()).all(|(p, q)| close(*p, *q)), "{backend}");

            let (mut mx, mut my) = ([0.0; 16], [0.0; 16]);
            k.mat4_mul(&m, &m, &mut mx);
            oracle.mat4_mul(&m, &m, &mut my);
            assert!(mx.iter().zip(my.iter()).all(|(p, q)| close(*p, *q)), "{backend}");
            if backend.is_bit_exact() {
                assert_eq!(mx, my);
            }

            k.mat4_transpose(&m, &mut mx);
            oracle.mat4_transpose(&m, &mut my);
            assert_eq!(mx, my);

            assert_eq!(
                k.plane_eval3(&a, &b, &a, &b),
                oracle.plane_eval3(&a, &b, &a, &b)
            );
        }
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn lanes() -> impl Strategy<Value = [f32; 4]> {
            prop::array::uniform4(-50.0f32..50.0)
        }

        proptest! {
            #[test]
            fn bit_exact_backends_match_scalar(
                a in lanes(),
                b in lanes(),
                m in prop::array::uniform16(-5.0f32..5.0),
            ) {
                let oracle = SimdKernels::scalar();
                for backend in SimdBackend::supported() {
                    let k = SimdKernels::new(backend).unwrap();

                    let (mut x, mut y) = ([0.0; 4], [0.0; 4]);
                    k.normalize3(&a, &mut x);
                    oracle.normalize3(&a, &mut y);
                    prop_assert!(x.iter().zip(y.iter()).all(|(p, q)| close(*p, *q)));

                    k.vec4_mul_mat4(&b, &m, &mut x);
                    oracle.vec4_mul_mat4(&b, &m, &mut y);
                    for (p, q) in x.iter().zip(y.iter()) {
                        prop_assert!((p - q).abs() <= 1e-3);
                    }

                    if backend.is_bit_exact() {
                        prop_assert_eq!(k.dot3(&a, &b), oracle.dot3(&a, &b));
                        prop_assert_eq!(k.dot4(&a, &b), oracle.dot4(&a, &b));
                        k.cross3(&a, &b, &mut x);
                        oracle.cross3(&a, &b, &mut y);
                        prop_assert_eq!(x, y);
                    }
                }
            }
        }
    }
}
