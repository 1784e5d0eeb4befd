//! # dsp3d_simd
//!
//! dsp3d 的SIMD层：运行时CPU特性检测，以及齐次3D几何内核的多套实现。
//!
//! ## 特性
//!
//! - **跨平台支持**: x86_64 (SSE2/AVX/AVX+FMA3) 和 aarch64 (NEON)
//! - **自动检测**: 运行时检测CPU特性，选择最优SIMD后端
//! - **标量基准**: 每个内核都有标量版本，SIMD版本以其为准
//!
//! ## 数据布局
//!
//! 所有内核直接操作原始通道：
//!
//! - 点/向量/平面: `[f32; 4]`，即 `{x, y, z, w}`
//! - 矩阵: `[f32; 16]`，行主序，行向量约定 (`r_i = sum_j v_j * M[j*4+i]`)
//!
//! ## 快速开始
//!
//! ```rust
//! use dsp3d_simd::{SimdBackend, SimdKernels};
//!
//! let kernels = SimdKernels::best();
//! let a = [1.0, 0.0, 0.0, 0.0];
//! let b = [0.0, 1.0, 0.0, 0.0];
//! let mut n = [0.0; 4];
//! kernels.cross3(&a, &b, &mut n);
//! assert_eq!(n, [0.0, 0.0, 1.0, 0.0]);
//!
//! // 强制指定后端，不支持时返回错误
//! assert!(SimdKernels::new(SimdBackend::Scalar).is_ok());
//! ```
//!
//! ## 数值一致性
//!
//! 除 `AvxFma3` 外，各后端的点积、叉积、归一化和矩阵运算都按与标量版本
//! 相同的顺序累加，结果逐位一致；`AvxFma3` 的融合乘加只保证在相对误差
//! `1e-5` 内一致。

pub mod cpu_detect;
pub mod kernels;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// 重新导出主要类型
pub use cpu_detect::{detect_cpu_features, CpuFeatures, CpuVendor};
pub use kernels::SimdKernels;

/// SIMD层错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimdError {
    /// 当前CPU不支持请求的后端
    #[error("SIMD backend {0} is not supported on this CPU")]
    Unsupported(SimdBackend),
    /// 无法识别的后端名称
    #[error("unknown SIMD backend name: {0:?}")]
    UnknownBackend(String),
}

/// SIMD后端类型
///
/// 表示可用的SIMD指令集后端，按性能从低到高排序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SimdBackend {
    /// 标量实现（基准）
    Scalar,
    /// SSE2 (Intel/AMD)
    Sse2,
    /// AVX (Intel/AMD)
    Avx,
    /// AVX + FMA3 (Intel/AMD)
    AvxFma3,
    /// ARM NEON (aarch64)
    Neon,
}

impl SimdBackend {
    /// 所有已知后端
    pub const ALL: [SimdBackend; 5] = [
        SimdBackend::Scalar,
        SimdBackend::Sse2,
        SimdBackend::Avx,
        SimdBackend::AvxFma3,
        SimdBackend::Neon,
    ];

    /// 获取当前平台最优的SIMD后端
    ///
    /// 根据运行时检测的CPU特性，返回当前平台支持的最高性能SIMD后端。
    ///
    /// # 示例
    ///
    /// ```rust
    /// use dsp3d_simd::SimdBackend;
    ///
    /// let backend = SimdBackend::best_available();
    /// assert!(backend.is_supported());
    /// ```
    pub fn best_available() -> Self {
        [Self::AvxFma3, Self::Avx, Self::Sse2, Self::Neon]
            .into_iter()
            .find(|backend| backend.is_supported())
            .unwrap_or(Self::Scalar)
    }

    /// 当前CPU是否支持该后端
    pub fn is_supported(&self) -> bool {
        let features = detect_cpu_features();
        match self {
            Self::Scalar => true,
            Self::Sse2 => cfg!(target_arch = "x86_64") && features.sse2,
            Self::Avx => cfg!(target_arch = "x86_64") && features.avx,
            Self::AvxFma3 => cfg!(target_arch = "x86_64") && features.avx && features.fma,
            Self::Neon => cfg!(target_arch = "aarch64") && features.neon,
        }
    }

    /// 当前CPU支持的所有后端
    pub fn supported() -> Vec<SimdBackend> {
        Self::ALL.into_iter().filter(|b| b.is_supported()).collect()
    }

    /// 后端名称（与 `FromStr` 互逆）
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Sse2 => "sse2",
            Self::Avx => "avx",
            Self::AvxFma3 => "avx_fma3",
            Self::Neon => "neon",
        }
    }

    /// 是否与标量实现逐位一致
    pub fn is_bit_exact(&self) -> bool {
        !matches!(self, Self::AvxFma3)
    }
}

impl fmt::Display for SimdBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimdBackend {
    type Err = SimdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalar" | "native" => Ok(Self::Scalar),
            "sse2" => Ok(Self::Sse2),
            "avx" => Ok(Self::Avx),
            "avx_fma3" | "avx+fma3" | "fma3" => Ok(Self::AvxFma3),
            "neon" => Ok(Self::Neon),
            _ => Err(SimdError::UnknownBackend(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_detection() {
        let backend = SimdBackend::best_available();
        assert!(backend.is_supported());
        // 现代CPU应该至少支持SSE2或NEON
        #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
        assert_ne!(backend, SimdBackend::Scalar);
    }

    #[test]
    fn test_scalar_always_supported() {
        assert!(SimdBackend::Scalar.is_supported());
        assert!(SimdBackend::supported().contains(&SimdBackend::Scalar));
    }

    #[test]
    fn test_foreign_arch_backends_unsupported() {
        #[cfg(target_arch = "x86_64")]
        assert!(!SimdBackend::Neon.is_supported());
        #[cfg(target_arch = "aarch64")]
        assert!(!SimdBackend::Avx.is_supported());
    }

    #[test]
    fn test_backend_names_round_trip() {
        for backend in SimdBackend::ALL {
            assert_eq!(backend.name().parse::<SimdBackend>(), Ok(backend));
        }
        assert_eq!("  AVX+FMA3 ".parse::<SimdBackend>(), Ok(SimdBackend::AvxFma3));
        assert_eq!(
            "altivec".parse::<SimdBackend>(),
            Err(SimdError::UnknownBackend("altivec".to_string()))
        );
    }
}
