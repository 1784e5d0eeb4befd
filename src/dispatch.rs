//! 运行时后端分派
//!
//! [`Kernel`] 持有选定的SIMD后端，对外提供与 [`crate::math`] 同名、同语义的
//! 加速版本。标量后端与 `math` 模块逐位一致。

use std::sync::OnceLock;

use dsp3d_simd::{SimdBackend, SimdKernels};

use crate::config::{Dsp3dConfig, SimdConfig};
use crate::error::Dsp3dResult;
use crate::types::{Colocation, ColocationX3, Matrix3D, Plane3D, Point3D, Vector3D};

/// 选定后端的几何内核
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    kernels: SimdKernels,
}

impl Kernel {
    /// 按配置选择后端
    ///
    /// SIMD关闭时使用标量实现；强制的后端名称无法识别或不受支持时返回错误。
    pub fn select(config: &SimdConfig) -> Dsp3dResult<Self> {
        if !config.enabled {
            tracing::info!(target: "dsp3d::dispatch", "SIMD disabled, using scalar kernels");
            return Ok(Self::scalar());
        }

        let forced = config
            .force_backend
            .as_deref()
            .map(str::parse::<SimdBackend>)
            .transpose()?;
        let kernels = match forced {
            Some(backend) => {
                let kernels = SimdKernels::new(backend)?;
                tracing::info!(target: "dsp3d::dispatch", "Using forced backend {}", backend);
                kernels
            }
            None => {
                let kernels = SimdKernels::best();
                tracing::info!(
                    target: "dsp3d::dispatch",
                    "Selected backend {} ({})",
                    kernels.backend(),
                    dsp3d_simd::detect_cpu_features()
                );
                kernels
            }
        };
        Ok(Self { kernels })
    }

    /// 指定后端
    pub fn with_backend(backend: SimdBackend) -> Dsp3dResult<Self> {
        Ok(Self {
            kernels: SimdKernels::new(backend)?,
        })
    }

    /// 标量参考实现
    pub const fn scalar() -> Self {
        Self {
            kernels: SimdKernels::scalar(),
        }
    }

    pub fn backend(&self) -> SimdBackend {
        self.kernels.backend()
    }

    pub fn kernels(&self) -> &SimdKernels {
        &self.kernels
    }

    /// `r = p * m`，w 非零时做齐次除法
    #[inline]
    pub fn apply_matrix3d_mp2(&self, r: &mut Point3D, p: &Point3D, m: &Matrix3D) {
        self.kernels.transform_row(p.lanes(), &m.m, r.lanes_mut());
    }

    /// `r = v * m`，w 非零时做齐次除法
    #[inline]
    pub fn apply_matrix3d_mv2(&self, r: &mut Vector3D, v: &Vector3D, m: &Matrix3D) {
        self.kernels.transform_row(v.lanes(), &m.m, r.lanes_mut());
    }

    /// `r = s * m`
    #[inline]
    pub fn apply_matrix3d_mm2(&self, r: &mut Matrix3D, s: &Matrix3D, m: &Matrix3D) {
        self.kernels.mat4_mul(&s.m, &m.m, &mut r.m);
    }

    #[inline]
    pub fn transpose_matrix3d2(&self, r: &mut Matrix3D, m: &Matrix3D) {
        self.kernels.mat4_transpose(&m.m, &mut r.m);
    }

    #[inline]
    pub fn normalize_vector2(&self, v: &mut Vector3D, src: &Vector3D) {
        self.kernels.normalize3(src.lanes(), v.lanes_mut());
    }

    /// 叉积 `r = v1 × v2`
    #[inline]
    pub fn vector_mul_v2(&self, r: &mut Vector3D, v1: &Vector3D, v2: &Vector3D) {
        self.kernels.cross3(v1.lanes(), v2.lanes(), r.lanes_mut());
    }

    /// 三个点相对平面的打包位置编码
    #[inline]
    pub fn colocation_x3_v1pv(&self, pl: &Plane3D, pv: &[Point3D; 3]) -> usize {
        self.classify_x3(pl, pv).pack()
    }

    #[inline]
    pub fn classify_x3(&self, pl: &Plane3D, pv: &[Point3D; 3]) -> ColocationX3 {
        let k = self
            .kernels
            .plane_eval3(pl.lanes(), pv[0].lanes(), pv[1].lanes(), pv[2].lanes());
        ColocationX3([
            Colocation::classify(k[0]),
            Colocation::classify(k[1]),
            Colocation::classify(k[2]),
        ])
    }

    /// 过三点的平面，返回归一化前的法线长度；共线时平面为0
    pub fn calc_plane_p3(&self, v: &mut Plane3D, p0: &Point3D, p1: &Point3D, p2: &Point3D) -> f32 {
        let e1 = [p1.x - p0.x, p1.y - p0.y, p1.z - p0.z, 0.0];
        let e2 = [p2.x - p0.x, p2.y - p0.y, p2.z - p0.z, 0.0];
        let mut n = [0.0; 4];
        self.kernels.cross3(&e1, &e2, &mut n);

        let len = self.kernels.dot3(&n, &n).sqrt();
        if len == 0.0 {
            *v = Vector3D::plane(0.0, 0.0, 0.0, 0.0);
            return 0.0;
        }
        let n = [n[0] / len, n[1] / len, n[2] / len, 0.0];
        *v = Vector3D::plane(n[0], n[1], n[2], -self.kernels.dot3(&n, p0.lanes()));
        len
    }

    /// 批量变换点，`src` 与 `dst` 长度必须相同
    pub fn transform_points(&self, m: &Matrix3D, src: &[Point3D], dst: &mut [Point3D]) {
        let src: &[[f32; 4]] = bytemuck::cast_slice(src);
        let dst: &mut [[f32; 4]] = bytemuck::cast_slice_mut(dst);
        self.kernels.transform_rows(&m.m, src, dst);
    }

    /// 批量变换向量，`src` 与 `dst` 长度必须相同
    pub fn transform_vectors(&self, m: &Matrix3D, src: &[Vector3D], dst: &mut [Vector3D]) {
        let src: &[[f32; 4]] = bytemuck::cast_slice(src);
        let dst: &mut [[f32; 4]] = bytemuck::cast_slice_mut(dst);
        self.kernels.transform_rows(&m.m, src, dst);
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self {
            kernels: SimdKernels::best(),
        }
    }
}

static KERNEL: OnceLock<Kernel> = OnceLock::new();

/// 进程级内核，首次调用时按环境变量选择后端
///
/// 环境变量指定的后端无效时回退到最优可用后端。
pub fn kernel() -> &'static Kernel {
    KERNEL.get_or_init(|| {
        let mut config = Dsp3dConfig::default();
        config.apply_env_overrides();
        Kernel::select(&config.simd).unwrap_or_else(|e| {
            tracing::warn!(target: "dsp3d::dispatch", "{}; falling back to best available", e);
            Kernel::default()
        })
    })
}
