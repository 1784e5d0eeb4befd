//! # dsp3d
//!
//! Homogeneous-coordinate 3D geometry kernels for real-time audio and
//! visualization pipelines.
//!
//! ## Features
//!
//! - **Data model**: `#[repr(C)]` points, vectors, planes, 4x4 matrices and raw triangles
//! - **Primitives**: construction, normalization, matrix application, planes, colocation, distances
//! - **Clipping**: triangle split / cull against a plane, winding preserved
//! - **SIMD dispatch**: scalar, SSE2, AVX, AVX+FMA3 and NEON kernels chosen at runtime
//! - **Batch**: slice helpers with scoped-thread fan-out
//!
//! ## Conventions
//!
//! Matrices are row-major and applied to row vectors (`r_i = sum_j v_j * M[j][i]`).
//! Operations write through an explicit `&mut` destination; `*1` variants update
//! in place, `*2` variants write a separate destination.
//!
//! ### Example
//!
//! ```rust
//! use dsp3d::prelude::*;
//!
//! let mut pl = Plane3D::default();
//! calc_plane_p3(
//!     &mut pl,
//!     &Point3D::new(0.0, 0.0, 0.0),
//!     &Point3D::new(1.0, 0.0, 0.0),
//!     &Point3D::new(0.0, 1.0, 0.0),
//! );
//!
//! let tri = RawTriangle::new(
//!     Point3D::new(0.0, 0.0, 1.0),
//!     Point3D::new(2.0, 0.0, -1.0),
//!     Point3D::new(0.0, 2.0, -1.0),
//! );
//! let (mut above, mut below) = (Vec::new(), Vec::new());
//! split_triangle_raw(&mut above, &mut below, &pl, &tri);
//! assert_eq!(above.len() + below.len(), 3);
//! ```
//!
//! ## Modules
//!
//! - [`types`]: data model and colocation codes
//! - [`math`]: scalar reference primitives
//! - [`clip`]: triangle clipping
//! - [`dispatch`]: backend-selected kernels
//! - [`batch`]: slice helpers
//! - [`config`]: TOML/JSON configuration

#[macro_use]
mod macros;

/// Triangle split / cull against a plane
pub mod clip;
/// Runtime backend selection
pub mod dispatch;
/// Point, vector, matrix, plane and distance primitives
pub mod math;
/// Data model
pub mod types;

/// Slice helpers
pub mod batch;
/// Configuration loading
pub mod config;
/// Error types
pub mod error;
/// Logging setup
pub mod logging;

pub use dsp3d_simd::{detect_cpu_features, CpuFeatures, SimdBackend};
pub use error::{Dsp3dError, Dsp3dResult};

pub mod prelude {
    pub use crate::clip::{cull_triangle_raw, split_triangle_raw, TriangleBuffer, TriangleSink};
    pub use crate::config::Dsp3dConfig;
    pub use crate::dispatch::{kernel, Kernel};
    pub use crate::math::*;
    pub use crate::types::*;
    pub use crate::SimdBackend;
}
