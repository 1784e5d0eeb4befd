//! 数据模型
//!
//! 所有记录都是 `#[repr(C)]` 纯数据（16 / 64 字节，无填充），可以通过
//! `bytemuck` 直接视为 `f32` 通道传给SIMD内核；数组在内存中连续排列。

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 全局容差，用于平面共面判定
pub const DSP_3D_TOLERANCE: f32 = 1e-5;

/// 齐次点 `{x, y, z, w}`，合法的点 `w == 1`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

/// 齐次向量 `{dx, dy, dz, dw}`，方向向量 `dw == 0`
///
/// 平面也使用该类型：`{nx, ny, nz, d}` 表示 `nx*x + ny*y + nz*z + d*w = 0`。
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector3D {
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
    pub dw: f32,
}

/// 平面 `{nx, ny, nz, d}`
pub type Plane3D = Vector3D;

/// 4x4矩阵，行主序 (`m[row * 4 + col]`)，行向量约定
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Matrix3D {
    pub m: [f32; 16],
}

/// 三个顶点组成的三角形，按值复制
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct RawTriangle {
    pub p: [Point3D; 3],
}

/// 单位矩阵
pub const IDENTITY: Matrix3D = Matrix3D {
    m: [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ],
};

impl Point3D {
    pub const ORIGIN: Point3D = Point3D::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    #[inline]
    pub fn lanes(&self) -> &[f32; 4] {
        bytemuck::cast_ref(self)
    }

    #[inline]
    pub fn lanes_mut(&mut self) -> &mut [f32; 4] {
        bytemuck::cast_mut(self)
    }

    #[inline]
    pub fn from_lanes(v: [f32; 4]) -> Self {
        bytemuck::cast(v)
    }
}

impl Default for Point3D {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Vector3D {
    pub const ZERO: Vector3D = Vector3D::new(0.0, 0.0, 0.0);

    pub const fn new(dx: f32, dy: f32, dz: f32) -> Self {
        Self { dx, dy, dz, dw: 0.0 }
    }

    /// 平面 `nx*x + ny*y + nz*z + d = 0`
    pub const fn plane(nx: f32, ny: f32, nz: f32, d: f32) -> Self {
        Self {
            dx: nx,
            dy: ny,
            dz: nz,
            dw: d,
        }
    }

    #[inline]
    pub fn lanes(&self) -> &[f32; 4] {
        bytemuck::cast_ref(self)
    }

    #[inline]
    pub fn lanes_mut(&mut self) -> &mut [f32; 4] {
        bytemuck::cast_mut(self)
    }

    #[inline]
    pub fn from_lanes(v: [f32; 4]) -> Self {
        bytemuck::cast(v)
    }
}

impl Default for Vector3D {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Matrix3D {
    pub const fn from_rows(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// 第 `row` 行第 `col` 列
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.m[row * 4 + col]
    }
}

impl Default for Matrix3D {
    fn default() -> Self {
        IDENTITY
    }
}

impl RawTriangle {
    pub const fn new(p0: Point3D, p1: Point3D, p2: Point3D) -> Self {
        Self { p: [p0, p1, p2] }
    }
}

/// 相对平面的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Colocation {
    /// `k < -tolerance`，编码 `00`
    Above = 0,
    /// `|k| <= tolerance`，编码 `01`
    On = 1,
    /// `k > tolerance`，编码 `10`
    Below = 2,
}

impl Colocation {
    /// 按容差对平面方程值分类
    #[inline]
    pub fn classify(k: f32) -> Self {
        if k < -DSP_3D_TOLERANCE {
            Self::Above
        } else if k > DSP_3D_TOLERANCE {
            Self::Below
        } else {
            Self::On
        }
    }

    #[inline]
    pub fn bits(self) -> usize {
        self as usize
    }

    /// 解码2位编码，`11` 无效
    pub fn from_bits(bits: usize) -> Option<Self> {
        match bits & 0b11 {
            0 => Some(Self::Above),
            1 => Some(Self::On),
            2 => Some(Self::Below),
            _ => None,
        }
    }
}

/// 两个实体的打包位置编码，实体0在最低位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColocationX2(pub [Colocation; 2]);

/// 三个实体的打包位置编码，实体0在最低位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColocationX3(pub [Colocation; 3]);

impl ColocationX2 {
    pub fn pack(&self) -> usize {
        self.0[0].bits() | (self.0[1].bits() << 2)
    }

    pub fn unpack(code: usize) -> Option<Self> {
        if code >> 4 != 0 {
            return None;
        }
        Some(Self([
            Colocation::from_bits(code)?,
            Colocation::from_bits(code >> 2)?,
        ]))
    }
}

impl ColocationX3 {
    pub fn pack(&self) -> usize {
        self.0[0].bits() | (self.0[1].bits() << 2) | (self.0[2].bits() << 4)
    }

    pub fn unpack(code: usize) -> Option<Self> {
        if code >> 6 != 0 {
            return None;
        }
        Some(Self([
            Colocation::from_bits(code)?,
            Colocation::from_bits(code >> 2)?,
            Colocation::from_bits(code >> 4)?,
        ]))
    }

    /// 各位置的个数 `(above, on, below)`
    pub fn counts(&self) -> (usize, usize, usize) {
        self.0.iter().fold((0, 0, 0), |(a, o, b), c| match c {
            Colocation::Above => (a + 1, o, b),
            Colocation::On => (a, o + 1, b),
            Colocation::Below => (a, o, b + 1),
        })
    }
}

/// 带符号坐标轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignedAxis {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl SignedAxis {
    pub fn unit(self) -> [f32; 3] {
        match self {
            Self::PosX => [1.0, 0.0, 0.0],
            Self::NegX => [-1.0, 0.0, 0.0],
            Self::PosY => [0.0, 1.0, 0.0],
            Self::NegY => [0.0, -1.0, 0.0],
            Self::PosZ => [0.0, 0.0, 1.0],
            Self::NegZ => [0.0, 0.0, -1.0],
        }
    }
}

macro_rules! axis_orientations {
    ($($name:ident => ($fwd:ident, $up:ident)),* $(,)?) => {
        /// 坐标系朝向：前方轴与上方轴的24种右手组合
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum AxisOrientation {
            $($name),*
        }

        impl AxisOrientation {
            pub const ALL: [AxisOrientation; 24] = [$(AxisOrientation::$name),*];

            /// `(前方, 上方)`
            pub fn axes(self) -> (SignedAxis, SignedAxis) {
                match self {
                    $(AxisOrientation::$name => (SignedAxis::$fwd, SignedAxis::$up)),*
                }
            }
        }
    };
}

axis_orientations! {
    PosXFwdPosYUp => (PosX, PosY),
    PosXFwdNegYUp => (PosX, NegY),
    PosXFwdPosZUp => (PosX, PosZ),
    PosXFwdNegZUp => (PosX, NegZ),
    NegXFwdPosYUp => (NegX, PosY),
    NegXFwdNegYUp => (NegX, NegY),
    NegXFwdPosZUp => (NegX, PosZ),
    NegXFwdNegZUp => (NegX, NegZ),
    PosYFwdPosXUp => (PosY, PosX),
    PosYFwdNegXUp => (PosY, NegX),
    PosYFwdPosZUp => (PosY, PosZ),
    PosYFwdNegZUp => (PosY, NegZ),
    NegYFwdPosXUp => (NegY, PosX),
    NegYFwdNegXUp => (NegY, NegX),
    NegYFwdPosZUp => (NegY, PosZ),
    NegYFwdNegZUp => (NegY, NegZ),
    PosZFwdPosXUp => (PosZ, PosX),
    PosZFwdNegXUp => (PosZ, NegX),
    PosZFwdPosYUp => (PosZ, PosY),
    PosZFwdNegYUp => (PosZ, NegY),
    NegZFwdPosXUp => (NegZ, PosX),
    NegZFwdNegXUp => (NegZ, NegX),
    NegZFwdPosYUp => (NegZ, PosY),
    NegZFwdNegYUp => (NegZ, NegY),
}

// glam 为列主序、列向量；同样16个浮点数在两种约定下描述同一变换

impl From<Point3D> for glam::Vec4 {
    fn from(p: Point3D) -> Self {
        glam::Vec4::from_array(*p.lanes())
    }
}

impl From<glam::Vec4> for Point3D {
    fn from(v: glam::Vec4) -> Self {
        Point3D::from_lanes(v.to_array())
    }
}

impl From<glam::Vec3> for Point3D {
    fn from(v: glam::Vec3) -> Self {
        Point3D::new(v.x, v.y, v.z)
    }
}

impl From<Point3D> for glam::Vec3 {
    fn from(p: Point3D) -> Self {
        glam::Vec3::new(p.x, p.y, p.z)
    }
}

impl From<Vector3D> for glam::Vec4 {
    fn from(v: Vector3D) -> Self {
        glam::Vec4::from_array(*v.lanes())
    }
}

impl From<glam::Vec4> for Vector3D {
    fn from(v: glam::Vec4) -> Self {
        Vector3D::from_lanes(v.to_array())
    }
}

impl From<glam::Vec3> for Vector3D {
    fn from(v: glam::Vec3) -> Self {
        Vector3D::new(v.x, v.y, v.z)
    }
}

impl From<Vector3D> for glam::Vec3 {
    fn from(v: Vector3D) -> Self {
        glam::Vec3::new(v.dx, v.dy, v.dz)
    }
}

impl From<Matrix3D> for glam::Mat4 {
    fn from(m: Matrix3D) -> Self {
        glam::Mat4::from_cols_array(&m.m)
    }
}

impl From<glam::Mat4> for Matrix3D {
    fn from(m: glam::Mat4) -> Self {
        Matrix3D {
            m: m.to_cols_array(),
        }
    }
}
