/// ARM NEON SIMD内核
///
/// NEON是ARM的128位SIMD指令集，在aarch64上是强制支持的。
/// 累加顺序与标量实现一致。

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

/// 按 x, y, z, w 顺序累加四个通道
#[cfg(target_arch = "aarch64")]
#[inline]
#[target_feature(enable = "neon")]
unsafe fn sum_lanes(v: float32x4_t, lanes: usize) -> f32 {
    let mut acc = vgetq_lane_f32::<0>(v) + vgetq_lane_f32::<1>(v) + vgetq_lane_f32::<2>(v);
    if lanes == 4 {
        acc += vgetq_lane_f32::<3>(v);
    }
    acc
}

/// 使用NEON的三维点积
///
/// # Safety
///
/// 调用者必须确保当前CPU支持NEON指令集（在aarch64上是强制支持的）。
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn dot3_neon(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let m = vmulq_f32(vld1q_f32(a.as_ptr()), vld1q_f32(b.as_ptr()));
    sum_lanes(m, 3)
}

/// 使用NEON的四维点积
///
/// # Safety
///
/// 调用者必须确保当前CPU支持NEON指令集。
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn dot4_neon(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let m = vmulq_f32(vld1q_f32(a.as_ptr()), vld1q_f32(b.as_ptr()));
    sum_lanes(m, 4)
}

/// 使用NEON的叉积
///
/// # Safety
///
/// 调用者必须确保当前CPU支持NEON指令集。
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn cross3_neon(a: &[f32; 4], b: &[f32; 4], out: &mut [f32; 4]) {
    let a_yzx = vld1q_f32([a[1], a[2], a[0], 0.0].as_ptr());
    let a_zxy = vld1q_f32([a[2], a[0], a[1], 0.0].as_ptr());
    let b_yzx = vld1q_f32([b[1], b[2], b[0], 0.0].as_ptr());
    let b_zxy = vld1q_f32([b[2], b[0], b[1], 0.0].as_ptr());

    let r = vsubq_f32(vmulq_f32(a_yzx, b_zxy), vmulq_f32(a_zxy, b_yzx));
    vst1q_f32(out.as_mut_ptr(), r);
    out[3] = 0.0;
}

/// 使用NEON的xyz归一化
///
/// # Safety
///
/// 调用者必须确保当前CPU支持NEON指令集。
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn normalize3_neon(v: &[f32; 4], out: &mut [f32; 4]) {
    let w = v[3];
    let len = dot3_neon(v, v).sqrt();
    if len == 0.0 {
        *out = [0.0, 0.0, 0.0, w];
        return;
    }
    let r = vdivq_f32(vld1q_f32(v.as_ptr()), vdupq_n_f32(len));
    vst1q_f32(out.as_mut_ptr(), r);
    out[3] = w;
}

/// 使用NEON的行向量乘矩阵 `out = v * m`
///
/// # Safety
///
/// 调用者必须确保当前CPU支持NEON指令集。
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn vec4_mul_mat4_neon(v: &[f32; 4], m: &[f32; 16], out: &mut [f32; 4]) {
    let p = m.as_ptr();
    let mut acc = vmulq_f32(vdupq_n_f32(v[0]), vld1q_f32(p));
    acc = vaddq_f32(acc, vmulq_f32(vdupq_n_f32(v[1]), vld1q_f32(p.add(4))));
    acc = vaddq_f32(acc, vmulq_f32(vdupq_n_f32(v[2]), vld1q_f32(p.add(8))));
    acc = vaddq_f32(acc, vmulq_f32(vdupq_n_f32(v[3]), vld1q_f32(p.add(12))));
    vst1q_f32(out.as_mut_ptr(), acc);
}

/// 使用NEON的4x4矩阵乘法 `out = a * b`
///
/// # Safety
///
/// 调用者必须确保当前CPU支持NEON指令集。
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn mat4_mul_neon(a: &[f32; 16], b: &[f32; 16], out: &mut [f32; 16]) {
    let bp = b.as_ptr();
    let b0 = vld1q_f32(bp);
    let b1 = vld1q_f32(bp.add(4));
    let b2 = vld1q_f32(bp.add(8));
    let b3 = vld1q_f32(bp.add(12));

    let mut r = [0.0f32; 16];
    for i in 0..4 {
        let row = &a[i * 4..i * 4 + 4];
        let mut acc = vmulq_f32(vdupq_n_f32(row[0]), b0);
        acc = vaddq_f32(acc, vmulq_f32(vdupq_n_f32(row[1]), b1));
        acc = vaddq_f32(acc, vmulq_f32(vdupq_n_f32(row[2]), b2));
        acc = vaddq_f32(acc, vmulq_f32(vdupq_n_f32(row[3]), b3));
        vst1q_f32(r.as_mut_ptr().add(i * 4), acc);
    }
    *out = r;
}

/// 使用NEON的4x4矩阵转置
///
/// # Safety
///
/// 调用者必须确保当前CPU支持NEON指令集。
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn mat4_transpose_neon(m: &[f32; 16], out: &mut [f32; 16]) {
    // vld4q 按4路交错加载，每个寄存器正好是一列
    let cols = vld4q_f32(m.as_ptr());
    let mut r = [0.0f32; 16];
    let o = r.as_mut_ptr();
    vst1q_f32(o, cols.0);
    vst1q_f32(o.add(4), cols.1);
    vst1q_f32(o.add(8), cols.2);
    vst1q_f32(o.add(12), cols.3);
    *out = r;
}

/// 使用NEON对三个点求平面方程值
///
/// # Safety
///
/// 调用者必须确保当前CPU支持NEON指令集。
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn plane_eval3_neon(
    pl: &[f32; 4],
    p0: &[f32; 4],
    p1: &[f32; 4],
    p2: &[f32; 4],
) -> [f32; 3] {
    [dot4_neon(pl, p0), dot4_neon(pl, p1), dot4_neon(pl, p2)]
}

#[cfg(test)]
mod tests {
    use super::super::scalar::*;
    use super::*;

    #[test]
    #[cfg(target_arch = "aarch64")]
    fn test_neon_matches_scalar_exactly() {
        let a = [1.5, -2.25, 3.0, 1.0];
        let b = [-0.5, 4.0, 0.125, 1.0];
        let m: [f32; 16] = core::array::from_fn(|i| (i as f32 * 0.37).sin() * 3.0);

        unsafe {
            assert_eq!(dot3_neon(&a, &b), dot3_scalar(&a, &b));
            assert_eq!(dot4_neon(&a, &b), dot4_scalar(&a, &b));

            let (mut x, mut y) = ([0.0; 4], [0.0; 4]);
            cross3_neon(&a, &b, &mut x);
            cross3_scalar(&a, &b, &mut y);
            assert_eq!(x, y);

            vec4_mul_mat4_neon(&a, &m, &mut x);
            vec4_mul_mat4_scalar(&a, &m, &mut y);
            assert_eq!(x, y);

            let (mut mx, mut my) = ([0.0; 16], [0.0; 16]);
            mat4_mul_neon(&m, &m, &mut mx);
            mat4_mul_scalar(&m, &m, &mut my);
            assert_eq!(mx, my);

            mat4_transpose_neon(&m, &mut mx);
            mat4_transpose_scalar(&m, &mut my);
            assert_eq!(mx, my);
        }
    }
}
