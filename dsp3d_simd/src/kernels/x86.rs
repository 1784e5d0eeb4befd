/// x86/x64 SIMD内核
///
/// 支持SSE2, AVX, AVX+FMA3指令集。除FMA版本外，累加顺序与标量实现一致。

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

// _MM_SHUFFLE(3, 0, 2, 1) 与 _MM_SHUFFLE(3, 1, 0, 2)
const SHUF_YZX: i32 = 0b11_00_10_01;
const SHUF_ZXY: i32 = 0b11_01_00_10;

/// 使用SSE2的三维点积
///
/// # Safety
///
/// 调用者必须确保当前CPU支持SSE2指令集。
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
pub unsafe fn dot3_sse2(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let m = _mm_mul_ps(_mm_loadu_ps(a.as_ptr()), _mm_loadu_ps(b.as_ptr()));
    let y = _mm_shuffle_ps(m, m, 0b01_01_01_01);
    let z = _mm_shuffle_ps(m, m, 0b10_10_10_10);
    _mm_cvtss_f32(_mm_add_ss(_mm_add_ss(m, y), z))
}

/// 使用SSE2的四维点积
///
/// # Safety
///
/// 调用者必须确保当前CPU支持SSE2指令集。
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
pub unsafe fn dot4_sse2(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let m = _mm_mul_ps(_mm_loadu_ps(a.as_ptr()), _mm_loadu_ps(b.as_ptr()));
    let y = _mm_shuffle_ps(m, m, 0b01_01_01_01);
    let z = _mm_shuffle_ps(m, m, 0b10_10_10_10);
    let w = _mm_shuffle_ps(m, m, 0b11_11_11_11);
    _mm_cvtss_f32(_mm_add_ss(_mm_add_ss(_mm_add_ss(m, y), z), w))
}

/// 使用SSE2的叉积
///
/// # Safety
///
/// 调用者必须确保当前CPU支持SSE2指令集。
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
pub unsafe fn cross3_sse2(a: &[f32; 4], b: &[f32; 4], out: &mut [f32; 4]) {
    let va = _mm_loadu_ps(a.as_ptr());
    let vb = _mm_loadu_ps(b.as_ptr());

    // a.yzx * b.zxy - a.zxy * b.yzx
    let l = _mm_mul_ps(_mm_shuffle_ps(va, va, SHUF_YZX), _mm_shuffle_ps(vb, vb, SHUF_ZXY));
    let r = _mm_mul_ps(_mm_shuffle_ps(va, va, SHUF_ZXY), _mm_shuffle_ps(vb, vb, SHUF_YZX));
    _mm_storeu_ps(out.as_mut_ptr(), _mm_sub_ps(l, r));
    out[3] = 0.0;
}

/// 使用SSE2的xyz归一化
///
/// # Safety
///
/// 调用者必须确保当前CPU支持SSE2指令集。
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
pub unsafe fn normalize3_sse2(v: &[f32; 4], out: &mut [f32; 4]) {
    let w = v[3];
    let len = dot3_sse2(v, v).sqrt();
    if len == 0.0 {
        *out = [0.0, 0.0, 0.0, w];
        return;
    }
    let r = _mm_div_ps(_mm_loadu_ps(v.as_ptr()), _mm_set1_ps(len));
    _mm_storeu_ps(out.as_mut_ptr(), r);
    out[3] = w;
}

/// 使用SSE2的行向量乘矩阵 `out = v * m`
///
/// # Safety
///
/// 调用者必须确保当前CPU支持SSE2指令集。
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
pub unsafe fn vec4_mul_mat4_sse2(v: &[f32; 4], m: &[f32; 16], out: &mut [f32; 4]) {
    let p = m.as_ptr();
    let mut acc = _mm_mul_ps(_mm_set1_ps(v[0]), _mm_loadu_ps(p));
    acc = _mm_add_ps(acc, _mm_mul_ps(_mm_set1_ps(v[1]), _mm_loadu_ps(p.add(4))));
    acc = _mm_add_ps(acc, _mm_mul_ps(_mm_set1_ps(v[2]), _mm_loadu_ps(p.add(8))));
    acc = _mm_add_ps(acc, _mm_mul_ps(_mm_set1_ps(v[3]), _mm_loadu_ps(p.add(12))));
    _mm_storeu_ps(out.as_mut_ptr(), acc);
}

/// 使用FMA3的行向量乘矩阵 `out = v * m`
///
/// # Safety
///
/// 调用者必须确保当前CPU支持AVX与FMA指令集。
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx,fma")]
pub unsafe fn vec4_mul_mat4_fma(v: &[f32; 4], m: &[f32; 16], out: &mut [f32; 4]) {
    let p = m.as_ptr();
    let mut acc = _mm_mul_ps(_mm_set1_ps(v[0]), _mm_loadu_ps(p));
    acc = _mm_fmadd_ps(_mm_set1_ps(v[1]), _mm_loadu_ps(p.add(4)), acc);
    acc = _mm_fmadd_ps(_mm_set1_ps(v[2]), _mm_loadu_ps(p.add(8)), acc);
    acc = _mm_fmadd_ps(_mm_set1_ps(v[3]), _mm_loadu_ps(p.add(12)), acc);
    _mm_storeu_ps(out.as_mut_ptr(), acc);
}

/// 使用SSE2的4x4矩阵乘法 `out = a * b`
///
/// # Safety
///
/// 调用者必须确保当前CPU支持SSE2指令集。
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
pub unsafe fn mat4_mul_sse2(a: &[f32; 16], b: &[f32; 16], out: &mut [f32; 16]) {
    let bp = b.as_ptr();
    let b0 = _mm_loadu_ps(bp);
    let b1 = _mm_loadu_ps(bp.add(4));
    let b2 = _mm_loadu_ps(bp.add(8));
    let b3 = _mm_loadu_ps(bp.add(12));

    let mut r = [0.0f32; 16];
    for i in 0..4 {
        let row = &a[i * 4..i * 4 + 4];
        let mut acc = _mm_mul_ps(_mm_set1_ps(row[0]), b0);
        acc = _mm_add_ps(acc, _mm_mul_ps(_mm_set1_ps(row[1]), b1));
        acc = _mm_add_ps(acc, _mm_mul_ps(_mm_set1_ps(row[2]), b2));
        acc = _mm_add_ps(acc, _mm_mul_ps(_mm_set1_ps(row[3]), b3));
        _mm_storeu_ps(r.as_mut_ptr().add(i * 4), acc);
    }
    *out = r;
}

/// 低128位填充 `lo`，高128位填充 `hi`
#[cfg(target_arch = "x86_64")]
#[inline]
#[target_feature(enable = "avx")]
unsafe fn splat_pair(lo: f32, hi: f32) -> __m256 {
    _mm256_set_m128(_mm_set1_ps(hi), _mm_set1_ps(lo))
}

/// 使用AVX的4x4矩阵乘法，每次处理两行
///
/// # Safety
///
/// 调用者必须确保当前CPU支持AVX指令集。
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx")]
pub unsafe fn mat4_mul_avx(a: &[f32; 16], b: &[f32; 16], out: &mut [f32; 16]) {
    let bp = b.as_ptr();
    let b0 = _mm256_broadcast_ps(&_mm_loadu_ps(bp));
    let b1 = _mm256_broadcast_ps(&_mm_loadu_ps(bp.add(4)));
    let b2 = _mm256_broadcast_ps(&_mm_loadu_ps(bp.add(8)));
    let b3 = _mm256_broadcast_ps(&_mm_loadu_ps(bp.add(12)));

    let mut r = [0.0f32; 16];
    for pair in 0..2 {
        let lo = pair * 8;
        let hi = lo + 4;
        let mut acc = _mm256_mul_ps(splat_pair(a[lo], a[hi]), b0);
        acc = _mm256_add_ps(acc, _mm256_mul_ps(splat_pair(a[lo + 1], a[hi + 1]), b1));
        acc = _mm256_add_ps(acc, _mm256_mul_ps(splat_pair(a[lo + 2], a[hi + 2]), b2));
        acc = _mm256_add_ps(acc, _mm256_mul_ps(splat_pair(a[lo + 3], a[hi + 3]), b3));
        _mm256_storeu_ps(r.as_mut_ptr().add(lo), acc);
    }
    *out = r;
}

/// 使用AVX+FMA3的4x4矩阵乘法
///
/// # Safety
///
/// 调用者必须确保当前CPU支持AVX与FMA指令集。
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx,fma")]
pub unsafe fn mat4_mul_fma(a: &[f32; 16], b: &[f32; 16], out: &mut [f32; 16]) {
    let bp = b.as_ptr();
    let b0 = _mm256_broadcast_ps(&_mm_loadu_ps(bp));
    let b1 = _mm256_broadcast_ps(&_mm_loadu_ps(bp.add(4)));
    let b2 = _mm256_broadcast_ps(&_mm_loadu_ps(bp.add(8)));
    let b3 = _mm256_broadcast_ps(&_mm_loadu_ps(bp.add(12)));

    let mut r = [0.0f32; 16];
    for pair in 0..2 {
        let lo = pair * 8;
        let hi = lo + 4;
        let mut acc = _mm256_mul_ps(splat_pair(a[lo], a[hi]), b0);
        acc = _mm256_fmadd_ps(splat_pair(a[lo + 1], a[hi + 1]), b1, acc);
        acc = _mm256_fmadd_ps(splat_pair(a[lo + 2], a[hi + 2]), b2, acc);
        acc = _mm256_fmadd_ps(splat_pair(a[lo + 3], a[hi + 3]), b3, acc);
        _mm256_storeu_ps(r.as_mut_ptr().add(lo), acc);
    }
    *out = r;
}

/// 使用SSE2的4x4矩阵转置
///
/// # Safety
///
/// 调用者必须确保当前CPU支持SSE2指令集。
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
pub unsafe fn mat4_transpose_sse2(m: &[f32; 16], out: &mut [f32; 16]) {
    let p = m.as_ptr();
    let r0 = _mm_loadu_ps(p);
    let r1 = _mm_loadu_ps(p.add(4));
    let r2 = _mm_loadu_ps(p.add(8));
    let r3 = _mm_loadu_ps(p.add(12));

    let t0 = _mm_unpacklo_ps(r0, r1);
    let t1 = _mm_unpacklo_ps(r2, r3);
    let t2 = _mm_unpackhi_ps(r0, r1);
    let t3 = _mm_unpackhi_ps(r2, r3);

    let mut r = [0.0f32; 16];
    let o = r.as_mut_ptr();
    _mm_storeu_ps(o, _mm_movelh_ps(t0, t1));
    _mm_storeu_ps(o.add(4), _mm_movehl_ps(t1, t0));
    _mm_storeu_ps(o.add(8), _mm_movelh_ps(t2, t3));
    _mm_storeu_ps(o.add(12), _mm_movehl_ps(t3, t2));
    *out = r;
}

/// 使用SSE2对三个点求平面方程值
///
/// # Safety
///
/// 调用者必须确保当前CPU支持SSE2指令集。
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
pub unsafe fn plane_eval3_sse2(
    pl: &[f32; 4],
    p0: &[f32; 4],
    p1: &[f32; 4],
    p2: &[f32; 4],
) -> [f32; 3] {
    [dot4_sse2(pl, p0), dot4_sse2(pl, p1), dot4_sse2(pl, p2)]
}

#[cfg(test)]
mod tests {
    use super::super::scalar::*;
    use super::*;

    fn sample_matrix() -> [f32; 16] {
        core::array::from_fn(|i| (i as f32 * 0.37).sin() * 3.0)
    }

    #[test]
    #[cfg(target_arch = "x86_64")]
    fn test_sse2_matches_scalar_exactly() {
        if !is_x86_feature_detected!("sse2") {
            return;
        }
        let a = [1.5, -2.25, 3.0, 1.0];
        let b = [-0.5, 4.0, 0.125, 1.0];
        let m = sample_matrix();

        unsafe {
            assert_eq!(dot3_sse2(&a, &b), dot3_scalar(&a, &b));
            assert_eq!(dot4_sse2(&a, &b), dot4_scalar(&a, &b));

            let (mut x, mut y) = ([0.0; 4], [0.0; 4]);
            cross3_sse2(&a, &b, &mut x);
            cross3_scalar(&a, &b, &mut y);
            assert_eq!(x, y);

            normalize3_sse2(&a, &mut x);
            normalize3_scalar(&a, &mut y);
            assert_eq!(x, y);

            vec4_mul_mat4_sse2(&a, &m, &mut x);
            vec4_mul_mat4_scalar(&a, &m, &mut y);
            assert_eq!(x, y);

            let (mut mx, mut my) = ([0.0; 16], [0.0; 16]);
            mat4_mul_sse2(&m, &m, &mut mx);
            mat4_mul_scalar(&m, &m, &mut my);
            assert_eq!(mx, my);

            mat4_transpose_sse2(&m, &mut mx);
            mat4_transpose_scalar(&m, &mut my);
            assert_eq!(mx, my);
        }
    }

    #[test]
    #[cfg(target_arch = "x86_64")]
    fn test_avx_mat4_mul() {
        if !is_x86_feature_detected!("avx") {
            return;
        }
        let m = sample_matrix();
        let (mut mx, mut my) = ([0.0; 16], [0.0; 16]);
        unsafe {
            mat4_mul_avx(&m, &m, &mut mx);
        }
        mat4_mul_scalar(&m, &m, &mut my);
        assert_eq!(mx, my);

        if is_x86_feature_detected!("fma") {
            unsafe {
                mat4_mul_fma(&m, &m, &mut mx);
            }
            for (x, y) in mx.iter().zip(my.iter()) {
                assert!((x - y).abs() <= 1e-5 * y.abs().max(1.0));
            }
        }
    }
}
