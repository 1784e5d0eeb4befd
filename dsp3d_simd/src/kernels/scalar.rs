/// 标量实现
///
/// 所有SIMD后端的基准；累加顺序即各后端的累加顺序

/// 三维点积（忽略w）
pub fn dot3_scalar(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// 四维点积（平面求值）
pub fn dot4_scalar(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

/// 叉积，结果 w = 0
pub fn cross3_scalar(a: &[f32; 4], b: &[f32; 4], out: &mut [f32; 4]) {
    let r = [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
        0.0,
    ];
    *out = r;
}

/// 归一化xyz，长度恰为0时xyz置0；w原样保留
pub fn normalize3_scalar(v: &[f32; 4], out: &mut [f32; 4]) {
    let len = dot3_scalar(v, v).sqrt();
    if len == 0.0 {
        *out = [0.0, 0.0, 0.0, v[3]];
    } else {
        *out = [v[0] / len, v[1] / len, v[2] / len, v[3]];
    }
}

/// 行向量乘矩阵 `out = v * m`（不做齐次除法）
pub fn vec4_mul_mat4_scalar(v: &[f32; 4], m: &[f32; 16], out: &mut [f32; 4]) {
    let mut r = [0.0f32; 4];
    for (i, value) in r.iter_mut().enumerate() {
        *value = v[0] * m[i] + v[1] * m[4 + i] + v[2] * m[8 + i] + v[3] * m[12 + i];
    }
    *out = r;
}

/// 4x4矩阵乘法 `out = a * b`（行主序）
pub fn mat4_mul_scalar(a: &[f32; 16], b: &[f32; 16], out: &mut [f32; 16]) {
    let mut r = [0.0f32; 16];
    for i in 0..4 {
        for j in 0..4 {
            r[i * 4 + j] = a[i * 4] * b[j]
                + a[i * 4 + 1] * b[4 + j]
                + a[i * 4 + 2] * b[8 + j]
                + a[i * 4 + 3] * b[12 + j];
        }
    }
    *out = r;
}

/// 4x4矩阵转置
pub fn mat4_transpose_scalar(m: &[f32; 16], out: &mut [f32; 16]) {
    let mut r = [0.0f32; 16];
    for i in 0..4 {
        for j in 0..4 {
            r[j * 4 + i] = m[i * 4 + j];
        }
    }
    *out = r;
}

/// 对三个点求平面方程值
pub fn plane_eval3_scalar(pl: &[f32; 4], p0: &[f32; 4], p1: &[f32; 4], p2: &[f32; 4]) -> [f32; 3] {
    [dot4_scalar(pl, p0), dot4_scalar(pl, p1), dot4_scalar(pl, p2)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_ops() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0];

        assert_eq!(dot3_scalar(&a, &b), 38.0);
        assert_eq!(dot4_scalar(&a, &b), 70.0);

        let mut c = [9.0; 4];
        cross3_scalar(&[1.0, 0.0, 0.0, 1.0], &[0.0, 1.0, 0.0, 1.0], &mut c);
        assert_eq!(c, [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_normalize_zero_keeps_w() {
        let mut out = [7.0; 4];
        normalize3_scalar(&[0.0, 0.0, 0.0, 1.0], &mut out);
        assert_eq!(out, [0.0, 0.0, 0.0, 1.0]);

        normalize3_scalar(&[3.0, 0.0, 4.0, 0.0], &mut out);
        assert_eq!(out, [0.6, 0.0, 0.8, 0.0]);
    }

    #[test]
    fn test_row_vector_convention() {
        // 平移放在第3行
        let mut m = [0.0f32; 16];
        m[0] = 1.0;
        m[5] = 1.0;
        m[10] = 1.0;
        m[15] = 1.0;
        m[12] = 2.0;
        m[13] = 4.0;
        m[14] = 8.0;

        let mut out = [0.0; 4];
        vec4_mul_mat4_scalar(&[1.0, 1.0, 1.0, 1.0], &m, &mut out);
        assert_eq!(out, [3.0, 5.0, 9.0, 1.0]);

        vec4_mul_mat4_scalar(&[1.0, 1.0, 1.0, 0.0], &m, &mut out);
        assert_eq!(out, [1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_transpose_and_mul() {
        let a: [f32; 16] = core::array::from_fn(|i| i as f32);
        let mut t = [0.0; 16];
        mat4_transpose_scalar(&a, &mut t);
        assert_eq!(t[1], 4.0);
        assert_eq!(t[4], 1.0);

        let mut id = [0.0f32; 16];
        for i in 0..4 {
            id[i * 5] = 1.0;
        }
        let mut out = [0.0; 16];
        mat4_mul_scalar(&a, &id, &mut out);
        assert_eq!(out, a);
        mat4_mul_scalar(&id, &a, &mut out);
        assert_eq!(out, a);
    }
}
