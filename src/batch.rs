/// 批量处理
///
/// 对点、向量和三角形切片执行同一操作。元素数超过
/// [`BatchConfig::parallel_threshold`] 时按连续区块分给作用域线程，
/// 输出顺序与单线程完全相同。
use std::thread;
use std::time::Instant;

use dsp3d_simd::SimdBackend;

use crate::clip::{cull_triangle_raw, split_triangle_raw};
use crate::config::BatchConfig;
use crate::dispatch::Kernel;
use crate::types::{Matrix3D, Plane3D, Point3D, RawTriangle, Vector3D};

/// 批量处理统计信息
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchStats {
    /// 处理的元素数量
    pub elements_processed: usize,
    /// 处理时间（微秒）
    pub processing_time_us: u64,
    /// 使用的SIMD后端
    pub backend_used: Option<SimdBackend>,
    /// 实际使用的线程数
    pub threads_used: usize,
}

impl BatchStats {
    /// 计算吞吐量（元素/秒）
    pub fn throughput(&self) -> f64 {
        if self.processing_time_us == 0 {
            return 0.0;
        }
        (self.elements_processed as f64) / (self.processing_time_us as f64 / 1_000_000.0)
    }
}

/// 区块大小；返回 `None` 表示单线程处理
fn chunk_len(config: &BatchConfig, len: usize) -> Option<usize> {
    let threads = config.num_threads();
    if threads <= 1 || len <= config.parallel_threshold {
        return None;
    }
    Some(len.div_ceil(threads))
}

fn finish(start: Instant, elements: usize, backend: Option<SimdBackend>, threads: usize) -> BatchStats {
    let stats = BatchStats {
        elements_processed: elements,
        processing_time_us: start.elapsed().as_micros() as u64,
        backend_used: backend,
        threads_used: threads,
    };
    tracing::trace!(
        target: "dsp3d::batch",
        "processed {} elements on {} thread(s) in {}us",
        stats.elements_processed,
        stats.threads_used,
        stats.processing_time_us
    );
    stats
}

/// 用 `m` 变换全部点
///
/// # Panics
///
/// `src` 与 `dst` 长度不同时panic
pub fn transform_points(
    kernel: &Kernel,
    config: &BatchConfig,
    m: &Matrix3D,
    src: &[Point3D],
    dst: &mut [Point3D],
) -> BatchStats {
    assert_eq!(src.len(), dst.len(), "source and destination lengths differ");
    let start = Instant::now();

    let threads = match chunk_len(config, src.len()) {
        None => {
            kernel.transform_points(m, src, dst);
            1
        }
        Some(chunk) => thread::scope(|s| {
            let mut spawned = 0;
            for (src, dst) in src.chunks(chunk).zip(dst.chunks_mut(chunk)) {
                s.spawn(move || kernel.transform_points(m, src, dst));
                spawned += 1;
            }
            spawned
        }),
    };

    finish(start, src.len(), Some(kernel.backend()), threads)
}

/// 用 `m` 变换全部向量
///
/// # Panics
///
/// `src` 与 `dst` 长度不同时panic
pub fn transform_vectors(
    kernel: &Kernel,
    config: &BatchConfig,
    m: &Matrix3D,
    src: &[Vector3D],
    dst: &mut [Vector3D],
) -> BatchStats {
    assert_eq!(src.len(), dst.len(), "source and destination lengths differ");
    let start = Instant::now();

    let threads = match chunk_len(config, src.len()) {
        None => {
            kernel.transform_vectors(m, src, dst);
            1
        }
        Some(chunk) => thread::scope(|s| {
            let mut spawned = 0;
            for (src, dst) in src.chunks(chunk).zip(dst.chunks_mut(chunk)) {
                s.spawn(move || kernel.transform_vectors(m, src, dst));
                spawned += 1;
            }
            spawned
        }),
    };

    finish(start, src.len(), Some(kernel.backend()), threads)
}

/// 每个区块的切分结果 `(out, in)`
type SplitChunk = (Vec<RawTriangle>, Vec<RawTriangle>);

fn split_chunk(pl: &Plane3D, tris: &[RawTriangle]) -> SplitChunk {
    let mut out = Vec::with_capacity(tris.len());
    let mut in_ = Vec::with_capacity(tris.len());
    for t in tris {
        split_triangle_raw(&mut out, &mut in_, pl, t);
    }
    (out, in_)
}

/// 按平面切分全部三角形，结果追加到 `out` 与 `in_`
pub fn split_triangles(
    config: &BatchConfig,
    pl: &Plane3D,
    tris: &[RawTriangle],
    out: &mut Vec<RawTriangle>,
    in_: &mut Vec<RawTriangle>,
) -> BatchStats {
    let start = Instant::now();

    let threads = match chunk_len(config, tris.len()) {
        None => {
            for t in tris {
                split_triangle_raw(out, in_, pl, t);
            }
            1
        }
        Some(chunk) => {
            let parts: Vec<SplitChunk> = thread::scope(|s| {
                let handles: Vec<_> = tris
                    .chunks(chunk)
                    .map(|part| s.spawn(move || split_chunk(pl, part)))
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                    .collect()
            });
            let threads = parts.len();
            for (o, i) in parts {
                out.extend(o);
                in_.extend(i);
            }
            threads
        }
    };

    finish(start, tris.len(), None, threads)
}

/// 只保留平面下方的部分，结果追加到 `in_`
pub fn cull_triangles(
    config: &BatchConfig,
    pl: &Plane3D,
    tris: &[RawTriangle],
    in_: &mut Vec<RawTriangle>,
) -> BatchStats {
    let start = Instant::now();

    let threads = match chunk_len(config, tris.len()) {
        None => {
            for t in tris {
                cull_triangle_raw(in_, pl, t);
            }
            1
        }
        Some(chunk) => {
            let parts: Vec<Vec<RawTriangle>> = thread::scope(|s| {
                let handles: Vec<_> = tris
                    .chunks(chunk)
                    .map(|part| {
                        s.spawn(move || {
                            let mut kept = Vec::with_capacity(part.len());
                            for t in part {
                                cull_triangle_raw(&mut kept, pl, t);
                            }
                            kept
                        })
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                    .collect()
            });
            let threads = parts.len();
            for kept in parts {
                in_.extend(kept);
            }
            threads
        }
    };

    finish(start, tris.len(), None, threads)
}
