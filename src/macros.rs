//! 核心宏定义

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// struct Limits {
///     threads: usize,
///     name: String,
/// }
///
/// dsp3d::impl_default!(Limits {
///     threads: 0,
///     name: String::new(),
/// });
///
/// assert_eq!(Limits::default().threads, 0);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}
