/// dsp3d错误处理
///
/// 几何内核本身没有错误返回，退化情况通过返回值表示；这里只覆盖配置与后端选择。
use thiserror::Error;

use crate::config::ConfigError;
use dsp3d_simd::{SimdBackend, SimdError};

/// dsp3d错误类型
#[derive(Error, Debug)]
pub enum Dsp3dError {
    /// 强制指定的后端在当前CPU上不可用
    #[error("后端 {backend} 不受支持，可用后端: {available:?}")]
    UnsupportedBackend {
        backend: SimdBackend,
        available: Vec<SimdBackend>,
    },

    /// 无法识别的后端名称
    #[error("未知的后端名称: {0:?}")]
    UnknownBackend(String),

    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// dsp3d结果类型
pub type Dsp3dResult<T> = Result<T, Dsp3dError>;

impl From<SimdError> for Dsp3dError {
    fn from(e: SimdError) -> Self {
        match e {
            SimdError::Unsupported(backend) => Dsp3dError::UnsupportedBackend {
                backend,
                available: SimdBackend::supported(),
            },
            SimdError::UnknownBackend(name) => Dsp3dError::UnknownBackend(name),
        }
    }
}

/// 错误上下文扩展
pub trait ErrorContext<T> {
    /// 添加上下文信息
    fn context(self, context: &str) -> Result<T, ConfigError>;

    /// 添加带格式化的上下文信息
    fn with_context<F>(self, f: F) -> Result<T, ConfigError>
    where
        F: FnOnce() -> String;
}

impl<T, E: std::error::Error + 'static> ErrorContext<T> for Result<T, E> {
    fn context(self, context: &str) -> Result<T, ConfigError> {
        self.map_err(|e| ConfigError::ParseError(format!("{}: {}", context, e)))
    }

    fn with_context<F>(self, f: F) -> Result<T, ConfigError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| ConfigError::ParseError(format!("{}: {}", f(), e)))
    }
}
