/// 统一配置系统
///
/// 提供TOML/JSON配置文件与环境变量覆盖。平面分类容差不在配置范围内。
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::error::ErrorContext;
use crate::impl_default;
use dsp3d_simd::SimdBackend;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 批处理线程数上限
pub const MAX_BATCH_THREADS: usize = 256;

/// 主配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dsp3dConfig {
    /// SIMD后端选择
    #[serde(default)]
    pub simd: SimdConfig,

    /// 批处理
    #[serde(default)]
    pub batch: BatchConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl_default!(Dsp3dConfig {
    simd: SimdConfig::default(),
    batch: BatchConfig::default(),
    logging: LoggingConfig::default(),
});

/// SIMD后端选择
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimdConfig {
    /// 关闭时只使用标量实现
    pub enabled: bool,

    /// 强制使用的后端名称（如 `"sse2"`、`"avx_fma3"`）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_backend: Option<String>,
}

impl_default!(SimdConfig {
    enabled: true,
    force_backend: None,
});

impl SimdConfig {
    /// 解析强制后端名称
    pub fn forced_backend(&self) -> ConfigResult<Option<SimdBackend>> {
        self.force_backend
            .as_deref()
            .map(|name| {
                name.parse::<SimdBackend>()
                    .map_err(|e| ConfigError::ValidationError(e.to_string()))
            })
            .transpose()
    }
}

/// 批处理配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// 是否启用多线程
    pub use_threading: bool,
    /// 线程数（0表示自动检测）
    pub threads: usize,
    /// 元素数超过该值时才拆分到多个线程
    pub parallel_threshold: usize,
}

impl_default!(BatchConfig {
    use_threading: true,
    threads: 0,
    parallel_threshold: 4096,
});

impl BatchConfig {
    /// 获取实际使用的线程数
    pub fn num_threads(&self) -> usize {
        if !self.use_threading {
            1
        } else if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }

    /// 单线程配置
    pub fn sequential() -> Self {
        Self {
            use_threading: false,
            ..Self::default()
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,

    /// 是否输出到控制台
    pub log_to_console: bool,

    /// 是否输出target
    pub with_target: bool,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    log_to_console: true,
    with_target: true,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ConfigError::ParseError(format!("unknown log level: {other}"))),
        }
    }
}

impl Dsp3dConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).context("invalid TOML")
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).context("invalid JSON")
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).context("serializing TOML")?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self).context("serializing JSON")?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// 按给定的查找函数覆盖配置，无法解析的值被忽略
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("DSP3D_SIMD_ENABLED") {
            self.simd.enabled = val.parse().unwrap_or(self.simd.enabled);
        }
        if let Some(val) = lookup("DSP3D_FORCE_BACKEND") {
            let val = val.trim();
            self.simd.force_backend = if val.is_empty() {
                None
            } else {
                Some(val.to_string())
            };
        }
        if let Some(val) = lookup("DSP3D_BATCH_THREADS") {
            if let Ok(threads) = val.parse() {
                self.batch.threads = threads;
            }
        }
        if let Some(val) = lookup("DSP3D_LOG_LEVEL") {
            match val.parse() {
                Ok(level) => self.logging.level = level,
                Err(e) => tracing::warn!(target: "dsp3d::config", "ignoring DSP3D_LOG_LEVEL: {}", e),
            }
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.simd.forced_backend()?;
        if self.batch.parallel_threshold == 0 {
            return Err(ConfigError::ValidationError(
                "batch.parallel_threshold must be greater than 0".to_string(),
            ));
        }
        if self.batch.threads > MAX_BATCH_THREADS {
            return Err(ConfigError::ValidationError(format!(
                "batch.threads must be at most {MAX_BATCH_THREADS}, got {}",
                self.batch.threads
            )));
        }
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./dsp3d.toml
    /// 2. ./dsp3d.json
    /// 3. <用户配置目录>/dsp3d/config.toml
    /// 4. 使用默认配置
    pub fn load_or_default() -> Self {
        let user = dirs::config_dir().map(|dir| dir.join("dsp3d").join("config.toml"));
        Self::load_from_candidates(Path::new("."), user)
    }

    /// 在 `dir` 中查找 `dsp3d.toml`、`dsp3d.json`，再尝试 `user`
    ///
    /// 无法解析或未通过验证的文件会被跳过并记录警告。
    pub fn load_from_candidates(dir: &Path, user: Option<PathBuf>) -> Self {
        // (路径, 是否为JSON)
        let mut candidates = vec![(dir.join("dsp3d.toml"), false), (dir.join("dsp3d.json"), true)];
        if let Some(user) = user {
            candidates.push((user, false));
        }

        for (path, json) in candidates {
            let loaded = if json {
                Self::from_json_file(&path)
            } else {
                Self::from_toml_file(&path)
            };
            match loaded.and_then(|config| config.validate().map(|()| config)) {
                Ok(config) => {
                    tracing::info!(target: "dsp3d::config", "Loaded config from {:?}", path);
                    return config;
                }
                Err(ConfigError::FileError(_)) => {}
                Err(e) => tracing::warn!(target: "dsp3d::config", "Skipping {:?}: {}", path, e),
            }
        }

        tracing::debug!(target: "dsp3d::config", "Using default configuration");
        Self::default()
    }
}
