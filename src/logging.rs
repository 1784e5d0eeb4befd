//! 日志初始化
//!
//! 几何内核本身不输出日志；只有后端选择、配置加载与批处理会记录。

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// 由配置构造过滤器，`RUST_LOG` 存在时优先
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
}

/// 初始化tracing日志
///
/// 重复调用无副作用；返回本次是否安装了订阅者。
pub fn init_logging(config: &LoggingConfig) -> bool {
    if !config.log_to_console {
        return false;
    }

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(config.with_target)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(target: "dsp3d::config", "Logging initialized at level {}", config.level);
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        let config = LoggingConfig::default();
        let _ = init_logging(&config);
        assert!(!init_logging(&config));
    }

    #[test]
    fn test_console_disabled() {
        let config = LoggingConfig {
            log_to_console: false,
            ..LoggingConfig::default()
        };
        assert!(!init_logging(&config));
    }
}
