/// 统一配置系统
///
/// 提供粒子效果配置、系统设置与日志配置，支持TOML/JSON序列化和验证。
/// 核心本身不读取环境变量或文件；文件加载是调用方按需使用的辅助功能。
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod particle;
pub mod range;
pub mod shape;

pub use particle::{ParticleConfiguration, PhysicsSettings, MIN_MASS};
pub use range::ValueRange;
pub use shape::{CircleMode, EmissionShape, LineDistribution, PolygonMode};

use crate::impl_default;
use crate::math::Bounds;
use crate::render::BlendMode;

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

/// 可序列化配置的文件读写
pub trait ConfigFile: Serialize + DeserializeOwned + Sized {
    /// 从TOML字符串解析配置
    fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从TOML文件加载配置
    fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 从JSON字符串解析配置
    fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }
}

/// 粒子系统（编排器）设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSettings {
    /// 固定物理步长（秒）
    pub fixed_time_step: f64,
    /// 每帧最多执行的物理子步数，超出部分的累积时间被丢弃
    pub max_substeps: u32,
    /// 系统范围的存活粒子上限，同时作为对象池容量
    pub max_particles: usize,
    /// 随机种子（None = 使用系统熵）
    pub seed: Option<u64>,
    pub blend_mode: BlendMode,
    /// 速度阻尼 `[0, 1)`
    pub drag: f64,
    pub bounds: Option<Bounds>,
    pub bounds_collision: bool,
    pub bounciness: f64,
}

impl_default!(SystemSettings {
    fixed_time_step: 1.0 / 60.0,
    max_substeps: 4,
    max_particles: 1000,
    seed: None,
    blend_mode: BlendMode::Normal,
    drag: 0.0,
    bounds: None,
    bounds_collision: false,
    bounciness: 0.5,
});

impl ConfigFile for SystemSettings {}

impl SystemSettings {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.fixed_time_step.is_finite() && self.fixed_time_step > 0.0) {
            return Err(ConfigError::ValidationError(
                "fixed_time_step must be positive".to_string(),
            ));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::ValidationError(
                "max_substeps must be at least 1".to_string(),
            ));
        }
        if self.max_particles == 0 {
            return Err(ConfigError::ValidationError(
                "max_particles must be greater than zero".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.drag) {
            return Err(ConfigError::ValidationError("drag must be in [0, 1)".to_string()));
        }
        if !(0.0..=1.0).contains(&self.bounciness) {
            return Err(ConfigError::ValidationError(
                "bounciness must be in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    /// 由粒子配置派生系统设置
    pub fn from_configuration(config: &ParticleConfiguration) -> Self {
        Self {
            max_particles: config.max_particles,
            blend_mode: config.blend_mode,
            drag: config.physics.drag,
            bounds: config.physics.bounds,
            bounds_collision: config.physics.bounds_collision,
            bounciness: config.physics.bounciness,
            ..Default::default()
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别（`RUST_LOG` 优先）
    pub level: LogLevel,
    /// 是否输出 target
    pub with_target: bool,
    /// 是否启用 ANSI 颜色
    pub ansi: bool,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    with_target: true,
    ansi: true,
});

impl ConfigFile for LoggingConfig {}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// 初始化日志系统
///
/// 配置tracing日志框架；`RUST_LOG` 环境变量存在时优先生效，
/// 否则使用配置中的级别。重复调用是无害的。
pub fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.level.as_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_ansi(config.ansi)
        .try_init();
    tracing::debug!(target: "particles", "Logging initialized at {:?}", config.level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_valid() {
        assert!(SystemSettings::default().validate().is_ok());
    }

    #[test]
    fn test_settings_reject_zero_step() {
        let settings = SystemSettings {
            fixed_time_step: 0.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_json_serialization() {
        let settings = SystemSettings {
            seed: Some(9),
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let parsed = SystemSettings::from_json_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = SystemSettings::from_toml_str("fixed_time_step = [").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(&LoggingConfig::default());
        init_logging(&LoggingConfig::default());
    }
}
