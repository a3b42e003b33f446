//! 统一错误处理模块
//!
//! 提供粒子引擎范围内的统一错误类型定义
//!
//! ## 错误类型分层
//!
//! - **配置错误** (`config::ConfigError`): 配置文件读取、解析和验证失败
//! - **系统错误** (`SystemError`): 通过句柄访问发射器/力/行为时的失败
//!
//! 模拟热路径（发射、力、行为、积分、对象池）不返回错误：
//! 对象池耗尽返回 `None`，重复归还是空操作，零长度归一化返回零向量。
//! `ParticleError` 聚合以上所有错误。

use crate::config::ConfigError;
use crate::system::{BehaviorHandle, EmitterHandle, ForceHandle, SystemState};
use thiserror::Error;

/// 粒子引擎核心错误类型
#[derive(Error, Debug)]
pub enum ParticleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("System error: {0}")]
    System(#[from] SystemError),
}

/// 粒子系统（编排器）错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SystemError {
    #[error("Emitter not found: {0:?}")]
    EmitterNotFound(EmitterHandle),

    #[error("Force not found: {0:?}")]
    ForceNotFound(ForceHandle),

    #[error("Behavior not found: {0:?}")]
    BehaviorNotFound(BehaviorHandle),

    #[error("Invalid state transition: {operation} while {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SystemState,
    },
}

/// 引擎结果类型别名
pub type ParticleResult<T> = Result<T, ParticleError>;
pub type SystemResult<T> = Result<T, SystemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let config_err = ConfigError::ValidationError("emission_rate".to_string());
        let err: ParticleError = config_err.into();
        assert!(matches!(err, ParticleError::Config(_)));

        let system_err = SystemError::EmitterNotFound(EmitterHandle::from_raw(7));
        let err: ParticleError = system_err.into();
        assert!(matches!(err, ParticleError::System(_)));
    }

    #[test]
    fn test_error_display() {
        let err = SystemError::InvalidState {
            operation: "resume",
            state: SystemState::Stopped,
        };
        assert_eq!(err.to_string(), "Invalid state transition: resume while Stopped");
    }
}
