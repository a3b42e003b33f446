//! 核心模块
//!
//! 包含引擎的基础设施：
//! - `error` - 错误类型定义
//! - `id` - 粒子标识分配
//! - `macros` - 样板代码宏

pub mod error;
pub mod id;
#[macro_use]
pub mod macros;

// 重新导出错误类型
pub use error::{ParticleError, ParticleResult, SystemError, SystemResult};
pub use id::ParticleId;
