//! 粒子系统（编排器）模块
//!
//! - `particle_system` - 固定步长主循环、发射、清扫与生命周期
//! - `handles` - 注册发射器/力/行为时返回的句柄
//! - `state` - 生命周期状态
//! - `stats` - 帧统计

pub mod handles;
pub mod particle_system;
pub mod state;
pub mod stats;

pub use handles::{BehaviorHandle, EmitterHandle, ForceHandle};
pub use particle_system::{CompletionCallback, ParticleSystem};
pub use state::SystemState;
pub use stats::FrameStatistics;
