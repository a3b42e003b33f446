//! 粒子数据模块
//!
//! - `particle` - 粒子实例状态、出生快照、轨迹与扩展字段
//! - `color` - RGBA/HSB 颜色
//! - `shape` - 外形标签与尺寸

pub mod color;
#[allow(clippy::module_inception)]
pub mod particle;
pub mod shape;

pub use color::{Color, Hsb};
pub use particle::{BirthState, Particle, ParticleInit, ALIVE_OPACITY_EPSILON};
pub use shape::{ParticleShape, Size};
