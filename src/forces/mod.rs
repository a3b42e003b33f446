//! 力模块
//!
//! ## 架构设计
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       Force trait                         │
//! ├──────────────────────────────────────────────────────────┤
//! │  evaluate() = gate.multiplier(p) × compute(p, dt)         │
//! │                                                            │
//! │  ForceGate（所有力共用的适用性判定）                        │
//! │    enabled → 年龄窗口 → 外形过滤 → 区域包含 → 边缘衰减      │
//! │                                                            │
//! │  Gravity / Wind / Attractor / Vortex / Turbulence          │
//! │  Composite / Timed / Conditional（组合器）                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! 有内部状态的力（风的阵风计时、涡旋相位、吸引子路径、湍流时间）
//! 在 [`Force::advance`] 中推进，系统每个物理子步对每个启用的力调用一次，
//! 然后才逐粒子计算。单独使用时需按帧顺序调用 `advance`。

use std::collections::HashSet;

use crate::impl_default;
use crate::math::{Bounds, Vector2D};
use crate::particle::{Particle, ParticleShape};

pub mod attractor;
pub mod composite;
pub mod gravity;
pub mod noise;
pub mod turbulence;
pub mod vortex;
pub mod wind;

pub use attractor::{AttractorForce, AttractorPath, Falloff, FalloffCurve};
pub use composite::{CombineMode, CompositeForce, ConditionalForce, ParticlePredicate, TimedForce};
pub use gravity::GravityForce;
pub use noise::PerlinNoise;
pub use turbulence::TurbulenceForce;
pub use vortex::{SpeedProfile, VortexFalloff, VortexForce, VortexTurbulence};
pub use wind::{GustSettings, GustState, WindForce};

/// 力的计算结果
///
/// `kill` 表示粒子应被移除（例如进入吸引子的吞噬半径）；
/// 由调用方（系统）执行移除，力本身不修改粒子。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForceOutput {
    pub force: Vector2D,
    pub kill: bool,
}

impl ForceOutput {
    pub const ZERO: Self = Self {
        force: Vector2D::ZERO,
        kill: false,
    };

    pub fn new(force: Vector2D) -> Self {
        Self { force, kill: false }
    }

    /// 吞噬信号
    pub fn killed() -> Self {
        Self {
            force: Vector2D::ZERO,
            kill: true,
        }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            force: self.force * factor,
            kill: self.kill,
        }
    }
}

/// 适用性判定
///
/// 每种力都内嵌一个，判定逻辑完全一致。
#[derive(Debug, Clone, PartialEq)]
pub struct ForceGate {
    pub enabled: bool,
    /// 作用区域（None = 全局）
    pub bounds: Option<Bounds>,
    /// 边缘衰减距离：区域内到最近边的距离小于该值时线性衰减到 0
    pub edge_fade: Option<f64>,
    /// 年龄下限（秒，含）
    pub min_age: Option<f64>,
    /// 年龄上限（秒，不含）
    pub max_age: Option<f64>,
    /// 外形过滤（None = 全部外形）
    pub shapes: Option<HashSet<ParticleShape>>,
}

impl_default!(ForceGate {
    enabled: true,
    bounds: None,
    edge_fade: None,
    min_age: None,
    max_age: None,
    shapes: None,
});

impl ForceGate {
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_edge_fade(mut self, distance: f64) -> Self {
        self.edge_fade = Some(distance);
        self
    }

    pub fn with_age_window(mut self, min_age: Option<f64>, max_age: Option<f64>) -> Self {
        self.min_age = min_age;
        self.max_age = max_age;
        self
    }

    pub fn with_shapes(mut self, shapes: impl IntoIterator<Item = ParticleShape>) -> Self {
        self.shapes = Some(shapes.into_iter().collect());
        self
    }

    /// 计算作用系数 `[0, 1]`；0 表示不作用
    pub fn multiplier(&self, particle: &Particle) -> f64 {
        if !self.enabled {
            return 0.0;
        }
        if let Some(min_age) = self.min_age {
            if particle.age < min_age {
                return 0.0;
            }
        }
        if let Some(max_age) = self.max_age {
            if particle.age >= max_age {
                return 0.0;
            }
        }
        if let Some(shapes) = &self.shapes {
            if !shapes.contains(&particle.shape) {
                return 0.0;
            }
        }
        match self.bounds {
            None => 1.0,
            Some(bounds) => {
                if !bounds.contains(particle.position) {
                    return 0.0;
                }
                match self.edge_fade {
                    Some(fade) if fade > 0.0 => {
                        (bounds.distance_to_edge(particle.position) / fade).clamp(0.0, 1.0)
                    }
                    _ => 1.0,
                }
            }
        }
    }
}

/// 力（策略接口）
pub trait Force: Send + Sync {
    fn gate(&self) -> &ForceGate;

    fn gate_mut(&mut self) -> &mut ForceGate;

    /// 未经适用性判定的原始计算
    fn compute(&mut self, particle: &Particle, dt: f64) -> ForceOutput;

    /// 推进内部状态（每个物理子步调用一次）
    fn advance(&mut self, _dt: f64) {}

    /// 诊断名称
    fn name(&self) -> &'static str;

    fn is_enabled(&self) -> bool {
        self.gate().enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.gate_mut().enabled = enabled;
    }

    /// 经过适用性判定的计算结果
    fn evaluate(&mut self, particle: &Particle, dt: f64) -> ForceOutput {
        let multiplier = self.gate().multiplier(particle);
        if multiplier <= 0.0 {
            return ForceOutput::ZERO;
        }
        self.compute(particle, dt).scaled(multiplier)
    }

    /// 只取力向量
    fn calculate_force(&mut self, particle: &Particle, dt: f64) -> Vector2D {
        self.evaluate(particle, dt).force
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleInit;

    fn particle_at(x: f64, y: f64) -> Particle {
        Particle::new(&ParticleInit {
            position: Vector2D::new(x, y),
            lifetime: 10.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_disabled_gate_is_zero() {
        let gate = ForceGate {
            enabled: false,
            ..Default::default()
        };
        assert_eq!(gate.multiplier(&particle_at(0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_bounds_and_edge_fade() {
        let gate = ForceGate::default()
            .with_bounds(Bounds::from_size(100.0, 100.0))
            .with_edge_fade(20.0);
        assert_eq!(gate.multiplier(&particle_at(50.0, 50.0)), 1.0);
        assert!((gate.multiplier(&particle_at(5.0, 50.0)) - 0.25).abs() < 1e-12);
        assert_eq!(gate.multiplier(&particle_at(150.0, 50.0)), 0.0);
    }

    #[test]
    fn test_age_window() {
        let gate = ForceGate::default().with_age_window(Some(1.0), Some(2.0));
        let mut p = particle_at(0.0, 0.0);
        assert_eq!(gate.multiplier(&p), 0.0);
        p.age = 1.0;
        assert_eq!(gate.multiplier(&p), 1.0);
        p.age = 2.0;
        assert_eq!(gate.multiplier(&p), 0.0);
    }

    #[test]
    fn test_shape_filter() {
        let gate = ForceGate::default().with_shapes([ParticleShape::Star]);
        let mut p = particle_at(0.0, 0.0);
        assert_eq!(gate.multiplier(&p), 0.0);
        p.shape = ParticleShape::Star;
        assert_eq!(gate.multiplier(&p), 1.0);
    }
}
