use std::f64::consts::TAU;

use super::{directional_velocity, Emitter, EmitterCore};
use crate::config::{CircleMode, ParticleConfiguration};
use crate::math::random::{self, SimRng};
use crate::math::Vector2D;

/// 圆形发射器
#[derive(Debug, Clone)]
pub struct CircleEmitter {
    core: EmitterCore,
    pub radius: f64,
    pub mode: CircleMode,
    /// 初速度沿半径向外（否则使用配置方向）
    pub radial_velocity: bool,
}

impl CircleEmitter {
    pub fn new(position: Vector2D, config: ParticleConfiguration, radius: f64, mode: CircleMode) -> Self {
        Self {
            core: EmitterCore::new(config, position),
            radius: radius.max(0.0),
            mode,
            radial_velocity: false,
        }
    }

    pub fn with_radial_velocity(mut self, radial: bool) -> Self {
        self.radial_velocity = radial;
        self
    }

    /// 到圆心的距离
    fn sample_radius(&self, rng: &mut SimRng) -> f64 {
        let u = random::unit(rng);
        match self.mode {
            CircleMode::Filled => u.sqrt() * self.radius,
            CircleMode::Edge => self.radius,
            CircleMode::Ring { inner_radius } => {
                let inner = inner_radius.clamp(0.0, self.radius);
                (u * (self.radius * self.radius - inner * inner) + inner * inner).sqrt()
            }
            CircleMode::CenterBiased => u * self.radius,
            CircleMode::Power { exponent } => {
                if exponent > 0.0 {
                    u.powf(1.0 / exponent) * self.radius
                } else {
                    u.sqrt() * self.radius
                }
            }
        }
    }
}

impl Emitter for CircleEmitter {
    fn core(&self) -> &EmitterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EmitterCore {
        &mut self.core
    }

    fn spawn_position(&mut self, rng: &mut SimRng) -> Vector2D {
        let angle = random::uniform(rng, 0.0, TAU);
        let distance = self.sample_radius(rng);
        self.core.position + Vector2D::from_polar(angle, distance)
    }

    fn initial_velocity(&mut self, rng: &mut SimRng, spawn: Vector2D) -> Vector2D {
        let outward = spawn - self.core.position;
        if self.radial_velocity && outward.length_squared() > 1e-12 {
            let speed = self.core.config.speed.sample(rng);
            outward.normalized() * speed
        } else {
            directional_velocity(&self.core.config, rng)
        }
    }

    fn name(&self) -> &'static str {
        "circle"
    }
}
