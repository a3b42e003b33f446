use super::{Emitter, EmitterCore};
use crate::config::ParticleConfiguration;
use crate::math::random::{self, SimRng};
use crate::math::Vector2D;

/// 点发射器（可选圆形抖动）
#[derive(Debug, Clone)]
pub struct PointEmitter {
    core: EmitterCore,
    /// 抖动半径（0 = 精确在发射点）
    pub jitter: f64,
}

impl PointEmitter {
    pub fn new(position: Vector2D, config: ParticleConfiguration) -> Self {
        Self {
            core: EmitterCore::new(config, position),
            jitter: 0.0,
        }
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.max(0.0);
        self
    }
}

impl Emitter for PointEmitter {
    fn core(&self) -> &EmitterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EmitterCore {
        &mut self.core
    }

    fn spawn_position(&mut self, rng: &mut SimRng) -> Vector2D {
        if self.jitter > 0.0 {
            self.core.position + random::in_unit_disc(rng) * self.jitter
        } else {
            self.core.position
        }
    }

    fn name(&self) -> &'static str {
        "point"
    }
}
