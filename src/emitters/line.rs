use super::{Emitter, EmitterCore};
use crate::config::{LineDistribution, ParticleConfiguration};
use crate::math::random::{self, SimRng};
use crate::math::Vector2D;

/// 线段发射器，线段以发射器位置为中点
#[derive(Debug, Clone)]
pub struct LineEmitter {
    core: EmitterCore,
    pub length: f64,
    /// 线段方向（弧度）
    pub angle: f64,
    pub distribution: LineDistribution,
    sequence: u64,
}

impl LineEmitter {
    pub fn new(
        position: Vector2D,
        config: ParticleConfiguration,
        length: f64,
        angle: f64,
        distribution: LineDistribution,
    ) -> Self {
        Self {
            core: EmitterCore::new(config, position),
            length: length.max(0.0),
            angle,
            distribution,
            sequence: 0,
        }
    }

    /// 线段两个端点
    pub fn endpoints(&self) -> (Vector2D, Vector2D) {
        let half = Vector2D::from_polar(self.angle, self.length * 0.5);
        (self.core.position - half, self.core.position + half)
    }

    /// 把 `[0, 1)` 均匀抽样重映射为线段参数
    fn parameter(&mut self, rng: &mut SimRng) -> f64 {
        match self.distribution {
            LineDistribution::Uniform => random::unit(rng),
            LineDistribution::CenterBiased => (random::unit(rng) + random::unit(rng)) * 0.5,
            LineDistribution::EndsBiased => {
                let v = random::signed_unit(rng);
                0.5 + 0.5 * v.signum() * v.abs().sqrt()
            }
            LineDistribution::StartBiased => {
                let u = random::unit(rng);
                u * u
            }
            LineDistribution::EndBiased => {
                let u = random::unit(rng);
                1.0 - (1.0 - u) * (1.0 - u)
            }
            LineDistribution::Sequential { segments } => {
                let segments = u64::from(segments.max(1));
                let index = self.sequence % segments;
                self.sequence = self.sequence.wrapping_add(1);
                (index as f64 + 0.5) / segments as f64
            }
        }
    }
}

impl Emitter for LineEmitter {
    fn core(&self) -> &EmitterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EmitterCore {
        &mut self.core
    }

    fn spawn_position(&mut self, rng: &mut SimRng) -> Vector2D {
        let t = self.parameter(rng);
        let (start, end) = self.endpoints();
        start.lerp(end, t)
    }

    fn name(&self) -> &'static str {
        "line"
    }
}
