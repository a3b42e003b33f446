use std::f64::consts::PI;

use super::{Force, ForceGate, ForceOutput};
use crate::config::ValueRange;
use crate::math::random::{self, SimRng};
use crate::math::Vector2D;
use crate::particle::Particle;

/// 阵风参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GustSettings {
    /// 两次阵风之间的间隔（秒）
    pub interval: ValueRange,
    /// 单次阵风持续时间（秒）
    pub duration: f64,
    /// 阵风峰值倍数（≥ 1）
    pub strength: f64,
}

impl Default for GustSettings {
    fn default() -> Self {
        Self {
            interval: ValueRange::new(2.0, 5.0),
            duration: 1.0,
            strength: 2.0,
        }
    }
}

/// 阵风状态机
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GustState {
    /// 等待下一次阵风
    Idle { remaining: f64 },
    /// 阵风进行中
    Active { elapsed: f64, duration: f64 },
}

/// 风力
///
/// 基础向量叠加随机抖动与阵风包络；设置了阻力系数时按
/// `(风速 - 粒子速度) × 系数` 计算，粒子速度趋近风速后不再加速。
#[derive(Debug, Clone)]
pub struct WindForce {
    pub gate: ForceGate,
    pub strength: f64,
    pub direction: Vector2D,
    /// 方向抖动幅度（弧度）
    pub angle_variation: f64,
    /// 大小抖动比例
    pub magnitude_variation: f64,
    pub gusts: Option<GustSettings>,
    pub drag_coefficient: Option<f64>,
    gust_state: GustState,
    rng: SimRng,
}

impl WindForce {
    pub fn new(direction: Vector2D, strength: f64) -> Self {
        Self {
            gate: ForceGate::default(),
            strength,
            direction,
            angle_variation: 0.0,
            magnitude_variation: 0.0,
            gusts: None,
            drag_coefficient: None,
            gust_state: GustState::Idle { remaining: 0.0 },
            rng: random::from_entropy(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = random::seeded(seed);
        self.reset_gust();
        self
    }

    pub fn with_variation(mut self, angle: f64, magnitude: f64) -> Self {
        self.angle_variation = angle.abs();
        self.magnitude_variation = magnitude.abs();
        self
    }

    pub fn with_gusts(mut self, gusts: GustSettings) -> Self {
        self.gusts = Some(gusts);
        self.reset_gust();
        self
    }

    pub fn with_drag(mut self, coefficient: f64) -> Self {
        self.drag_coefficient = Some(coefficient);
        self
    }

    pub fn gust_state(&self) -> GustState {
        self.gust_state
    }

    /// 当前阵风倍数，范围 `[1, strength]`
    pub fn gust_multiplier(&self) -> f64 {
        match (self.gusts, self.gust_state) {
            (Some(gusts), GustState::Active { elapsed, duration }) if duration > 0.0 => {
                let progress = (elapsed / duration).clamp(0.0, 1.0);
                1.0 + (gusts.strength.max(1.0) - 1.0) * (progress * PI).sin()
            }
            _ => 1.0,
        }
    }

    /// 不含抖动的风速向量
    pub fn base_wind(&self) -> Vector2D {
        self.direction.normalized() * self.strength * self.gust_multiplier()
    }

    fn reset_gust(&mut self) {
        self.gust_state = match self.gusts {
            Some(gusts) => GustState::Idle {
                remaining: gusts.interval.sample(&mut self.rng),
            },
            None => GustState::Idle { remaining: 0.0 },
        };
    }
}

impl Force for WindForce {
    fn gate(&self) -> &ForceGate {
        &self.gate
    }

    fn gate_mut(&mut self) -> &mut ForceGate {
        &mut self.gate
    }

    fn advance(&mut self, dt: f64) {
        let Some(gusts) = self.gusts else {
            return;
        };
        self.gust_state = match self.gust_state {
            GustState::Idle { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    GustState::Active {
                        elapsed: 0.0,
                        duration: gusts.duration.max(0.0),
                    }
                } else {
                    GustState::Idle { remaining }
                }
            }
            GustState::Active { elapsed, duration } => {
                let elapsed = elapsed + dt;
                if elapsed >= duration {
                    GustState::Idle {
                        remaining: gusts.interval.sample(&mut self.rng),
                    }
                } else {
                    GustState::Active { elapsed, duration }
                }
            }
        };
    }

    fn compute(&mut self, particle: &Particle, _dt: f64) -> ForceOutput {
        let mut wind = self.base_wind();
        if self.angle_variation > 0.0 {
            wind = wind.rotated(random::signed_unit(&mut self.rng) * self.angle_variation);
        }
        if self.magnitude_variation > 0.0 {
            wind *= 1.0 + random::signed_unit(&mut self.rng) * self.magnitude_variation;
        }
        let force = match self.drag_coefficient {
            Some(coefficient) => (wind - particle.velocity) * coefficient,
            None => wind,
        };
        ForceOutput::new(force)
    }

    fn name(&self) -> &'static str {
        "wind"
    }
}
