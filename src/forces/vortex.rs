use std::f64::consts::PI;

use super::{Force, ForceGate, ForceOutput};
use crate::math::Vector2D;
use crate::particle::Particle;

/// 涡旋强度随距离的衰减
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum VortexFalloff {
    None,
    /// `1 - t`
    #[default]
    Linear,
    /// `(1 - t)²`
    Quadratic,
    /// `min(1, 0.1 / t)`
    Inverse,
    /// 核心内线性增长，核心外按 `core / t` 衰减（`core` 为归一化半径）
    Rankine { core: f64 },
}

impl VortexFalloff {
    /// `t` 为归一化距离 `[0, 1]`
    pub fn multiplier(self, t: f64) -> f64 {
        match self {
            VortexFalloff::None => 1.0,
            VortexFalloff::Linear => 1.0 - t,
            VortexFalloff::Quadratic => (1.0 - t).powi(2),
            VortexFalloff::Inverse => {
                if t <= 0.0 {
                    1.0
                } else {
                    (0.1 / t).min(1.0)
                }
            }
            VortexFalloff::Rankine { core } => {
                let core = core.clamp(f64::EPSILON, 1.0);
                if t <= core {
                    t / core
                } else {
                    core / t
                }
            }
        }
    }
}

/// 切向速度剖面
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SpeedProfile {
    #[default]
    Constant,
    /// 外圈更快：`t`
    IncreasingOutward,
    /// 内圈更快：`1 - t`
    DecreasingOutward,
    /// 中环最快：`sin(t·π)`
    SinePeak,
}

impl SpeedProfile {
    pub fn multiplier(self, t: f64) -> f64 {
        match self {
            SpeedProfile::Constant => 1.0,
            SpeedProfile::IncreasingOutward => t,
            SpeedProfile::DecreasingOutward => 1.0 - t,
            SpeedProfile::SinePeak => (t * PI).sin(),
        }
    }
}

/// 涡旋的正弦扰动
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VortexTurbulence {
    pub amplitude: f64,
    /// 空间频率
    pub frequency: f64,
}

/// 涡旋力
///
/// 环带 `[inner_radius, radius]` 内施加切向力，可叠加径向拉力、竖直力与正弦扰动。
#[derive(Debug, Clone)]
pub struct VortexForce {
    pub gate: ForceGate,
    pub center: Vector2D,
    /// 内半径，以内不受力
    pub inner_radius: f64,
    pub radius: f64,
    pub strength: f64,
    pub clockwise: bool,
    pub falloff: VortexFalloff,
    pub speed_profile: SpeedProfile,
    /// 向心拉力强度（负值向外推）
    pub radial_strength: f64,
    /// 竖直分量，输出为 `(0, -vertical_strength × falloff)`
    pub vertical_strength: f64,
    pub turbulence: Option<VortexTurbulence>,
    /// 相位角速度（弧度/秒），用于扰动图案随时间旋转
    pub angular_velocity: f64,
    phase: f64,
}

impl VortexForce {
    pub fn new(center: Vector2D, radius: f64, strength: f64) -> Self {
        Self {
            gate: ForceGate::default(),
            center,
            inner_radius: 0.0,
            radius,
            strength,
            clockwise: false,
            falloff: VortexFalloff::default(),
            speed_profile: SpeedProfile::default(),
            radial_strength: 0.0,
            vertical_strength: 0.0,
            turbulence: None,
            angular_velocity: 0.0,
            phase: 0.0,
        }
    }

    pub fn with_inner_radius(mut self, inner_radius: f64) -> Self {
        self.inner_radius = inner_radius.max(0.0);
        self
    }

    pub fn with_clockwise(mut self, clockwise: bool) -> Self {
        self.clockwise = clockwise;
        self
    }

    pub fn with_falloff(mut self, falloff: VortexFalloff) -> Self {
        self.falloff = falloff;
        self
    }

    pub fn with_speed_profile(mut self, profile: SpeedProfile) -> Self {
        self.speed_profile = profile;
        self
    }

    pub fn with_radial_strength(mut self, strength: f64) -> Self {
        self.radial_strength = strength;
        self
    }

    pub fn with_vertical_strength(mut self, strength: f64) -> Self {
        self.vertical_strength = strength;
        self
    }

    pub fn with_turbulence(mut self, amplitude: f64, frequency: f64) -> Self {
        self.turbulence = Some(VortexTurbulence { amplitude, frequency });
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }
}

impl Force for VortexForce {
    fn gate(&self) -> &ForceGate {
        &self.gate
    }

    fn gate_mut(&mut self) -> &mut ForceGate {
        &mut self.gate
    }

    fn advance(&mut self, dt: f64) {
        self.phase = (self.phase + self.angular_velocity * dt).rem_euclid(std::f64::consts::TAU);
    }

    fn compute(&mut self, particle: &Particle, _dt: f64) -> ForceOutput {
        let offset = particle.position - self.center;
        let distance = offset.length();
        let span = self.radius - self.inner_radius;
        if span <= 0.0 || distance > self.radius || distance < self.inner_radius || distance < 1e-9 {
            return ForceOutput::ZERO;
        }

        // 在 [inner_radius, radius] 环带上归一化
        let t = (distance - self.inner_radius) / span;
        let falloff = self.falloff.multiplier(t);
        let radial = offset / distance;

        let tangent = if self.clockwise {
            -radial.perpendicular()
        } else {
            radial.perpendicular()
        };
        let mut force = tangent * (self.strength * falloff * self.speed_profile.multiplier(t));

        if self.radial_strength != 0.0 {
            force -= radial * (self.radial_strength * falloff);
        }
        if self.vertical_strength != 0.0 {
            force += Vector2D::new(0.0, -self.vertical_strength * falloff);
        }
        if let Some(turbulence) = self.turbulence {
            let angle = offset.angle() + self.phase;
            let wobble = (angle * turbulence.frequency + distance * turbulence.frequency).sin();
            force += radial * (wobble * turbulence.amplitude * falloff);
        }
        ForceOutput::new(force)
    }

    fn name(&self) -> &'static str {
        "vortex"
    }
}
