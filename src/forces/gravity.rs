use super::{Force, ForceGate, ForceOutput};
use crate::math::Vector2D;
use crate::particle::Particle;

/// 重力
///
/// 恒定方向 × 强度。默认方向 `(0, 1)`（屏幕坐标 y 向下），
/// 默认按质量缩放，使加速度与质量无关。
#[derive(Debug, Clone)]
pub struct GravityForce {
    pub gate: ForceGate,
    pub strength: f64,
    pub direction: Vector2D,
    /// 力乘以质量（加速度恒定）
    pub scale_by_mass: bool,
    /// 年龄衰减指数：力乘以 `normalized_age ^ exponent`
    pub age_exponent: Option<f64>,
    /// 参考尺寸：力乘以 `平均边长 / reference_size`
    pub reference_size: Option<f64>,
}

impl GravityForce {
    pub fn new(strength: f64) -> Self {
        Self {
            gate: ForceGate::default(),
            strength,
            direction: Vector2D::Y,
            scale_by_mass: true,
            age_exponent: None,
            reference_size: None,
        }
    }

    pub fn with_direction(mut self, direction: Vector2D) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_mass_scaling(mut self, enabled: bool) -> Self {
        self.scale_by_mass = enabled;
        self
    }

    pub fn with_age_exponent(mut self, exponent: f64) -> Self {
        self.age_exponent = Some(exponent);
        self
    }

    pub fn with_reference_size(mut self, size: f64) -> Self {
        self.reference_size = Some(size);
        self
    }
}

impl Default for GravityForce {
    fn default() -> Self {
        Self::new(98.0)
    }
}

impl Force for GravityForce {
    fn gate(&self) -> &ForceGate {
        &self.gate
    }

    fn gate_mut(&mut self) -> &mut ForceGate {
        &mut self.gate
    }

    fn compute(&mut self, particle: &Particle, _dt: f64) -> ForceOutput {
        let mut force = self.direction.normalized() * self.strength;
        if self.scale_by_mass {
            force *= particle.mass.max(0.0);
        }
        if let Some(exponent) = self.age_exponent {
            force *= particle.normalized_age().powf(exponent);
        }
        if let Some(reference) = self.reference_size {
            if reference > 0.0 {
                force *= particle.size.average() / reference;
            }
        }
        ForceOutput::new(force)
    }

    fn name(&self) -> &'static str {
        "gravity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{ParticleInit, Size};

    #[test]
    fn test_gravity_sample() {
        let mut gravity = GravityForce::new(100.0);
        let p = Particle::new(&ParticleInit {
            mass: 1.0,
            velocity: Vector2D::ZERO,
            ..Default::default()
        });
        let f = gravity.calculate_force(&p, 1.0 / 60.0);
        assert!((f.x - 0.0).abs() < 1e-12);
        assert!((f.y - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_disabled_gravity_is_zero() {
        let mut gravity = GravityForce::new(100.0);
        gravity.set_enabled(false);
        let p = Particle::default();
        assert_eq!(gravity.calculate_force(&p, 0.1), Vector2D::ZERO);
    }

    #[test]
    fn test_mass_scaling_keeps_acceleration_constant() {
        let mut gravity = GravityForce::new(10.0);
        let mut heavy = Particle::new(&ParticleInit { mass: 4.0, ..Default::default() });
        let f = gravity.calculate_force(&heavy, 0.1);
        heavy.apply_force(f);
        assert!((heavy.acceleration.y - 10.0).abs() < 1e-12);

        let mut unscaled = GravityForce::new(10.0).with_mass_scaling(false);
        let f = unscaled.calculate_force(&heavy, 0.1);
        assert!((f.y - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_age_and_size_attenuation() {
        let mut gravity = GravityForce::new(10.0).with_age_exponent(2.0).with_reference_size(10.0);
        let mut p = Particle::new(&ParticleInit {
            lifetime: 2.0,
            size: Size::square(20.0),
            ..Default::default()
        });
        p.age = 1.0;
        // 0.5² × (20 / 10) = 0.5
        let f = gravity.calculate_force(&p, 0.1);
        assert!((f.y - 5.0).abs() < 1e-12);
    }
}
