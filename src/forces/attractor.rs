use std::fmt;
use std::sync::Arc;

use super::{Force, ForceGate, ForceOutput};
use crate::math::Vector2D;
use crate::particle::Particle;

/// 自定义衰减曲线：归一化距离 → 系数
#[derive(Clone)]
pub struct FalloffCurve(pub Arc<dyn Fn(f64) -> f64 + Send + Sync>);

impl FalloffCurve {
    pub fn new(curve: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(curve))
    }
}

impl fmt::Debug for FalloffCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FalloffCurve(..)")
    }
}

/// 距离衰减策略
///
/// 归一化距离 `nd = distance / radius`，`d` 已钳制到不小于 `min_distance`。
#[derive(Debug, Clone, Default)]
pub enum Falloff {
    Constant,
    /// `1 - nd`
    Linear,
    /// `(1 - nd)²`
    Quadratic,
    /// `(min_distance / d)²`
    #[default]
    InverseSquare,
    /// `min_distance / d`
    Inverse,
    /// `exp(-decay × nd)`
    Exponential { decay: f64 },
    Custom(FalloffCurve),
}

impl Falloff {
    pub fn multiplier(&self, distance: f64, min_distance: f64, radius: f64) -> f64 {
        let normalized = if radius.is_finite() && radius > 0.0 {
            (distance / radius).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let value = match self {
            Falloff::Constant => 1.0,
            Falloff::Linear => 1.0 - normalized,
            Falloff::Quadratic => (1.0 - normalized).powi(2),
            Falloff::InverseSquare => (min_distance / distance).powi(2),
            Falloff::Inverse => min_distance / distance,
            Falloff::Exponential { decay } => (-decay * normalized).exp(),
            Falloff::Custom(curve) => (curve.0)(normalized),
        };
        if value.is_finite() {
            value.max(0.0)
        } else {
            0.0
        }
    }
}

/// 吸引子移动路径
#[derive(Debug, Clone, PartialEq)]
pub struct AttractorPath {
    pub waypoints: Vec<Vector2D>,
    /// 移动速度（单位/秒）
    pub speed: f64,
    pub looping: bool,
    target: usize,
    finished: bool,
}

impl AttractorPath {
    pub fn new(waypoints: Vec<Vector2D>, speed: f64, looping: bool) -> Self {
        Self {
            waypoints,
            speed,
            looping,
            target: 0,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// 沿路径移动 `position`，一步内可越过多个路点
    fn step(&mut self, position: &mut Vector2D, dt: f64) {
        if self.finished || self.waypoints.is_empty() || self.speed <= 0.0 {
            return;
        }
        let mut budget = self.speed * dt;
        // 路点重合时一圈走不出距离，需要跳出
        let mut stalled = 0;
        while budget > 0.0 && stalled <= self.waypoints.len() {
            let target = self.waypoints[self.target];
            let distance = position.distance(target);
            if distance > budget {
                *position += (target - *position).normalized() * budget;
                return;
            }
            *position = target;
            budget -= distance;
            stalled = if distance > 0.0 { 0 } else { stalled + 1 };
            self.target += 1;
            if self.target >= self.waypoints.len() {
                if self.looping && self.waypoints.len() > 1 {
                    self.target = 0;
                } else {
                    self.target = self.waypoints.len() - 1;
                    self.finished = true;
                    return;
                }
            }
        }
    }
}

/// 吸引/排斥力
///
/// 正强度吸引，负强度排斥。粒子进入 `kill_radius` 时发出吞噬信号。
#[derive(Debug, Clone)]
pub struct AttractorForce {
    pub gate: ForceGate,
    pub position: Vector2D,
    pub strength: f64,
    /// 影响半径，超出后力为 0（无穷大 = 不限）
    pub radius: f64,
    /// 距离下限，避免近距离奇点
    pub min_distance: f64,
    pub max_force: f64,
    pub falloff: Falloff,
    pub kill_radius: Option<f64>,
    pub path: Option<AttractorPath>,
}

impl AttractorForce {
    pub fn new(position: Vector2D, strength: f64) -> Self {
        Self {
            gate: ForceGate::default(),
            position,
            strength,
            radius: f64::INFINITY,
            min_distance: 10.0,
            max_force: f64::INFINITY,
            falloff: Falloff::default(),
            kill_radius: None,
            path: None,
        }
    }

    /// 排斥器（强度取负）
    pub fn repeller(position: Vector2D, strength: f64) -> Self {
        Self::new(position, -strength.abs())
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_min_distance(mut self, min_distance: f64) -> Self {
        self.min_distance = min_distance.max(f64::EPSILON);
        self
    }

    pub fn with_max_force(mut self, max_force: f64) -> Self {
        self.max_force = max_force;
        self
    }

    pub fn with_falloff(mut self, falloff: Falloff) -> Self {
        self.falloff = falloff;
        self
    }

    pub fn with_kill_radius(mut self, radius: f64) -> Self {
        self.kill_radius = Some(radius);
        self
    }

    pub fn with_path(mut self, path: AttractorPath) -> Self {
        self.path = Some(path);
        self
    }
}

impl Force for AttractorForce {
    fn gate(&self) -> &ForceGate {
        &self.gate
    }

    fn gate_mut(&mut self) -> &mut ForceGate {
        &mut self.gate
    }

    fn advance(&mut self, dt: f64) {
        if let Some(path) = &mut self.path {
            path.step(&mut self.position, dt);
        }
    }

    fn compute(&mut self, particle: &Particle, _dt: f64) -> ForceOutput {
        let offset = self.position - particle.position;
        let raw_distance = offset.length();

        if let Some(kill_radius) = self.kill_radius {
            if raw_distance <= kill_radius {
                return ForceOutput::killed();
            }
        }
        if raw_distance > self.radius || raw_distance < 1e-9 {
            return ForceOutput::ZERO;
        }

        let distance = raw_distance.max(self.min_distance);
        let magnitude =
            self.strength * self.falloff.multiplier(distance, self.min_distance, self.radius);
        let force = (offset / raw_distance * magnitude).clamp_length(self.max_force);
        ForceOutput::new(force)
    }

    fn name(&self) -> &'static str {
        if self.strength < 0.0 {
            "repeller"
        } else {
            "attractor"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleInit;

    fn particle_at(x: f64, y: f64) -> Particle {
        Particle::new(&ParticleInit {
            position: Vector2D::new(x, y),
            ..Default::default()
        })
    }

    #[test]
    fn test_attractor_pulls_toward_center() {
        let mut attractor = AttractorForce::new(Vector2D::new(100.0, 100.0), 500.0);
        let p = particle_at(50.0, 50.0);
        let f = attractor.calculate_force(&p, 0.1);
        let toward = Vector2D::new(100.0, 100.0) - p.position;
        assert!(f.dot(toward) > 0.0);
    }

    #[test]
    fn test_repeller_pushes_away() {
        let mut repeller = AttractorForce::repeller(Vector2D::ZERO, 500.0);
        let f = repeller.calculate_force(&particle_at(20.0, 0.0), 0.1);
        assert!(f.x > 0.0);
        assert_eq!(repeller.name(), "repeller");
    }

    #[test]
    fn test_magnitude_decreases_with_distance() {
        for falloff in [
            Falloff::InverseSquare,
            Falloff::Inverse,
            Falloff::Linear,
            Falloff::Quadratic,
            Falloff::Exponential { decay: 2.0 },
        ] {
            let mut attractor = AttractorForce::new(Vector2D::ZERO, 1000.0)
                .with_radius(500.0)
                .with_falloff(falloff);
            let mut last = f64::INFINITY;
            for d in [20.0, 40.0, 80.0, 160.0, 320.0] {
                let magnitude = attractor.calculate_force(&particle_at(d, 0.0), 0.1).length();
                assert!(magnitude < last);
                last = magnitude;
            }
        }
    }

    #[test]
    fn test_min_distance_and_max_force_clamp() {
        let mut attractor = AttractorForce::new(Vector2D::ZERO, 1000.0)
            .with_min_distance(10.0)
            .with_max_force(50.0);
        let f = attractor.calculate_force(&particle_at(0.5, 0.0), 0.1);
        assert!(f.is_finite());
        assert!(f.length() <= 50.0 + 1e-9);
    }

    #[test]
    fn test_outside_radius_is_zero() {
        let mut attractor = AttractorForce::new(Vector2D::ZERO, 100.0).with_radius(50.0);
        assert_eq!(
            attractor.calculate_force(&particle_at(60.0, 0.0), 0.1),
            Vector2D::ZERO
        );
    }

    #[test]
    fn test_kill_radius_signals_removal() {
        let mut attractor = AttractorForce::new(Vector2D::ZERO, 100.0).with_kill_radius(5.0);
        assert!(attractor.evaluate(&particle_at(3.0, 0.0), 0.1).kill);
        assert!(!attractor.evaluate(&particle_at(30.0, 0.0), 0.1).kill);
    }

    #[test]
    fn test_custom_falloff() {
        let curve = Falloff::Custom(FalloffCurve::new(|nd| if nd < 0.5 { 1.0 } else { 0.0 }));
        let mut attractor = AttractorForce::new(Vector2D::ZERO, 10.0)
            .with_radius(100.0)
            .with_falloff(curve);
        assert!((attractor.calculate_force(&particle_at(20.0, 0.0), 0.1).length() - 10.0).abs() < 1e-9);
        assert_eq!(
            attractor.calculate_force(&particle_at(80.0, 0.0), 0.1),
            Vector2D::ZERO
        );
    }

    #[test]
    fn test_path_following() {
        let path = AttractorPath::new(vec![Vector2D::new(10.0, 0.0), Vector2D::new(10.0, 10.0)], 10.0, false);
        let mut attractor = AttractorForce::new(Vector2D::ZERO, 1.0).with_path(path);
        attractor.advance(0.5);
        assert!((attractor.position.x - 5.0).abs() < 1e-9);
        attractor.advance(1.0);
        assert!((attractor.position - Vector2D::new(10.0, 5.0)).length() < 1e-9);
        attractor.advance(10.0);
        assert_eq!(attractor.position, Vector2D::new(10.0, 10.0));
        assert!(attractor.path.as_ref().map(|p| p.is_finished()).unwrap_or(false));
    }
}
