use std::f64::consts::TAU;

use super::{Behavior, BehaviorWindow};
use crate::math::lerp;
use crate::particle::Particle;

/// 闪烁参数：振幅随进度线性衰减到 0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flicker {
    pub amplitude: f64,
    /// 频率（Hz）
    pub frequency: f64,
}

/// 淡出
#[derive(Debug, Clone)]
pub struct FadeOutBehavior {
    pub window: BehaviorWindow,
    pub start_opacity: f64,
    pub end_opacity: f64,
    /// 结果乘以出生时的透明度
    pub relative_to_birth: bool,
    pub flicker: Option<Flicker>,
}

impl FadeOutBehavior {
    pub fn new(start_opacity: f64, end_opacity: f64) -> Self {
        Self {
            window: BehaviorWindow::default(),
            start_opacity,
            end_opacity,
            relative_to_birth: true,
            flicker: None,
        }
    }

    pub fn with_window(mut self, window: BehaviorWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_flicker(mut self, amplitude: f64, frequency: f64) -> Self {
        self.flicker = Some(Flicker { amplitude, frequency });
        self
    }

    pub fn absolute(mut self) -> Self {
        self.relative_to_birth = false;
        self
    }
}

impl Default for FadeOutBehavior {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl Behavior for FadeOutBehavior {
    fn window(&self) -> &BehaviorWindow {
        &self.window
    }

    fn window_mut(&mut self) -> &mut BehaviorWindow {
        &mut self.window
    }

    fn apply_progress(&mut self, particle: &mut Particle, progress: f64, _dt: f64) {
        let mut opacity = lerp(self.start_opacity, self.end_opacity, progress);
        if self.relative_to_birth {
            opacity *= particle.birth().opacity;
        }
        if let Some(flicker) = self.flicker {
            let wave = (particle.age * flicker.frequency * TAU).sin();
            opacity += wave * flicker.amplitude * (1.0 - progress);
        }
        particle.opacity = opacity.clamp(0.0, 1.0);
    }

    fn name(&self) -> &'static str {
        "fade_out"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleInit;

    fn particle_at_age(normalized_age: f64) -> Particle {
        let mut p = Particle::new(&ParticleInit {
            lifetime: 2.0,
            ..Default::default()
        });
        p.age = normalized_age * 2.0;
        p
    }

    #[test]
    fn test_fade_midpoint() {
        let mut fade = FadeOutBehavior::new(1.0, 0.0);
        let mut p = particle_at_age(0.5);
        let prior = p.opacity;
        fade.apply(&mut p, 1.0 / 60.0);
        assert!(p.opacity > 0.0 && p.opacity < prior);
    }

    #[test]
    fn test_relative_to_birth_opacity() {
        let mut fade = FadeOutBehavior::new(1.0, 0.0);
        let mut p = Particle::new(&ParticleInit {
            opacity: 0.5,
            lifetime: 1.0,
            ..Default::default()
        });
        p.age = 0.5;
        fade.apply(&mut p, 0.1);
        assert!((p.opacity - 0.25).abs() < 1e-12);

        let mut absolute = FadeOutBehavior::new(1.0, 0.0).absolute();
        absolute.apply(&mut p, 0.1);
        assert!((p.opacity - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_flicker_vanishes_at_end() {
        let mut fade = FadeOutBehavior::new(1.0, 0.2).with_flicker(0.3, 7.0).absolute();
        let mut p = particle_at_age(1.0);
        fade.apply(&mut p, 0.1);
        assert!((p.opacity - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_disabled_leaves_opacity() {
        let mut fade = FadeOutBehavior::default();
        fade.set_enabled(false);
        let mut p = particle_at_age(0.9);
        fade.apply(&mut p, 0.1);
        assert_eq!(p.opacity, 1.0);
    }
}
