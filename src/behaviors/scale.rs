use std::f64::consts::TAU;

use super::{Behavior, BehaviorWindow};
use crate::math::lerp;
use crate::particle::{Particle, Size};

/// 缩放模式
///
/// 两种模式互斥：`NonUniform` 直接改写 `size`（相对出生尺寸）并把 `scale` 固定为 1。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScaleMode {
    #[default]
    Uniform,
    /// 宽高分别插值，元组为 `(宽倍数, 高倍数)`
    NonUniform { start: (f64, f64), end: (f64, f64) },
}

/// 阻尼脉动
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub amplitude: f64,
    /// 频率（Hz）
    pub frequency: f64,
    /// 振幅按 `exp(-damping × progress)` 衰减
    pub damping: f64,
}

impl Pulse {
    fn factor(&self, age: f64, progress: f64) -> f64 {
        1.0 + self.amplitude * (age * self.frequency * TAU).sin() * (-self.damping * progress).exp()
    }
}

/// 缩放
#[derive(Debug, Clone)]
pub struct ScaleBehavior {
    pub window: BehaviorWindow,
    pub start_scale: f64,
    pub end_scale: f64,
    /// 结果乘以出生时的缩放
    pub relative_to_birth: bool,
    pub pulse: Option<Pulse>,
    pub mode: ScaleMode,
}

impl ScaleBehavior {
    pub fn new(start_scale: f64, end_scale: f64) -> Self {
        Self {
            window: BehaviorWindow::default(),
            start_scale,
            end_scale,
            relative_to_birth: true,
            pulse: None,
            mode: ScaleMode::Uniform,
        }
    }

    /// 宽高独立缩放
    pub fn non_uniform(start: (f64, f64), end: (f64, f64)) -> Self {
        Self {
            mode: ScaleMode::NonUniform { start, end },
            ..Self::new(1.0, 1.0)
        }
    }

    pub fn with_window(mut self, window: BehaviorWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_pulse(mut self, amplitude: f64, frequency: f64, damping: f64) -> Self {
        self.pulse = Some(Pulse {
            amplitude,
            frequency,
            damping,
        });
        self
    }

    pub fn absolute(mut self) -> Self {
        self.relative_to_birth = false;
        self
    }
}

impl Default for ScaleBehavior {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl Behavior for ScaleBehavior {
    fn window(&self) -> &BehaviorWindow {
        &self.window
    }

    fn window_mut(&mut self) -> &mut BehaviorWindow {
        &mut self.window
    }

    fn apply_progress(&mut self, particle: &mut Particle, progress: f64, _dt: f64) {
        let pulse = self
            .pulse
            .map_or(1.0, |pulse| pulse.factor(particle.age, progress));

        match self.mode {
            ScaleMode::Uniform => {
                let mut scale = lerp(self.start_scale, self.end_scale, progress) * pulse;
                if self.relative_to_birth {
                    scale *= particle.birth().scale;
                }
                particle.scale = scale.max(0.0);
            }
            ScaleMode::NonUniform { start, end } => {
                let birth = particle.birth().size;
                let width = birth.width * lerp(start.0, end.0, progress) * pulse;
                let height = birth.height * lerp(start.1, end.1, progress) * pulse;
                particle.size = Size::new(width.max(0.0), height.max(0.0));
                particle.scale = 1.0;
            }
        }
    }

    fn name(&self) -> &'static str {
        "scale"
    }
}
