//! 行为模块
//!
//! 行为按粒子的归一化年龄修改外观属性（透明度、缩放、颜色）。
//! 所有行为共用 [`BehaviorWindow`]：启用开关、作用区间、缓动、
//! 往返（ping-pong）与外形过滤，进度计算方式对每种行为完全一致。

use std::collections::HashSet;

use crate::impl_default;
use crate::math::Easing;
use crate::particle::{Particle, ParticleShape};

pub mod color;
pub mod composite;
pub mod fade;
pub mod scale;

pub use color::{ColorBehavior, ColorSpace, ColorStop, ColorTransition};
pub use composite::CompositeBehavior;
pub use fade::{FadeOutBehavior, Flicker};
pub use scale::{Pulse, ScaleBehavior, ScaleMode};

/// 行为作用区间与进度映射
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorWindow {
    pub enabled: bool,
    /// 区间起点（归一化年龄）
    pub start: f64,
    /// 区间终点（归一化年龄）
    pub end: f64,
    /// 进度先升后降：`p < 0.5 ? 2p : 2(1 - p)`
    pub ping_pong: bool,
    pub easing: Easing,
    /// 外形过滤（None = 全部外形）
    pub shapes: Option<HashSet<ParticleShape>>,
}

impl_default!(BehaviorWindow {
    enabled: true,
    start: 0.0,
    end: 1.0,
    ping_pong: false,
    easing: Easing::Linear,
    shapes: None,
});

impl BehaviorWindow {
    pub fn with_range(mut self, start: f64, end: f64) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_ping_pong(mut self, ping_pong: bool) -> Self {
        self.ping_pong = ping_pong;
        self
    }

    pub fn with_shapes(mut self, shapes: impl IntoIterator<Item = ParticleShape>) -> Self {
        self.shapes = Some(shapes.into_iter().collect());
        self
    }

    /// 粒子是否受此行为影响
    pub fn applies_to(&self, particle: &Particle) -> bool {
        self.enabled
            && self
                .shapes
                .as_ref()
                .map_or(true, |shapes| shapes.contains(&particle.shape))
    }

    /// 由归一化年龄计算进度；不适用时返回 `None`
    ///
    /// 区间退化（`end <= start`）时在 `start` 处阶跃。
    pub fn progress(&self, particle: &Particle) -> Option<f64> {
        if !self.applies_to(particle) {
            return None;
        }
        Some(self.progress_at(particle.normalized_age()))
    }

    pub fn progress_at(&self, normalized_age: f64) -> f64 {
        let span = self.end - self.start;
        let linear = if span <= 0.0 {
            if normalized_age >= self.start {
                1.0
            } else {
                0.0
            }
        } else {
            ((normalized_age - self.start) / span).clamp(0.0, 1.0)
        };
        let eased = self.easing.ease(linear);
        if self.ping_pong {
            if eased < 0.5 {
                eased * 2.0
            } else {
                (1.0 - eased) * 2.0
            }
        } else {
            eased
        }
    }
}

/// 行为（策略接口）
pub trait Behavior: Send + Sync {
    fn window(&self) -> &BehaviorWindow;

    fn window_mut(&mut self) -> &mut BehaviorWindow;

    /// 以给定进度修改粒子
    fn apply_progress(&mut self, particle: &mut Particle, progress: f64, dt: f64);

    /// 诊断名称
    fn name(&self) -> &'static str;

    fn is_enabled(&self) -> bool {
        self.window().enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.window_mut().enabled = enabled;
    }

    /// 按窗口计算进度后应用
    fn apply(&mut self, particle: &mut Particle, dt: f64) {
        if let Some(progress) = self.window().progress(particle) {
            self.apply_progress(particle, progress, dt);
        }
    }
}
