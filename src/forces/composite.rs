//! 组合力：合成、定时、条件

use std::fmt;
use std::sync::Arc;

use super::{Force, ForceGate, ForceOutput};
use crate::math::Vector2D;
use crate::particle::Particle;

/// 子力合成方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombineMode {
    #[default]
    Sum,
    Average,
    /// 逐分量取绝对值最大者（保留符号）
    Max,
    /// 逐分量取绝对值最小者（保留符号）
    Min,
    /// 分量相乘
    Multiply,
}

/// 合成力
///
/// 每个子力先经过自身的适用性判定；任一子力发出吞噬信号则整体发出。
pub struct CompositeForce {
    pub gate: ForceGate,
    pub mode: CombineMode,
    /// 整体倍率
    pub strength: f64,
    children: Vec<Box<dyn Force>>,
}

impl CompositeForce {
    pub fn new(mode: CombineMode) -> Self {
        Self {
            gate: ForceGate::default(),
            mode,
            strength: 1.0,
            children: Vec::new(),
        }
    }

    pub fn with(mut self, force: impl Force + 'static) -> Self {
        self.children.push(Box::new(force));
        self
    }

    pub fn push(&mut self, force: Box<dyn Force>) {
        self.children.push(force);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Debug for CompositeForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeForce")
            .field("mode", &self.mode)
            .field("strength", &self.strength)
            .field(
                "children",
                &self.children.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Force for CompositeForce {
    fn gate(&self) -> &ForceGate {
        &self.gate
    }

    fn gate_mut(&mut self) -> &mut ForceGate {
        &mut self.gate
    }

    fn advance(&mut self, dt: f64) {
        for child in &mut self.children {
            child.advance(dt);
        }
    }

    fn compute(&mut self, particle: &Particle, dt: f64) -> ForceOutput {
        let mut combined: Option<Vector2D> = None;
        let mut count = 0usize;
        let mut kill = false;
        for child in &mut self.children {
            let output = child.evaluate(particle, dt);
            kill |= output.kill;
            count += 1;
            let force = output.force;
            combined = Some(match combined {
                None => force,
                Some(acc) => match self.mode {
                    CombineMode::Sum | CombineMode::Average => acc + force,
                    CombineMode::Max => Vector2D::new(
                        larger_magnitude(acc.x, force.x),
                        larger_magnitude(acc.y, force.y),
                    ),
                    CombineMode::Min => Vector2D::new(
                        smaller_magnitude(acc.x, force.x),
                        smaller_magnitude(acc.y, force.y),
                    ),
                    CombineMode::Multiply => acc.component_mul(force),
                },
            });
        }

        let Some(mut combined) = combined else {
            return ForceOutput::ZERO;
        };
        if self.mode == CombineMode::Average {
            combined = combined / count as f64;
        }
        ForceOutput {
            force: combined * self.strength,
            kill,
        }
    }

    fn name(&self) -> &'static str {
        "composite"
    }
}

fn larger_magnitude(a: f64, b: f64) -> f64 {
    if b.abs() > a.abs() {
        b
    } else {
        a
    }
}

fn smaller_magnitude(a: f64, b: f64) -> f64 {
    if b.abs() < a.abs() {
        b
    } else {
        a
    }
}

/// 定时力
///
/// 在 `[start_time, start_time + duration)` 内生效，可淡入淡出。
/// 时间从加入系统起由 [`Force::advance`] 累计。
pub struct TimedForce {
    pub gate: ForceGate,
    pub start_time: f64,
    /// None = 开始后一直生效
    pub duration: Option<f64>,
    pub fade_in: f64,
    pub fade_out: f64,
    elapsed: f64,
    inner: Box<dyn Force>,
}

impl TimedForce {
    pub fn new(inner: impl Force + 'static, start_time: f64, duration: Option<f64>) -> Self {
        Self {
            gate: ForceGate::default(),
            start_time,
            duration,
            fade_in: 0.0,
            fade_out: 0.0,
            elapsed: 0.0,
            inner: Box::new(inner),
        }
    }

    pub fn with_fade(mut self, fade_in: f64, fade_out: f64) -> Self {
        self.fade_in = fade_in.max(0.0);
        self.fade_out = fade_out.max(0.0);
        self
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_active(&self) -> bool {
        self.envelope() > 0.0
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.duration, Some(d) if self.elapsed - self.start_time >= d)
    }

    /// 当前包络系数 `[0, 1]`
    pub fn envelope(&self) -> f64 {
        let local = self.elapsed - self.start_time;
        if local < 0.0 || self.is_finished() {
            return 0.0;
        }
        let mut envelope: f64 = 1.0;
        if self.fade_in > 0.0 {
            envelope = envelope.min(local / self.fade_in);
        }
        if let (Some(duration), true) = (self.duration, self.fade_out > 0.0) {
            envelope = envelope.min((duration - local) / self.fade_out);
        }
        envelope.clamp(0.0, 1.0)
    }
}

impl fmt::Debug for TimedForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedForce")
            .field("inner", &self.inner.name())
            .field("start_time", &self.start_time)
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

impl Force for TimedForce {
    fn gate(&self) -> &ForceGate {
        &self.gate
    }

    fn gate_mut(&mut self) -> &mut ForceGate {
        &mut self.gate
    }

    fn advance(&mut self, dt: f64) {
        self.elapsed += dt;
        self.inner.advance(dt);
    }

    fn compute(&mut self, particle: &Particle, dt: f64) -> ForceOutput {
        let envelope = self.envelope();
        if envelope <= 0.0 {
            return ForceOutput::ZERO;
        }
        self.inner.evaluate(particle, dt).scaled(envelope)
    }

    fn name(&self) -> &'static str {
        "timed"
    }
}

/// 粒子谓词
pub type ParticlePredicate = Arc<dyn Fn(&Particle) -> bool + Send + Sync>;

/// 条件力：谓词为真时才作用
pub struct ConditionalForce {
    pub gate: ForceGate,
    predicate: ParticlePredicate,
    inner: Box<dyn Force>,
}

impl ConditionalForce {
    pub fn new(
        inner: impl Force + 'static,
        predicate: impl Fn(&Particle) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            gate: ForceGate::default(),
            predicate: Arc::new(predicate),
            inner: Box::new(inner),
        }
    }
}

impl fmt::Debug for ConditionalForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalForce")
            .field("inner", &self.inner.name())
            .finish()
    }
}

impl Force for ConditionalForce {
    fn gate(&self) -> &ForceGate {
        &self.gate
    }

    fn gate_mut(&mut self) -> &mut ForceGate {
        &mut self.gate
    }

    fn advance(&mut self, dt: f64) {
        self.inner.advance(dt);
    }

    fn compute(&mut self, particle: &Particle, dt: f64) -> ForceOutput {
        if (self.predicate)(particle) {
            self.inner.evaluate(particle, dt)
        } else {
            ForceOutput::ZERO
        }
    }

    fn name(&self) -> &'static str {
        "conditional"
    }
}
