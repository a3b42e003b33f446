//! 发射器模块
//!
//! ## 架构设计
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │                   Emitter trait                     │
//! ├────────────────────────────────────────────────────┤
//! │  由具体发射器实现：                                  │
//! │    spawn_position()    出生位置（形状相关）          │
//! │    initial_velocity()  初速度（默认：方向 ± 扩散角） │
//! │                                                      │
//! │  默认提供：                                          │
//! │    particle_init()     按配置区间随机化其余属性      │
//! │    emit_into()         延迟 → 时长/循环 → 余量 →    │
//! │                        爆发或连续发射                │
//! │    burst_into()        立即爆发                      │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! 发射计时是变步长的，与物理子步无关。所有随机抽样使用调用方传入的 [`SimRng`]。

use crate::config::{ParticleConfiguration, MIN_MASS};
use crate::math::random::{self, SimRng};
use crate::math::Vector2D;
use crate::particle::{Color, Particle, ParticleInit, Size};
use crate::pool::{HeapSource, ParticleSource};

pub mod circle;
pub mod factory;
pub mod line;
pub mod point;
pub mod polygon;

pub use circle::CircleEmitter;
pub use factory::build_emitter;
pub use line::LineEmitter;
pub use point::PointEmitter;
pub use polygon::PolygonEmitter;

/// 发射器公共状态
#[derive(Debug, Clone)]
pub struct EmitterCore {
    pub config: ParticleConfiguration,
    pub position: Vector2D,
    active: bool,
    /// 自启动（或上次循环）以来的时间，包含启动延迟
    elapsed: f64,
    accumulator: f64,
    completed: bool,
    emitted_total: u64,
}

impl EmitterCore {
    /// 配置会先被修正（非法区间钳制，而非把 NaN 带进模拟）
    pub fn new(config: ParticleConfiguration, position: Vector2D) -> Self {
        Self {
            config: config.sanitized(),
            position,
            active: true,
            elapsed: 0.0,
            accumulator: 0.0,
            completed: false,
            emitted_total: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn emitted_total(&self) -> u64 {
        self.emitted_total
    }

    /// 已完成或已停用
    pub fn is_finished(&self) -> bool {
        self.completed || !self.active
    }

    fn reset_timers(&mut self) {
        self.elapsed = 0.0;
        self.accumulator = 0.0;
    }

    /// 推进计时并决定本帧应发射的数量
    fn schedule(&mut self, dt: f64, headroom: usize) -> usize {
        if !self.active || self.completed {
            return 0;
        }

        let config = &self.config;
        if self.elapsed < config.start_delay {
            self.elapsed += dt;
            return 0;
        }

        if let Some(duration) = config.duration {
            if self.elapsed - config.start_delay >= duration {
                if config.loops {
                    tracing::debug!(target: "emitter", "Emitter loop restarted");
                    self.elapsed = 0.0;
                    self.accumulator = 0.0;
                } else {
                    tracing::debug!(
                        target: "emitter",
                        emitted = self.emitted_total,
                        "Emitter completed"
                    );
                    self.completed = true;
                    self.active = false;
                }
                return 0;
            }
        }

        self.elapsed += dt;
        if headroom == 0 {
            return 0;
        }

        if config.burst_count > 0 {
            self.accumulator += dt;
            if self.accumulator >= config.burst_interval {
                self.accumulator -= config.burst_interval;
                return config.burst_count.min(headroom);
            }
            return 0;
        }

        if config.emission_rate <= 0.0 {
            return 0;
        }
        let interval = 1.0 / config.emission_rate;
        self.accumulator += dt;
        let mut count = 0;
        while self.accumulator >= interval && count < headroom {
            self.accumulator -= interval;
            count += 1;
        }
        if count == headroom {
            // 余量不足时不积压，避免腾出空间后一次性补发
            self.accumulator = self.accumulator.min(interval);
        }
        count
    }
}

/// 发射器（模板方法）
pub trait Emitter: Send + Sync {
    fn core(&self) -> &EmitterCore;

    fn core_mut(&mut self) -> &mut EmitterCore;

    /// 出生位置（世界坐标）
    fn spawn_position(&mut self, rng: &mut SimRng) -> Vector2D;

    /// 初速度：配置方向 ± 扩散角的一半，速率取配置区间
    fn initial_velocity(&mut self, rng: &mut SimRng, _spawn: Vector2D) -> Vector2D {
        directional_velocity(&self.core().config, rng)
    }

    /// 诊断名称
    fn name(&self) -> &'static str;

    fn config(&self) -> &ParticleConfiguration {
        &self.core().config
    }

    fn position(&self) -> Vector2D {
        self.core().position
    }

    fn set_position(&mut self, position: Vector2D) {
        self.core_mut().position = position;
    }

    fn is_active(&self) -> bool {
        self.core().is_active()
    }

    fn is_completed(&self) -> bool {
        self.core().is_completed()
    }

    /// 生成一个粒子的初始化参数
    fn particle_init(&mut self, rng: &mut SimRng) -> ParticleInit {
        let position = self.spawn_position(rng);
        let velocity = self.initial_velocity(rng, position);
        let config = &self.core().config;
        let color = random::pick_index(rng, config.colors.len())
            .map(|i| config.colors[i])
            .unwrap_or(Color::WHITE);
        ParticleInit {
            position,
            velocity,
            rotation: config.rotation.sample(rng),
            angular_velocity: config.angular_velocity.sample(rng),
            scale: config.scale.sample(rng),
            opacity: config.opacity.sample(rng),
            color,
            lifetime: config.lifetime.sample(rng).max(f64::EPSILON),
            mass: config.mass.sample(rng).max(MIN_MASS),
            size: Size::square(config.size.sample(rng).max(0.0)),
            shape: config.particle_shape,
            max_trail_length: config.trail_length,
        }
    }

    /// 新建一个按配置随机化的粒子（不经过池）
    fn create_configured_particle(&mut self, rng: &mut SimRng) -> Particle {
        Particle::new(&self.particle_init(rng))
    }

    /// 推进计时并把新粒子追加到 `out`
    ///
    /// 余量 = `min(max_particles - active_count, limit)`；来源耗尽时提前停止。
    /// 返回实际发射数量。
    fn emit_into(
        &mut self,
        dt: f64,
        active_count: usize,
        limit: usize,
        rng: &mut SimRng,
        source: &mut dyn ParticleSource,
        out: &mut Vec<Particle>,
    ) -> usize {
        let headroom = self
            .core()
            .config
            .max_particles
            .saturating_sub(active_count)
            .min(limit);
        let count = self.core_mut().schedule(dt, headroom);
        spawn_into(self, count, rng, source, out)
    }

    /// 单独使用时的便捷入口：每个粒子新分配
    fn update(&mut self, dt: f64, active_count: usize, rng: &mut SimRng) -> Vec<Particle> {
        let mut out = Vec::new();
        self.emit_into(dt, active_count, usize::MAX, rng, &mut HeapSource, &mut out);
        out
    }

    /// 立即爆发 `burst_count` 个（连续模式下为 1 个），不超过 `limit`
    fn burst_into(
        &mut self,
        limit: usize,
        rng: &mut SimRng,
        source: &mut dyn ParticleSource,
        out: &mut Vec<Particle>,
    ) -> usize {
        let count = self.core().config.burst_count.max(1).min(limit);
        tracing::trace!(target: "emitter", count, "Emitter burst");
        spawn_into(self, count, rng, source, out)
    }

    fn burst(&mut self, rng: &mut SimRng) -> Vec<Particle> {
        let mut out = Vec::new();
        self.burst_into(usize::MAX, rng, &mut HeapSource, &mut out);
        out
    }

    /// 从头开始（清除完成状态）
    fn restart(&mut self) {
        let core = self.core_mut();
        core.reset_timers();
        core.completed = false;
        core.active = true;
    }

    fn start(&mut self) {
        self.core_mut().active = true;
    }

    /// 停用；已存在的粒子不受影响
    fn stop(&mut self) {
        self.core_mut().active = false;
    }
}

fn spawn_into<E: Emitter + ?Sized>(
    emitter: &mut E,
    count: usize,
    rng: &mut SimRng,
    source: &mut dyn ParticleSource,
    out: &mut Vec<Particle>,
) -> usize {
    let mut spawned = 0;
    for _ in 0..count {
        let init = emitter.particle_init(rng);
        match source.obtain(&init) {
            Some(particle) => {
                out.push(particle);
                spawned += 1;
            }
            None => break,
        }
    }
    emitter.core_mut().emitted_total += spawned as u64;
    spawned
}

/// 方向 ± 扩散角一半内的随机速度
pub fn directional_velocity(config: &ParticleConfiguration, rng: &mut SimRng) -> Vector2D {
    let angle = config.direction + random::signed_unit(rng) * config.spread * 0.5;
    Vector2D::from_polar(angle, config.speed.sample(rng))
}
