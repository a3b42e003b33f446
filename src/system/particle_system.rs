use bevy_ecs::prelude::*;

use super::handles::{BehaviorHandle, EmitterHandle, ForceHandle};
use super::state::SystemState;
use super::stats::FrameStatistics;
use crate::behaviors::Behavior;
use crate::config::{ConfigResult, ParticleConfiguration, SystemSettings};
use crate::core::error::{SystemError, SystemResult};
use crate::emitters::{build_emitter, Emitter};
use crate::forces::{Force, GravityForce, TurbulenceForce, WindForce};
use crate::math::random::{self, SimRng};
use crate::math::Vector2D;
use crate::particle::Particle;
use crate::pool::ParticlePool;
use crate::render::{ParticleRenderState, ParticleRenderer, RenderFrame};

/// 系统进入 Completed 时调用
pub type CompletionCallback = Box<dyn FnMut(&FrameStatistics) + Send + Sync>;

/// 粒子系统编排器
///
/// 拥有全部发射器、力、行为与存活粒子，按固定顺序驱动一帧：
///
/// 1. 累加帧时间，按固定步长执行物理子步（每帧最多 `max_substeps` 次，超出的时间丢弃）
/// 2. 变步长发射（与物理子步无关）
/// 3. 清扫死亡粒子并归还对象池
/// 4. 检查是否完成
///
/// # 示例
///
/// ```
/// use particle_engine::prelude::*;
///
/// let mut system = ParticleSystem::default();
/// let config = ParticleConfiguration { emission_rate: 50.0, ..Default::default() };
/// system.add_emitter(PointEmitter::new(Vector2D::new(100.0, 100.0), config));
/// system.add_force(GravityForce::new(98.0));
/// system.add_behavior(FadeOutBehavior::default());
/// system.start().unwrap();
/// system.update(1.0 / 60.0);
/// ```
#[derive(Resource)]
pub struct ParticleSystem {
    settings: SystemSettings,
    state: SystemState,
    particles: Vec<Particle>,
    spawned: Vec<Particle>,
    pool: ParticlePool,
    emitters: Vec<(EmitterHandle, Box<dyn Emitter>)>,
    forces: Vec<(ForceHandle, Box<dyn Force>)>,
    behaviors: Vec<(BehaviorHandle, Box<dyn Behavior>)>,
    next_handle: u64,
    rng: SimRng,
    accumulator: f64,
    stats: FrameStatistics,
    on_complete: Option<CompletionCallback>,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::build(SystemSettings::default())
    }
}

impl std::fmt::Debug for ParticleSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleSystem")
            .field("state", &self.state)
            .field("particles", &self.particles.len())
            .field("emitters", &self.emitters.len())
            .field("forces", &self.forces.len())
            .field("behaviors", &self.behaviors.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl ParticleSystem {
    /// 按设置创建（先验证）
    pub fn new(settings: SystemSettings) -> ConfigResult<Self> {
        settings.validate()?;
        Ok(Self::build(settings))
    }

    fn build(settings: SystemSettings) -> Self {
        Self {
            pool: ParticlePool::new(settings.max_particles),
            particles: Vec::with_capacity(settings.max_particles),
            spawned: Vec::new(),
            rng: random::from_optional_seed(settings.seed),
            settings,
            state: SystemState::Stopped,
            emitters: Vec::new(),
            forces: Vec::new(),
            behaviors: Vec::new(),
            next_handle: 0,
            accumulator: 0.0,
            stats: FrameStatistics::default(),
            on_complete: None,
        }
    }

    /// 由一份粒子配置构建：一个按发射形状选择的发射器，
    /// 加上 `physics` 中强度非零的重力、风力与湍流
    pub fn from_configuration(
        position: Vector2D,
        config: &ParticleConfiguration,
    ) -> ConfigResult<Self> {
        Self::from_configuration_seeded(position, config, None)
    }

    pub fn from_configuration_seeded(
        position: Vector2D,
        config: &ParticleConfiguration,
        seed: Option<u64>,
    ) -> ConfigResult<Self> {
        let config = config.sanitized();
        let settings = SystemSettings {
            seed,
            ..SystemSettings::from_configuration(&config)
        };
        let mut system = Self::new(settings)?;
        system.add_boxed_emitter(build_emitter(position, &config));

        let physics = &config.physics;
        if physics.gravity != 0.0 {
            system.add_force(GravityForce::new(physics.gravity).with_direction(physics.gravity_direction));
        }
        if physics.wind_strength != 0.0 {
            let mut wind = WindForce::new(physics.wind_direction, physics.wind_strength);
            if let Some(seed) = seed {
                wind = wind.with_seed(seed);
            }
            system.add_force(wind);
        }
        if physics.turbulence_strength != 0.0 {
            let mut turbulence =
                TurbulenceForce::new(physics.turbulence_strength, physics.turbulence_frequency);
            if let Some(seed) = seed {
                turbulence = turbulence.with_seed(seed);
            }
            system.add_force(turbulence);
        }

        tracing::debug!(
            target: "particles",
            forces = system.forces.len(),
            max_particles = system.settings.max_particles,
            "Particle system built from configuration"
        );
        Ok(system)
    }

    // ------------------------------------------------------------------
    // 生命周期
    // ------------------------------------------------------------------

    pub fn state(&self) -> SystemState {
        self.state
    }

    /// Stopped/Completed → Running；从 Completed 重新启动时所有发射器从头开始
    pub fn start(&mut self) -> SystemResult<()> {
        match self.state {
            SystemState::Running => Ok(()),
            SystemState::Paused => Err(SystemError::InvalidState {
                operation: "start",
                state: self.state,
            }),
            SystemState::Stopped | SystemState::Completed => {
                if self.state == SystemState::Completed {
                    for (_, emitter) in &mut self.emitters {
                        emitter.restart();
                    }
                }
                self.accumulator = 0.0;
                self.state = SystemState::Running;
                tracing::info!(target: "particles", emitters = self.emitters.len(), "Particle system started");
                Ok(())
            }
        }
    }

    pub fn pause(&mut self) -> SystemResult<()> {
        match self.state {
            SystemState::Running => {
                self.state = SystemState::Paused;
                tracing::info!(target: "particles", "Particle system paused");
                Ok(())
            }
            SystemState::Paused => Ok(()),
            state => Err(SystemError::InvalidState {
                operation: "pause",
                state,
            }),
        }
    }

    pub fn resume(&mut self) -> SystemResult<()> {
        match self.state {
            SystemState::Paused => {
                self.state = SystemState::Running;
                tracing::info!(target: "particles", "Particle system resumed");
                Ok(())
            }
            SystemState::Running => Ok(()),
            state => Err(SystemError::InvalidState {
                operation: "resume",
                state,
            }),
        }
    }

    /// 任意状态 → Stopped：归还全部粒子、清空统计、发射器从头开始
    pub fn stop(&mut self) {
        let released = self.pool.release_all(self.particles.drain(..));
        for (_, emitter) in &mut self.emitters {
            emitter.restart();
        }
        self.accumulator = 0.0;
        self.stats = FrameStatistics::default();
        self.pool.reset_statistics();
        self.state = SystemState::Stopped;
        tracing::info!(target: "particles", released, "Particle system stopped");
    }

    pub fn set_completion_callback(
        &mut self,
        callback: impl FnMut(&FrameStatistics) + Send + Sync + 'static,
    ) {
        self.on_complete = Some(Box::new(callback));
    }

    // ------------------------------------------------------------------
    // 帧推进
    // ------------------------------------------------------------------

    /// 推进一帧（仅在 Running 状态下生效）
    pub fn update(&mut self, delta: f64) {
        if !self.state.is_running() || !delta.is_finite() || delta < 0.0 {
            return;
        }
        let _span = tracing::trace_span!(target: "particles", "particle_update").entered();
        self.stats.begin_frame();

        // 固定时间步更新
        self.accumulator += delta;
        let fixed_step = self.settings.fixed_time_step;
        let mut substeps = 0;
        while self.accumulator >= fixed_step && substeps < self.settings.max_substeps {
            self.step(fixed_step);
            self.accumulator -= fixed_step;
            substeps += 1;
        }
        if self.accumulator >= fixed_step {
            tracing::debug!(
                target: "particles",
                dropped = self.accumulator,
                substeps,
                "Sub-step cap reached, dropping accumulated time"
            );
            self.stats.dropped_time += self.accumulator;
            self.accumulator = 0.0;
        }
        self.stats.substeps_this_frame = substeps;
        self.stats.simulated_time += f64::from(substeps) * fixed_step;

        self.emit(delta);
        self.sweep();

        self.stats.active_particles = self.particles.len();
        self.stats.pool = self.pool.statistics();
        tracing::trace!(
            target: "particles",
            frame = self.stats.frame_count,
            active = self.stats.active_particles,
            emitted = self.stats.emitted_this_frame,
            released = self.stats.released_this_frame,
            substeps,
            "Frame finished"
        );

        self.check_completion();
    }

    /// 一个物理子步
    fn step(&mut self, dt: f64) {
        for particle in &mut self.particles {
            particle.reset_forces();
        }

        for (_, force) in &mut self.forces {
            if !force.is_enabled() {
                continue;
            }
            force.advance(dt);
            for particle in self.particles.iter_mut().filter(|p| p.is_alive()) {
                let output = force.evaluate(particle, dt);
                if output.kill {
                    particle.kill();
                    self.stats.killed_by_forces += 1;
                } else {
                    particle.apply_force(output.force);
                }
            }
        }

        for (_, behavior) in &mut self.behaviors {
            if !behavior.is_enabled() {
                continue;
            }
            for particle in self.particles.iter_mut().filter(|p| p.is_alive()) {
                behavior.apply(particle, dt);
            }
        }

        let damping = 1.0 - self.settings.drag;
        let collision_bounds = if self.settings.bounds_collision {
            self.settings.bounds
        } else {
            None
        };
        for particle in self.particles.iter_mut().filter(|p| p.is_alive()) {
            particle.velocity *= damping;
            particle.update(dt);
            if let Some(bounds) = collision_bounds {
                reflect_inside(particle, bounds.min, bounds.max, self.settings.bounciness);
            }
        }
    }

    fn emit(&mut self, delta: f64) {
        let limit = self.settings.max_particles;
        for (_, emitter) in &mut self.emitters {
            if !emitter.is_active() {
                continue;
            }
            let active = self.particles.len() + self.spawned.len();
            let count = emitter.emit_into(
                delta,
                active,
                limit.saturating_sub(active),
                &mut self.rng,
                &mut self.pool,
                &mut self.spawned,
            );
            self.stats.record_emitted(count);
        }
        self.particles.append(&mut self.spawned);
    }

    /// 移除死亡粒子（保持存活粒子的相对顺序）并归还对象池
    fn sweep(&mut self) {
        let mut alive = 0;
        for index in 0..self.particles.len() {
            if self.particles[index].is_alive() {
                self.particles.swap(alive, index);
                alive += 1;
            }
        }
        if alive == self.particles.len() {
            return;
        }
        let dead = self.particles.len() - alive;
        self.pool.release_all(self.particles.drain(alive..));
        self.stats.record_released(dead);
    }

    fn check_completion(&mut self) {
        if !self.particles.is_empty() || !self.emitters.iter().all(|(_, e)| e.core().is_finished()) {
            return;
        }
        self.state = SystemState::Completed;
        tracing::info!(
            target: "particles",
            frames = self.stats.frame_count,
            emitted = self.stats.total_emitted,
            "Particle system completed"
        );
        if let Some(callback) = self.on_complete.as_mut() {
            callback(&self.stats);
        }
    }

    /// 子步结束后剩余的累积时间占步长的比例，用于渲染插值
    pub fn interpolation_alpha(&self) -> f64 {
        self.accumulator / self.settings.fixed_time_step
    }

    // ------------------------------------------------------------------
    // 注册与句柄访问
    // ------------------------------------------------------------------

    fn next_raw_handle(&mut self) -> u64 {
        let raw = self.next_handle;
        self.next_handle += 1;
        raw
    }

    pub fn add_emitter(&mut self, emitter: impl Emitter + 'static) -> EmitterHandle {
        self.add_boxed_emitter(Box::new(emitter))
    }

    pub fn add_boxed_emitter(&mut self, emitter: Box<dyn Emitter>) -> EmitterHandle {
        let handle = EmitterHandle::from_raw(self.next_raw_handle());
        tracing::debug!(target: "particles", kind = emitter.name(), ?handle, "Emitter added");
        self.emitters.push((handle, emitter));
        handle
    }

    /// 移除发射器；它已发射的粒子继续存活直到自然死亡
    pub fn remove_emitter(&mut self, handle: EmitterHandle) -> SystemResult<Box<dyn Emitter>> {
        let index = self
            .emitters
            .iter()
            .position(|(h, _)| *h == handle)
            .ok_or(SystemError::EmitterNotFound(handle))?;
        Ok(self.emitters.remove(index).1)
    }

    pub fn emitter(&self, handle: EmitterHandle) -> Option<&dyn Emitter> {
        self.emitters
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, e)| e.as_ref())
    }

    pub fn emitter_mut(&mut self, handle: EmitterHandle) -> Option<&mut (dyn Emitter + 'static)> {
        self.emitters
            .iter_mut()
            .find(|(h, _)| *h == handle)
            .map(|(_, e)| e.as_mut())
    }

    pub fn add_force(&mut self, force: impl Force + 'static) -> ForceHandle {
        self.add_boxed_force(Box::new(force))
    }

    pub fn add_boxed_force(&mut self, force: Box<dyn Force>) -> ForceHandle {
        let handle = ForceHandle::from_raw(self.next_raw_handle());
        tracing::debug!(target: "particles", kind = force.name(), ?handle, "Force added");
        self.forces.push((handle, force));
        handle
    }

    pub fn remove_force(&mut self, handle: ForceHandle) -> SystemResult<Box<dyn Force>> {
        let index = self
            .forces
            .iter()
            .position(|(h, _)| *h == handle)
            .ok_or(SystemError::ForceNotFound(handle))?;
        Ok(self.forces.remove(index).1)
    }

    pub fn force_mut(&mut self, handle: ForceHandle) -> Option<&mut (dyn Force + 'static)> {
        self.forces
            .iter_mut()
            .find(|(h, _)| *h == handle)
            .map(|(_, f)| f.as_mut())
    }

    pub fn add_behavior(&mut self, behavior: impl Behavior + 'static) -> BehaviorHandle {
        self.add_boxed_behavior(Box::new(behavior))
    }

    pub fn add_boxed_behavior(&mut self, behavior: Box<dyn Behavior>) -> BehaviorHandle {
        let handle = BehaviorHandle::from_raw(self.next_raw_handle());
        tracing::debug!(target: "particles", kind = behavior.name(), ?handle, "Behavior added");
        self.behaviors.push((handle, behavior));
        handle
    }

    pub fn remove_behavior(&mut self, handle: BehaviorHandle) -> SystemResult<Box<dyn Behavior>> {
        let index = self
            .behaviors
            .iter()
            .position(|(h, _)| *h == handle)
            .ok_or(SystemError::BehaviorNotFound(handle))?;
        Ok(self.behaviors.remove(index).1)
    }

    pub fn behavior_mut(&mut self, handle: BehaviorHandle) -> Option<&mut (dyn Behavior + 'static)> {
        self.behaviors
            .iter_mut()
            .find(|(h, _)| *h == handle)
            .map(|(_, b)| b.as_mut())
    }

    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    pub fn force_count(&self) -> usize {
        self.forces.len()
    }

    pub fn behavior_count(&self) -> usize {
        self.behaviors.len()
    }

    /// 立即让指定发射器爆发一次（受系统粒子上限约束，不受状态约束）
    pub fn burst(&mut self, handle: EmitterHandle) -> SystemResult<usize> {
        let limit = self.settings.max_particles.saturating_sub(self.particles.len());
        let (_, emitter) = self
            .emitters
            .iter_mut()
            .find(|(h, _)| *h == handle)
            .ok_or(SystemError::EmitterNotFound(handle))?;
        let count = emitter.burst_into(limit, &mut self.rng, &mut self.pool, &mut self.particles);
        self.stats.record_emitted(count);
        self.stats.active_particles = self.particles.len();
        Ok(count)
    }

    // ------------------------------------------------------------------
    // 查询与渲染
    // ------------------------------------------------------------------

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn statistics(&self) -> &FrameStatistics {
        &self.stats
    }

    pub fn settings(&self) -> &SystemSettings {
        &self.settings
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// 归还全部存活粒子（状态不变）
    pub fn clear_particles(&mut self) {
        let released = self.pool.release_all(self.particles.drain(..));
        self.stats.record_released(released);
        self.stats.active_particles = 0;
    }

    /// 当前时刻的渲染快照
    pub fn render_frame(&self) -> RenderFrame {
        RenderFrame {
            frame: self.stats.frame_count,
            blend_mode: self.settings.blend_mode,
            particles: self.particles.iter().map(ParticleRenderState::from_particle).collect(),
        }
    }

    /// 写入调用方持有的缓冲（先清空），避免每帧分配
    pub fn write_render_states(&self, out: &mut Vec<ParticleRenderState>) {
        out.clear();
        out.extend(self.particles.iter().map(ParticleRenderState::from_particle));
    }

    /// 把当前快照交给渲染器
    pub fn render(&self, renderer: &mut dyn ParticleRenderer) {
        renderer.render(&self.render_frame());
    }
}

/// 越界时把位置钳回边界，并按反弹系数反转该轴速度（指向区域内侧）
fn reflect_inside(particle: &mut Particle, min: Vector2D, max: Vector2D, bounciness: f64) {
    if particle.position.x < min.x {
        particle.position.x = min.x;
        particle.velocity.x = particle.velocity.x.abs() * bounciness;
    } else if particle.position.x > max.x {
        particle.position.x = max.x;
        particle.velocity.x = -particle.velocity.x.abs() * bounciness;
    }
    if particle.position.y < min.y {
        particle.position.y = min.y;
        particle.velocity.y = particle.velocity.y.abs() * bounciness;
    } else if particle.position.y > max.y {
        particle.position.y = max.y;
        particle.velocity.y = -particle.velocity.y.abs() * bounciness;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::FadeOutBehavior;
    use crate::config::ValueRange;
    use crate::emitters::PointEmitter;
    use crate::forces::AttractorForce;
    use crate::math::Bounds;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const STEP: f64 = 1.0 / 60.0;

    fn seeded_system(max_particles: usize) -> ParticleSystem {
        ParticleSystem::new(SystemSettings {
            max_particles,
            seed: Some(7),
            ..Default::default()
        })
        .unwrap()
    }

    fn point_config(rate: f64) -> ParticleConfiguration {
        ParticleConfiguration {
            emission_rate: rate,
            max_particles: 1000,
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let result = ParticleSystem::new(SystemSettings {
            fixed_time_step: 0.0,
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_update_ignored_unless_running() {
        let mut system = seeded_system(100);
        system.add_emitter(PointEmitter::new(Vector2D::ZERO, point_config(100.0)));
        system.update(1.0);
        assert_eq!(system.particle_count(), 0);
        assert_eq!(system.statistics().frame_count, 0);
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut system = seeded_system(10);
        system.add_emitter(PointEmitter::new(Vector2D::ZERO, point_config(10.0)));
        assert_eq!(system.state(), SystemState::Stopped);
        assert_eq!(
            system.resume(),
            Err(SystemError::InvalidState {
                operation: "resume",
                state: SystemState::Stopped
            })
        );
        assert!(system.pause().is_err());

        system.start().unwrap();
        assert_eq!(system.state(), SystemState::Running);
        system.pause().unwrap();
        assert_eq!(system.state(), SystemState::Paused);
        assert!(system.start().is_err());
        system.resume().unwrap();
        assert_eq!(system.state(), SystemState::Running);

        system.stop();
        assert_eq!(system.state(), SystemState::Stopped);
    }

    #[test]
    fn test_paused_system_does_not_advance() {
        let mut system = seeded_system(100);
        system.add_emitter(PointEmitter::new(Vector2D::ZERO, point_config(60.0)));
        system.start().unwrap();
        system.update(0.5);
        let count = system.particle_count();
        let ages: Vec<f64> = system.particles().iter().map(|p| p.age).collect();

        system.pause().unwrap();
        system.update(0.5);
        assert_eq!(system.particle_count(), count);
        let after: Vec<f64> = system.particles().iter().map(|p| p.age).collect();
        assert_eq!(ages, after);
    }

    #[test]
    fn test_substep_cap_drops_excess_time() {
        let mut system = seeded_system(10);
        system.add_emitter(PointEmitter::new(Vector2D::ZERO, point_config(1.0)));
        system.start().unwrap();
        system.update(1.0);
        let stats = system.statistics();
        assert_eq!(stats.substeps_this_frame, 4);
        assert!((stats.simulated_time - 4.0 * STEP).abs() < 1e-9);
        assert!((stats.dropped_time - (1.0 - 4.0 * STEP)).abs() < 1e-9);
        assert_eq!(system.interpolation_alpha(), 0.0);
    }

    #[test]
    fn test_partial_step_carries_over() {
        let mut system = seeded_system(10);
        system.add_emitter(PointEmitter::new(Vector2D::ZERO, point_config(1.0)));
        system.start().unwrap();
        system.update(STEP * 0.5);
        assert_eq!(system.statistics().substeps_this_frame, 0);
        system.update(STEP * 0.5);
        assert_eq!(system.statistics().substeps_this_frame, 1);
    }

    #[test]
    fn test_emission_capped_by_system_limit() {
        let mut system = seeded_system(20);
        let config = ParticleConfiguration {
            emission_rate: 1000.0,
            lifetime: ValueRange::constant(10.0),
            ..point_config(0.0)
        };
        system.add_emitter(PointEmitter::new(Vector2D::ZERO, config.clone()));
        system.add_emitter(PointEmitter::new(Vector2D::ZERO, config));
        system.start().unwrap();
        for _ in 0..30 {
            system.update(STEP);
            assert!(system.particle_count() <= 20);
        }
        assert_eq!(system.particle_count(), 20);
        let pool = system.pool();
        assert_eq!(pool.active_count(), 20);
        assert!(pool.available_count() + pool.active_count() <= pool.capacity());
    }

    #[test]
    fn test_dead_particles_returned_to_pool() {
        let mut system = seeded_system(100);
        let config = ParticleConfiguration {
            emission_rate: 60.0,
            lifetime: ValueRange::constant(0.1),
            ..point_config(0.0)
        };
        system.add_emitter(PointEmitter::new(Vector2D::ZERO, config));
        system.start().unwrap();
        for _ in 0..60 {
            system.update(STEP);
            assert!(system.particles().iter().all(|p| p.is_alive()));
        }
        let stats = system.statistics();
        assert!(stats.total_released > 0);
        assert!(system.pool().statistics().reused > 0);
    }

    #[test]
    fn test_completion_fires_callback_once() {
        let mut system = seeded_system(50);
        let config = ParticleConfiguration {
            emission_rate: 0.0,
            burst_count: 5,
            burst_interval: 0.01,
            duration: Some(0.05),
            loops: false,
            lifetime: ValueRange::constant(0.2),
            ..Default::default()
        };
        system.add_emitter(PointEmitter::new(Vector2D::ZERO, config));
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        system.set_completion_callback(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        system.start().unwrap();
        for _ in 0..120 {
            system.update(STEP);
        }
        assert_eq!(system.state(), SystemState::Completed);
        assert_eq!(system.particle_count(), 0);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        system.start().unwrap();
        system.update(STEP);
        assert!(system.particle_count() > 0);
    }

    #[test]
    fn test_stop_releases_and_clears_statistics() {
        let mut system = seeded_system(100);
        system.add_emitter(PointEmitter::new(Vector2D::ZERO, point_config(120.0)));
        system.start().unwrap();
        for _ in 0..10 {
            system.update(STEP);
        }
        assert!(system.particle_count() > 0);
        system.stop();
        assert_eq!(system.particle_count(), 0);
        assert_eq!(system.statistics(), &FrameStatistics::default());
        assert_eq!(system.pool().active_count(), 0);
        assert!(system.pool().available_count() > 0);
    }

    #[test]
    fn test_kill_radius_removes_particles() {
        let mut system = seeded_system(100);
        let config = ParticleConfiguration {
            emission_rate: 0.0,
            burst_count: 5,
            speed: ValueRange::constant(0.0),
            lifetime: ValueRange::constant(10.0),
            ..Default::default()
        };
        let emitter = system.add_emitter(PointEmitter::new(Vector2D::new(5.0, 5.0), config));
        system.add_force(AttractorForce::new(Vector2D::new(5.0, 5.0), 100.0).with_kill_radius(1.0));
        system.start().unwrap();
        assert_eq!(system.burst(emitter).unwrap(), 5);
        system.emitter_mut(emitter).unwrap().stop();

        system.update(STEP);
        assert_eq!(system.particle_count(), 0);
        assert_eq!(system.statistics().killed_by_forces, 5);
        assert_eq!(system.state(), SystemState::Completed);
    }

    #[test]
    fn test_bounds_collision_reflects_and_clamps() {
        let mut system = ParticleSystem::new(SystemSettings {
            seed: Some(3),
            bounds: Some(Bounds::from_size(100.0, 100.0)),
            bounds_collision: true,
            bounciness: 0.5,
            ..Default::default()
        })
        .unwrap();
        let config = ParticleConfiguration {
            emission_rate: 0.0,
            burst_count: 1,
            speed: ValueRange::constant(0.0),
            lifetime: ValueRange::constant(10.0),
            ..Default::default()
        };
        let emitter = system.add_emitter(PointEmitter::new(Vector2D::new(50.0, 95.0), config));
        system.add_force(GravityForce::new(5000.0));
        system.start().unwrap();
        system.burst(emitter).unwrap();
        for _ in 0..10 {
            system.update(STEP);
            for p in system.particles() {
                assert!(p.position.y <= 100.0);
            }
        }
        assert!(system.particles().iter().any(|p| p.position.y == 100.0 || p.velocity.y < 0.0));
    }

    #[test]
    fn test_handles_and_removal() {
        let mut system = seeded_system(10);
        let emitter = system.add_emitter(PointEmitter::new(Vector2D::ZERO, point_config(1.0)));
        let force = system.add_force(GravityForce::new(10.0));
        let behavior = system.add_behavior(FadeOutBehavior::default());
        assert_eq!(system.emitter_count(), 1);

        system.emitter_mut(emitter).unwrap().set_position(Vector2D::new(3.0, 3.0));
        assert_eq!(system.emitter(emitter).unwrap().position(), Vector2D::new(3.0, 3.0));
        system.force_mut(force).unwrap().set_enabled(false);
        system.behavior_mut(behavior).unwrap().set_enabled(false);

        assert!(system.remove_force(force).is_ok());
        assert_eq!(
            system.remove_force(force).err(),
            Some(SystemError::ForceNotFound(force))
        );
        assert!(system.remove_behavior(behavior).is_ok());
        assert!(system.remove_emitter(emitter).is_ok());
        assert!(matches!(
            system.burst(emitter),
            Err(SystemError::EmitterNotFound(_))
        ));
    }

    #[test]
    fn test_disabled_force_has_no_effect() {
        let mut system = seeded_system(10);
        let config = ParticleConfiguration {
            emission_rate: 0.0,
            burst_count: 1,
            speed: ValueRange::constant(0.0),
            lifetime: ValueRange::constant(10.0),
            ..Default::default()
        };
        let emitter = system.add_emitter(PointEmitter::new(Vector2D::ZERO, config));
        let gravity = system.add_force(GravityForce::new(100.0));
        system.force_mut(gravity).unwrap().set_enabled(false);
        system.start().unwrap();
        system.burst(emitter).unwrap();
        system.update(STEP * 3.0);
        assert!(system.particles().iter().all(|p| p.velocity == Vector2D::ZERO));
    }

    #[test]
    fn test_render_frame_snapshot() {
        let mut system = seeded_system(100);
        system.add_emitter(PointEmitter::new(Vector2D::new(10.0, 20.0), point_config(120.0)));
        system.start().unwrap();
        system.update(STEP * 2.0);
        let frame = system.render_frame();
        assert_eq!(frame.len(), system.particle_count());
        assert_eq!(frame.frame, system.statistics().frame_count);

        let mut buffer = vec![ParticleRenderState::from_particle(&Particle::default()); 500];
        system.write_render_states(&mut buffer);
        assert_eq!(buffer, frame.particles);
    }

    #[test]
    fn test_from_configuration_installs_forces() {
        let mut config = ParticleConfiguration::default();
        config.physics.gravity = 98.0;
        config.physics.wind_strength = 10.0;
        let system = ParticleSystem::from_configuration_seeded(Vector2D::ZERO, &config, Some(1)).unwrap();
        assert_eq!(system.emitter_count(), 1);
        assert_eq!(system.force_count(), 2);
        assert_eq!(system.settings().max_particles, config.max_particles);
    }

    #[test]
    fn test_seeded_systems_are_deterministic() {
        let run = || {
            let mut system = seeded_system(200);
            system.add_emitter(PointEmitter::new(Vector2D::ZERO, point_config(100.0)));
            system.add_force(GravityForce::new(98.0));
            system.start().unwrap();
            for _ in 0..30 {
                system.update(STEP);
            }
            system.particles().iter().map(|p| p.position).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
