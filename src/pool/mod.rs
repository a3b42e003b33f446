//! 粒子对象池
//!
//! - `particle_pool` - 单线程对象池（空闲列表 + 借出标识集合 + 统计）
//! - `shared` - 读写锁包装的线程安全版本
//!
//! 发射器通过 [`ParticleSource`] 取得粒子，不关心粒子来自池还是新分配。

pub mod particle_pool;
pub mod shared;

pub use particle_pool::{ExhaustionCallback, ParticlePool, PoolStatistics};
pub use shared::SharedParticlePool;

use crate::particle::{Particle, ParticleInit};

/// 粒子来源
pub trait ParticleSource {
    /// 按初始化参数取得一个粒子；来源耗尽时返回 `None`
    fn obtain(&mut self, init: &ParticleInit) -> Option<Particle>;
}

impl ParticleSource for ParticlePool {
    fn obtain(&mut self, init: &ParticleInit) -> Option<Particle> {
        self.acquire(init)
    }
}

impl ParticleSource for SharedParticlePool {
    fn obtain(&mut self, init: &ParticleInit) -> Option<Particle> {
        self.acquire(init)
    }
}

/// 不经过池、每次新分配
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapSource;

impl ParticleSource for HeapSource {
    fn obtain(&mut self, init: &ParticleInit) -> Option<Particle> {
        Some(Particle::new(init))
    }
}
