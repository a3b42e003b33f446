use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::core::ParticleId;
use crate::particle::{Particle, ParticleInit};

/// 池耗尽回调
///
/// 回调在池的可变借用（或共享池的写锁）释放之后才被调用，可以安全地查询池。
pub type ExhaustionCallback = Arc<dyn Fn(&PoolStatistics) + Send + Sync>;

/// 对象池统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStatistics {
    /// 成功获取次数（复用 + 新建）
    pub acquired: usize,
    /// 从空闲列表复用的次数
    pub reused: usize,
    /// 新建粒子的次数
    pub allocated: usize,
    /// 因容量耗尽而失败的次数
    pub exhausted: usize,
    /// 成功归还次数
    pub released: usize,
    /// 被 `trim` 丢弃的空闲粒子数
    pub trimmed: usize,
    /// 同时借出的峰值
    pub peak_active: usize,
}

impl PoolStatistics {
    /// 计算复用命中率
    pub fn hit_rate(&self) -> f64 {
        if self.acquired == 0 {
            0.0
        } else {
            self.reused as f64 / self.acquired as f64
        }
    }
}

/// 粒子对象池
///
/// 空闲列表 + 借出标识集合。容量同时约束两者：
/// `available_count() + active_count() <= capacity()` 恒成立。
/// 耗尽不是错误：`acquire` 返回 `None`，调用方将其视为背压。
pub struct ParticlePool {
    available: Vec<Particle>,
    active: HashSet<ParticleId>,
    capacity: usize,
    default_init: ParticleInit,
    stats: PoolStatistics,
    on_exhausted: Option<ExhaustionCallback>,
    exhaustion_reported: bool,
}

impl ParticlePool {
    /// 创建对象池
    pub fn new(capacity: usize) -> Self {
        Self::with_default_init(capacity, ParticleInit::default())
    }

    pub fn with_default_init(capacity: usize, default_init: ParticleInit) -> Self {
        Self {
            available: Vec::with_capacity(capacity.min(4096)),
            active: HashSet::with_capacity(capacity.min(4096)),
            capacity,
            default_init,
            stats: PoolStatistics::default(),
            on_exhausted: None,
            exhaustion_reported: false,
        }
    }

    /// 设置耗尽回调
    pub fn set_exhaustion_callback(
        &mut self,
        callback: impl Fn(&PoolStatistics) + Send + Sync + 'static,
    ) {
        self.on_exhausted = Some(Arc::new(callback));
    }

    /// 从池中获取粒子
    ///
    /// 空闲列表非空时复用（字段按 `init` 覆盖）；否则在容量内新建；
    /// 否则记一次耗尽、调用回调并返回 `None`。
    pub fn acquire(&mut self, init: &ParticleInit) -> Option<Particle> {
        match self.try_acquire(init) {
            Ok(particle) => Some(particle),
            Err(stats) => {
                if let Some(callback) = self.on_exhausted.clone() {
                    callback(&stats);
                }
                None
            }
        }
    }

    /// 获取但不调用耗尽回调；耗尽时返回当时的统计快照
    pub(crate) fn try_acquire(&mut self, init: &ParticleInit) -> Result<Particle, PoolStatistics> {
        let particle = if let Some(mut particle) = self.available.pop() {
            particle.reset(init);
            self.stats.reused += 1;
            particle
        } else if self.active.len() < self.capacity {
            self.stats.allocated += 1;
            Particle::new(init)
        } else {
            self.stats.exhausted += 1;
            if !self.exhaustion_reported {
                self.exhaustion_reported = true;
                tracing::warn!(
                    target: "particle_pool",
                    capacity = self.capacity,
                    "Particle pool exhausted"
                );
            }
            return Err(self.stats);
        };

        self.active.insert(particle.id());
        self.stats.acquired += 1;
        self.stats.peak_active = self.stats.peak_active.max(self.active.len());
        Ok(particle)
    }

    pub(crate) fn exhaustion_callback(&self) -> Option<ExhaustionCallback> {
        self.on_exhausted.clone()
    }

    /// 以默认参数获取
    pub fn acquire_default(&mut self) -> Option<Particle> {
        let init = self.default_init.clone();
        self.acquire(&init)
    }

    /// 归还粒子
    ///
    /// 标识不在借出集合中（重复归还或外来粒子）时静默忽略并返回 `false`。
    pub fn release(&mut self, mut particle: Particle) -> bool {
        if !self.active.remove(&particle.id()) {
            return false;
        }
        self.stats.released += 1;
        if self.available.len() + self.active.len() < self.capacity {
            particle.clear_transient();
            self.available.push(particle);
        }
        true
    }

    /// 批量归还
    pub fn release_all(&mut self, particles: impl IntoIterator<Item = Particle>) -> usize {
        particles
            .into_iter()
            .map(|p| self.release(p))
            .filter(|released| *released)
            .count()
    }

    /// 预热：预先创建空闲粒子，不超过剩余容量
    pub fn prewarm(&mut self, count: usize) -> usize {
        let room = self
            .capacity
            .saturating_sub(self.available.len() + self.active.len());
        let to_add = count.min(room);
        for _ in 0..to_add {
            let mut particle = Particle::new(&self.default_init);
            particle.clear_transient();
            self.available.push(particle);
        }
        tracing::debug!(target: "particle_pool", added = to_add, "Pool prewarmed");
        to_add
    }

    /// 收缩空闲列表到 `keep` 个，返回丢弃数量
    pub fn trim(&mut self, keep: usize) -> usize {
        let removed = self.available.len().saturating_sub(keep);
        self.available.truncate(keep);
        self.available.shrink_to(keep);
        self.stats.trimmed += removed;
        removed
    }

    /// 丢弃全部空闲粒子（借出记录保留）
    pub fn clear(&mut self) {
        let removed = self.available.len();
        self.available.clear();
        self.stats.trimmed += removed;
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_active(&self, id: ParticleId) -> bool {
        self.active.contains(&id)
    }

    /// 借出比例 `[0, 1]`
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            return 1.0;
        }
        self.active.len() as f64 / self.capacity as f64
    }

    pub fn statistics(&self) -> PoolStatistics {
        self.stats
    }

    /// 重置统计（峰值取当前借出数）
    pub fn reset_statistics(&mut self) {
        self.stats = PoolStatistics {
            peak_active: self.active.len(),
            ..Default::default()
        };
        self.exhaustion_reported = false;
    }

    pub fn default_init(&self) -> &ParticleInit {
        &self.default_init
    }

    pub fn set_default_init(&mut self, init: ParticleInit) {
        self.default_init = init;
    }
}

impl fmt::Debug for ParticlePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticlePool")
            .field("capacity", &self.capacity)
            .field("available", &self.available.len())
            .field("active", &self.active.len())
            .field("stats", &self.stats)
            .finish()
    }
}
