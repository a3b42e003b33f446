use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// 全局粒子标识计数器（无锁）
static NEXT_PARTICLE_ID: AtomicU64 = AtomicU64::new(1);

/// 粒子唯一标识
///
/// 进程内单调递增，可比较、可哈希。回收的粒子会获得新的标识，
/// 因此对象池可以用它区分"同一个值的不同生命"。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticleId(u64);

impl ParticleId {
    /// 分配新的标识
    pub fn next() -> Self {
        Self(NEXT_PARTICLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// 原始值
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "particle#{}", self.0)
    }
}
