use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{ParticlePool, PoolStatistics};
use crate::particle::{Particle, ParticleInit};

/// 线程安全对象池
///
/// 所有修改操作（获取、归还、预热、收缩）在写锁内完成，互不交错；
/// 计数查询走读锁，可以彼此并发但不与修改并发。
/// 锁中毒时继续使用内部状态：池的每个操作都在锁内一次完成，不会留下半更新状态。
#[derive(Clone)]
pub struct SharedParticlePool {
    inner: Arc<RwLock<ParticlePool>>,
}

impl SharedParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self::from_pool(ParticlePool::new(capacity))
    }

    pub fn from_pool(pool: ParticlePool) -> Self {
        Self {
            inner: Arc::new(RwLock::new(pool)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ParticlePool> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ParticlePool> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// 获取粒子；耗尽回调在写锁释放后调用
    pub fn acquire(&self, init: &ParticleInit) -> Option<Particle> {
        let (result, callback) = {
            let mut pool = self.write();
            let result = pool.try_acquire(init);
            let callback = result.is_err().then(|| pool.exhaustion_callback()).flatten();
            (result, callback)
        };
        match result {
            Ok(particle) => Some(particle),
            Err(stats) => {
                if let Some(callback) = callback {
                    callback(&stats);
                }
                None
            }
        }
    }

    pub fn acquire_default(&self) -> Option<Particle> {
        let init = self.read().default_init().clone();
        self.acquire(&init)
    }

    pub fn release(&self, particle: Particle) -> bool {
        self.write().release(particle)
    }

    /// 批量归还（只加一次锁）
    pub fn release_all(&self, particles: impl IntoIterator<Item = Particle>) -> usize {
        self.write().release_all(particles)
    }

    pub fn prewarm(&self, count: usize) -> usize {
        self.write().prewarm(count)
    }

    pub fn trim(&self, keep: usize) -> usize {
        self.write().trim(keep)
    }

    pub fn set_exhaustion_callback(
        &self,
        callback: impl Fn(&PoolStatistics) + Send + Sync + 'static,
    ) {
        self.write().set_exhaustion_callback(callback);
    }

    pub fn reset_statistics(&self) {
        self.write().reset_statistics();
    }

    pub fn available_count(&self) -> usize {
        self.read().available_count()
    }

    pub fn active_count(&self) -> usize {
        self.read().active_count()
    }

    pub fn capacity(&self) -> usize {
        self.read().capacity()
    }

    pub fn utilization(&self) -> f64 {
        self.read().utilization()
    }

    pub fn statistics(&self) -> PoolStatistics {
        self.read().statistics()
    }

    /// 在写锁内对池执行任意操作
    pub fn with_pool<R>(&self, f: impl FnOnce(&mut ParticlePool) -> R) -> R {
        f(&mut self.write())
    }
}

impl std::fmt::Debug for SharedParticlePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedParticlePool").field(&*self.read()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_concurrent_acquire_release() {
        let pool = SharedParticlePool::new(64);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = pool.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        if let Some(p) = pool.acquire_default() {
                            let total =
                                pool.with_pool(|p| p.available_count() + p.active_count());
                            assert!(total <= 64);
                            pool.release(p);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = pool.statistics();
        assert_eq!(pool.active_count(), 0);
        assert!(pool.available_count() <= 64);
        assert_eq!(stats.acquired, stats.released);
        assert_eq!(stats.acquired + stats.exhausted, 8 * 500);
    }

    #[test]
    fn test_release_from_other_thread() {
        let pool = SharedParticlePool::new(16);
        let particles: Vec<_> = (0..16).filter_map(|_| pool.acquire_default()).collect();
        assert_eq!(particles.len(), 16);
        assert!(pool.acquire_default().is_none());

        let releaser = {
            let pool = pool.clone();
            thread::spawn(move || pool.release_all(particles))
        };
        assert_eq!(releaser.join().unwrap(), 16);
        assert_eq!(pool.available_count(), 16);
        assert!(pool.acquire_default().is_some());
    }

    #[test]
    fn test_exhaustion_callback_can_query_pool() {
        let pool = SharedParticlePool::new(1);
        let observed = Arc::new(AtomicUsize::new(usize::MAX));
        {
            let observer = pool.clone();
            let observed = Arc::clone(&observed);
            pool.set_exhaustion_callback(move |stats| {
                assert_eq!(stats.exhausted, 1);
                observed.store(observer.active_count(), Ordering::SeqCst);
            });
        }

        let (done, finished) = mpsc::channel();
        let worker = {
            let pool = pool.clone();
            thread::spawn(move || {
                let first = pool.acquire_default();
                let second = pool.acquire_default();
                let _ = done.send((first.is_some(), second.is_none()));
            })
        };
        let outcome = finished.recv_timeout(Duration::from_secs(5));
        assert_eq!(outcome, Ok((true, true)));
        worker.join().unwrap();
        assert_eq!(observed.load(Ordering::SeqCst), 1);
        assert_eq!(pool.statistics().exhausted, 1);
    }
}
