use crate::pool::PoolStatistics;

/// 帧统计
///
/// `*_this_frame` 字段在每次 `update` 开始时清零，其余为自上次 `stop` 以来的累计值。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStatistics {
    /// 已执行的帧数（仅计 Running 状态下的 update）
    pub frame_count: u64,
    pub active_particles: usize,
    pub emitted_this_frame: usize,
    pub released_this_frame: usize,
    pub substeps_this_frame: u32,
    pub total_emitted: u64,
    pub total_released: u64,
    /// 被力（如吸引子击杀半径）提前结束的粒子数
    pub killed_by_forces: u64,
    /// 已模拟的物理时间（秒）
    pub simulated_time: f64,
    /// 因子步上限被丢弃的累积时间（秒）
    pub dropped_time: f64,
    /// 最近一帧结束时的对象池统计
    pub pool: PoolStatistics,
}

impl FrameStatistics {
    pub(crate) fn begin_frame(&mut self) {
        self.frame_count += 1;
        self.emitted_this_frame = 0;
        self.released_this_frame = 0;
        self.substeps_this_frame = 0;
    }

    pub(crate) fn record_emitted(&mut self, count: usize) {
        self.emitted_this_frame += count;
        self.total_emitted += count as u64;
    }

    pub(crate) fn record_released(&mut self, count: usize) {
        self.released_this_frame += count;
        self.total_released += count as u64;
    }

    /// 平均每帧发射数
    pub fn average_emitted_per_frame(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        self.total_emitted as f64 / self.frame_count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_frame_clears_per_frame_counters() {
        let mut stats = FrameStatistics::default();
        stats.begin_frame();
        stats.record_emitted(5);
        stats.record_released(2);
        stats.substeps_this_frame = 3;

        stats.begin_frame();
        assert_eq!(stats.frame_count, 2);
        assert_eq!(stats.emitted_this_frame, 0);
        assert_eq!(stats.released_this_frame, 0);
        assert_eq!(stats.substeps_this_frame, 0);
        assert_eq!(stats.total_emitted, 5);
        assert_eq!(stats.total_released, 2);
        assert!((stats.average_emitted_per_frame() - 2.5).abs() < 1e-12);
    }
}
