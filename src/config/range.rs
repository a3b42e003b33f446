use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::random;

/// 闭区间数值范围 `[min, max]`
///
/// 构造时自动修正反向区间；均匀采样。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// 创建范围（min > max 时交换）
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// 单值范围
    pub const fn constant(value: f64) -> Self {
        Self { min: value, max: value }
    }

    /// 均匀采样
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        random::uniform(rng, self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// 修正后的范围：非有限端点替换为 `fallback` 对应端点，反向区间交换
    pub fn sanitized(self, fallback: ValueRange) -> Self {
        let min = if self.min.is_finite() { self.min } else { fallback.min };
        let max = if self.max.is_finite() { self.max } else { fallback.max };
        Self::new(min, max)
    }

    /// 把两端钳制到 `[lo, hi]`
    pub fn clamped(self, lo: f64, hi: f64) -> Self {
        Self::new(self.min.clamp(lo, hi), self.max.clamp(lo, hi))
    }
}

impl From<(f64, f64)> for ValueRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

impl From<f64> for ValueRange {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::random::seeded;

    #[test]
    fn test_inverted_range_is_swapped() {
        let r = ValueRange::new(5.0, 1.0);
        assert_eq!(r.min, 1.0);
        assert_eq!(r.max, 5.0);
    }

    #[test]
    fn test_sample_within_range() {
        let r = ValueRange::new(2.0, 3.0);
        let mut rng = seeded(11);
        for _ in 0..500 {
            assert!(r.contains(r.sample(&mut rng)));
        }
        assert_eq!(ValueRange::constant(4.0).sample(&mut rng), 4.0);
    }

    #[test]
    fn test_sanitized_replaces_nan() {
        let r = ValueRange { min: f64::NAN, max: 9.0 }.sanitized(ValueRange::new(1.0, 2.0));
        assert_eq!(r, ValueRange::new(1.0, 9.0));
    }
}
