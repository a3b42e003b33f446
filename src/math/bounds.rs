use serde::{Deserialize, Serialize};

use super::Vector2D;

/// 轴对齐矩形区域
///
/// 用于力的作用范围限制以及系统的边界碰撞。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vector2D,
    pub max: Vector2D,
}

impl Bounds {
    /// 创建区域（自动修正 min/max 顺序）
    pub fn new(a: Vector2D, b: Vector2D) -> Self {
        Self {
            min: Vector2D::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vector2D::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// 以原点为左上角、指定宽高创建
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(Vector2D::ZERO, Vector2D::new(width, height))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vector2D {
        (self.min + self.max) * 0.5
    }

    /// 包含判定（含边界）
    pub fn contains(&self, p: Vector2D) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// 区域内一点到最近边的距离；区域外返回 0
    pub fn distance_to_edge(&self, p: Vector2D) -> f64 {
        if !self.contains(p) {
            return 0.0;
        }
        (p.x - self.min.x)
            .min(self.max.x - p.x)
            .min(p.y - self.min.y)
            .min(self.max.y - p.y)
    }

    /// 把点限制在区域内
    pub fn clamp(&self, p: Vector2D) -> Vector2D {
        Vector2D::new(p.x.clamp(self.min.x, self.max.x), p.y.clamp(self.min.y, self.max.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_normalizes_corners() {
        let b = Bounds::new(Vector2D::new(10.0, 0.0), Vector2D::new(0.0, 5.0));
        assert_eq!(b.min, Vector2D::new(0.0, 0.0));
        assert_eq!(b.max, Vector2D::new(10.0, 5.0));
        assert_eq!(b.center(), Vector2D::new(5.0, 2.5));
    }

    #[test]
    fn test_distance_to_edge() {
        let b = Bounds::from_size(100.0, 50.0);
        assert_eq!(b.distance_to_edge(Vector2D::new(50.0, 25.0)), 25.0);
        assert_eq!(b.distance_to_edge(Vector2D::new(3.0, 25.0)), 3.0);
        assert_eq!(b.distance_to_edge(Vector2D::new(-1.0, 25.0)), 0.0);
    }

    #[test]
    fn test_clamp() {
        let b = Bounds::from_size(10.0, 10.0);
        assert_eq!(b.clamp(Vector2D::new(-5.0, 20.0)), Vector2D::new(0.0, 10.0));
    }
}
