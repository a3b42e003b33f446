use serde::{Deserialize, Serialize};

/// 粒子外形标签（渲染器据此选择精灵/图元）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParticleShape {
    #[default]
    Circle,
    Square,
    Triangle,
    Star,
    Diamond,
    Heart,
    Spark,
    Ring,
    Line,
    Snowflake,
    Raindrop,
    Leaf,
    Custom,
}

impl ParticleShape {
    /// 渲染器使用的紧凑编号
    pub fn index(self) -> u32 {
        self as u32
    }
}

/// 粒子尺寸（宽/高）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub const fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    /// 平均边长
    pub fn average(self) -> f64 {
        (self.width + self.height) * 0.5
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::square(10.0)
    }
}
