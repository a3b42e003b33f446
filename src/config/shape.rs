use serde::{Deserialize, Serialize};

use crate::math::Vector2D;

/// 发射形状描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EmissionShape {
    /// 点发射，可选随机抖动半径
    Point { jitter: f64 },
    /// 线段发射（以发射器位置为中心）
    Line {
        length: f64,
        /// 线段方向（弧度）
        angle: f64,
        distribution: LineDistribution,
    },
    /// 圆形发射
    Circle { radius: f64, mode: CircleMode },
    /// 多边形发射（顶点相对发射器位置）
    Polygon {
        vertices: Vec<Vector2D>,
        mode: PolygonMode,
    },
}

impl Default for EmissionShape {
    fn default() -> Self {
        Self::Point { jitter: 0.0 }
    }
}

/// 线段上的分布策略（对 `[0, 1]` 均匀抽样做参数重映射）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum LineDistribution {
    #[default]
    Uniform,
    /// 向中点聚集（两个均匀数取平均，三角分布）
    CenterBiased,
    /// 向两端聚集
    EndsBiased,
    /// 向起点聚集（`u²`）
    StartBiased,
    /// 向终点聚集（`1 - (1-u)²`）
    EndBiased,
    /// 按段依次轮转，每次落在下一段中点
    Sequential { segments: u32 },
}

/// 圆形发射模式
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum CircleMode {
    /// 实心圆（`sqrt(u) * r` 面积均匀）
    #[default]
    Filled,
    /// 仅圆周
    Edge,
    /// 圆环 `[inner, radius]`，面积均匀
    Ring { inner_radius: f64 },
    /// 向圆心聚集（`u * r`）
    CenterBiased,
    /// 幂次加权（`u^(1/exponent) * r`，exponent=2 等价于实心圆）
    Power { exponent: f64 },
}

/// 多边形发射模式
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum PolygonMode {
    /// 仅顶点
    Vertices,
    /// 沿周长（按边长加权）
    #[default]
    Edges,
    /// 内部填充（拒绝采样）
    Fill,
    /// 质心
    Centroid,
}
