//! 数学基础模块
//!
//! - `vector` - 双精度二维/三维向量
//! - `bounds` - 轴对齐矩形
//! - `easing` - 缓动曲线
//! - `random` - 显式随机源

pub mod bounds;
pub mod easing;
pub mod random;
pub mod vector;

pub use bounds::Bounds;
pub use easing::Easing;
pub use random::SimRng;
pub use vector::{Vector2D, Vector3D};

/// 线性插值
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// 浮点比较容差
pub const EPSILON: f64 = 1e-6;
