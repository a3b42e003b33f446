//! 二维/三维向量值类型
//!
//! 双精度、按值语义。内部运算借助 glam 的 `DVec2`/`DVec3`，
//! 对外暴露稳定的字段布局，可用作哈希键。

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use glam::{DQuat, DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// 规范化浮点位模式：`-0.0` 与 `0.0` 视为同一个键，所有 NaN 折叠为同一个位模式
#[inline]
fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

// ============================================================================
// Vector2D
// ============================================================================

/// 二维向量
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn splat(v: f64) -> Self {
        Self::new(v, v)
    }

    /// 由角度（弧度）构造单位向量
    pub fn from_angle(angle: f64) -> Self {
        DVec2::from_angle(angle).into()
    }

    /// 由极坐标构造
    pub fn from_polar(angle: f64, length: f64) -> Self {
        Self::from_angle(angle) * length
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// 归一化；零长度向量返回零向量
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            self / len
        } else {
            Self::ZERO
        }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// 二维伪叉积（返回 z 分量）
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// 逆时针旋转 90°
    pub fn perpendicular(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// 绕原点旋转（弧度）
    pub fn rotated(self, angle: f64) -> Self {
        DVec2::from_angle(angle).rotate(self.into()).into()
    }

    /// 绕指定点旋转
    pub fn rotated_around(self, pivot: Self, angle: f64) -> Self {
        (self - pivot).rotated(angle) + pivot
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        DVec2::from(self).lerp(other.into(), t).into()
    }

    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    pub fn distance_squared(self, other: Self) -> f64 {
        (self - other).length_squared()
    }

    /// 与 +X 轴的夹角（弧度，`atan2`）
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// 限制长度不超过 `max`
    pub fn clamp_length(self, max: f64) -> Self {
        let len = self.length();
        if len > max && len > 0.0 {
            self * (max / len)
        } else {
            self
        }
    }

    /// 分量乘法
    pub fn component_mul(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn extend(self, z: f64) -> Vector3D {
        Vector3D::new(self.x, self.y, z)
    }
}

/// 与 `Hash` 使用同一套规范位比较：`-0.0 == 0.0`，NaN 等于自身
impl PartialEq for Vector2D {
    fn eq(&self, other: &Self) -> bool {
        canonical_bits(self.x) == canonical_bits(other.x)
            && canonical_bits(self.y) == canonical_bits(other.y)
    }
}

impl Eq for Vector2D {}

impl Hash for Vector2D {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_bits(self.x).hash(state);
        canonical_bits(self.y).hash(state);
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<DVec2> for Vector2D {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2D> for DVec2 {
    fn from(v: Vector2D) -> Self {
        DVec2::new(v.x, v.y)
    }
}

impl From<(f64, f64)> for Vector2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Vector2D {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2D {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector2D {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vector2D> for f64 {
    type Output = Vector2D;
    fn mul(self, rhs: Vector2D) -> Vector2D {
        rhs * self
    }
}

impl Div<f64> for Vector2D {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl AddAssign for Vector2D {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector2D {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f64> for Vector2D {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl DivAssign<f64> for Vector2D {
    fn div_assign(&mut self, rhs: f64) {
        *self = *self / rhs;
    }
}

// ============================================================================
// Vector3D
// ============================================================================

/// 三维向量
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3D {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// 归一化；零长度向量返回零向量
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            self / len
        } else {
            Self::ZERO
        }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// 绕任意轴旋转（弧度）；零长度轴不旋转
    pub fn rotated(self, axis: Self, angle: f64) -> Self {
        let axis = axis.normalized();
        if axis == Self::ZERO {
            return self;
        }
        (DQuat::from_axis_angle(axis.into(), angle) * DVec3::from(self)).into()
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        DVec3::from(self).lerp(other.into(), t).into()
    }

    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    pub fn truncate(self) -> Vector2D {
        Vector2D::new(self.x, self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl PartialEq for Vector3D {
    fn eq(&self, other: &Self) -> bool {
        canonical_bits(self.x) == canonical_bits(other.x)
            && canonical_bits(self.y) == canonical_bits(other.y)
            && canonical_bits(self.z) == canonical_bits(other.z)
    }
}

impl Eq for Vector3D {}

impl Hash for Vector3D {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_bits(self.x).hash(state);
        canonical_bits(self.y).hash(state);
        canonical_bits(self.z).hash(state);
    }
}

impl fmt::Display for Vector3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<DVec3> for Vector3D {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3D> for DVec3 {
    fn from(v: Vector3D) -> Self {
        DVec3::new(v.x, v.y, v.z)
    }
}

impl Add for Vector3D {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3D {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vector3D {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vector3D {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vector3D> for f64 {
    type Output = Vector3D;
    fn mul(self, rhs: Vector3D) -> Vector3D {
        rhs * self
    }
}

impl Div<f64> for Vector3D {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl AddAssign for Vector3D {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector3D {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f64> for Vector3D {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl DivAssign<f64> for Vector3D {
    fn div_assign(&mut self, rhs: f64) {
        *self = *self / rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn approx(a: Vector2D, b: Vector2D) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Vector2D::ZERO.normalized(), Vector2D::ZERO);
        assert_eq!(Vector3D::ZERO.normalized(), Vector3D::ZERO);
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let v = Vector2D::new(1.0, 0.0).rotated(FRAC_PI_2);
        assert!(approx(v, Vector2D::new(0.0, 1.0)));

        let around = Vector2D::new(2.0, 1.0).rotated_around(Vector2D::new(1.0, 1.0), PI);
        assert!(approx(around, Vector2D::new(0.0, 1.0)));
    }

    #[test]
    fn test_cross_products() {
        assert_eq!(Vector2D::X.cross(Vector2D::Y), 1.0);
        assert_eq!(Vector3D::X.cross(Vector3D::Y), Vector3D::Z);
    }

    #[test]
    fn test_rotate_3d_about_z() {
        let v = Vector3D::X.rotated(Vector3D::Z, FRAC_PI_2);
        assert!((v - Vector3D::Y).length() < 1e-9);
        assert_eq!(Vector3D::X.rotated(Vector3D::ZERO, 1.0), Vector3D::X);
    }

    #[test]
    fn test_clamp_length() {
        let v = Vector2D::new(30.0, 40.0).clamp_length(5.0);
        assert!((v.length() - 5.0).abs() < 1e-9);
        assert_eq!(Vector2D::new(1.0, 0.0).clamp_length(5.0), Vector2D::new(1.0, 0.0));
    }

    #[test]
    fn test_hash_key_treats_signed_zero_equal() {
        let mut map = HashMap::new();
        map.insert(Vector2D::new(0.0, 1.0), "a");
        assert_eq!(map.get(&Vector2D::new(-0.0, 1.0)), Some(&"a"));
    }

    #[test]
    fn test_nan_vector_is_reflexive_key() {
        let nan = Vector2D::new(f64::NAN, 1.0);
        assert_eq!(nan, nan);
        assert_eq!(Vector3D::new(0.0, f64::NAN, -0.0), Vector3D::new(-0.0, f64::NAN, 0.0));

        let mut map = HashMap::new();
        map.insert(nan, "nan");
        assert_eq!(map.get(&Vector2D::new(f64::NAN, 1.0)), Some(&"nan"));
        assert_ne!(nan, Vector2D::new(f64::NAN, 2.0));
    }

    fn finite() -> impl Strategy<Value = f64> {
        -1000.0f64..1000.0
    }

    fn vec2() -> impl Strategy<Value = Vector2D> {
        (finite(), finite()).prop_map(|(x, y)| Vector2D::new(x, y))
    }

    proptest! {
        #[test]
        fn vector_add_commutative(a in vec2(), b in vec2()) {
            prop_assert!(approx(a + b, b + a));
        }

        #[test]
        fn vector_scalar_distributive(a in vec2(), b in vec2(), s in finite()) {
            let lhs = (a + b) * s;
            let rhs = a * s + b * s;
            prop_assert!((lhs - rhs).length() < 1e-6);
        }

        #[test]
        fn normalize_is_idempotent(a in vec2()) {
            let once = a.normalized();
            let twice = once.normalized();
            prop_assert!(approx(once, twice));
            if a.length() > 1e-9 {
                prop_assert!((once.length() - 1.0).abs() < 1e-9);
            }
        }

        #[test]
        fn rotation_preserves_length(a in vec2(), angle in -10.0f64..10.0) {
            prop_assert!((a.rotated(angle).length() - a.length()).abs() < 1e-6);
        }
    }
}
