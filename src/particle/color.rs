use serde::{Deserialize, Serialize};

use crate::math::lerp;

/// RGBA 颜色（各通道 `[0, 1]`）
///
/// 通过构造函数创建时各通道会被钳制到 `[0, 1]`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// HSB（色相/饱和度/亮度）表示，色相取 `[0, 1)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsb {
    pub hue: f64,
    pub saturation: f64,
    pub brightness: f64,
    pub alpha: f64,
}

#[inline]
fn clamp_channel(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

impl Color {
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const RED: Self = Self { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const GREEN: Self = Self { r: 0.0, g: 1.0, b: 0.0, a: 1.0 };
    pub const BLUE: Self = Self { r: 0.0, g: 0.0, b: 1.0, a: 1.0 };
    pub const TRANSPARENT: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    /// 创建颜色（通道钳制到 `[0, 1]`，NaN 视为 0）
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            a: clamp_channel(a),
        }
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// 从 HSB 创建（色相会被环绕到 `[0, 1)`）
    pub fn from_hsb(hue: f64, saturation: f64, brightness: f64, alpha: f64) -> Self {
        let h = hue.rem_euclid(1.0) * 6.0;
        let s = clamp_channel(saturation);
        let v = clamp_channel(brightness);

        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector as i32 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self::new(r, g, b, alpha)
    }

    /// 转换为 HSB
    pub fn to_hsb(self) -> Hsb {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;

        let hue = if delta <= 0.0 {
            0.0
        } else if max == self.r {
            ((self.g - self.b) / delta).rem_euclid(6.0) / 6.0
        } else if max == self.g {
            ((self.b - self.r) / delta + 2.0) / 6.0
        } else {
            ((self.r - self.g) / delta + 4.0) / 6.0
        };
        let saturation = if max > 0.0 { delta / max } else { 0.0 };

        Hsb {
            hue,
            saturation,
            brightness: max,
            alpha: self.a,
        }
    }

    /// RGB 空间线性插值
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            lerp(self.r, other.r, t),
            lerp(self.g, other.g, t),
            lerp(self.b, other.b, t),
            lerp(self.a, other.a, t),
        )
    }

    /// HSB 空间插值，色相沿圆周最短路径
    pub fn lerp_hsb(self, other: Self, t: f64) -> Self {
        let a = self.to_hsb();
        let b = other.to_hsb();

        let mut delta = b.hue - a.hue;
        if delta > 0.5 {
            delta -= 1.0;
        } else if delta < -0.5 {
            delta += 1.0;
        }

        Self::from_hsb(
            a.hue + delta * t,
            lerp(a.saturation, b.saturation, t),
            lerp(a.brightness, b.brightness, t),
            lerp(a.alpha, b.alpha, t),
        )
    }

    /// 相对亮度（Rec. 709 系数）
    pub fn luminance(self) -> f64 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r as f32, self.g as f32, self.b as f32, self.a as f32]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
