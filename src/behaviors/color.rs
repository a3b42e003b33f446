use super::{Behavior, BehaviorWindow};
use crate::math::random::{self, SimRng};
use crate::particle::{Color, Particle};

/// 渐变色标
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

impl ColorStop {
    pub fn new(position: f64, color: Color) -> Self {
        Self { position, color }
    }
}

/// 插值色彩空间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    #[default]
    Rgb,
    /// 色相沿圆周最短路径
    Hsb,
}

impl ColorSpace {
    fn mix(self, a: Color, b: Color, t: f64) -> Color {
        match self {
            ColorSpace::Rgb => a.lerp(b, t),
            ColorSpace::Hsb => a.lerp_hsb(b, t),
        }
    }
}

/// 颜色过渡
#[derive(Debug, Clone, PartialEq)]
pub enum ColorTransition {
    TwoColor { from: Color, to: Color },
    /// 色标按位置升序存放
    Gradient(Vec<ColorStop>),
}

impl ColorTransition {
    /// 多色标渐变（自动排序）
    pub fn gradient(mut stops: Vec<ColorStop>) -> Self {
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        ColorTransition::Gradient(stops)
    }

    /// 在进度 `t` 处取色；空渐变返回 `None`
    pub fn sample(&self, t: f64, space: ColorSpace) -> Option<Color> {
        match self {
            ColorTransition::TwoColor { from, to } => Some(space.mix(*from, *to, t)),
            ColorTransition::Gradient(stops) => {
                let first = stops.first()?;
                let last = stops.last()?;
                if t <= first.position {
                    return Some(first.color);
                }
                if t >= last.position {
                    return Some(last.color);
                }
                for pair in stops.windows(2) {
                    let (a, b) = (pair[0], pair[1]);
                    if t >= a.position && t <= b.position {
                        let span = b.position - a.position;
                        if span <= 0.0 {
                            return Some(b.color);
                        }
                        return Some(space.mix(a.color, b.color, (t - a.position) / span));
                    }
                }
                Some(last.color)
            }
        }
    }
}

/// 颜色变化
///
/// 处理顺序：循环 → 取色 → 抖动 → 保持亮度 → 保持透明度。
#[derive(Debug, Clone)]
pub struct ColorBehavior {
    pub window: BehaviorWindow,
    pub transition: ColorTransition,
    pub space: ColorSpace,
    /// 循环次数（1 = 不循环）
    pub cycles: f64,
    /// 每通道随机抖动幅度
    pub jitter: f64,
    /// 按出生颜色的亮度重新缩放
    pub preserve_brightness: bool,
    /// 恢复出生颜色的透明通道
    pub preserve_alpha: bool,
    rng: SimRng,
}

impl ColorBehavior {
    pub fn new(transition: ColorTransition) -> Self {
        Self {
            window: BehaviorWindow::default(),
            transition,
            space: ColorSpace::Rgb,
            cycles: 1.0,
            jitter: 0.0,
            preserve_brightness: false,
            preserve_alpha: false,
            rng: random::from_entropy(),
        }
    }

    pub fn two_color(from: Color, to: Color) -> Self {
        Self::new(ColorTransition::TwoColor { from, to })
    }

    pub fn gradient(stops: Vec<ColorStop>) -> Self {
        Self::new(ColorTransition::gradient(stops))
    }

    pub fn with_window(mut self, window: BehaviorWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_space(mut self, space: ColorSpace) -> Self {
        self.space = space;
        self
    }

    pub fn with_cycles(mut self, cycles: f64) -> Self {
        self.cycles = cycles;
        self
    }

    pub fn with_jitter(mut self, jitter: f64, seed: Option<u64>) -> Self {
        self.jitter = jitter.abs();
        self.rng = random::from_optional_seed(seed);
        self
    }

    pub fn preserving_brightness(mut self) -> Self {
        self.preserve_brightness = true;
        self
    }

    pub fn preserving_alpha(mut self) -> Self {
        self.preserve_alpha = true;
        self
    }

    fn cycled(&self, progress: f64) -> f64 {
        if self.cycles > 0.0 && self.cycles != 1.0 {
            (progress * self.cycles).rem_euclid(1.0)
        } else {
            progress
        }
    }
}

impl Behavior for ColorBehavior {
    fn window(&self) -> &BehaviorWindow {
        &self.window
    }

    fn window_mut(&mut self) -> &mut BehaviorWindow {
        &mut self.window
    }

    fn apply_progress(&mut self, particle: &mut Particle, progress: f64, _dt: f64) {
        let t = self.cycled(progress);
        let Some(mut color) = self.transition.sample(t, self.space) else {
            return;
        };

        if self.jitter > 0.0 {
            let rng = &mut self.rng;
            color = Color::new(
                color.r + random::signed_unit(rng) * self.jitter,
                color.g + random::signed_unit(rng) * self.jitter,
                color.b + random::signed_unit(rng) * self.jitter,
                color.a,
            );
        }

        let birth = particle.birth().color;
        if self.preserve_brightness {
            let current = color.luminance();
            if current > 0.0 {
                let ratio = birth.luminance() / current;
                color = Color::new(color.r * ratio, color.g * ratio, color.b * ratio, color.a);
            }
        }
        if self.preserve_alpha {
            color = color.with_alpha(birth.a);
        }
        particle.color = color;
    }

    fn name(&self) -> &'static str {
        "color"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleInit;

    fn particle(color: Color, normalized_age: f64) -> Particle {
        let mut p = Particle::new(&ParticleInit {
            color,
            lifetime: 1.0,
            ..Default::default()
        });
        p.age = normalized_age;
        p
    }

    #[test]
    fn test_two_color_midpoint() {
        let mut behavior = ColorBehavior::two_color(Color::BLACK, Color::WHITE);
        let mut p = particle(Color::WHITE, 0.5);
        behavior.apply(&mut p, 0.1);
        assert!((p.color.r - 0.5).abs() < 1e-12);
        assert!((p.color.g - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_gradient_stops_are_sorted() {
        let transition = ColorTransition::gradient(vec![
            ColorStop::new(1.0, Color::BLUE),
            ColorStop::new(0.0, Color::RED),
            ColorStop::new(0.5, Color::GREEN),
        ]);
        assert_eq!(transition.sample(0.0, ColorSpace::Rgb), Some(Color::RED));
        assert_eq!(transition.sample(0.5, ColorSpace::Rgb), Some(Color::GREEN));
        assert_eq!(transition.sample(1.0, ColorSpace::Rgb), Some(Color::BLUE));

        let quarter = transition.sample(0.25, ColorSpace::Rgb).unwrap_or(Color::BLACK);
        assert!((quarter.r - 0.5).abs() < 1e-12 && (quarter.g - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_gradient_leaves_color() {
        let mut behavior = ColorBehavior::gradient(Vec::new());
        let mut p = particle(Color::RED, 0.5);
        behavior.apply(&mut p, 0.1);
        assert_eq!(p.color, Color::RED);
    }

    #[test]
    fn test_hsb_takes_short_hue_path() {
        // 红 (0°) → 品红 (300°)：最短路径经过 330°，不经过绿色
        let magenta = Color::rgb(1.0, 0.0, 1.0);
        let mid = ColorSpace::Hsb.mix(Color::RED, magenta, 0.5);
        assert!(mid.g.abs() < 1e-9);
        assert!((mid.r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cycles_wrap() {
        let behavior = ColorBehavior::two_color(Color::BLACK, Color::WHITE).with_cycles(2.0);
        assert!((behavior.cycled(0.75) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_preserve_alpha_and_brightness() {
        let mut behavior = ColorBehavior::two_color(Color::WHITE, Color::rgb(0.2, 0.2, 0.2))
            .preserving_brightness()
            .preserving_alpha();
        let mut p = particle(Color::new(0.5, 0.5, 0.5, 0.3), 1.0);
        behavior.apply(&mut p, 0.1);
        assert!((p.color.luminance() - 0.5).abs() < 1e-9);
        assert!((p.color.a - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_jitter_is_bounded() {
        let mut behavior = ColorBehavior::two_color(Color::rgb(0.5, 0.5, 0.5), Color::rgb(0.5, 0.5, 0.5))
            .with_jitter(0.05, Some(4));
        for _ in 0..50 {
            let mut p = particle(Color::WHITE, 0.3);
            behavior.apply(&mut p, 0.1);
            assert!((p.color.r - 0.5).abs() <= 0.05 + 1e-12);
        }
    }
}
