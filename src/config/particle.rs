//! 粒子效果配置记录
//!
//! 这是核心唯一的入站配置面：发射参数、粒子属性范围、调色板、
//! 发射形状以及物理默认值。预设目录（火焰、烟雾、雪花……）
//! 只是满足该结构的静态数据。

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{ConfigError, ConfigFile, ConfigResult, EmissionShape, ValueRange};
use crate::impl_default;
use crate::math::{Bounds, Vector2D};
use crate::particle::{Color, ParticleShape};
use crate::render::BlendMode;

/// 质量下限（避免除零）
pub const MIN_MASS: f64 = 1e-3;

/// 粒子效果配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfiguration {
    /// 每秒发射数量（连续模式）
    pub emission_rate: f64,
    /// 该发射器允许的最大存活粒子数
    pub max_particles: usize,
    /// 每次爆发的粒子数（0 = 连续模式）
    pub burst_count: usize,
    /// 爆发间隔（秒）
    pub burst_interval: f64,
    /// 启动延迟（秒）
    pub start_delay: f64,
    /// 发射持续时间（None = 无限）
    pub duration: Option<f64>,
    /// 持续时间结束后是否循环
    pub loops: bool,
    pub lifetime: ValueRange,
    pub speed: ValueRange,
    /// 粒子边长
    pub size: ValueRange,
    pub opacity: ValueRange,
    pub scale: ValueRange,
    /// 初始旋转（弧度）
    pub rotation: ValueRange,
    /// 角速度（弧度/秒）
    pub angular_velocity: ValueRange,
    pub mass: ValueRange,
    /// 调色板（均匀随机选取）
    pub colors: Vec<Color>,
    pub shape: EmissionShape,
    pub particle_shape: ParticleShape,
    /// 发射方向（弧度，屏幕坐标 y 向下，默认朝上）
    pub direction: f64,
    /// 方向扩散角（弧度，总宽度）
    pub spread: f64,
    pub trail_length: usize,
    pub physics: PhysicsSettings,
    pub blend_mode: BlendMode,
}

impl_default!(ParticleConfiguration {
    emission_rate: 10.0,
    max_particles: 100,
    burst_count: 0,
    burst_interval: 1.0,
    start_delay: 0.0,
    duration: None,
    loops: true,
    lifetime: ValueRange::new(1.0, 2.0),
    speed: ValueRange::new(50.0, 100.0),
    size: ValueRange::new(5.0, 10.0),
    opacity: ValueRange::constant(1.0),
    scale: ValueRange::constant(1.0),
    rotation: ValueRange::constant(0.0),
    angular_velocity: ValueRange::constant(0.0),
    mass: ValueRange::constant(1.0),
    colors: vec![Color::WHITE],
    shape: EmissionShape::default(),
    particle_shape: ParticleShape::Circle,
    direction: -FRAC_PI_2,
    spread: 0.5,
    trail_length: 0,
    physics: PhysicsSettings::default(),
    blend_mode: BlendMode::Normal,
});

impl ConfigFile for ParticleConfiguration {}

impl ParticleConfiguration {
    /// 验证配置（拒绝非法值）
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.emission_rate.is_finite() || self.emission_rate < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "emission_rate must be a non-negative number, got {}",
                self.emission_rate
            )));
        }
        if self.max_particles == 0 {
            return Err(ConfigError::ValidationError(
                "max_particles must be greater than zero".to_string(),
            ));
        }
        if self.burst_count > 0 && !(self.burst_interval.is_finite() && self.burst_interval > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "burst_interval must be positive, got {}",
                self.burst_interval
            )));
        }
        if !self.start_delay.is_finite() || self.start_delay < 0.0 {
            return Err(ConfigError::ValidationError("Invalid start_delay".to_string()));
        }
        if let Some(duration) = self.duration {
            if !duration.is_finite() || duration <= 0.0 {
                return Err(ConfigError::ValidationError("Invalid duration".to_string()));
            }
        }

        let ranges = [
            ("lifetime", self.lifetime),
            ("speed", self.speed),
            ("size", self.size),
            ("opacity", self.opacity),
            ("scale", self.scale),
            ("rotation", self.rotation),
            ("angular_velocity", self.angular_velocity),
            ("mass", self.mass),
        ];
        for (name, range) in ranges {
            if !range.is_finite() || range.min > range.max {
                return Err(ConfigError::ValidationError(format!("Invalid {} range", name)));
            }
        }
        if self.lifetime.min <= 0.0 {
            return Err(ConfigError::ValidationError("lifetime must be positive".to_string()));
        }
        if self.mass.min <= 0.0 {
            return Err(ConfigError::ValidationError("mass must be positive".to_string()));
        }
        if !self.direction.is_finite() || !self.spread.is_finite() {
            return Err(ConfigError::ValidationError("Invalid direction or spread".to_string()));
        }
        self.physics.validate()
    }

    /// 返回修正后的配置（钳制而非拒绝）
    ///
    /// 反向区间交换，非有限值替换为默认值，质量与寿命保持为正。
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut config = self.clone();

        if !config.emission_rate.is_finite() || config.emission_rate < 0.0 {
            warn!(target: "particles", "emission_rate {} clamped to 0", config.emission_rate);
            config.emission_rate = 0.0;
        }
        if config.max_particles == 0 {
            warn!(target: "particles", "max_particles 0 raised to 1");
            config.max_particles = 1;
        }
        if !(config.burst_interval.is_finite() && config.burst_interval > 0.0) {
            config.burst_interval = defaults.burst_interval;
        }
        if !config.start_delay.is_finite() || config.start_delay < 0.0 {
            config.start_delay = 0.0;
        }
        config.duration = config.duration.filter(|d| d.is_finite() && *d > 0.0);

        config.lifetime = config.lifetime.sanitized(defaults.lifetime);
        if config.lifetime.min <= 0.0 {
            warn!(target: "particles", "non-positive lifetime range clamped");
            config.lifetime = ValueRange::new(config.lifetime.min.max(1e-3), config.lifetime.max.max(1e-3));
        }
        config.speed = config.speed.sanitized(defaults.speed);
        config.size = config.size.sanitized(defaults.size).clamped(0.0, f64::MAX);
        config.opacity = config.opacity.sanitized(defaults.opacity).clamped(0.0, 1.0);
        config.scale = config.scale.sanitized(defaults.scale);
        config.rotation = config.rotation.sanitized(defaults.rotation);
        config.angular_velocity = config.angular_velocity.sanitized(defaults.angular_velocity);
        config.mass = config.mass.sanitized(defaults.mass).clamped(MIN_MASS, f64::MAX);

        if config.colors.is_empty() {
            config.colors = defaults.colors;
        }
        if !config.direction.is_finite() {
            config.direction = defaults.direction;
        }
        if !config.spread.is_finite() {
            config.spread = defaults.spread;
        }
        config.physics = config.physics.sanitized();
        config
    }
}

/// 物理默认值
///
/// `ParticleSystem::from_configuration` 据此安装默认力并设置阻尼/边界。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// 重力强度（0 = 不安装重力）
    pub gravity: f64,
    pub gravity_direction: Vector2D,
    /// 风力强度（0 = 不安装风力）
    pub wind_strength: f64,
    pub wind_direction: Vector2D,
    /// 速度阻尼（每物理步乘以 `1 - drag`）
    pub drag: f64,
    /// 湍流强度（0 = 不安装湍流）
    pub turbulence_strength: f64,
    pub turbulence_frequency: f64,
    pub bounds_collision: bool,
    pub bounds: Option<Bounds>,
    /// 反弹系数 `[0, 1]`
    pub bounciness: f64,
}

impl_default!(PhysicsSettings {
    gravity: 0.0,
    gravity_direction: Vector2D::Y,
    wind_strength: 0.0,
    wind_direction: Vector2D::X,
    drag: 0.0,
    turbulence_strength: 0.0,
    turbulence_frequency: 0.01,
    bounds_collision: false,
    bounds: None,
    bounciness: 0.5,
});

impl PhysicsSettings {
    pub fn validate(&self) -> ConfigResult<()> {
        let scalars = [
            ("gravity", self.gravity),
            ("wind_strength", self.wind_strength),
            ("turbulence_strength", self.turbulence_strength),
            ("turbulence_frequency", self.turbulence_frequency),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigError::ValidationError(format!("{} must be finite", name)));
            }
        }
        if !(0.0..1.0).contains(&self.drag) {
            return Err(ConfigError::ValidationError(format!(
                "drag must be in [0, 1), got {}",
                self.drag
            )));
        }
        if !(0.0..=1.0).contains(&self.bounciness) {
            return Err(ConfigError::ValidationError(format!(
                "bounciness must be in [0, 1], got {}",
                self.bounciness
            )));
        }
        if self.bounds_collision && self.bounds.is_none() {
            return Err(ConfigError::ValidationError(
                "bounds_collision requires bounds".to_string(),
            ));
        }
        Ok(())
    }

    pub fn sanitized(&self) -> Self {
        let mut physics = self.clone();
        let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0.0 };
        physics.gravity = finite_or_zero(physics.gravity);
        physics.wind_strength = finite_or_zero(physics.wind_strength);
        physics.turbulence_strength = finite_or_zero(physics.turbulence_strength);
        physics.turbulence_frequency = finite_or_zero(physics.turbulence_frequency);
        physics.drag = if physics.drag.is_finite() {
            physics.drag.clamp(0.0, 0.999)
        } else {
            0.0
        };
        physics.bounciness = if physics.bounciness.is_finite() {
            physics.bounciness.clamp(0.0, 1.0)
        } else {
            0.5
        };
        if physics.bounds_collision && physics.bounds.is_none() {
            warn!(target: "particles", "bounds_collision disabled: no bounds configured");
            physics.bounds_collision = false;
        }
        physics
    }
}
