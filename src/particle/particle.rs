//! 粒子实例状态
//!
//! 状态机：Spawned → Alive → Dead。"死亡"不是显式字段，
//! 而是由 [`Particle::is_alive`] 推导；是否移除由编排器决定。

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::core::ParticleId;
use crate::impl_default;
use crate::math::Vector2D;

use super::{Color, ParticleShape, Size};

/// 透明度低于该值的粒子视为死亡
pub const ALIVE_OPACITY_EPSILON: f64 = 1e-3;

/// 粒子初始化参数
///
/// 发射器产生、对象池消费。新建与回收走同一套字段，保证两条路径行为一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleInit {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub rotation: f64,
    pub angular_velocity: f64,
    pub scale: f64,
    pub opacity: f64,
    pub color: Color,
    pub lifetime: f64,
    pub mass: f64,
    pub size: Size,
    pub shape: ParticleShape,
    /// 轨迹历史长度（0 = 不记录）
    pub max_trail_length: usize,
}

impl_default!(ParticleInit {
    position: Vector2D::ZERO,
    velocity: Vector2D::ZERO,
    rotation: 0.0,
    angular_velocity: 0.0,
    scale: 1.0,
    opacity: 1.0,
    color: Color::WHITE,
    lifetime: 1.0,
    mass: 1.0,
    size: Size::default(),
    shape: ParticleShape::Circle,
    max_trail_length: 0,
});

/// 出生状态快照（构造时捕获，此后不变）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirthState {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub color: Color,
    pub scale: f64,
    pub opacity: f64,
    pub size: Size,
}

/// 粒子
#[derive(Debug, Clone)]
pub struct Particle {
    id: ParticleId,
    pub position: Vector2D,
    pub velocity: Vector2D,
    /// 本物理步累积的加速度（每步开头清零）
    pub acceleration: Vector2D,
    pub rotation: f64,
    pub angular_velocity: f64,
    pub scale: f64,
    pub opacity: f64,
    pub color: Color,
    pub age: f64,
    pub lifetime: f64,
    pub mass: f64,
    pub size: Size,
    pub shape: ParticleShape,
    birth: BirthState,
    trail: VecDeque<Vector2D>,
    max_trail_length: usize,
    custom: HashMap<String, f64>,
}

impl Particle {
    /// 创建新粒子
    pub fn new(init: &ParticleInit) -> Self {
        let mut particle = Self {
            id: ParticleId::next(),
            position: Vector2D::ZERO,
            velocity: Vector2D::ZERO,
            acceleration: Vector2D::ZERO,
            rotation: 0.0,
            angular_velocity: 0.0,
            scale: 1.0,
            opacity: 1.0,
            color: Color::WHITE,
            age: 0.0,
            lifetime: 1.0,
            mass: 1.0,
            size: Size::default(),
            shape: ParticleShape::Circle,
            birth: BirthState {
                position: Vector2D::ZERO,
                velocity: Vector2D::ZERO,
                color: Color::WHITE,
                scale: 1.0,
                opacity: 1.0,
                size: Size::default(),
            },
            trail: VecDeque::with_capacity(init.max_trail_length),
            max_trail_length: 0,
            custom: HashMap::new(),
        };
        particle.reset(init);
        particle
    }

    /// 用新参数覆盖全部字段（对象池回收路径）
    ///
    /// 分配新的标识，清空轨迹与扩展表，年龄归零，重新捕获出生快照。
    /// 轨迹和扩展表的已分配容量会被保留。
    pub fn reset(&mut self, init: &ParticleInit) {
        self.id = ParticleId::next();
        self.position = init.position;
        self.velocity = init.velocity;
        self.acceleration = Vector2D::ZERO;
        self.rotation = init.rotation;
        self.angular_velocity = init.angular_velocity;
        self.scale = init.scale;
        self.opacity = init.opacity.clamp(0.0, 1.0);
        self.color = Color::new(init.color.r, init.color.g, init.color.b, init.color.a);
        self.age = 0.0;
        self.lifetime = init.lifetime;
        self.mass = init.mass;
        self.size = init.size;
        self.shape = init.shape;
        self.max_trail_length = init.max_trail_length;
        self.trail.clear();
        self.custom.clear();
        self.birth = BirthState {
            position: self.position,
            velocity: self.velocity,
            color: self.color,
            scale: self.scale,
            opacity: self.opacity,
            size: self.size,
        };
    }

    /// 清除瞬态状态（加速度、轨迹），用于归还对象池
    pub fn clear_transient(&mut self) {
        self.acceleration = Vector2D::ZERO;
        self.trail.clear();
    }

    pub fn id(&self) -> ParticleId {
        self.id
    }

    pub fn birth(&self) -> &BirthState {
        &self.birth
    }

    /// 轨迹历史（最新在前）
    pub fn trail(&self) -> impl Iterator<Item = &Vector2D> {
        self.trail.iter()
    }

    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    pub fn max_trail_length(&self) -> usize {
        self.max_trail_length
    }

    /// `age < lifetime` 且透明度高于阈值
    pub fn is_alive(&self) -> bool {
        self.age < self.lifetime && self.opacity > ALIVE_OPACITY_EPSILON
    }

    /// 归一化年龄，钳制到 `[0, 1]`；寿命非正时视为 1
    pub fn normalized_age(&self) -> f64 {
        if self.lifetime <= 0.0 {
            return 1.0;
        }
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }

    /// 剩余寿命（秒）
    pub fn remaining_life(&self) -> f64 {
        (self.lifetime - self.age).max(0.0)
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// 累加力：`acceleration += force / mass`
    ///
    /// 质量非正或力非有限时跳过，绝不产生 NaN/Inf。
    pub fn apply_force(&mut self, force: Vector2D) {
        if self.mass <= 0.0 || !force.is_finite() {
            return;
        }
        self.acceleration += force / self.mass;
    }

    /// 施加冲量：`velocity += impulse / mass`（质量非正时跳过）
    pub fn apply_impulse(&mut self, impulse: Vector2D) {
        if self.mass <= 0.0 || !impulse.is_finite() {
            return;
        }
        self.velocity += impulse / self.mass;
    }

    /// 清零加速度；每个物理步在施加任何力之前调用一次
    pub fn reset_forces(&mut self) {
        self.acceleration = Vector2D::ZERO;
    }

    /// 积分一步
    pub fn update(&mut self, dt: f64) {
        if self.max_trail_length > 0 {
            self.trail.push_front(self.position);
            self.trail.truncate(self.max_trail_length);
        }
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
        self.rotation += self.angular_velocity * dt;
        self.age += dt;
    }

    /// 立即结束生命（下一次清扫时回收）
    pub fn kill(&mut self) {
        self.age = self.age.max(self.lifetime);
    }

    /// 读取扩展字段
    pub fn custom(&self, key: &str) -> Option<f64> {
        self.custom.get(key).copied()
    }

    /// 写入扩展字段
    pub fn set_custom(&mut self, key: impl Into<String>, value: f64) {
        self.custom.insert(key.into(), value);
    }

    pub fn custom_fields(&self) -> &HashMap<String, f64> {
        &self.custom
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::new(&ParticleInit::default())
    }
}
