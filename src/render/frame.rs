//! 渲染边界数据结构
//!
//! 核心每帧导出一份只读的粒子渲染状态快照，渲染器（GPU 后端）只消费它，
//! 不会观察到正在被修改的粒子。

use serde::{Deserialize, Serialize};

use crate::particle::Particle;

/// 混合模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlendMode {
    #[default]
    Normal,
    Additive,
    Multiply,
    Screen,
    SoftLight,
}

/// 粒子渲染状态（对应着色器实例结构）
///
/// `#[repr(C)]` + `Pod`，可直接 `bytemuck::cast_slice` 上传到实例缓冲区。
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleRenderState {
    /// 位置
    pub position: [f32; 2],
    /// 尺寸（已乘以缩放）
    pub size: [f32; 2],
    /// 颜色（alpha 已乘以透明度）
    pub color: [f32; 4],
    /// 旋转（弧度）
    pub rotation: f32,
    /// 外形编号，见 [`crate::particle::ParticleShape::index`]
    pub shape: u32,
}

impl ParticleRenderState {
    /// 从粒子当前状态生成
    pub fn from_particle(particle: &Particle) -> Self {
        let size = particle.size.scaled(particle.scale);
        let color = particle.color;
        Self {
            position: [particle.position.x as f32, particle.position.y as f32],
            size: [size.width as f32, size.height as f32],
            color: [
                color.r as f32,
                color.g as f32,
                color.b as f32,
                (color.a * particle.opacity) as f32,
            ],
            rotation: particle.rotation as f32,
            shape: particle.shape.index(),
        }
    }
}

/// 一帧的渲染快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    /// 帧序号
    pub frame: u64,
    pub blend_mode: BlendMode,
    pub particles: Vec<ParticleRenderState>,
}

impl RenderFrame {
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// 实例缓冲区字节视图
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles)
    }
}

/// 渲染器接口（外部协作者）
pub trait ParticleRenderer {
    fn render(&mut self, frame: &RenderFrame);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{Color, ParticleInit, ParticleShape, Size};

    #[test]
    fn test_render_state_applies_scale_and_opacity() {
        let mut particle = Particle::new(&ParticleInit {
            size: Size::new(4.0, 2.0),
            color: Color::new(1.0, 0.5, 0.25, 0.8),
            shape: ParticleShape::Star,
            ..Default::default()
        });
        particle.scale = 2.0;
        particle.opacity = 0.5;

        let state = ParticleRenderState::from_particle(&particle);
        assert_eq!(state.size, [8.0, 4.0]);
        assert!((state.color[3] - 0.4).abs() < 1e-6);
        assert_eq!(state.shape, ParticleShape::Star.index());
    }

    #[test]
    fn test_frame_byte_view() {
        let frame = RenderFrame {
            frame: 1,
            blend_mode: BlendMode::Additive,
            particles: vec![ParticleRenderState::from_particle(&Particle::default()); 3],
        };
        assert_eq!(
            frame.as_bytes().len(),
            3 * std::mem::size_of::<ParticleRenderState>()
        );
    }
}
