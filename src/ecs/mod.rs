//! bevy_ecs 集成
//!
//! `ParticleSystem` 本身就是一个 `Resource`。宿主每帧写入 [`FrameTime`]，
//! 然后在自己的 `Schedule` 中运行：
//!
//! ```text
//! advance_particle_systems → publish_particle_frames
//! ```

use bevy_ecs::prelude::*;

use crate::render::FrameSender;
use crate::system::ParticleSystem;

/// 宿主提供的帧时间
#[derive(Resource, Clone, Copy, Debug)]
pub struct FrameTime {
    pub delta_seconds: f64,
    pub elapsed_seconds: f64,
}

impl Default for FrameTime {
    fn default() -> Self {
        Self {
            delta_seconds: 0.0,
            elapsed_seconds: 0.0,
        }
    }
}

impl FrameTime {
    /// 推进一帧
    pub fn tick(&mut self, delta_seconds: f64) {
        self.delta_seconds = delta_seconds;
        self.elapsed_seconds += delta_seconds;
    }
}

/// 渲染帧输出通道
#[derive(Resource, Clone)]
pub struct ParticleFrameOutput(pub FrameSender);

/// 用本帧时间推进粒子系统
pub fn advance_particle_systems(time: Res<FrameTime>, mut system: ResMut<ParticleSystem>) {
    system.update(time.delta_seconds);
}

/// 把当前粒子快照发布给渲染线程
pub fn publish_particle_frames(system: Res<ParticleSystem>, output: Option<Res<ParticleFrameOutput>>) {
    let Some(output) = output else {
        return;
    };
    output.0.publish(system.render_frame());
}
