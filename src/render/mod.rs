//! 渲染边界模块
//!
//! 核心不依赖任何图形 API。每帧导出：
//! - `RenderFrame` - 粒子渲染状态快照 + 混合模式
//! - `ParticleRenderer` - 外部渲染器实现的接收接口
//! - `frame_channel` - 跨线程传递快照的有界通道

pub mod channel;
pub mod frame;

pub use channel::{frame_channel, FrameReceiver, FrameSender};
pub use frame::{BlendMode, ParticleRenderState, ParticleRenderer, RenderFrame};
