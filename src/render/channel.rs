//! 模拟线程 → 渲染线程的帧传递
//!
//! 容量为 1 的有界通道：渲染端总是拿到最近一帧完整快照，
//! 模拟端在渲染端落后时用新帧替换旧帧，永不阻塞。

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};

use super::RenderFrame;

/// 帧发送端（模拟线程持有）
#[derive(Clone)]
pub struct FrameSender {
    sender: Sender<RenderFrame>,
    // 发送端也持有接收端，用于丢弃渲染端尚未取走的旧帧
    stale: Receiver<RenderFrame>,
}

/// 帧接收端（渲染线程持有）
#[derive(Clone)]
pub struct FrameReceiver {
    receiver: Receiver<RenderFrame>,
}

/// 创建一对帧通道
pub fn frame_channel() -> (FrameSender, FrameReceiver) {
    let (sender, receiver) = bounded(1);
    (
        FrameSender {
            sender,
            stale: receiver.clone(),
        },
        FrameReceiver { receiver },
    )
}

impl FrameSender {
    /// 发布一帧；若上一帧尚未被取走则替换它
    pub fn publish(&self, frame: RenderFrame) {
        let mut frame = frame;
        loop {
            match self.sender.try_send(frame) {
                Ok(()) | Err(TrySendError::Disconnected(_)) => return,
                Err(TrySendError::Full(rejected)) => {
                    let _ = self.stale.try_recv();
                    frame = rejected;
                }
            }
        }
    }
}

impl FrameReceiver {
    /// 取最新一帧（没有新帧时返回 `None`）
    pub fn latest(&self) -> Option<RenderFrame> {
        let mut latest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(frame) => latest = Some(frame),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return latest,
            }
        }
    }

    /// 阻塞等待下一帧
    pub fn recv(&self) -> Option<RenderFrame> {
        self.receiver.recv().ok()
    }
}
