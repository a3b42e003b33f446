use serde::{Deserialize, Serialize};

/// 粒子系统生命周期状态
///
/// ```text
/// Stopped ──start──▶ Running ◀──resume── Paused
///    ▲                  │  └───pause────▶   │
///    │                  ▼                    │
///    └──stop── Completed（自动）  ◀──stop────┘
/// ```
///
/// 任意状态都可以通过 `stop` 回到 `Stopped`；`Completed` 只能通过 `start` 重新运行。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SystemState {
    #[default]
    Stopped,
    Running,
    Paused,
    Completed,
}

impl SystemState {
    /// 是否推进模拟
    pub fn is_running(self) -> bool {
        self == SystemState::Running
    }

    /// Stopped 或 Completed
    pub fn is_idle(self) -> bool {
        matches!(self, SystemState::Stopped | SystemState::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stopped() {
        assert_eq!(SystemState::default(), SystemState::Stopped);
        assert!(SystemState::Stopped.is_idle());
        assert!(SystemState::Completed.is_idle());
        assert!(!SystemState::Paused.is_idle());
        assert!(SystemState::Running.is_running());
    }
}
