use serde::{Deserialize, Serialize};

/// 注册句柄：由系统在注册时分配，移除后不再复用
macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            pub fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            pub fn raw(self) -> u64 {
                self.0
            }
        }
    };
}

define_handle!(
    /// 发射器句柄
    EmitterHandle
);

define_handle!(
    /// 力句柄
    ForceHandle
);

define_handle!(
    /// 行为句柄
    BehaviorHandle
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_handle_raw_round_trip() {
        let handle = EmitterHandle::from_raw(42);
        assert_eq!(handle.raw(), 42);
        assert_eq!(handle, EmitterHandle::from_raw(42));
        assert_ne!(handle, EmitterHandle::from_raw(43));
    }

    #[test]
    fn test_handles_hashable() {
        let set: HashSet<ForceHandle> = (0..4).map(ForceHandle::from_raw).collect();
        assert_eq!(set.len(), 4);
        assert!(set.contains(&ForceHandle::from_raw(3)));
    }
}
