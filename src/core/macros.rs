//! 核心宏定义
//!
//! 提供统一的宏来减少配置记录的样板代码

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use particle_engine::impl_default;
///
/// struct Spark {
///     lifetime: f64,
///     label: String,
/// }
///
/// impl_default!(Spark {
///     lifetime: 1.5,
///     label: String::from("spark"),
/// });
///
/// assert_eq!(Spark::default().lifetime, 1.5);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    struct Sample {
        rate: f64,
        count: usize,
    }

    impl_default!(Sample {
        rate: 50.0,
        count: 3,
    });

    #[test]
    fn test_impl_default() {
        let sample = Sample::default();
        assert_eq!(sample.rate, 50.0);
        assert_eq!(sample.count, 3);
    }
}
