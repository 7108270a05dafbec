//! 命令参数（CommandParameter）
//!
//! 绑定层以 `Option<&dyn Any>` 传入参数，带类型的命令在边界处按以下规则还原：
//! 1. 参数存在且类型为 `T`：直接使用；
//! 2. 参数缺失且 `T` 为可空类型：使用 `T` 的空值；
//! 3. 参数缺失且 `T` 为值类型：不可执行，执行时静默跳过；
//! 4. 参数存在但类型不符：无论哪种类型都不可执行，执行时静默跳过。
//!
//! 可空类型即 `Option<U>`，空值为 `None`；其余实现者均视为值类型。
//! 自定义类型只需 `impl CommandParameter for MyType {}` 即可作为值类型使用。
//!
use std::any::Any;
use std::sync::Arc;

/// 可作为命令参数的类型
pub trait CommandParameter: Any + Clone + Send + Sync {
    /// 参数缺失时的替代值；返回 `None` 表示该类型为值类型
    fn absent() -> Option<Self> {
        None
    }

    /// 从类型擦除的参数中还原
    fn from_any(value: &dyn Any) -> Option<Self> {
        value.downcast_ref::<Self>().cloned()
    }
}

impl<U> CommandParameter for Option<U>
where
    U: Any + Clone + Send + Sync,
{
    fn absent() -> Option<Self> {
        Some(None)
    }

    fn from_any(value: &dyn Any) -> Option<Self> {
        if let Some(v) = value.downcast_ref::<Option<U>>() {
            return Some(v.clone());
        }
        value.downcast_ref::<U>().map(|v| Some(v.clone()))
    }
}

macro_rules! value_parameters {
    ($($ty:ty),* $(,)?) => {
        $(impl CommandParameter for $ty {})*
    };
}

value_parameters!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, &'static str,
);

impl<U> CommandParameter for Vec<U> where U: Any + Clone + Send + Sync {}

impl<U> CommandParameter for Arc<U> where U: Any + Send + Sync + ?Sized {}

/// 按上述规则还原参数；`None` 表示命令不可执行
pub fn reconcile<T: CommandParameter>(parameter: Option<&dyn Any>) -> Option<T> {
    match parameter {
        Some(value) => T::from_any(value),
        None => T::absent(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Point {
        x: i32,
    }

    impl CommandParameter for Point {}

    #[test]
    fn matching_value_is_used_directly() {
        assert_eq!(reconcile::<i32>(Some(&5i32)), Some(5));
        assert_eq!(
            reconcile::<String>(Some(&"hi".to_string())),
            Some("hi".to_string())
        );
        assert_eq!(reconcile::<Point>(Some(&Point { x: 1 })), Some(Point { x: 1 }));
    }

    #[test]
    fn absent_value_kind_is_not_executable() {
        assert_eq!(reconcile::<i32>(None), None);
        assert_eq!(reconcile::<Point>(None), None);
    }

    #[test]
    fn absent_nullable_kind_yields_empty_value() {
        assert_eq!(reconcile::<Option<String>>(None), Some(None));
    }

    #[test]
    fn mismatched_type_is_rejected_for_both_kinds() {
        assert_eq!(reconcile::<i32>(Some(&"five")), None);
        assert_eq!(reconcile::<Option<i32>>(Some(&"five")), None);
        assert_eq!(reconcile::<Option<String>>(Some(&42i32)), None);
    }

    #[test]
    fn nullable_kind_accepts_inner_value() {
        assert_eq!(reconcile::<Option<i32>>(Some(&7i32)), Some(Some(7)));
        assert_eq!(reconcile::<Option<i32>>(Some(&Some(8i32))), Some(Some(8)));
    }
}
