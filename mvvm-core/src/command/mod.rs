//! 命令（Command）
//!
//! 将界面触发的动作桥接到应用逻辑：
//! - `DelegateCommand` / `DelegateCommandOf<T>`：同步执行，动作在调用线程内完成；
//! - `AsyncDelegateCommand` / `AsyncDelegateCommandOf<T>`：在 tokio 运行时中派生任务执行，
//!   执行期间 `can_execute` 返回 `false`，完成（含失败）后自动恢复。
//!
//! 可执行状态不做依赖追踪，持有者需要在依赖变化时调用 `raise_can_execute_changed`，
//! 绑定层收到通知后重新查询 `can_execute`。
//!
pub mod async_delegate;
pub mod delegate;
pub mod parameter;

pub use async_delegate::{AsyncDelegateCommand, AsyncDelegateCommandOf, ExecutionHandle};
pub use delegate::{DelegateCommand, DelegateCommandOf};
pub use parameter::{CommandParameter, reconcile};

use crate::error::CommandResult;
use crate::event::Event;
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};

/// 面向绑定层的命令接口
pub trait Command: Send + Sync {
    /// 当前是否可执行；纯查询，无副作用
    fn can_execute(&self, parameter: Option<&dyn Any>) -> bool;

    /// 执行命令
    ///
    /// 同步命令返回动作自身的结果；异步命令在派生任务后立即返回。
    /// 实现不会再次检查 `can_execute`，调用方应先查询（或使用 `try_execute`）。
    fn execute(&self, parameter: Option<&dyn Any>) -> CommandResult<()>;

    /// 可执行状态可能已变化
    fn can_execute_changed(&self) -> &Event;

    fn raise_can_execute_changed(&self) {
        self.can_execute_changed().raise(&());
    }

    /// 先查询 `can_execute`，可执行时才执行；返回是否执行
    fn try_execute(&self, parameter: Option<&dyn Any>) -> CommandResult<bool> {
        if !self.can_execute(parameter) {
            return Ok(false);
        }
        self.execute(parameter)?;
        Ok(true)
    }
}

/// 活动状态（常用于界面指示，例如高亮当前选中的按钮）
pub trait ActiveAware {
    fn is_active(&self) -> bool;

    /// 设置活动状态，仅在值变化时触发 `is_active_changed`
    fn set_is_active(&self, active: bool);

    fn is_active_changed(&self) -> &Event;
}

/// 命令共享的活动状态与通知
#[derive(Debug, Default)]
pub(crate) struct CommandSignals {
    can_execute_changed: Event,
    is_active: AtomicBool,
    is_active_changed: Event,
}

impl CommandSignals {
    pub(crate) fn can_execute_changed(&self) -> &Event {
        &self.can_execute_changed
    }

    pub(crate) fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }

    pub(crate) fn set_is_active(&self, active: bool) {
        if self.is_active.swap(active, Ordering::SeqCst) != active {
            self.is_active_changed.raise(&());
        }
    }

    pub(crate) fn is_active_changed(&self) -> &Event {
        &self.is_active_changed
    }
}

macro_rules! impl_active_aware {
    ($ty:ident $(<$g:ident>)?, $($field:ident).+) => {
        impl$(<$g: $crate::command::CommandParameter>)? $crate::command::ActiveAware for $ty$(<$g>)? {
            fn is_active(&self) -> bool {
                self.$($field).+.is_active()
            }

            fn set_is_active(&self, active: bool) {
                self.$($field).+.set_is_active(active)
            }

            fn is_active_changed(&self) -> &$crate::event::Event {
                self.$($field).+.is_active_changed()
            }
        }
    };
}

pub(crate) use impl_active_aware;
