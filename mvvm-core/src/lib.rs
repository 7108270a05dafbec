//! 视图模型基础库（mvvm-core）
//!
//! 为桌面界面的视图模型提供与具体界面框架无关的构件：
//! - 可观察对象（`observable`）：属性变更通知与按属性聚合的验证错误；
//! - 命令（`command`）：同步/异步委托命令，带可执行判断、忙标记与活动状态；
//! - 事件（`event`）：命令与视图模型共用的多播通知通道。
//!
//! 典型用法：
//! 1. 视图模型持有 `ObservableObject`，属性放在 `Mutex` / `RwLock` 中，setter 调用 `set_property`；
//! 2. 以 `DelegateCommand` / `AsyncDelegateCommand` 暴露界面动作；
//! 3. 依赖变化时调用 `raise_can_execute_changed`，绑定层据此重新查询 `can_execute`。
//!
//! ```rust
//! use mvvm_core::command::{Command, DelegateCommandOf};
//!
//! let cmd = DelegateCommandOf::<i32>::with_can_execute(|_| Ok(()), |v| *v > 0);
//! assert!(cmd.can_execute(Some(&1i32)));
//! assert!(!cmd.can_execute(None));
//! ```
//!
pub mod command;
pub mod error;
pub mod event;
pub mod observable;

pub use command::{
    ActiveAware, AsyncDelegateCommand, AsyncDelegateCommandOf, Command, CommandParameter,
    DelegateCommand, DelegateCommandOf, ExecutionHandle,
};
pub use error::{CommandError, CommandResult};
pub use event::{Event, SubscriptionId};
pub use observable::{
    DataErrorInfo, DataErrorsChangedArgs, NotifyPropertyChanged, ObservableObject,
    PropertyCell, PropertyChangedArgs,
};
