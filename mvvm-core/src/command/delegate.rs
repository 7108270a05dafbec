//! 同步委托命令
//!
//! 动作在调用线程内执行，适合短小的界面逻辑；耗时操作请使用
//! [`AsyncDelegateCommand`](super::AsyncDelegateCommand)。
//!
use super::parameter::{CommandParameter, reconcile};
use super::{Command, CommandSignals, impl_active_aware};
use crate::error::{CommandError, CommandResult};
use crate::event::Event;
use std::any::Any;
use std::fmt;

type Action = Box<dyn Fn() -> anyhow::Result<()> + Send + Sync>;
type Predicate = Box<dyn Fn() -> bool + Send + Sync>;
type ActionOf<T> = Box<dyn Fn(T) -> anyhow::Result<()> + Send + Sync>;
type PredicateOf<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// 无参数的同步命令
pub struct DelegateCommand {
    execute: Action,
    can_execute: Option<Predicate>,
    signals: CommandSignals,
}

impl DelegateCommand {
    /// 创建命令，始终可执行
    pub fn new<F>(execute: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            execute: Box::new(execute),
            can_execute: None,
            signals: CommandSignals::default(),
        }
    }

    /// 创建命令，并指定可执行判断
    pub fn with_can_execute<F, P>(execute: F, can_execute: P) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
        P: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            can_execute: Some(Box::new(can_execute)),
            ..Self::new(execute)
        }
    }

    /// 由可选部件组装命令，缺少动作时立即失败
    pub fn from_parts(execute: Option<Action>, can_execute: Option<Predicate>) -> CommandResult<Self> {
        let execute = execute.ok_or(CommandError::missing_action("DelegateCommand"))?;
        Ok(Self {
            execute,
            can_execute,
            signals: CommandSignals::default(),
        })
    }
}

impl Command for DelegateCommand {
    fn can_execute(&self, _parameter: Option<&dyn Any>) -> bool {
        self.can_execute.as_ref().is_none_or(|p| p())
    }

    fn execute(&self, _parameter: Option<&dyn Any>) -> CommandResult<()> {
        (self.execute)().map_err(CommandError::Action)
    }

    fn can_execute_changed(&self) -> &Event {
        self.signals.can_execute_changed()
    }
}

impl_active_aware!(DelegateCommand, signals);

impl fmt::Debug for DelegateCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateCommand")
            .field("has_can_execute", &self.can_execute.is_some())
            .field("signals", &self.signals)
            .finish()
    }
}

/// 带类型参数的同步命令
pub struct DelegateCommandOf<T: CommandParameter> {
    execute: ActionOf<T>,
    can_execute: Option<PredicateOf<T>>,
    signals: CommandSignals,
}

impl<T: CommandParameter> DelegateCommandOf<T> {
    pub fn new<F>(execute: F) -> Self
    where
        F: Fn(T) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            execute: Box::new(execute),
            can_execute: None,
            signals: CommandSignals::default(),
        }
    }

    pub fn with_can_execute<F, P>(execute: F, can_execute: P) -> Self
    where
        F: Fn(T) -> anyhow::Result<()> + Send + Sync + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            can_execute: Some(Box::new(can_execute)),
            ..Self::new(execute)
        }
    }

    pub fn from_parts(
        execute: Option<ActionOf<T>>,
        can_execute: Option<PredicateOf<T>>,
    ) -> CommandResult<Self> {
        let execute = execute.ok_or(CommandError::missing_action("DelegateCommandOf"))?;
        Ok(Self {
            execute,
            can_execute,
            signals: CommandSignals::default(),
        })
    }

    /// 以已知类型的参数查询可执行状态
    pub fn can_execute_with(&self, value: &T) -> bool {
        self.can_execute.as_ref().is_none_or(|p| p(value))
    }

    /// 以已知类型的参数执行
    pub fn execute_with(&self, value: T) -> CommandResult<()> {
        (self.execute)(value).map_err(CommandError::Action)
    }
}

impl<T: CommandParameter> Command for DelegateCommandOf<T> {
    fn can_execute(&self, parameter: Option<&dyn Any>) -> bool {
        reconcile::<T>(parameter).is_some_and(|value| self.can_execute_with(&value))
    }

    fn execute(&self, parameter: Option<&dyn Any>) -> CommandResult<()> {
        match reconcile::<T>(parameter) {
            Some(value) => self.execute_with(value),
            // 值类型缺参：静默跳过
            None => Ok(()),
        }
    }

    fn can_execute_changed(&self) -> &Event {
        self.signals.can_execute_changed()
    }
}

impl_active_aware!(DelegateCommandOf<T>, signals);

impl<T: CommandParameter> fmt::Debug for DelegateCommandOf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateCommandOf")
            .field("parameter", &std::any::type_name::<T>())
            .field("has_can_execute", &self.can_execute.is_some())
            .field("signals", &self.signals)
            .finish()
    }
}
