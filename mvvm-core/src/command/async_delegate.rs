//! 异步委托命令
//!
//! 状态机：空闲 → `execute`（置忙并通知可执行状态变化）→ 在 tokio 运行时中派生任务执行动作
//! → 完成（成功、失败或 panic）→ 空闲（清除忙标记并再次通知）。
//!
//! 忙标记由 `ExecutionGuard` 持有，任务结束时随 drop 释放，保证任何退出路径都会复位。
//! `execute` 本身不检查忙标记，绑定层应先调用 `can_execute`（或使用 `try_execute`）。
//!
//! 线程：置忙通知在调用 `execute` 的线程上发出；复位通知在运行任务的线程上发出。
//! 多线程运行时中那是工作线程，界面宿主应在界面线程上运行 current-thread 运行时，
//! 或在 `can_execute_changed` 处理器中自行转发到界面线程。
//!
use super::parameter::{CommandParameter, reconcile};
use super::{Command, CommandSignals, impl_active_aware};
use crate::error::{CommandError, CommandResult};
use crate::event::Event;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type AsyncAction = Box<dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;
type AsyncActionOf<T> = Box<dyn Fn(T) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;
type Predicate = Box<dyn Fn() -> bool + Send + Sync>;
type PredicateOf<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// 执行状态：忙标记与通知
#[derive(Debug, Default)]
struct ExecutionState {
    is_executing: AtomicBool,
    signals: CommandSignals,
}

impl ExecutionState {
    fn is_executing(&self) -> bool {
        self.is_executing.load(Ordering::SeqCst)
    }
}

/// 忙标记守卫：创建时置忙，drop 时复位，两次都会通知可执行状态变化
struct ExecutionGuard {
    state: Arc<ExecutionState>,
}

impl ExecutionGuard {
    fn acquire(state: &Arc<ExecutionState>) -> Self {
        state.is_executing.store(true, Ordering::SeqCst);
        state.signals.can_execute_changed().raise(&());
        Self {
            state: state.clone(),
        }
    }
}

impl Drop for ExecutionGuard {
    fn drop(&mut self) {
        self.state.is_executing.store(false, Ordering::SeqCst);
        self.state.signals.can_execute_changed().raise(&());
    }
}

/// 异步执行句柄
///
/// 丢弃句柄即“发射后不管”，任务照常运行到结束；
/// 需要结果时调用 `wait` 取回动作的成功或失败。
#[must_use = "drop the handle explicitly to fire and forget"]
pub struct ExecutionHandle {
    name: &'static str,
    task: Option<JoinHandle<CommandResult<()>>>,
}

impl ExecutionHandle {
    fn completed(name: &'static str) -> Self {
        Self { name, task: None }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// 等待动作结束，返回其结果
    pub async fn wait(self) -> CommandResult<()> {
        let Some(task) = self.task else {
            return Ok(());
        };

        match task.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => Err(CommandError::Panicked { command: self.name }),
            Err(_) => Err(CommandError::Cancelled { command: self.name }),
        }
    }
}

impl fmt::Debug for ExecutionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionHandle")
            .field("command", &self.name)
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// 置忙并派生任务；无运行时则不改变任何状态
fn dispatch(
    name: &'static str,
    state: &Arc<ExecutionState>,
    action: impl FnOnce() -> BoxFuture<'static, anyhow::Result<()>>,
) -> CommandResult<ExecutionHandle> {
    let runtime =
        Handle::try_current().map_err(|_| CommandError::NoRuntime { command: name })?;

    let guard = ExecutionGuard::acquire(state);
    let future = action();

    debug!(command = name, "async command started");
    let task = runtime.spawn(async move {
        let _guard = guard;
        let result = future.await.map_err(CommandError::Action);
        match &result {
            Ok(()) => debug!(command = name, "async command finished"),
            Err(e) => warn!(command = name, error = %e, "async command failed"),
        }
        result
    });

    Ok(ExecutionHandle {
        name,
        task: Some(task),
    })
}

/// 无参数的异步命令
pub struct AsyncDelegateCommand {
    name: &'static str,
    execute: AsyncAction,
    can_execute: Option<Predicate>,
    state: Arc<ExecutionState>,
}

impl AsyncDelegateCommand {
    pub fn new<F, Fut>(execute: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            name: "AsyncDelegateCommand",
            execute: Box::new(move || execute().boxed()),
            can_execute: None,
            state: Arc::default(),
        }
    }

    pub fn with_can_execute<F, Fut, P>(execute: F, can_execute: P) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
        P: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            can_execute: Some(Box::new(can_execute)),
            ..Self::new(execute)
        }
    }

    pub fn from_parts(
        execute: Option<AsyncAction>,
        can_execute: Option<Predicate>,
    ) -> CommandResult<Self> {
        let execute = execute.ok_or(CommandError::missing_action("AsyncDelegateCommand"))?;
        Ok(Self {
            name: "AsyncDelegateCommand",
            execute,
            can_execute,
            state: Arc::default(),
        })
    }

    /// 为日志与错误指定命令名称
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn is_executing(&self) -> bool {
        self.state.is_executing()
    }

    /// 置忙并派生动作任务，返回可等待的句柄
    pub fn spawn(&self) -> CommandResult<ExecutionHandle> {
        dispatch(self.name, &self.state, || (self.execute)())
    }
}

impl Command for AsyncDelegateCommand {
    fn can_execute(&self, _parameter: Option<&dyn Any>) -> bool {
        if self.state.is_executing() {
            return false;
        }
        self.can_execute.as_ref().is_none_or(|p| p())
    }

    fn execute(&self, _parameter: Option<&dyn Any>) -> CommandResult<()> {
        self.spawn().map(drop)
    }

    fn can_execute_changed(&self) -> &Event {
        self.state.signals.can_execute_changed()
    }
}

impl_active_aware!(AsyncDelegateCommand, state.signals);

impl fmt::Debug for AsyncDelegateCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncDelegateCommand")
            .field("name", &self.name)
            .field("has_can_execute", &self.can_execute.is_some())
            .field("state", &self.state)
            .finish()
    }
}

/// 带类型参数的异步命令
pub struct AsyncDelegateCommandOf<T: CommandParameter> {
    name: &'static str,
    execute: AsyncActionOf<T>,
    can_execute: Option<PredicateOf<T>>,
    state: Arc<ExecutionState>,
}

impl<T: CommandParameter> AsyncDelegateCommandOf<T> {
    pub fn new<F, Fut>(execute: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            name: "AsyncDelegateCommandOf",
            execute: Box::new(move |value| execute(value).boxed()),
            can_execute: None,
            state: Arc::default(),
        }
    }

    pub fn with_can_execute<F, Fut, P>(execute: F, can_execute: P) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            can_execute: Some(Box::new(can_execute)),
            ..Self::new(execute)
        }
    }

    pub fn from_parts(
        execute: Option<AsyncActionOf<T>>,
        can_execute: Option<PredicateOf<T>>,
    ) -> CommandResult<Self> {
        let execute = execute.ok_or(CommandError::missing_action("AsyncDelegateCommandOf"))?;
        Ok(Self {
            name: "AsyncDelegateCommandOf",
            execute,
            can_execute,
            state: Arc::default(),
        })
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn is_executing(&self) -> bool {
        self.state.is_executing()
    }

    /// 以类型擦除的参数派生任务
    ///
    /// 值类型缺参时不派生任务：忙标记立即置位并复位，返回已完成的句柄。
    pub fn spawn(&self, parameter: Option<&dyn Any>) -> CommandResult<ExecutionHandle> {
        match reconcile::<T>(parameter) {
            Some(value) => self.spawn_with(value),
            None => {
                drop(ExecutionGuard::acquire(&self.state));
                Ok(ExecutionHandle::completed(self.name))
            }
        }
    }

    /// 以已知类型的参数派生任务
    pub fn spawn_with(&self, value: T) -> CommandResult<ExecutionHandle> {
        dispatch(self.name, &self.state, move || (self.execute)(value))
    }
}

impl<T: CommandParameter> Command for AsyncDelegateCommandOf<T> {
    fn can_execute(&self, parameter: Option<&dyn Any>) -> bool {
        if self.state.is_executing() {
            return false;
        }
        reconcile::<T>(parameter)
            .is_some_and(|value| self.can_execute.as_ref().is_none_or(|p| p(&value)))
    }

    fn execute(&self, parameter: Option<&dyn Any>) -> CommandResult<()> {
        self.spawn(parameter).map(drop)
    }

    fn can_execute_changed(&self) -> &Event {
        self.state.signals.can_execute_changed()
    }
}

impl_active_aware!(AsyncDelegateCommandOf<T>, state.signals);

impl<T: CommandParameter> fmt::Debug for AsyncDelegateCommandOf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncDelegateCommandOf")
            .field("name", &self.name)
            .field("parameter", &std::any::type_name::<T>())
            .field("has_can_execute", &self.can_execute.is_some())
            .field("state", &self.state)
            .finish()
    }
}
