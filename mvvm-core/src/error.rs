//! 命令层统一错误定义
//!
//! 覆盖命令构造、动作执行与异步调度三类失败，
//! 便于绑定层统一处理。
//!
use thiserror::Error;

/// 命令错误
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CommandError {
    /// 构造命令时缺少必需的执行动作
    #[error("missing action: command={command}")]
    MissingAction { command: &'static str },

    /// 动作自身返回的失败，原样向调用方传播
    #[error("command action failed: {0}")]
    Action(#[source] anyhow::Error),

    /// 异步动作在执行过程中 panic
    #[error("command action panicked: command={command}")]
    Panicked { command: &'static str },

    /// 异步任务在完成前被运行时取消（例如运行时关闭）
    #[error("command action cancelled: command={command}")]
    Cancelled { command: &'static str },

    /// 异步命令在 tokio 运行时之外被调用
    #[error("no async runtime available: command={command}")]
    NoRuntime { command: &'static str },
}

impl CommandError {
    pub fn missing_action(command: &'static str) -> Self {
        Self::MissingAction { command }
    }
}

/// 统一 Result 类型别名
pub type CommandResult<T> = Result<T, CommandError>;
