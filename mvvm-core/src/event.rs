//! 多播事件（Event）
//!
//! 视图模型与命令对外暴露的通知通道，例如属性变更、可执行状态变更等。
//! - `subscribe` 返回订阅标识，可用于 `unsubscribe`；
//! - `raise` 先复制处理器列表再逐个调用，处理器内部可以再次订阅或查询发送方。
//!
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

type Handler<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// 订阅标识
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// 事件：维护一组处理器，按订阅顺序通知
pub struct Event<A = ()> {
    next_id: AtomicU64,
    handlers: RwLock<Vec<(SubscriptionId, Handler<A>)>>,
}

impl<A> Default for Event<A> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            handlers: RwLock::new(Vec::new()),
        }
    }
}

impl<A> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

impl<A> Event<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 订阅事件
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(handler)));
        id
    }

    /// 取消订阅，返回是否确实移除了处理器
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let before = handlers.len();
        handlers.retain(|(sid, _)| *sid != id);
        handlers.len() != before
    }

    /// 触发事件
    pub fn raise(&self, args: &A) {
        // 在锁外调用，允许处理器重入
        let snapshot: Vec<Handler<A>> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, h)| h.clone())
            .collect();

        for handler in snapshot {
            handler(args);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
