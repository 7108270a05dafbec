//! 对话框参数（DialogParameters）
//!
//! 以字符串为键、任意类型为值的参数包，用于向对话框传入初始化数据，
//! 也用于在关闭时把数据带回调用方。
//! - 键唯一，重复写入以最后一次为准；
//! - 取值时请求类型必须与存入类型一致：`try_get` 视不一致为不存在，`get` 则返回错误。
//!
use crate::error::DialogError;
use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;

struct StoredValue {
    type_name: &'static str,
    value: Box<dyn Any + Send + Sync>,
}

#[derive(Default)]
pub struct DialogParameters {
    values: HashMap<String, StoredValue>,
}

impl DialogParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加参数，键为空白时返回错误
    pub fn add<T>(&mut self, key: impl Into<String>, value: T) -> Result<(), DialogError>
    where
        T: Any + Send + Sync,
    {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(DialogError::InvalidKey(key));
        }

        self.insert(key, value);
        Ok(())
    }

    /// 链式添加参数
    pub fn with<T>(mut self, key: impl Into<String>, value: T) -> Result<Self, DialogError>
    where
        T: Any + Send + Sync,
    {
        self.add(key, value)?;
        Ok(self)
    }

    pub(crate) fn insert<T>(&mut self, key: String, value: T)
    where
        T: Any + Send + Sync,
    {
        self.values.insert(
            key,
            StoredValue {
                type_name: type_name::<T>(),
                value: Box::new(value),
            },
        );
    }

    /// 强类型取值：键不存在或类型不一致时返回错误
    pub fn get<T: Any>(&self, key: &str) -> Result<&T, DialogError> {
        let stored = self
            .values
            .get(key)
            .ok_or_else(|| DialogError::KeyNotFound(key.to_string()))?;

        stored
            .value
            .downcast_ref::<T>()
            .ok_or_else(|| DialogError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
                found: stored.type_name,
            })
    }

    /// 安全取值：键不存在或类型不一致时返回 `None`
    pub fn try_get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key)?.value.downcast_ref::<T>()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// 移除参数并按类型取回；类型不一致时参数保留在包内
    pub fn remove<T: Any>(&mut self, key: &str) -> Option<T> {
        if !self.values.get(key)?.value.is::<T>() {
            return None;
        }
        let stored = self.values.remove(key)?;
        stored.value.downcast::<T>().ok().map(|v| *v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for DialogParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.values.iter().map(|(k, v)| (k, v.type_name)))
            .finish()
    }
}
