//! 可观察对象（ObservableObject）
//!
//! 视图模型的组合式基座，提供两类能力：
//! - 属性变更通知（`NotifyPropertyChanged`）：先比较再赋值，值变化时发出通知；
//! - 按属性聚合的验证错误（`DataErrorInfo`）：增删错误时发出 `errors_changed`，
//!   并同步通知 `has_errors` 属性变化，便于命令重新评估可执行状态。
//!
//! 视图模型通常以字段形式持有 `ObservableObject`，并实现上述两个 trait 转发给它。
//! 属性值放在 `Mutex` / `RwLock` 中，`set_property` 在释放锁之后才发出通知，
//! 处理器可以在通知中重新读取该属性。
//!
use crate::event::Event;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError, RwLock};

/// 聚合错误状态对应的属性名
pub const HAS_ERRORS: &str = "has_errors";

/// 属性变更事件参数；`property_name` 为 `None` 表示全部属性需要刷新
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyChangedArgs {
    pub property_name: Option<String>,
}

impl PropertyChangedArgs {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            property_name: Some(name.into()),
        }
    }

    pub fn all() -> Self {
        Self {
            property_name: None,
        }
    }

    /// 该通知是否覆盖给定属性
    pub fn affects(&self, name: &str) -> bool {
        self.property_name.as_deref().is_none_or(|n| n == name)
    }
}

/// 验证错误变更事件参数
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataErrorsChangedArgs {
    pub property_name: String,
}

/// 属性变更通知能力
pub trait NotifyPropertyChanged {
    fn property_changed(&self) -> &Event<PropertyChangedArgs>;

    fn raise_property_changed(&self, property_name: &str) {
        self.property_changed()
            .raise(&PropertyChangedArgs::named(property_name));
    }
}

/// 按属性暴露验证错误的能力
pub trait DataErrorInfo {
    fn has_errors(&self) -> bool;

    /// `None` 返回全部属性的错误
    fn errors(&self, property_name: Option<&str>) -> Vec<String>;

    fn errors_changed(&self) -> &Event<DataErrorsChangedArgs>;
}

/// 属性存储
pub trait PropertyCell<T> {
    /// 值不同则替换并返回 `true`；返回前释放锁
    fn replace_if_changed(&self, value: T) -> bool;
}

fn replace<T: PartialEq>(field: &mut T, value: T) -> bool {
    if *field == value {
        return false;
    }
    *field = value;
    true
}

impl<T: PartialEq> PropertyCell<T> for Mutex<T> {
    fn replace_if_changed(&self, value: T) -> bool {
        replace(&mut *self.lock().unwrap_or_else(PoisonError::into_inner), value)
    }
}

impl<T: PartialEq> PropertyCell<T> for RwLock<T> {
    fn replace_if_changed(&self, value: T) -> bool {
        replace(&mut *self.write().unwrap_or_else(PoisonError::into_inner), value)
    }
}

/// 可观察对象：属性通知 + 验证错误
#[derive(Debug, Default)]
pub struct ObservableObject {
    property_changed: Event<PropertyChangedArgs>,
    errors_changed: Event<DataErrorsChangedArgs>,
    errors: RwLock<BTreeMap<String, Vec<String>>>,
}

impl ObservableObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置属性值，值发生变化时发出通知并返回 `true`
    ///
    /// 通知在锁释放之后发出。
    pub fn set_property<T, C>(&self, field: &C, value: T, property_name: &str) -> bool
    where
        C: PropertyCell<T> + ?Sized,
    {
        let changed = field.replace_if_changed(value);
        if changed {
            self.raise_property_changed(property_name);
        }
        changed
    }

    /// 通知全部属性刷新（开销较大，谨慎使用）
    pub fn refresh_all(&self) {
        self.property_changed.raise(&PropertyChangedArgs::all());
    }

    /// 添加验证错误；同一属性的重复消息会被忽略
    pub fn add_error(&self, property_name: &str, message: impl Into<String>) {
        if property_name.is_empty() {
            return;
        }

        let message = message.into();
        let added = {
            let mut errors = self.errors.write().unwrap_or_else(PoisonError::into_inner);
            let list = errors.entry(property_name.to_string()).or_default();
            if list.contains(&message) {
                false
            } else {
                list.push(message);
                true
            }
        };

        if added {
            self.on_errors_changed(property_name);
        }
    }

    /// 清除某个属性的全部错误
    pub fn clear_errors(&self, property_name: &str) {
        if property_name.is_empty() {
            return;
        }

        let removed = self
            .errors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(property_name)
            .is_some();

        if removed {
            self.on_errors_changed(property_name);
        }
    }

    /// 清除所有验证错误，并为每个受影响的属性发出通知
    pub fn clear_all_errors(&self) {
        let names: Vec<String> = {
            let mut errors = self.errors.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *errors).into_keys().collect()
        };

        for name in names {
            self.on_errors_changed(&name);
        }
    }

    fn on_errors_changed(&self, property_name: &str) {
        self.errors_changed.raise(&DataErrorsChangedArgs {
            property_name: property_name.to_string(),
        });
        // 错误状态变化可能影响命令的可执行状态
        self.raise_property_changed(HAS_ERRORS);
    }
}

impl NotifyPropertyChanged for ObservableObject {
    fn property_changed(&self) -> &Event<PropertyChangedArgs> {
        &self.property_changed
    }
}

impl DataErrorInfo for ObservableObject {
    fn has_errors(&self) -> bool {
        !self
            .errors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    fn errors(&self, property_name: Option<&str>) -> Vec<String> {
        let errors = self.errors.read().unwrap_or_else(PoisonError::into_inner);
        match property_name {
            None | Some("") => errors.values().flatten().cloned().collect(),
            Some(name) => errors.get(name).cloned().unwrap_or_default(),
        }
    }

    fn errors_changed(&self) -> &Event<DataErrorsChangedArgs> {
        &self.errors_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record_properties(obj: &ObservableObject) -> Arc<Mutex<Vec<Option<String>>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        obj.property_changed().subscribe(move |args: &PropertyChangedArgs| {
            sink.lock().unwrap().push(args.property_name.clone());
        });
        seen
    }

    #[test]
    fn set_property_notifies_only_on_change() {
        let obj = ObservableObject::new();
        let seen = record_properties(&obj);
        let name = Mutex::new(String::from("a"));

        assert!(!obj.set_property(&name, "a".to_string(), "name"));
        assert!(obj.set_property(&name, "b".to_string(), "name"));

        assert_eq!(*name.lock().unwrap(), "b");
        assert_eq!(*seen.lock().unwrap(), vec![Some("name".to_string())]);
    }

    #[test]
    fn handler_can_read_property_during_notification() {
        let obj = ObservableObject::new();
        let name = Arc::new(Mutex::new(String::new()));
        let age = Arc::new(RwLock::new(0u32));
        let read = Arc::new(Mutex::new(Vec::new()));

        let (n, a, sink) = (name.clone(), age.clone(), read.clone());
        obj.property_changed().subscribe(move |args: &PropertyChangedArgs| {
            let value = match args.property_name.as_deref() {
                Some("name") => n.try_lock().map(|v| v.clone()).ok(),
                Some("age") => a.try_read().map(|v| v.to_string()).ok(),
                _ => None,
            };
            sink.lock().unwrap().push(value);
        });

        assert!(obj.set_property(&*name, "alice".to_string(), "name"));
        assert!(obj.set_property(&*age, 30, "age"));

        assert_eq!(
            *read.lock().unwrap(),
            vec![Some("alice".to_string()), Some("30".to_string())]
        );
    }

    #[test]
    fn refresh_all_raises_unnamed_notification() {
        let obj = ObservableObject::new();
        let seen = record_properties(&obj);

        obj.refresh_all();

        assert_eq!(*seen.lock().unwrap(), vec![None]);
        assert!(PropertyChangedArgs::all().affects("anything"));
    }

    #[test]
    fn errors_are_deduplicated_and_aggregated() {
        let obj = ObservableObject::new();
        let changed = Arc::new(Mutex::new(Vec::new()));
        let sink = changed.clone();
        obj.errors_changed()
            .subscribe(move |args: &DataErrorsChangedArgs| {
                sink.lock().unwrap().push(args.property_name.clone());
            });
        let props = record_properties(&obj);

        obj.add_error("name", "required");
        obj.add_error("name", "required");
        obj.add_error("age", "too young");

        assert!(obj.has_errors());
        assert_eq!(obj.errors(Some("name")), vec!["required".to_string()]);
        assert_eq!(obj.errors(None).len(), 2);
        assert!(obj.errors(Some("email")).is_empty());
        assert_eq!(*changed.lock().unwrap(), vec!["name", "age"]);
        assert_eq!(
            *props.lock().unwrap(),
            vec![Some(HAS_ERRORS.to_string()), Some(HAS_ERRORS.to_string())]
        );
    }

    #[test]
    fn clearing_errors_notifies_each_affected_property() {
        let obj = ObservableObject::new();
        obj.add_error("name", "required");
        obj.add_error("age", "too young");

        let changed = Arc::new(Mutex::new(Vec::new()));
        let sink = changed.clone();
        obj.errors_changed()
            .subscribe(move |args: &DataErrorsChangedArgs| {
                sink.lock().unwrap().push(args.property_name.clone());
            });

        obj.clear_errors("missing");
        obj.clear_errors("name");
        assert!(obj.has_errors());

        obj.clear_all_errors();
        assert!(!obj.has_errors());
        assert_eq!(*changed.lock().unwrap(), vec!["name", "age"]);
    }
}
