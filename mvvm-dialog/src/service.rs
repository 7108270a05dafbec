//! 对话框服务（DialogService）
//!
//! 编排一次模态对话框的完整流程：
//! 1. 按视图模型类型查找已注册的视图，未注册则报错且不创建任何视图；
//! 2. 无参构造视图并挂接视图模型为数据上下文；
//! 3. 视图模型具备 `DialogAware` 能力时调用 `on_dialog_opened`；
//! 4. 模态展示，阻塞到宿主给出关闭信号；
//! 5. 具备能力时调用 `on_dialog_closed` 取得结果，并以宿主信号覆盖其中的 `outcome`；
//!    否则生成只含宿主信号与空参数包的结果。
//!
//! 服务实例由应用持有并注入到需要弹出对话框的位置，不使用全局注册表。
//!
use crate::aware::ViewModel;
use crate::error::DialogError;
use crate::parameters::DialogParameters;
use crate::result::DialogResult;
use crate::view::{View, ViewFactory, construct};
use bon::Builder;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::any::{TypeId, type_name};
use std::sync::Arc;
use tracing::debug;

/// 对话框服务配置
#[derive(Builder, Clone, Copy, Debug, Default)]
pub struct DialogServiceConfig {
    /// 为 `true` 时重复注册同一视图模型返回错误；默认以最后一次注册为准
    #[builder(default)]
    pub strict_registration: bool,
}

#[derive(Clone, Copy)]
struct ViewRegistration {
    view_model: &'static str,
    view: &'static str,
    factory: ViewFactory,
}

/// 基于类型映射的对话框服务
#[derive(Builder)]
pub struct DialogService {
    #[builder(skip)]
    mappings: DashMap<TypeId, ViewRegistration>,
    #[builder(default)]
    config: DialogServiceConfig,
}

impl Default for DialogService {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DialogService {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建立视图模型 `VM` 到视图 `V` 的映射
    ///
    /// 不校验视图的展示能力，构造问题留到展示时暴露。
    pub fn register<V, VM>(&self) -> Result<(), DialogError>
    where
        V: View + Default + 'static,
        VM: ViewModel,
    {
        let registration = ViewRegistration {
            view_model: type_name::<VM>(),
            view: type_name::<V>(),
            factory: construct::<V>,
        };

        match self.mappings.entry(TypeId::of::<VM>()) {
            Entry::Occupied(mut occupied) => {
                if self.config.strict_registration {
                    return Err(DialogError::AlreadyRegistered {
                        view_model: registration.view_model,
                        view: occupied.get().view,
                    });
                }
                let previous = occupied.insert(registration);
                debug!(
                    view_model = registration.view_model,
                    previous = previous.view,
                    view = registration.view,
                    "dialog view replaced"
                );
            }
            Entry::Vacant(vacant) => {
                vacant.insert(registration);
                debug!(
                    view_model = registration.view_model,
                    view = registration.view,
                    "dialog view registered"
                );
            }
        }

        Ok(())
    }

    pub fn is_registered<VM: ViewModel>(&self) -> bool {
        self.mappings.contains_key(&TypeId::of::<VM>())
    }

    /// 已注册的视图模型类型名列表（只读视图）
    pub fn registered_view_models(&self) -> Vec<&'static str> {
        self.mappings.iter().map(|e| e.value().view_model).collect()
    }

    /// 以静态类型 `VM` 查找视图并模态展示
    pub fn show_dialog<VM: ViewModel>(
        &self,
        parameters: &DialogParameters,
        view_model: Arc<VM>,
    ) -> Result<DialogResult, DialogError> {
        let registration = self.resolve(TypeId::of::<VM>(), type_name::<VM>())?;
        Ok(Self::run(registration, parameters, view_model))
    }

    /// 以视图模型的运行时类型查找视图并模态展示
    pub fn show_dialog_dyn(
        &self,
        parameters: &DialogParameters,
        view_model: Arc<dyn ViewModel>,
    ) -> Result<DialogResult, DialogError> {
        let registration =
            self.resolve(view_model.view_model_type_id(), view_model.view_model_name())?;
        Ok(Self::run(registration, parameters, view_model))
    }

    fn resolve(
        &self,
        key: TypeId,
        view_model: &'static str,
    ) -> Result<ViewRegistration, DialogError> {
        // 复制出注册项，展示期间不持有分片锁，允许嵌套对话框再次注册/查找
        self.mappings
            .get(&key)
            .map(|r| *r.value())
            .ok_or(DialogError::NotRegistered { view_model })
    }

    fn run(
        registration: ViewRegistration,
        parameters: &DialogParameters,
        view_model: Arc<dyn ViewModel>,
    ) -> DialogResult {
        let ViewRegistration {
            view_model: vm_name,
            view: view_name,
            factory,
        } = registration;

        let mut view = factory();
        view.set_data_context(view_model.clone());

        if let Some(aware) = view_model.as_dialog_aware() {
            aware.on_dialog_opened(parameters);
        }

        debug!(view_model = vm_name, view = view_name, "dialog shown");
        let outcome = view.show_dialog();
        drop(view);
        debug!(view_model = vm_name, ?outcome, "dialog closed");

        match view_model.as_dialog_aware() {
            Some(aware) => {
                let mut result = aware.on_dialog_closed();
                // 宿主信号优先
                result.outcome = outcome;
                result
            }
            None => DialogResult::new(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::DialogOutcome;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

    struct CountingView;

    impl Default for CountingView {
        fn default() -> Self {
            CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
            Self
        }
    }

    impl View for CountingView {
        fn set_data_context(&mut self, _view_model: Arc<dyn ViewModel>) {}

        fn show_dialog(&mut self) -> DialogOutcome {
            DialogOutcome::Cancelled
        }
    }

    #[derive(Default)]
    struct OtherView;

    impl View for OtherView {
        fn set_data_context(&mut self, _view_model: Arc<dyn ViewModel>) {}

        fn show_dialog(&mut self) -> DialogOutcome {
            DialogOutcome::Confirmed
        }
    }

    struct PlainVm;
    impl ViewModel for PlainVm {}

    struct UnknownVm;
    impl ViewModel for UnknownVm {}

    #[test]
    fn last_registration_wins_by_default() {
        let service = DialogService::new();
        service.register::<CountingView, PlainVm>().unwrap();
        service.register::<OtherView, PlainVm>().unwrap();

        let result = service
            .show_dialog(&DialogParameters::new(), Arc::new(PlainVm))
            .unwrap();

        assert_eq!(result.outcome, DialogOutcome::Confirmed);
        assert!(result.parameters.is_empty());
        assert_eq!(service.registered_view_models().len(), 1);
    }

    #[test]
    fn strict_registration_rejects_duplicates() {
        let service = DialogService::builder()
            .config(DialogServiceConfig::builder().strict_registration(true).build())
            .build();
        service.register::<CountingView, PlainVm>().unwrap();

        let err = service.register::<OtherView, PlainVm>().unwrap_err();
        match err {
            DialogError::AlreadyRegistered { view_model, view } => {
                assert!(view_model.contains("PlainVm"));
                assert!(view.contains("CountingView"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unregistered_view_model_is_a_configuration_error() {
        let service = DialogService::new();
        service.register::<CountingView, PlainVm>().unwrap();
        let before = CONSTRUCTED.load(Ordering::SeqCst);

        let err = service
            .show_dialog(&DialogParameters::new(), Arc::new(UnknownVm))
            .unwrap_err();

        match err {
            DialogError::NotRegistered { view_model } => assert!(view_model.contains("UnknownVm")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), before);
        assert!(!service.is_registered::<UnknownVm>());
        assert!(service.is_registered::<PlainVm>());
    }

    #[test]
    fn dynamic_lookup_uses_runtime_type() {
        let service = DialogService::new();
        service.register::<OtherView, PlainVm>().unwrap();

        let vm: Arc<dyn ViewModel> = Arc::new(PlainVm);
        let result = service
            .show_dialog_dyn(&DialogParameters::new(), vm)
            .unwrap();
        assert!(result.is_confirmed());

        let unknown: Arc<dyn ViewModel> = Arc::new(UnknownVm);
        assert!(matches!(
            service.show_dialog_dyn(&DialogParameters::new(), unknown),
            Err(DialogError::NotRegistered { .. })
        ));
    }
}
