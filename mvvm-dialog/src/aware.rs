//! 视图模型与对话框生命周期
//!
//! 视图模型实现 [`ViewModel`] 即可被对话框服务展示；
//! 需要感知打开/关闭的视图模型再实现 [`DialogAware`]，并在
//! `as_dialog_aware` 中返回自身，服务在编排时据此查询该能力。
//!
use crate::parameters::DialogParameters;
use crate::result::DialogResult;
use std::any::{Any, TypeId, type_name};

/// 可作为视图数据上下文的视图模型
pub trait ViewModel: Any + Send + Sync {
    /// 对话框生命周期能力；默认不具备
    fn as_dialog_aware(&self) -> Option<&dyn DialogAware> {
        None
    }

    /// 具体类型标识，用于按运行时类型查找视图；无需覆盖
    fn view_model_type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// 具体类型名称，用于日志与错误信息；无需覆盖
    fn view_model_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// 对话框生命周期能力
pub trait DialogAware: Send + Sync {
    /// 视图展示之前调用，可据参数初始化自身状态
    fn on_dialog_opened(&self, parameters: &DialogParameters);

    /// 视图关闭之后调用，返回需要带回的数据；
    /// 其中的 `outcome` 会被宿主的关闭信号覆盖
    fn on_dialog_closed(&self) -> DialogResult;
}
