//! 视图（View）：由宿主界面框架实现
//!
//! 对话框服务只依赖三项能力：无参构造（`Default`）、挂接数据上下文、模态展示。
//! 布局、渲染与输入均由宿主负责。
//!
use crate::aware::ViewModel;
use crate::result::DialogOutcome;
use std::sync::Arc;

pub trait View {
    /// 挂接视图模型作为数据上下文
    fn set_data_context(&mut self, view_model: Arc<dyn ViewModel>);

    /// 模态展示并阻塞到关闭，返回关闭信号
    ///
    /// 宿主在此期间应继续处理自身的事件循环，以便嵌套打开其他对话框。
    fn show_dialog(&mut self) -> DialogOutcome;
}

pub(crate) type ViewFactory = fn() -> Box<dyn View>;

pub(crate) fn construct<V>() -> Box<dyn View>
where
    V: View + Default + 'static,
{
    Box::new(V::default())
}
