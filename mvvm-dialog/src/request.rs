//! 消息类对话框请求
//!
//! 以值对象描述标题、内容与按钮组合，可转换为 `DialogParameters`
//! 交给通用的消息对话框视图模型，也可由视图模型从参数包还原。
//!
use crate::error::DialogError;
use crate::parameters::DialogParameters;
use bon::Builder;

pub const TITLE: &str = "title";
pub const MESSAGE: &str = "message";
pub const BUTTON: &str = "button";

/// 未指定标题时使用的默认标题
pub const DEFAULT_TITLE: &str = "提示";

/// 按钮组合
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DialogButton {
    #[default]
    Ok,
    OkCancel,
    YesNo,
    YesNoCancel,
}

/// 对话框请求参数
#[derive(Builder, Clone, Debug, PartialEq, Eq)]
pub struct DialogRequest {
    #[builder(into, default = DEFAULT_TITLE.to_string())]
    pub title: String,
    #[builder(into)]
    pub message: String,
    #[builder(default)]
    pub button: DialogButton,
}

impl DialogRequest {
    pub fn into_parameters(self) -> DialogParameters {
        let mut parameters = DialogParameters::new();
        parameters.insert(TITLE.to_string(), self.title);
        parameters.insert(MESSAGE.to_string(), self.message);
        parameters.insert(BUTTON.to_string(), self.button);
        parameters
    }

    /// 从参数包还原；缺少标题或按钮时使用默认值，缺少内容时报错
    pub fn from_parameters(parameters: &DialogParameters) -> Result<Self, DialogError> {
        let message = parameters.get::<String>(MESSAGE)?.clone();
        let title = parameters
            .try_get::<String>(TITLE)
            .map_or_else(|| DEFAULT_TITLE.to_string(), Clone::clone);
        let button = parameters
            .try_get::<DialogButton>(BUTTON)
            .copied()
            .unwrap_or_default();

        Ok(Self {
            title,
            message,
            button,
        })
    }
}

impl From<DialogRequest> for DialogParameters {
    fn from(request: DialogRequest) -> Self {
        request.into_parameters()
    }
}
