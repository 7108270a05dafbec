//! 对话框编排库（mvvm-dialog）
//!
//! 将视图模型与视图（窗口）配对，模态展示并把强类型结果回传给调用方：
//! - `parameters`：字符串键的参数包，向对话框传入数据并带回结果；
//! - `aware`：视图模型接口与可选的对话框生命周期能力；
//! - `view`：由宿主界面框架实现的视图接口；
//! - `service`：类型映射注册与打开/展示/关闭编排；
//! - `request`：消息类对话框的请求值对象。
//!
//! 宿主框架负责窗口的创建、布局与事件循环；本 crate 只定义视图模型、
//! 视图类型与参数/结果在三者之间如何流动。
//!
pub mod aware;
pub mod error;
pub mod parameters;
pub mod request;
pub mod result;
pub mod service;
pub mod view;

pub use aware::{DialogAware, ViewModel};
pub use error::DialogError;
pub use parameters::DialogParameters;
pub use request::{DialogButton, DialogRequest};
pub use result::{DialogOutcome, DialogResult};
pub use service::{DialogService, DialogServiceConfig};
pub use view::View;
