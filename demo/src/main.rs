use mvvm_core::command::{ActiveAware, AsyncDelegateCommand, Command, DelegateCommandOf};
use mvvm_core::{NotifyPropertyChanged, ObservableObject};
use mvvm_dialog::request::BUTTON;
use mvvm_dialog::{
    DialogAware, DialogButton, DialogOutcome, DialogParameters, DialogRequest, DialogResult,
    DialogService, View, ViewModel,
};
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// 控制台“窗口”：打印提示并从标准输入读取选择
#[derive(Default)]
struct ConsoleWindow {
    data_context: Option<Arc<dyn ViewModel>>,
}

impl View for ConsoleWindow {
    fn set_data_context(&mut self, view_model: Arc<dyn ViewModel>) {
        self.data_context = Some(view_model);
    }

    fn show_dialog(&mut self) -> DialogOutcome {
        if let Some(vm) = &self.data_context {
            println!("[window] {}", vm.view_model_name());
        }
        print!("confirm? [y/n, empty to close] ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => DialogOutcome::Dismissed,
            Ok(_) => match line.trim() {
                "y" | "Y" => DialogOutcome::Confirmed,
                "n" | "N" => DialogOutcome::Cancelled,
                _ => DialogOutcome::Dismissed,
            },
        }
    }
}

/// 删除确认框
#[derive(Default)]
struct ConfirmDeleteViewModel {
    request: Mutex<Option<DialogRequest>>,
}

impl ViewModel for ConfirmDeleteViewModel {
    fn as_dialog_aware(&self) -> Option<&dyn DialogAware> {
        Some(self)
    }
}

impl DialogAware for ConfirmDeleteViewModel {
    fn on_dialog_opened(&self, parameters: &DialogParameters) {
        match DialogRequest::from_parameters(parameters) {
            Ok(request) => {
                println!("[{}] {}", request.title, request.message);
                *self.request.lock().unwrap_or_else(|e| e.into_inner()) = Some(request);
            }
            Err(e) => tracing::warn!(error = %e, "malformed dialog request"),
        }
    }

    fn on_dialog_closed(&self) -> DialogResult {
        let mut result = DialogResult::default();
        if let Some(request) = self.request.lock().unwrap_or_else(|e| e.into_inner()).take() {
            if let Err(e) = result.parameters.add(BUTTON, request.button) {
                tracing::warn!(error = %e, "failed to return dialog button");
            }
        }
        result
    }
}

/// 文档列表视图模型
struct DocumentsViewModel {
    base: ObservableObject,
    documents: Mutex<Vec<String>>,
    dialogs: Arc<DialogService>,
}

impl DocumentsViewModel {
    fn new(dialogs: Arc<DialogService>) -> Arc<Self> {
        Arc::new(Self {
            base: ObservableObject::new(),
            documents: Mutex::new(vec!["readme.md".into(), "notes.txt".into()]),
            dialogs,
        })
    }

    fn delete_command(self: &Arc<Self>) -> DelegateCommandOf<String> {
        let vm = self.clone();
        let check = self.clone();
        DelegateCommandOf::with_can_execute(
            move |name: String| vm.delete(&name),
            move |name: &String| check.documents().contains(name),
        )
    }

    fn reload_command(self: &Arc<Self>) -> AsyncDelegateCommand {
        let vm = self.clone();
        AsyncDelegateCommand::new(move || {
            let vm = vm.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                vm.base.refresh_all();
                Ok(())
            }
        })
        .named("reload")
    }

    fn documents(&self) -> Vec<String> {
        self.documents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn delete(&self, name: &str) -> anyhow::Result<()> {
        let request = DialogRequest::builder()
            .title("删除")
            .message(format!("确定删除 {name}？"))
            .button(DialogButton::YesNo)
            .build();
        let result = self.dialogs.show_dialog(
            &request.into_parameters(),
            Arc::new(ConfirmDeleteViewModel::default()),
        )?;

        if result.is_confirmed() {
            self.documents
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .retain(|d| d != name);
            self.base.raise_property_changed("documents");
        }
        println!("dialog outcome: {:?}", result.outcome.as_bool());
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    // 启动时注册视图模型与窗口的映射
    let dialogs = Arc::new(DialogService::new());
    dialogs.register::<ConsoleWindow, ConfirmDeleteViewModel>()?;

    let vm = DocumentsViewModel::new(dialogs);
    vm.base.property_changed().subscribe(|args| {
        println!("property changed: {:?}", args.property_name);
    });

    // 异步命令：执行期间不可再次触发
    let reload = vm.reload_command();
    let handle = reload.spawn()?;
    println!("reload can execute while running: {}", reload.can_execute(None));
    handle.wait().await?;
    println!("reload can execute after completion: {}", reload.can_execute(None));

    // 同步带参命令：通过确认框删除文档
    let delete = vm.delete_command();
    delete.set_is_active(true);
    let target = "notes.txt".to_string();
    let ran = tokio::task::block_in_place(|| delete.try_execute(Some(&target)))?;
    println!("delete ran: {ran}, documents: {:?}", vm.documents());

    // 值类型缺参：命令不可执行，也不会弹出对话框
    println!("delete without argument: {}", delete.can_execute(None));
    Ok(())
}
