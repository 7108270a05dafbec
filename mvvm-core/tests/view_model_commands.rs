use mvvm_core::command::{Command, DelegateCommand, DelegateCommandOf};
use mvvm_core::observable::HAS_ERRORS;
use mvvm_core::{AsyncDelegateCommand, DataErrorInfo, NotifyPropertyChanged, ObservableObject};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 登录表单：用户名为空时产生验证错误，提交命令据此禁用
struct LoginViewModel {
    base: ObservableObject,
    user_name: Mutex<String>,
    submitted: AtomicUsize,
}

impl LoginViewModel {
    fn new() -> Arc<Self> {
        let vm = Arc::new(Self {
            base: ObservableObject::new(),
            user_name: Mutex::new(String::new()),
            submitted: AtomicUsize::new(0),
        });
        vm.validate();
        vm
    }

    fn set_user_name(&self, value: &str) {
        if self
            .base
            .set_property(&self.user_name, value.to_string(), "user_name")
        {
            self.validate();
        }
    }

    fn validate(&self) {
        self.base.clear_errors("user_name");
        if self.user_name.lock().unwrap().trim().is_empty() {
            self.base.add_error("user_name", "user name is required");
        }
    }

    fn submit_command(self: &Arc<Self>) -> Arc<DelegateCommand> {
        let run = self.clone();
        let check = self.clone();
        let cmd = Arc::new(DelegateCommand::with_can_execute(
            move || {
                run.submitted.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            move || !check.base.has_errors(),
        ));

        // 错误状态变化时重新广播可执行状态
        let weak = Arc::downgrade(&cmd);
        self.base.property_changed().subscribe(move |args| {
            if args.affects(HAS_ERRORS) {
                if let Some(cmd) = weak.upgrade() {
                    cmd.raise_can_execute_changed();
                }
            }
        });
        cmd
    }
}

#[test]
fn submit_follows_validation_state() {
    let vm = LoginViewModel::new();
    let submit = vm.submit_command();
    let refreshes = Arc::new(AtomicUsize::new(0));
    let r = refreshes.clone();
    submit.can_execute_changed().subscribe(move |_| {
        r.fetch_add(1, Ordering::SeqCst);
    });

    assert!(!submit.can_execute(None));
    assert!(!submit.try_execute(None).unwrap());

    vm.set_user_name("alice");
    assert!(submit.can_execute(None));
    assert!(submit.try_execute(None).unwrap());
    assert_eq!(vm.submitted.load(Ordering::SeqCst), 1);
    assert!(refreshes.load(Ordering::SeqCst) >= 1);

    vm.set_user_name("   ");
    assert!(!submit.can_execute(None));
    assert_eq!(vm.base.errors(Some("user_name")), vec!["user name is required"]);
}

#[test]
fn parameterized_command_drives_selection() {
    let selected = Arc::new(Mutex::new(Vec::new()));
    let sink = selected.clone();
    let select = DelegateCommandOf::<usize>::with_can_execute(
        move |index| {
            sink.lock().unwrap().push(index);
            Ok(())
        },
        |index| *index < 3,
    );

    for parameter in [Some(&1usize), Some(&5usize), None] {
        select
            .try_execute(parameter.map(|p| p as &dyn std::any::Any))
            .unwrap();
    }

    assert_eq!(*selected.lock().unwrap(), vec![1]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn fire_and_forget_async_command_settles() {
    let loads = Arc::new(AtomicUsize::new(0));
    let l = loads.clone();
    let refresh = AsyncDelegateCommand::new(move || {
        let l = l.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            l.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    })
    .named("refresh");

    refresh.execute(None).unwrap();
    assert!(!refresh.can_execute(None));

    tokio::time::timeout(Duration::from_secs(2), async {
        while refresh.is_executing() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert!(refresh.can_execute(None));
}
