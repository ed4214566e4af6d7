// 通知边界
//
// 编排层只决定展示什么、何时展示，具体渲染交给界面层实现 Notifier。

use crate::models::{Notification, Severity};

/// 通知接收方
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// 只写日志的通知实现（无界面环境、命令行场景）
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Error => tracing::error!(
                title = %notification.title,
                description = %notification.description,
                "通知"
            ),
            Severity::Info | Severity::Success => tracing::info!(
                title = %notification.title,
                description = %notification.description,
                actions = notification.actions.len(),
                "通知"
            ),
        }
    }
}
