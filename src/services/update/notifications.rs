// 更新流程中各阶段的通知内容

use crate::models::{Notification, Severity, UpdateAction, UpdateInfo};

pub fn update_available(info: &UpdateInfo) -> Notification {
    Notification::new(
        "发现新版本",
        format!("版本 {} 已可用。", info.version),
        Severity::Info,
        "i-lucide-download",
    )
    .persistent()
    .with_action("更新并重启", UpdateAction::Accept)
    .with_action("稍后", UpdateAction::Decline)
}

pub fn up_to_date() -> Notification {
    Notification::new(
        "已是最新版本",
        "当前运行的是最新版本。",
        Severity::Success,
        "i-lucide-check-circle",
    )
}

pub fn check_failed(error: &str) -> Notification {
    Notification::new("检查更新失败", error, Severity::Error, "i-lucide-alert-circle")
}

pub fn downloading(version: &str) -> Notification {
    Notification::new(
        "正在下载更新",
        format!("正在下载版本 {version}，请稍候…"),
        Severity::Info,
        "i-lucide-loader-2",
    )
    .persistent()
    .loading()
}

pub fn download_failed(error: &str) -> Notification {
    Notification::new("更新下载失败", error, Severity::Error, "i-lucide-alert-circle").persistent()
}

pub fn install_failed(error: &str) -> Notification {
    Notification::new("更新安装失败", error, Severity::Error, "i-lucide-alert-circle").persistent()
}

pub fn relaunch_failed(error: &str) -> Notification {
    Notification::new(
        "重启失败",
        format!("更新已安装，请手动重启应用。{error}"),
        Severity::Error,
        "i-lucide-alert-circle",
    )
    .persistent()
}
