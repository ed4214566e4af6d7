use serde::{Deserialize, Serialize};

/// 通知的语义级别（由界面层决定具体配色）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// 用户可以对更新通知执行的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateAction {
    /// 更新并重启
    Accept,
    /// 稍后
    Decline,
}

/// 通知上的按钮
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub label: String,
    pub action: UpdateAction,
}

/// 交给界面层展示的通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub icon: String,
    #[serde(default)]
    pub actions: Vec<NotificationAction>,
    /// true：直到用户关闭前一直显示；false：自动消失
    pub persistent: bool,
    /// 显示加载动画
    #[serde(default)]
    pub loading: bool,
}

impl Notification {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
            icon: icon.into(),
            actions: Vec::new(),
            persistent: false,
            loading: false,
        }
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    pub fn loading(mut self) -> Self {
        self.loading = true;
        self
    }

    pub fn with_action(mut self, label: impl Into<String>, action: UpdateAction) -> Self {
        self.actions.push(NotificationAction {
            label: label.into(),
            action,
        });
        self
    }
}
