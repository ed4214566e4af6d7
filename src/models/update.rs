use serde::{de, Deserialize, Deserializer, Serialize};

/// 待安装的应用更新（`None` 表示已是最新版本）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInfo {
    /// 目标版本
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// 发布说明
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl UpdateInfo {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            current_version: None,
            date: None,
            body: None,
        }
    }
}

/// 下载过程中由更新子系统推送的事件
///
/// 线上格式为 `{"event": "...", "data": {...}}`。反序列化时 `Started`
/// 可以省略 `data` 或其中的 `contentLength`，视为总大小未知。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum DownloadEvent {
    /// 服务器未报告大小时 content_length 为空
    Started {
        #[serde(rename = "contentLength")]
        content_length: Option<u64>,
    },
    Progress {
        #[serde(rename = "chunkLength")]
        chunk_length: u64,
    },
    /// 载荷已完整接收（不会自动触发重启）
    Finished,
}

#[derive(Deserialize)]
struct RawDownloadEvent {
    event: String,
    #[serde(default)]
    data: Option<RawEventData>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RawEventData {
    #[serde(default)]
    content_length: Option<u64>,
    #[serde(default)]
    chunk_length: Option<u64>,
}

impl<'de> Deserialize<'de> for DownloadEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawDownloadEvent::deserialize(deserializer)?;
        let data = raw.data.unwrap_or_default();

        match raw.event.as_str() {
            "Started" => Ok(DownloadEvent::Started {
                content_length: data.content_length,
            }),
            "Progress" => data
                .chunk_length
                .map(|chunk_length| DownloadEvent::Progress { chunk_length })
                .ok_or_else(|| de::Error::missing_field("chunkLength")),
            "Finished" => Ok(DownloadEvent::Finished),
            other => Err(de::Error::unknown_variant(
                other,
                &["Started", "Progress", "Finished"],
            )),
        }
    }
}

/// 一次下载会话中累计的字节数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadProgress {
    /// 预期总字节数，0 表示未知
    pub content_length: u64,
    /// 已下载字节数，单调不减
    pub downloaded: u64,
    pub finished: bool,
}

impl DownloadProgress {
    /// 累加一个事件
    pub fn apply(&mut self, event: &DownloadEvent) {
        match event {
            DownloadEvent::Started { content_length } => {
                self.content_length = content_length.unwrap_or(0);
            }
            DownloadEvent::Progress { chunk_length } => {
                self.downloaded = self.downloaded.saturating_add(*chunk_length);
            }
            DownloadEvent::Finished => {
                self.finished = true;
            }
        }
    }

    /// 总大小未知时进度不确定，界面应显示为无刻度进度
    pub fn is_indeterminate(&self) -> bool {
        self.content_length == 0
    }

    /// 完成比例 `[0, 1]`，总大小未知时为 `None`
    pub fn fraction(&self) -> Option<f64> {
        if self.is_indeterminate() {
            return None;
        }
        Some((self.downloaded as f64 / self.content_length as f64).min(1.0))
    }

    /// 完成百分比 `[0, 100]`，总大小未知时为 `None`
    pub fn percentage(&self) -> Option<f32> {
        self.fraction().map(|f| (f * 100.0) as f32)
    }
}

/// 更新会话状态
///
/// `Idle → Checking → {UpToDate | UpdateAvailable | CheckFailed}`，
/// `UpdateAvailable → {Declined | Downloading}`，
/// `Downloading → Installing → Relaunching`，失败进入对应的 `*Failed`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UpdateState {
    Idle,
    Checking,
    UpToDate,
    UpdateAvailable { version: String },
    CheckFailed { error: String },
    Declined,
    Downloading,
    Installing,
    Relaunching,
    DownloadFailed { error: String },
    InstallFailed { error: String },
    RelaunchFailed { error: String },
}

impl UpdateState {
    /// 终止状态：会话结束，可以开始新的检查
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UpdateState::UpToDate
                | UpdateState::CheckFailed { .. }
                | UpdateState::Declined
                | UpdateState::Relaunching
                | UpdateState::DownloadFailed { .. }
                | UpdateState::InstallFailed { .. }
                | UpdateState::RelaunchFailed { .. }
        )
    }

    /// 正在执行的阶段：此时不能开始新会话
    ///
    /// 等待用户决定的 `UpdateAvailable` 不算在内，用户可能直接关闭了通知，
    /// 新的检查会替换掉它。
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            UpdateState::Checking | UpdateState::Downloading | UpdateState::Installing
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            UpdateState::Idle => "idle",
            UpdateState::Checking => "checking",
            UpdateState::UpToDate => "up_to_date",
            UpdateState::UpdateAvailable { .. } => "update_available",
            UpdateState::CheckFailed { .. } => "check_failed",
            UpdateState::Declined => "declined",
            UpdateState::Downloading => "downloading",
            UpdateState::Installing => "installing",
            UpdateState::Relaunching => "relaunching",
            UpdateState::DownloadFailed { .. } => "download_failed",
            UpdateState::InstallFailed { .. } => "install_failed",
            UpdateState::RelaunchFailed { .. } => "relaunch_failed",
        }
    }
}
