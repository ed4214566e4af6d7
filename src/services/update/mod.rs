// 应用自更新模块
//
// - updater: 更新子系统接口（检查、下载安装、重启）
// - events: 下载事件流与进度展示
// - orchestrator: 会话状态机
// - notifications: 各阶段通知内容
// - scheduler: 后台静默检查

pub mod events;
pub mod notifications;
pub mod orchestrator;
pub mod scheduler;
pub mod updater;

pub use events::{
    download_channel, DownloadEventSink, DownloadEventStream, ProgressReporter,
    TracingProgressReporter,
};
pub use orchestrator::{UpdateOrchestrator, UpdateSession};
pub use scheduler::spawn_background_checks;
pub use updater::Updater;
