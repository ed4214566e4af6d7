// Updater Trait - 更新子系统接口

use super::events::DownloadEventSink;
use crate::models::UpdateInfo;
use anyhow::Result;
use async_trait::async_trait;

/// 应用自身的更新子系统
///
/// 检查、下载安装、重启都由外部实现，编排器只负责顺序与状态。
#[async_trait]
pub trait Updater: Send + Sync {
    /// 检查更新，`None` 表示已是最新版本
    async fn check(&self) -> Result<Option<UpdateInfo>>;

    /// 下载并安装更新
    ///
    /// 通过 `events` 依次推送 `Started* → Progress* → Finished`，
    /// 返回时安装已写入磁盘。`events` 在返回时被丢弃，事件流随之结束。
    async fn download_and_install(&self, events: DownloadEventSink) -> Result<()>;

    /// 重启应用（成功时通常不会返回）
    async fn relaunch(&self) -> Result<()>;
}
