// 下载事件流
//
// 每个下载会话创建一对 sink/stream：sink 交给更新子系统推送事件，
// stream 由编排器单独消费。sink 被丢弃后事件流结束，不能重新开始。

use crate::models::{DownloadEvent, DownloadProgress};
use tokio::sync::mpsc;

/// 创建一次下载会话使用的事件通道
pub fn download_channel() -> (DownloadEventSink, DownloadEventStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (DownloadEventSink { tx }, DownloadEventStream { rx })
}

/// 事件生产端（由更新子系统持有）
#[derive(Debug)]
pub struct DownloadEventSink {
    tx: mpsc::UnboundedSender<DownloadEvent>,
}

impl DownloadEventSink {
    pub fn emit(&self, event: DownloadEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("下载事件接收端已关闭，丢弃事件");
        }
    }

    pub fn started(&self, content_length: Option<u64>) {
        self.emit(DownloadEvent::Started { content_length });
    }

    pub fn progress(&self, chunk_length: u64) {
        self.emit(DownloadEvent::Progress { chunk_length });
    }

    pub fn finished(&self) {
        self.emit(DownloadEvent::Finished);
    }
}

/// 事件消费端（单一订阅者）
#[derive(Debug)]
pub struct DownloadEventStream {
    rx: mpsc::UnboundedReceiver<DownloadEvent>,
}

impl DownloadEventStream {
    /// 等待下一个事件，生产端全部丢弃且队列为空时返回 None
    pub async fn next(&mut self) -> Option<DownloadEvent> {
        self.rx.recv().await
    }

    /// 取出已到达的事件，不等待
    pub fn try_next(&mut self) -> Option<DownloadEvent> {
        self.rx.try_recv().ok()
    }
}

/// 下载进度的展示方，可替换（界面事件、日志、测试记录）
pub trait ProgressReporter: Send + Sync {
    fn on_progress(&self, event: &DownloadEvent, progress: &DownloadProgress);
}

/// 把进度写入日志
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgressReporter;

impl ProgressReporter for TracingProgressReporter {
    fn on_progress(&self, event: &DownloadEvent, progress: &DownloadProgress) {
        match event {
            DownloadEvent::Started { content_length } => {
                tracing::info!(content_length = ?content_length, "开始下载更新");
            }
            DownloadEvent::Progress { .. } => match progress.percentage() {
                Some(percentage) => tracing::trace!(
                    downloaded = progress.downloaded,
                    total = progress.content_length,
                    percentage = percentage,
                    "更新下载进度"
                ),
                None => tracing::trace!(downloaded = progress.downloaded, "更新下载进度（总大小未知）"),
            },
            DownloadEvent::Finished => {
                tracing::info!(downloaded = progress.downloaded, "更新下载完成，开始安装");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stream_ends_when_sink_dropped() {
        let (sink, mut stream) = download_channel();
        sink.started(Some(10));
        sink.progress(4);
        sink.finished();
        drop(sink);

        assert_eq!(
            stream.next().await,
            Some(DownloadEvent::Started {
                content_length: Some(10)
            })
        );
        assert_eq!(
            stream.next().await,
            Some(DownloadEvent::Progress { chunk_length: 4 })
        );
        assert_eq!(stream.next().await, Some(DownloadEvent::Finished));
        assert_eq!(stream.next().await, None);
    }

    #[test]
    fn test_emit_after_stream_dropped_is_ignored() {
        let (sink, stream) = download_channel();
        drop(stream);
        sink.progress(1);
    }

    #[test]
    fn test_try_next_does_not_block() {
        let (sink, mut stream) = download_channel();
        assert_eq!(stream.try_next(), None);
        sink.progress(8);
        assert_eq!(
            stream.try_next(),
            Some(DownloadEvent::Progress { chunk_length: 8 })
        );
    }
}
