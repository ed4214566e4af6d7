use super::events::{download_channel, ProgressReporter, TracingProgressReporter};
use super::notifications;
use super::updater::Updater;
use crate::core::error::{AppError, AppResult};
use crate::models::{DownloadEvent, DownloadProgress, UpdateAction, UpdateInfo, UpdateState};
use crate::services::notification::Notifier;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// 一次更新会话（从检查到终止状态）
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSession {
    pub id: u64,
    pub silent: bool,
    pub state: UpdateState,
    pub update: Option<UpdateInfo>,
    /// 仅在下载期间存在
    pub progress: Option<DownloadProgress>,
    pub started_at: DateTime<Utc>,
}

/// 更新编排器
///
/// 同一时间只允许一个正在执行的会话：检查、下载、安装期间，
/// 新的检查请求直接返回 [`AppError::SessionActive`]。
/// 仍在等待用户决定（`UpdateAvailable`）的会话会被新的检查替换。
#[derive(Clone)]
pub struct UpdateOrchestrator {
    updater: Arc<dyn Updater>,
    notifier: Arc<dyn Notifier>,
    reporter: Arc<dyn ProgressReporter>,
    session: Arc<RwLock<Option<UpdateSession>>>,
    next_session_id: Arc<AtomicU64>,
}

impl UpdateOrchestrator {
    pub fn new(updater: Arc<dyn Updater>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            updater,
            notifier,
            reporter: Arc::new(TracingProgressReporter),
            session: Arc::new(RwLock::new(None)),
            next_session_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// 替换进度展示方
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// 当前状态（没有会话时为 Idle）
    pub async fn state(&self) -> UpdateState {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.state.clone())
            .unwrap_or(UpdateState::Idle)
    }

    /// 当前下载进度
    pub async fn progress(&self) -> Option<DownloadProgress> {
        self.session.read().await.as_ref().and_then(|s| s.progress)
    }

    /// 当前会话快照
    pub async fn session(&self) -> Option<UpdateSession> {
        self.session.read().await.clone()
    }

    /// 检查更新
    ///
    /// 静默模式下只有“发现新版本”会通知用户，已是最新与检查失败只记录日志。
    pub async fn check_for_updates(&self, silent: bool) -> AppResult<UpdateState> {
        let session_id = self.begin_session(silent).await?;
        tracing::info!(session_id = session_id, silent = silent, "开始检查更新");

        let state = match self.updater.check().await {
            Ok(Some(info)) => {
                tracing::info!(session_id = session_id, version = %info.version, "发现新版本");
                let state = UpdateState::UpdateAvailable {
                    version: info.version.clone(),
                };
                let notification = notifications::update_available(&info);
                self.update_session(session_id, |s| {
                    s.state = state.clone();
                    s.update = Some(info);
                })
                .await;
                self.notifier.notify(notification);
                state
            }
            Ok(None) => {
                tracing::info!(session_id = session_id, "已是最新版本");
                self.set_state(session_id, UpdateState::UpToDate).await;
                if !silent {
                    self.notifier.notify(notifications::up_to_date());
                }
                UpdateState::UpToDate
            }
            Err(e) => {
                let error = format!("{e:#}");
                tracing::error!(session_id = session_id, error = %error, "检查更新失败");
                let state = UpdateState::CheckFailed {
                    error: error.clone(),
                };
                self.set_state(session_id, state.clone()).await;
                if !silent {
                    self.notifier.notify(notifications::check_failed(&error));
                }
                state
            }
        };

        Ok(state)
    }

    /// 用户选择“更新并重启”
    ///
    /// 下载/安装/重启失败时总是通知用户（与 silent 无关），并返回错误。
    pub async fn accept(&self) -> AppResult<UpdateState> {
        let (session_id, version) = {
            let mut guard = self.session.write().await;
            let session = match guard.as_mut() {
                Some(session) => session,
                None => {
                    return Err(AppError::InvalidTransition {
                        state: UpdateState::Idle.name(),
                        action: "accept",
                    })
                }
            };

            let version = match &session.state {
                UpdateState::UpdateAvailable { version } => version.clone(),
                other => {
                    return Err(AppError::InvalidTransition {
                        state: other.name(),
                        action: "accept",
                    })
                }
            };

            session.state = UpdateState::Downloading;
            session.progress = Some(DownloadProgress::default());
            (session.id, version)
        };

        tracing::info!(version = %version, "开始下载并安装更新");
        self.notifier.notify(notifications::downloading(&version));

        if let Err(e) = self.run_download().await {
            let error = format!("{e:#}");
            let finished = self.progress().await.is_some_and(|p| p.finished);

            let (state, err, notification) = if finished {
                tracing::error!(error = %error, "更新安装失败");
                (
                    UpdateState::InstallFailed {
                        error: error.clone(),
                    },
                    AppError::UpdateInstall(error.clone()),
                    notifications::install_failed(&error),
                )
            } else {
                tracing::error!(error = %error, "更新下载失败");
                (
                    UpdateState::DownloadFailed {
                        error: error.clone(),
                    },
                    AppError::UpdateDownload(error.clone()),
                    notifications::download_failed(&error),
                )
            };

            self.update_session(session_id, |s| {
                s.state = state;
                s.progress = None;
            })
            .await;
            self.notifier.notify(notification);
            return Err(err);
        }

        self.update_session(session_id, |s| {
            s.state = UpdateState::Relaunching;
            s.progress = None;
        })
        .await;
        tracing::info!(version = %version, "更新已安装，重启应用");

        if let Err(e) = self.updater.relaunch().await {
            let error = format!("{e:#}");
            tracing::error!(error = %error, "重启应用失败");
            self.set_state(
                session_id,
                UpdateState::RelaunchFailed {
                    error: error.clone(),
                },
            )
            .await;
            self.notifier.notify(notifications::relaunch_failed(&error));
            return Err(AppError::Relaunch(error));
        }

        Ok(UpdateState::Relaunching)
    }

    /// 用户选择“稍后”
    pub async fn decline(&self) -> AppResult<UpdateState> {
        let mut guard = self.session.write().await;
        match guard.as_mut() {
            Some(session) if matches!(session.state, UpdateState::UpdateAvailable { .. }) => {
                session.state = UpdateState::Declined;
                tracing::info!(session_id = session.id, "用户选择稍后更新");
                Ok(UpdateState::Declined)
            }
            Some(session) => Err(AppError::InvalidTransition {
                state: session.state.name(),
                action: "decline",
            }),
            None => Err(AppError::InvalidTransition {
                state: UpdateState::Idle.name(),
                action: "decline",
            }),
        }
    }

    /// 执行通知按钮对应的操作
    pub async fn dispatch(&self, action: UpdateAction) -> AppResult<UpdateState> {
        match action {
            UpdateAction::Accept => self.accept().await,
            UpdateAction::Decline => self.decline().await,
        }
    }

    /// 开始新会话；已有正在执行的会话时失败
    async fn begin_session(&self, silent: bool) -> AppResult<u64> {
        let mut guard = self.session.write().await;

        if let Some(current) = guard.as_ref() {
            if current.state.is_busy() {
                tracing::warn!(
                    session_id = current.id,
                    state = current.state.name(),
                    "已有更新会话进行中"
                );
                return Err(AppError::SessionActive {
                    state: current.state.name(),
                });
            }
        }

        let id = self.next_session_id.fetch_add(1, Ordering::SeqCst);
        *guard = Some(UpdateSession {
            id,
            silent,
            state: UpdateState::Checking,
            update: None,
            progress: None,
            started_at: Utc::now(),
        });

        Ok(id)
    }

    /// 调用更新子系统，同时消费事件流
    async fn run_download(&self) -> anyhow::Result<()> {
        let (sink, mut stream) = download_channel();
        let install = self.updater.download_and_install(sink);
        tokio::pin!(install);

        let result = loop {
            tokio::select! {
                biased;
                Some(event) = stream.next() => self.record_event(event).await,
                result = &mut install => break result,
            }
        };

        // 完成前已到达但尚未处理的事件
        while let Some(event) = stream.try_next() {
            self.record_event(event).await;
        }

        result
    }

    async fn record_event(&self, event: DownloadEvent) {
        let snapshot = {
            let mut guard = self.session.write().await;
            let Some(session) = guard.as_mut() else {
                return;
            };
            let Some(progress) = session.progress.as_mut() else {
                return;
            };

            progress.apply(&event);
            let snapshot = *progress;

            if event == DownloadEvent::Finished && session.state == UpdateState::Downloading {
                session.state = UpdateState::Installing;
            }
            snapshot
        };

        self.reporter.on_progress(&event, &snapshot);
    }

    async fn set_state(&self, session_id: u64, state: UpdateState) {
        self.update_session(session_id, |s| s.state = state).await;
    }

    /// 只修改指定会话；会话已被新会话替换时忽略
    async fn update_session<F>(&self, session_id: u64, f: F)
    where
        F: FnOnce(&mut UpdateSession),
    {
        match self.session.write().await.as_mut() {
            Some(session) if session.id == session_id => f(session),
            _ => tracing::debug!(session_id = session_id, "会话已结束，忽略状态更新"),
        }
    }
}
