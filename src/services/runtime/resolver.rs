use super::backend::RuntimeBackend;
use super::selection::RuntimeSelector;
use crate::core::error::{AppError, AppResult};
use crate::models::config::RuntimeConfig;
use crate::models::{
    Resolution, RuntimeInstallation, RuntimeRelease, RuntimeValidationResult,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// 一次扫描的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub installations: Vec<RuntimeInstallation>,
    /// 后端失败原因，成功时为 None
    pub error: Option<String>,
}

/// 最近一次生效的扫描结果，`seq` 为该次扫描的开始序号
#[derive(Debug, Default)]
struct ScanSnapshot {
    seq: u64,
    outcome: ScanOutcome,
}

/// 扫描计数守卫，离开作用域（包括 future 被丢弃）时计数减一
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Java 运行时解析服务
///
/// 扫描与发行版查询失败时不返回错误，而是归一化为空结果并记录日志；
/// 只有下载失败会作为错误向上传递。
#[derive(Clone)]
pub struct RuntimeResolver {
    backend: Arc<dyn RuntimeBackend>,
    selector: RuntimeSelector,
    install_dir: PathBuf,
    snapshot: Arc<RwLock<ScanSnapshot>>,
    scan_seq: Arc<AtomicU64>,
    scans_in_flight: Arc<AtomicUsize>,
}

impl RuntimeResolver {
    pub fn new(backend: Arc<dyn RuntimeBackend>, config: &RuntimeConfig) -> Self {
        Self {
            backend,
            selector: RuntimeSelector::from_config(config),
            install_dir: config.effective_install_dir(),
            snapshot: Arc::new(RwLock::new(ScanSnapshot::default())),
            scan_seq: Arc::new(AtomicU64::new(0)),
            scans_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 替换选择器（自定义兼容策略）
    pub fn with_selector(mut self, selector: RuntimeSelector) -> Self {
        self.selector = selector;
        self
    }

    /// 默认安装目录
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// 是否有扫描正在进行（任意一个未完成即为 true）
    ///
    /// 并发扫描不会被合并，只关心一份结果的调用方应先检查此标志。
    pub fn is_scanning(&self) -> bool {
        self.scans_in_flight.load(Ordering::SeqCst) > 0
    }

    /// 最近开始的已完成扫描得到的运行时列表
    pub async fn installations(&self) -> Vec<RuntimeInstallation> {
        self.snapshot.read().await.outcome.installations.clone()
    }

    /// 最近开始的已完成扫描的失败原因
    pub async fn last_error(&self) -> Option<String> {
        self.snapshot.read().await.outcome.error.clone()
    }

    /// 重新扫描本机运行时
    ///
    /// 多个扫描重叠时，快照只接受开始得更晚的结果，
    /// 先开始、后完成的扫描不会覆盖较新的快照。
    pub async fn scan(&self) -> ScanOutcome {
        let _in_flight = InFlightGuard::enter(&self.scans_in_flight);
        let seq = self.scan_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let outcome = match self.backend.detect_installations().await {
            Ok(installations) => {
                tracing::info!(count = installations.len(), "Java 运行时扫描完成");
                ScanOutcome {
                    installations,
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(error = ?e, "扫描 Java 运行时失败");
                ScanOutcome {
                    installations: Vec::new(),
                    error: Some(format!("{e:#}")),
                }
            }
        };

        // 失败时同样替换快照，旧结果被清空
        let mut snapshot = self.snapshot.write().await;
        if seq > snapshot.seq {
            *snapshot = ScanSnapshot {
                seq,
                outcome: outcome.clone(),
            };
        } else {
            tracing::debug!(seq = seq, current = snapshot.seq, "已有更新的扫描结果，忽略本次快照");
        }

        outcome
    }

    /// 校验指定路径的运行时，任何后端错误都转换为无效结果
    pub async fn validate(&self, path: &str) -> RuntimeValidationResult {
        match self.backend.validate_path(path).await {
            Ok(result) => {
                let result = result.normalized();
                tracing::debug!(
                    path = %path,
                    is_valid = result.is_valid,
                    major = ?result.major,
                    "Java 路径校验完成"
                );
                result
            }
            Err(e) => {
                tracing::error!(path = %path, error = ?e, "校验 Java 路径失败");
                RuntimeValidationResult::invalid(format!("{e:#}"))
            }
        }
    }

    /// 查询指定主版本的最新发行版
    ///
    /// 没有匹配构建与请求失败都返回 None，两者都意味着暂时无法下载安装。
    pub async fn fetch_release(&self, major: u32) -> Option<RuntimeRelease> {
        self.lookup_release(major).await.ok()
    }

    /// 查询发行版，拿不到时返回可以展示给用户的原因
    async fn lookup_release(&self, major: u32) -> Result<RuntimeRelease, String> {
        match self.backend.fetch_release(major).await {
            Ok(Some(release)) => {
                tracing::info!(
                    major = major,
                    version = %release.version,
                    size = release.size,
                    "获取到 Java 发行版"
                );
                Ok(release)
            }
            Ok(None) => {
                tracing::warn!(major = major, "没有匹配的 Java 发行版");
                Err(format!("没有可下载的 Java {major} 发行版"))
            }
            Err(e) => {
                tracing::error!(major = major, error = ?e, "获取 Java {} 发行版失败", major);
                Err(format!("获取 Java {major} 发行版失败: {e:#}"))
            }
        }
    }

    /// 下载并安装运行时，失败原样向上传递
    pub async fn download(&self, major: u32, install_dir: &Path) -> AppResult<String> {
        tracing::info!(major = major, install_dir = %install_dir.display(), "开始下载 Java 运行时");

        self.backend
            .download_runtime(major, install_dir)
            .await
            .map_err(|e| {
                tracing::error!(major = major, error = ?e, "Java 运行时下载失败");
                AppError::RuntimeDownload {
                    major,
                    message: format!("{e:#}"),
                }
            })
    }

    /// 在给定列表中选择最合适的运行时
    pub fn select_best<'a>(
        &self,
        installations: &'a [RuntimeInstallation],
        required_major: u32,
    ) -> Option<&'a RuntimeInstallation> {
        self.selector.select_best(installations, required_major)
    }

    /// 扫描并选择；本机没有合适的运行时时查询可下载的发行版
    pub async fn resolve(&self, required_major: u32) -> Resolution {
        let outcome = self.scan().await;

        if let Some(found) = self.select_best(&outcome.installations, required_major) {
            tracing::info!(
                required = required_major,
                path = %found.path,
                major = ?found.effective_major(),
                "找到可用的 Java 运行时"
            );
            return Resolution::Installed(found.clone());
        }

        tracing::info!(required = required_major, "本机没有兼容的 Java 运行时，尝试获取发行版");

        match self.lookup_release(required_major).await {
            Ok(release) => Resolution::Provisionable(release),
            Err(reason) => Resolution::Unavailable { reason },
        }
    }

    /// 下载安装并校验，返回可直接使用的安装记录
    ///
    /// `install_dir` 为空时使用配置中的默认目录。
    pub async fn provision(
        &self,
        major: u32,
        install_dir: Option<&Path>,
    ) -> AppResult<RuntimeInstallation> {
        let install_dir = install_dir.unwrap_or(self.install_dir.as_path());
        let installed_path = self.download(major, install_dir).await?;

        let validation = self.validate(&installed_path).await;
        if !validation.is_valid {
            let message = validation
                .error
                .clone()
                .unwrap_or_else(|| "unknown validation failure".to_string());
            return Err(AppError::RuntimeInvalid {
                path: installed_path,
                message,
            });
        }

        let installation = validation.into_installation(installed_path);
        tracing::info!(path = %installation.path, major = ?installation.effective_major(), "Java 运行时安装完成");
        Ok(installation)
    }
}
