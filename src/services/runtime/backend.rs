// Runtime Backend Trait - 运行时后端接口
//
// 扫描、校验、查询发行版、下载安装都由原生后端完成，
// 编排层只通过此 trait 调用，不关心具体实现。

use crate::models::{RuntimeInstallation, RuntimeRelease, RuntimeValidationResult};
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Java 运行时后端
///
/// 所有方法都可能失败，失败如何归一化由 [`RuntimeResolver`](super::RuntimeResolver) 决定。
#[async_trait]
pub trait RuntimeBackend: Send + Sync {
    /// 全量扫描本机运行时（每次都重新扫描，不做缓存）
    async fn detect_installations(&self) -> Result<Vec<RuntimeInstallation>>;

    /// 执行指定路径的运行时并解析版本输出
    async fn validate_path(&self, path: &str) -> Result<RuntimeValidationResult>;

    /// 查询指定主版本的最新发行版
    ///
    /// `Ok(None)` 表示分发服务没有匹配的构建，与调用失败区分
    async fn fetch_release(&self, major: u32) -> Result<Option<RuntimeRelease>>;

    /// 下载并解压到 `install_dir`，返回安装后的运行时路径
    async fn download_runtime(&self, major: u32, install_dir: &Path) -> Result<String>;
}
