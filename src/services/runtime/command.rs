// 命令边界适配
//
// 原生后端以“命令名 + JSON 参数 → JSON 结果 / 字符串错误”的形式暴露，
// 这里把它适配为 RuntimeBackend。

use super::backend::RuntimeBackend;
use crate::models::{RuntimeInstallation, RuntimeRelease, RuntimeValidationResult};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::path::Path;

pub const DETECT_INSTALLATIONS_CMD: &str = "detect_java_installations_cmd";
pub const VALIDATE_PATH_CMD: &str = "validate_java_path_cmd";
pub const FETCH_RELEASE_CMD: &str = "fetch_adoptium_release_cmd";
pub const DOWNLOAD_RUNTIME_CMD: &str = "download_java_cmd";

/// 命令调用器（IPC 桥、子进程、测试桩均可实现）
#[async_trait]
pub trait CommandInvoker: Send + Sync {
    async fn invoke(&self, command: &str, args: Value) -> std::result::Result<Value, String>;
}

/// 基于命令调用的后端实现
pub struct InvokeBackend<I> {
    invoker: I,
}

impl<I: CommandInvoker> InvokeBackend<I> {
    pub fn new(invoker: I) -> Self {
        Self { invoker }
    }

    async fn call<T: DeserializeOwned>(&self, command: &str, args: Value) -> Result<T> {
        tracing::trace!(command = command, args = %args, "调用后端命令");

        let value = self
            .invoker
            .invoke(command, args)
            .await
            .map_err(|e| anyhow!("{command} failed: {e}"))?;

        serde_json::from_value(value)
            .with_context(|| format!("Failed to parse {command} response"))
    }
}

#[async_trait]
impl<I: CommandInvoker> RuntimeBackend for InvokeBackend<I> {
    async fn detect_installations(&self) -> Result<Vec<RuntimeInstallation>> {
        self.call(DETECT_INSTALLATIONS_CMD, json!({})).await
    }

    async fn validate_path(&self, path: &str) -> Result<RuntimeValidationResult> {
        self.call(VALIDATE_PATH_CMD, json!({ "path": path })).await
    }

    async fn fetch_release(&self, major: u32) -> Result<Option<RuntimeRelease>> {
        // null 表示没有匹配的发行版
        self.call(FETCH_RELEASE_CMD, json!({ "major": major })).await
    }

    async fn download_runtime(&self, major: u32, install_dir: &Path) -> Result<String> {
        self.call(
            DOWNLOAD_RUNTIME_CMD,
            json!({
                "major": major,
                "installDir": install_dir.to_string_lossy(),
            }),
        )
        .await
    }
}
