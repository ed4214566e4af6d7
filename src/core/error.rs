//! 统一错误类型定义
//!
//! 使用 `thiserror` 定义编排层的错误类型。协作方（后端命令、更新子系统）
//! 返回 `anyhow::Error`，在进入编排层时被归一化为这里的变体。

use std::path::PathBuf;
use thiserror::Error;

/// 编排层的统一错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 运行时下载/解压失败（与“没有可用运行时”区分开）
    #[error("Java {major} 下载失败: {message}")]
    RuntimeDownload { major: u32, message: String },

    /// 下载完成但安装目录中的运行时无法通过校验
    #[error("已安装的 Java 运行时无效: {path}: {message}")]
    RuntimeInvalid { path: String, message: String },

    /// 已有未结束的更新会话
    #[error("更新会话进行中（当前状态: {state}）")]
    SessionActive { state: &'static str },

    /// 当前状态不允许执行该操作
    #[error("状态 {state} 下不能执行 {action}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    /// 更新包下载失败
    #[error("更新下载失败: {0}")]
    UpdateDownload(String),

    /// 更新包已下载，但安装失败
    #[error("更新安装失败: {0}")]
    UpdateInstall(String),

    /// 重启应用失败
    #[error("重启应用失败: {0}")]
    Relaunch(String),

    /// 文件 I/O 错误
    #[error("文件 I/O 错误: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件解析错误
    #[error("配置解析错误: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// 无效的配置值
    #[error("无效的配置: {0}")]
    InvalidConfig(String),
}

/// 编排层结果别名
pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    /// 从 `std::io::Error` 和路径创建 I/O 错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// 是否为“会话已存在”类错误（后台定时检查会忽略它）
    pub fn is_session_active(&self) -> bool {
        matches!(self, Self::SessionActive { .. })
    }
}
