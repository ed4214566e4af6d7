// lib.rs - Java 运行时解析与应用自更新编排

pub mod core;
pub mod models;
pub mod services;

pub use models::*;
pub use services::notification::{Notifier, TracingNotifier};
pub use services::runtime::{
    CommandInvoker, InvokeBackend, RuntimeBackend, RuntimeResolver, RuntimeSelector,
};
pub use services::update::{spawn_background_checks, UpdateOrchestrator, Updater};

// 重新导出常用类型
pub use anyhow::{Context, Result};

pub use core::{init_logger, update_log_level, AppError, AppResult};
