// 应用配置模型
//
// 日志、运行时解析、自动更新三部分，全部字段都有默认值，
// 配置文件中缺失的字段会回退到默认值。

use crate::core::error::{AppError, AppResult};
use crate::models::runtime::TieBreak;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// 解析字符串为日志级别（大小写不敏感）
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// 日志输出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Console,
    File,
    Both,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// 日志目录（None 时使用 ~/.java-orchestrator/logs）
    pub file_path: Option<String>,
}

/// 版本兼容策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityMode {
    /// 高版本可以运行为低版本构建的应用
    #[default]
    Forward,
    /// 只接受主版本号完全一致的运行时
    Exact,
}

/// 运行时解析配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RuntimeConfig {
    /// 运行时安装目录（None 时使用数据目录下的 runtimes）
    pub install_dir: Option<PathBuf>,
    pub compatibility: CompatibilityMode,
    /// Forward 模式下允许的最大主版本差距
    pub max_major_gap: Option<u32>,
    pub tie_break: TieBreak,
}

impl RuntimeConfig {
    /// 实际生效的安装目录
    pub fn effective_install_dir(&self) -> PathBuf {
        self.install_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("java-orchestrator")
                .join("runtimes")
        })
    }
}

/// 自动更新配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// 启动时执行一次静默检查
    pub check_on_startup: bool,
    /// 后台定时检查间隔（秒），0 表示关闭
    pub check_interval_secs: u64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            check_on_startup: true,
            check_interval_secs: 6 * 60 * 60,
        }
    }
}

/// 顶层配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub log: LogConfig,
    pub runtime: RuntimeConfig,
    pub update: UpdateConfig,
}

impl AppConfig {
    /// 默认配置文件路径（~/.java-orchestrator/config.toml）
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".java-orchestrator").join("config.toml"))
    }

    /// 从 TOML 文件加载配置，文件不存在时使用默认值，随后应用环境变量覆盖
    pub fn load(path: &Path) -> AppResult<Self> {
        let mut config = if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
            Self::from_toml(&content)?
        } else {
            tracing::debug!(path = %path.display(), "配置文件不存在，使用默认配置");
            Self::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml(content: &str) -> AppResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) -> AppResult<()> {
        if let Ok(level) = std::env::var("JAVA_ORCH_LOG_LEVEL") {
            self.log.level = LogLevel::parse(&level)
                .ok_or_else(|| AppError::InvalidConfig(format!("无效的日志级别: {level}")))?;
        }

        if let Ok(format) = std::env::var("JAVA_ORCH_LOG_FORMAT") {
            self.log.format = match format.trim().to_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(AppError::InvalidConfig(format!(
                        "无效的日志格式: {format}"
                    )))
                }
            };
        }

        if let Ok(output) = std::env::var("JAVA_ORCH_LOG_OUTPUT") {
            self.log.output = match output.trim().to_lowercase().as_str() {
                "console" => LogOutput::Console,
                "file" => LogOutput::File,
                "both" => LogOutput::Both,
                _ => {
                    return Err(AppError::InvalidConfig(format!(
                        "无效的日志输出目标: {output}"
                    )))
                }
            };
        }

        if let Ok(path) = std::env::var("JAVA_ORCH_LOG_PATH") {
            self.log.file_path = Some(path);
        }

        if let Ok(dir) = std::env::var("JAVA_ORCH_RUNTIME_DIR") {
            self.runtime.install_dir = Some(PathBuf::from(dir));
        }

        if let Ok(secs) = std::env::var("JAVA_ORCH_UPDATE_INTERVAL_SECS") {
            self.update.check_interval_secs = secs.trim().parse().map_err(|_| {
                AppError::InvalidConfig(format!("无效的更新检查间隔: {secs}"))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const ENV_KEYS: [&str; 6] = [
        "JAVA_ORCH_LOG_LEVEL",
        "JAVA_ORCH_LOG_FORMAT",
        "JAVA_ORCH_LOG_OUTPUT",
        "JAVA_ORCH_LOG_PATH",
        "JAVA_ORCH_RUNTIME_DIR",
        "JAVA_ORCH_UPDATE_INTERVAL_SECS",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [runtime]
            compatibility = "exact"
            tie_break = "path_order"

            [log]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.output, LogOutput::Console);
        assert_eq!(config.runtime.compatibility, CompatibilityMode::Exact);
        assert_eq!(config.runtime.tie_break, TieBreak::PathOrder);
        assert_eq!(config.update, UpdateConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let err = AppConfig::from_toml("[log]\nlevel = \"loud\"").unwrap_err();
        assert!(matches!(err, AppError::ConfigParse(_)));
    }

    #[test]
    #[serial]
    fn test_load_missing_file_returns_defaults() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    #[serial]
    fn test_load_file_then_env_overrides() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[update]\ncheck_on_startup = false\ncheck_interval_secs = 60\n",
        )
        .unwrap();

        std::env::set_var("JAVA_ORCH_LOG_LEVEL", "TRACE");
        std::env::set_var("JAVA_ORCH_RUNTIME_DIR", "/opt/runtimes");
        let config = AppConfig::load(&path);
        clear_env();

        let config = config.unwrap();
        assert!(!config.update.check_on_startup);
        assert_eq!(config.update.check_interval_secs, 60);
        assert_eq!(config.log.level, LogLevel::Trace);
        assert_eq!(
            config.runtime.effective_install_dir(),
            PathBuf::from("/opt/runtimes")
        );
    }

    #[test]
    #[serial]
    fn test_invalid_env_value_is_rejected() {
        clear_env();
        std::env::set_var("JAVA_ORCH_UPDATE_INTERVAL_SECS", "soon");
        let mut config = AppConfig::default();
        let result = config.apply_env_overrides();
        clear_env();

        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }
}
