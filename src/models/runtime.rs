use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 扫描发现的一个 Java 运行时
///
/// 由后端批量返回，返回后不再修改；新的扫描结果会整体替换旧结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeInstallation {
    /// 运行时路径（同一次扫描结果内唯一）
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    /// 后端成功执行并解析了该运行时的版本输出
    pub is_valid: bool,
}

impl RuntimeInstallation {
    /// 主版本号：优先使用后端给出的 major，否则从 version 推导
    pub fn effective_major(&self) -> Option<u32> {
        self.major
            .or_else(|| self.version.as_deref().and_then(parse_major))
    }
}

/// 单个路径的校验结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeValidationResult {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RuntimeValidationResult {
    /// 构造一个失败的校验结果
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            version: None,
            major: None,
            vendor: None,
            arch: None,
            error: Some(error.into()),
        }
    }

    /// 保证 `error` 与 `is_valid` 互斥：有错误即无效，有效即无错误
    pub fn normalized(mut self) -> Self {
        if self.error.is_some() {
            self.is_valid = false;
        }
        if self.is_valid {
            self.error = None;
        }
        self
    }

    /// 转换为安装记录（用户手动指定的路径也能参与选择）
    pub fn into_installation(self, path: impl Into<String>) -> RuntimeInstallation {
        RuntimeInstallation {
            path: path.into(),
            version: self.version,
            major: self.major,
            vendor: self.vendor,
            arch: self.arch,
            is_valid: self.is_valid && self.error.is_none(),
        }
    }
}

/// 分发服务提供的可下载运行时构建
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeRelease {
    pub version: String,
    pub major: u32,
    pub download_url: String,
    pub filename: String,
    /// 文件大小（字节）
    pub size: u64,
    /// 部分分发源不提供校验和
    #[serde(default)]
    pub checksum: Option<String>,
}

/// 同主版本候选之间的次级排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// 保持扫描结果顺序，取第一个
    #[default]
    InputOrder,
    /// 按路径字典序取最小
    PathOrder,
}

/// 一次解析请求的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 本机已有可用运行时
    Installed(RuntimeInstallation),
    /// 本机没有，但分发服务有可下载的构建
    Provisionable(RuntimeRelease),
    /// 本机没有，且当前无法获取可下载构建
    Unavailable {
        /// 没有匹配的构建或查询失败的原因，可直接展示给用户
        reason: String,
    },
}

/// 从版本字符串中提取主版本号
///
/// 兼容旧式 `1.x` 命名：`1.8.0_392` → 8；新式 `17.0.2` → 17；`21` → 21。
pub fn parse_major(version: &str) -> Option<u32> {
    static MAJOR_REGEX: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^\s*v?(\d+)(?:\.(\d+))?").expect("invalid major version regex")
    });

    let captures = MAJOR_REGEX.captures(version)?;
    let first: u32 = captures.get(1)?.as_str().parse().ok()?;

    if first == 1 {
        if let Some(second) = captures.get(2) {
            return second.as_str().parse().ok();
        }
    }

    Some(first)
}
