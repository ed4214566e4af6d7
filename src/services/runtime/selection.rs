// 运行时选择算法
//
// 给定扫描结果与所需主版本，选出最合适的运行时；没有合适的返回 None，
// 调用方据此走下载安装流程。

use crate::models::config::{CompatibilityMode, RuntimeConfig};
use crate::models::{RuntimeInstallation, TieBreak};
use std::sync::Arc;

/// 主版本兼容策略
///
/// 精确匹配总是优先，策略只决定没有精确匹配时哪些候选可用、谁更接近。
pub trait CompatibilityPolicy: Send + Sync {
    /// `candidate` 主版本能否运行要求 `required` 的应用
    fn is_compatible(&self, candidate: u32, required: u32) -> bool;

    /// 兼容候选与要求之间的差距，越小越优先
    fn distance(&self, candidate: u32, required: u32) -> u32;
}

/// 向上兼容：高版本运行时可以运行低版本应用，反之不行
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardCompatible {
    /// 允许的最大主版本差距，None 表示不限
    pub max_gap: Option<u32>,
}

impl CompatibilityPolicy for ForwardCompatible {
    fn is_compatible(&self, candidate: u32, required: u32) -> bool {
        candidate >= required
            && self
                .max_gap
                .is_none_or(|gap| candidate - required <= gap)
    }

    fn distance(&self, candidate: u32, required: u32) -> u32 {
        candidate.saturating_sub(required)
    }
}

/// 只接受主版本完全一致
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactOnly;

impl CompatibilityPolicy for ExactOnly {
    fn is_compatible(&self, candidate: u32, required: u32) -> bool {
        candidate == required
    }

    fn distance(&self, _candidate: u32, _required: u32) -> u32 {
        0
    }
}

/// 运行时选择器
#[derive(Clone)]
pub struct RuntimeSelector {
    policy: Arc<dyn CompatibilityPolicy>,
    tie_break: TieBreak,
}

impl RuntimeSelector {
    pub fn new(policy: Arc<dyn CompatibilityPolicy>, tie_break: TieBreak) -> Self {
        Self { policy, tie_break }
    }

    /// 按配置构建
    pub fn from_config(config: &RuntimeConfig) -> Self {
        let policy: Arc<dyn CompatibilityPolicy> = match config.compatibility {
            CompatibilityMode::Forward => Arc::new(ForwardCompatible {
                max_gap: config.max_major_gap,
            }),
            CompatibilityMode::Exact => Arc::new(ExactOnly),
        };
        Self::new(policy, config.tie_break)
    }

    /// 选出最合适的运行时
    ///
    /// 1. 有效且主版本完全一致的，按输入顺序取第一个，直接返回；
    /// 2. 否则在策略认可的有效候选中取差距最小的；
    /// 3. 差距相同时按 tie_break 决定；
    /// 4. 都没有则返回 None。
    ///
    /// 无效的运行时、无法确定主版本的运行时永远不会被选中。
    pub fn select_best<'a>(
        &self,
        installations: &'a [RuntimeInstallation],
        required_major: u32,
    ) -> Option<&'a RuntimeInstallation> {
        let exact = installations
            .iter()
            .find(|j| j.is_valid && j.effective_major() == Some(required_major));
        if exact.is_some() {
            return exact;
        }

        let compatible = installations.iter().filter_map(|j| {
            if !j.is_valid {
                return None;
            }
            let major = j.effective_major()?;
            self.policy
                .is_compatible(major, required_major)
                .then(|| (self.policy.distance(major, required_major), j))
        });

        // min_by 在相等时保留第一个元素，输入顺序因此得以保持
        let best = match self.tie_break {
            TieBreak::InputOrder => compatible.min_by(|(a, _), (b, _)| a.cmp(b)),
            TieBreak::PathOrder => compatible.min_by(|(da, a), (db, b)| {
                da.cmp(db).then_with(|| a.path.cmp(&b.path))
            }),
        };

        best.map(|(_, j)| j)
    }
}

impl Default for RuntimeSelector {
    fn default() -> Self {
        Self::new(Arc::new(ForwardCompatible::default()), TieBreak::InputOrder)
    }
}

impl std::fmt::Debug for RuntimeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeSelector")
            .field("tie_break", &self.tie_break)
            .finish_non_exhaustive()
    }
}

/// 使用默认策略（向上兼容、保持输入顺序）选择
pub fn select_best(
    installations: &[RuntimeInstallation],
    required_major: u32,
) -> Option<&RuntimeInstallation> {
    RuntimeSelector::default().select_best(installations, required_major)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn java(path: &str, major: Option<u32>, is_valid: bool) -> RuntimeInstallation {
        RuntimeInstallation {
            path: path.to_string(),
            version: major.map(|m| format!("{m}.0.1")),
            major,
            vendor: None,
            arch: None,
            is_valid,
        }
    }

    #[test]
    fn test_exact_match_wins() {
        let installations = vec![
            java("/jvm/8", Some(8), true),
            java("/jvm/17", Some(17), true),
            java("/jvm/21", Some(21), false),
        ];
        let best = select_best(&installations, 17).unwrap();
        assert_eq!(best.path, "/jvm/17");
    }

    #[test]
    fn test_smallest_qualifying_major() {
        let installations = vec![java("/jvm/8", Some(8), true), java("/jvm/21", Some(21), true)];
        let best = select_best(&installations, 17).unwrap();
        assert_eq!(best.path, "/jvm/21");
    }

    #[test]
    fn test_nothing_compatible() {
        let installations = vec![java("/jvm/8", Some(8), true)];
        assert!(select_best(&installations, 17).is_none());
    }

    #[test]
    fn test_invalid_never_selected() {
        let installations = vec![java("/jvm/17", Some(17), false), java("/jvm/21", Some(21), false)];
        assert!(select_best(&installations, 17).is_none());
        assert!(select_best(&[], 17).is_none());
    }

    #[test]
    fn test_exact_match_beats_earlier_closer_candidates() {
        let installations = vec![
            java("/jvm/21", Some(21), true),
            java("/jvm/17-a", Some(17), false),
            java("/jvm/17-b", Some(17), true),
            java("/jvm/17-c", Some(17), true),
        ];
        let best = select_best(&installations, 17).unwrap();
        assert_eq!(best.path, "/jvm/17-b");
    }

    #[test]
    fn test_minimal_major_among_many() {
        let installations = vec![
            java("/jvm/25", Some(25), true),
            java("/jvm/11", Some(11), true),
            java("/jvm/21", Some(21), true),
            java("/jvm/22", Some(22), true),
        ];
        let best = select_best(&installations, 17).unwrap();
        assert_eq!(best.path, "/jvm/21");
    }

    #[test]
    fn test_unknown_major_never_qualifies() {
        let mut unknown = java("/jvm/unknown", None, true);
        unknown.version = Some("custom-build".to_string());
        let installations = vec![unknown];
        assert!(select_best(&installations, 0).is_none());
        assert!(select_best(&installations, 17).is_none());
    }

    #[test]
    fn test_major_derived_from_version() {
        let mut legacy = java("/jvm/legacy", None, true);
        legacy.version = Some("1.8.0_392".to_string());
        let installations = vec![legacy];
        assert_eq!(select_best(&installations, 8).unwrap().path, "/jvm/legacy");
    }

    #[test]
    fn test_tie_break_input_order() {
        let installations = vec![
            java("/zulu/21", Some(21), true),
            java("/adoptium/21", Some(21), true),
        ];
        let best = select_best(&installations, 17).unwrap();
        assert_eq!(best.path, "/zulu/21");
    }

    #[test]
    fn test_tie_break_path_order() {
        let installations = vec![
            java("/zulu/21", Some(21), true),
            java("/adoptium/21", Some(21), true),
            java("/adoptium/25", Some(25), true),
        ];
        let selector = RuntimeSelector::new(
            Arc::new(ForwardCompatible::default()),
            TieBreak::PathOrder,
        );
        let best = selector.select_best(&installations, 17).unwrap();
        assert_eq!(best.path, "/adoptium/21");
    }

    #[test]
    fn test_exact_only_policy() {
        let installations = vec![java("/jvm/21", Some(21), true)];
        let selector = RuntimeSelector::new(Arc::new(ExactOnly), TieBreak::InputOrder);
        assert!(selector.select_best(&installations, 17).is_none());
        assert!(selector.select_best(&installations, 21).is_some());
    }

    #[test]
    fn test_forward_policy_max_gap() {
        let installations = vec![java("/jvm/25", Some(25), true)];
        let config = RuntimeConfig {
            max_major_gap: Some(4),
            ..Default::default()
        };
        let selector = RuntimeSelector::from_config(&config);
        assert!(selector.select_best(&installations, 17).is_none());
        assert!(selector.select_best(&installations, 21).is_some());
    }
}
