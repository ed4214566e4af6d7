// 后台自动检查更新
//
// 启动时检查一次，之后按间隔定时检查，全部以静默模式进行。

use super::orchestrator::UpdateOrchestrator;
use crate::models::config::UpdateConfig;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// 按配置启动后台检查任务，启动检查与定时检查都关闭时返回 None
pub fn spawn_background_checks(
    orchestrator: UpdateOrchestrator,
    config: &UpdateConfig,
) -> Option<JoinHandle<()>> {
    let check_on_startup = config.check_on_startup;
    let period = (config.check_interval_secs > 0)
        .then(|| Duration::from_secs(config.check_interval_secs));

    if !check_on_startup && period.is_none() {
        tracing::debug!("自动检查更新已关闭");
        return None;
    }

    Some(tokio::spawn(async move {
        if check_on_startup {
            silent_check(&orchestrator).await;
        }

        let Some(period) = period else {
            return;
        };

        tracing::info!(interval_secs = period.as_secs(), "启动定时检查更新");
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            silent_check(&orchestrator).await;
        }
    }))
}

async fn silent_check(orchestrator: &UpdateOrchestrator) {
    match orchestrator.check_for_updates(true).await {
        Ok(state) => tracing::debug!(state = state.name(), "后台检查更新完成"),
        Err(e) if e.is_session_active() => {
            tracing::debug!(error = %e, "已有更新会话，跳过本次后台检查");
        }
        Err(e) => tracing::warn!(error = %e, "后台检查更新失败"),
    }
}
