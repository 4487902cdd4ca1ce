//! 登场主题
//!
//! 服务已经在语音频道里时，有成员加入就播放该成员设定的
//! 登场主题（短音源）。没设定、下载被拒都静默跳过。

use std::sync::Arc;

use crate::application::acquire::AudioAcquirer;
use crate::application::events::MembershipEvent;
use crate::application::playback::PlaybackDriver;
use crate::application::ports::{SettingsStorePort, VoiceGatewayPort};

/// 登场主题服务
pub struct JingleService {
    gateway: Arc<dyn VoiceGatewayPort>,
    settings: Arc<dyn SettingsStorePort>,
    acquirer: Arc<AudioAcquirer>,
    driver: Arc<PlaybackDriver>,
}

impl JingleService {
    pub fn new(
        gateway: Arc<dyn VoiceGatewayPort>,
        settings: Arc<dyn SettingsStorePort>,
        acquirer: Arc<AudioAcquirer>,
        driver: Arc<PlaybackDriver>,
    ) -> Self {
        Self {
            gateway,
            settings,
            acquirer,
            driver,
        }
    }

    /// 成员语音状态变动
    pub async fn on_membership(&self, ev: &MembershipEvent) {
        if ev.is_bot {
            return;
        }
        // 频道没变或离席的变动不播放
        if ev.previous == ev.current || ev.current.is_none() {
            return;
        }

        // 服务不在语音频道里就不动作
        let Some(conn) = self.gateway.connection(ev.guild) else {
            return;
        };

        let url = match self.settings.user_config(ev.user).await {
            Ok(config) => match config.theme_for(ev.guild) {
                Some(url) => url.to_string(),
                None => return,
            },
            Err(e) => {
                tracing::warn!(user = %ev.user, error = %e, "Failed to load user config");
                return;
            }
        };

        let asset = match self.acquirer.fetch_remote(&url).await {
            Ok(Some(asset)) => asset,
            Ok(None) => {
                tracing::debug!(user = %ev.user, "Theme clip unavailable");
                return;
            }
            Err(e) => {
                tracing::warn!(user = %ev.user, error = %e, "Theme fetch failed");
                return;
            }
        };

        if let Err(e) = self.driver.play(conn.as_ref(), asset).await {
            tracing::warn!(user = %ev.user, error = %e, "Theme playback gave up");
        }
    }
}
