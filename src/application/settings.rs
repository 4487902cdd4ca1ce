//! 音色设定指令
//!
//! 设定值是 0~100 的百分比，写入前夹取；回复里带上变更前后的值。

use std::sync::Arc;

use crate::application::ports::{ChatPort, SettingsStorePort};
use crate::domain::voice::clamp;
use crate::domain::{ChannelId, GuildId, SerifCatalog, UserId, VoiceKind, VoiceProfile};

/// 可调的数值参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceParam {
    Speed,
    Tone,
    Intone,
    Threshold,
}

impl VoiceParam {
    /// 回复里的参数名
    pub fn label(&self) -> &'static str {
        match self {
            VoiceParam::Speed => "話す速度",
            VoiceParam::Tone => "声のトーン",
            VoiceParam::Intone => "声のイントネーション",
            VoiceParam::Threshold => "声の閾値",
        }
    }

    fn get(&self, profile: &VoiceProfile) -> f64 {
        match self {
            VoiceParam::Speed => profile.speed,
            VoiceParam::Tone => profile.tone,
            VoiceParam::Intone => profile.intone,
            VoiceParam::Threshold => profile.threshold,
        }
    }

    fn set(&self, profile: &mut VoiceProfile, value: f64) {
        match self {
            VoiceParam::Speed => profile.speed = value,
            VoiceParam::Tone => profile.tone = value,
            VoiceParam::Intone => profile.intone = value,
            VoiceParam::Threshold => profile.threshold = value,
        }
    }
}

/// 音色设定服务
pub struct SettingsService {
    settings: Arc<dyn SettingsStorePort>,
    chat: Arc<dyn ChatPort>,
    catalog: Arc<SerifCatalog>,
}

impl SettingsService {
    pub fn new(
        settings: Arc<dyn SettingsStorePort>,
        chat: Arc<dyn ChatPort>,
        catalog: Arc<SerifCatalog>,
    ) -> Self {
        Self {
            settings,
            chat,
            catalog,
        }
    }

    /// 更新一个数值参数（夹取到 [0,100]）
    pub async fn set_param(
        &self,
        user: UserId,
        reply_channel: ChannelId,
        param: VoiceParam,
        value: f64,
    ) {
        let value = clamp(value, 0.0, 100.0);

        let mut config = match self.settings.user_config(user).await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(user = %user, error = %e, "Failed to load user config");
                return;
            }
        };

        let before = param.get(&config.profile);
        param.set(&mut config.profile, value);

        if let Err(e) = self.settings.put_user_config(user, &config).await {
            tracing::warn!(user = %user, error = %e, "Failed to store user config");
            return;
        }

        let line = self.catalog.render(
            "status_change",
            &[
                &user.mention(),
                param.label(),
                &before.to_string(),
                &value.to_string(),
            ],
        );
        self.reply(reply_channel, &line).await;
    }

    /// 变更音色种类
    pub async fn change_voice(&self, user: UserId, reply_channel: ChannelId, name: &str) {
        let Ok(kind) = name.parse::<VoiceKind>() else {
            let line = self.catalog.render("voice_not_exist", &[&user.mention()]);
            self.reply(reply_channel, &line).await;
            return;
        };

        let mut config = match self.settings.user_config(user).await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(user = %user, error = %e, "Failed to load user config");
                return;
            }
        };

        let before = config.profile.voice;
        config.profile.voice = kind;

        if let Err(e) = self.settings.put_user_config(user, &config).await {
            tracing::warn!(user = %user, error = %e, "Failed to store user config");
            return;
        }

        let line = self.catalog.render(
            "status_change",
            &[
                &user.mention(),
                "ボイスの種類",
                before.as_str(),
                kind.as_str(),
            ],
        );
        self.reply(reply_channel, &line).await;
    }

    /// 展示设定状况
    pub async fn show(&self, user: UserId, reply_channel: ChannelId) {
        let profile = match self.settings.user_config(user).await {
            Ok(config) => config.profile,
            Err(e) => {
                tracing::warn!(user = %user, error = %e, "Failed to load user config");
                return;
            }
        };

        let mut lines = vec![self.catalog.render("show_user_status", &[&user.mention()])];
        lines.push(format!("声の種類　　　　： {}", profile.voice));
        lines.push(format!("話す速度　　　　： {}", profile.speed));
        lines.push(format!("トーン　　　　　： {}", profile.tone));
        lines.push(format!("イントネーション： {}", profile.intone));
        self.reply(reply_channel, &lines.join("\n")).await;
    }

    /// 设置登场主题
    pub async fn set_theme(&self, user: UserId, guild: GuildId, url: &str) {
        let mut config = match self.settings.user_config(user).await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(user = %user, error = %e, "Failed to load user config");
                return;
            }
        };

        config.set_theme(guild, url);

        if let Err(e) = self.settings.put_user_config(user, &config).await {
            tracing::warn!(user = %user, error = %e, "Failed to store user config");
        }
    }

    async fn reply(&self, channel: ChannelId, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Err(e) = self.chat.send(channel, text).await {
            tracing::warn!(channel = %channel, error = %e, "Failed to send reply");
        }
    }
}
