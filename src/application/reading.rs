//! 朗读编排
//!
//! 成员变动与消息事件驱动的核心服务。每个服务器的事件由
//! 路由器串行投递，本服务在单写者前提下修改 `GuildSession`。
//!
//! 失败语义全部是尽力而为：频道解析不了、跨服务器错配、
//! 合成或播放失败都只记录日志并放弃该次请求，不打扰用户。

use std::sync::Arc;

use crate::application::acquire::AudioAcquirer;
use crate::application::events::{MembershipEvent, MessageEvent};
use crate::application::playback::PlaybackDriver;
use crate::application::ports::{
    ChatPort, SettingsStorePort, VoiceGatewayPort, WatchConfig,
};
use crate::application::text::TextService;
use crate::domain::{AttachOutcome, ChannelId, ChannelRef, GuildSession, SerifCatalog, UserId};

/// 朗读服务
pub struct ReadingService {
    gateway: Arc<dyn VoiceGatewayPort>,
    chat: Arc<dyn ChatPort>,
    settings: Arc<dyn SettingsStorePort>,
    text: Arc<TextService>,
    acquirer: Arc<AudioAcquirer>,
    driver: Arc<PlaybackDriver>,
    catalog: Arc<SerifCatalog>,
    /// 单条消息的最大朗读字符数
    max_chars: usize,
}

impl ReadingService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        gateway: Arc<dyn VoiceGatewayPort>,
        chat: Arc<dyn ChatPort>,
        settings: Arc<dyn SettingsStorePort>,
        text: Arc<TextService>,
        acquirer: Arc<AudioAcquirer>,
        driver: Arc<PlaybackDriver>,
        catalog: Arc<SerifCatalog>,
        max_chars: usize,
    ) -> Self {
        Self {
            gateway,
            chat,
            settings,
            text,
            acquirer,
            driver,
            catalog,
            max_chars,
        }
    }

    /// 成员语音状态变动
    pub async fn on_membership(&self, session: &mut GuildSession, ev: &MembershipEvent) {
        // 机器帐号不触发任何动作
        if ev.is_bot {
            return;
        }

        // 频道没变（静音切换等）的变动忽略
        if ev.previous == ev.current {
            return;
        }

        match self.gateway.connection(ev.guild) {
            Some(conn) => {
                // 已连接: 频道里只剩机器帐号就退出
                if conn.human_count() == 0 {
                    self.leave_voice(session).await;
                }
            }
            None => {
                // 未连接: 判断是否触发自动参加
                let Some(joined) = ev.current else {
                    // 没有先行绑定的退出事件忽略
                    return;
                };
                self.try_auto_join(session, ev, joined).await;
            }
        }
    }

    /// 自动参加判定
    async fn try_auto_join(
        &self,
        session: &mut GuildSession,
        ev: &MembershipEvent,
        joined: ChannelId,
    ) {
        let config = match self.settings.guild_config(ev.guild).await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(guild = %ev.guild, error = %e, "Failed to load guild config");
                return;
            }
        };

        // 加入的不是监视频道则不动作
        if config.watch.voice != Some(joined) {
            return;
        }

        let Some(text_id) = config.watch.text else {
            return;
        };

        // 文字频道解析不了、或属于别的服务器 → 静默放弃
        // （设定残留的错配，不向用户上报）
        let Some(channel) = self.chat.resolve_text_channel(text_id).await else {
            tracing::debug!(guild = %ev.guild, channel = %text_id, "Auto-join text channel unresolved, giving up");
            return;
        };
        if channel.guild != ev.guild {
            tracing::debug!(guild = %ev.guild, channel = %text_id, "Auto-join text channel belongs to another guild, giving up");
            return;
        }

        self.attach(session, joined, channel).await;
    }

    /// 连接语音频道并绑定朗读频道
    async fn attach(
        &self,
        session: &mut GuildSession,
        voice_channel: ChannelId,
        text_channel: ChannelRef,
    ) {
        let guild = session.guild_id();

        let need_connect = match self.gateway.connection(guild) {
            Some(conn) => conn.channel() != voice_channel,
            None => true,
        };
        if need_connect {
            if let Err(e) = self.gateway.connect(guild, voice_channel).await {
                tracing::warn!(guild = %guild, channel = %voice_channel, error = %e, "Voice connect failed");
                return;
            }
        }

        match session.attach(text_channel) {
            AttachOutcome::Started => {
                self.send_serif(text_channel.id, "start_reading", &[&text_channel.id.mention()])
                    .await;
                tracing::info!(guild = %guild, voice = %voice_channel, text = %text_channel.id, "Reading attached");
            }
            AttachOutcome::AlreadyReading => {
                self.send_serif(
                    text_channel.id,
                    "already_reading",
                    &[&text_channel.id.mention()],
                )
                .await;
            }
        }
    }

    /// 退出语音频道（自动退出与 leave 指令共用）
    async fn leave_voice(&self, session: &mut GuildSession) {
        if let Some(channel) = session.detach() {
            self.send_serif(channel.id, "leave_voice_channel", &[]).await;
        }
        if let Some(conn) = self.gateway.connection(session.guild_id()) {
            conn.disconnect().await;
        }
        tracing::info!(guild = %session.guild_id(), "Reading detached");
    }

    /// 文字消息
    pub async fn on_message(&self, session: &mut GuildSession, ev: &MessageEvent) {
        // 机器帐号的发言不朗读
        if ev.author_is_bot {
            return;
        }

        let conn = self.gateway.connection(ev.guild);

        // 对账: 记账与观测到的连接状态不一致时，
        // 依据持久化监视设定重推导绑定频道，不拿过期缓存路由播放
        if session.out_of_sync(conn.is_some()) {
            let derived = match conn {
                Some(_) => self.derive_attached_channel(session).await,
                None => None,
            };
            session.reconcile(derived);
        }

        let Some(attached) = session.attached_channel() else {
            return;
        };

        // 绑定频道以外的消息不朗读
        if ev.channel != attached.id {
            return;
        }

        let Some(conn) = self.gateway.connection(ev.guild) else {
            return;
        };

        // 规范化 → 音源获取 → 有界重试播放
        let msg = self.text.normalize(&ev.text, Some(self.max_chars)).await;
        if msg.is_empty() {
            return;
        }

        let asset = match self.acquirer.acquire(&msg, ev.author).await {
            Ok(Some(asset)) => asset,
            Ok(None) => {
                tracing::debug!(guild = %ev.guild, "Clip unavailable, skipping message");
                return;
            }
            Err(e) => {
                tracing::warn!(guild = %ev.guild, error = %e, "Audio acquisition failed");
                return;
            }
        };

        if let Err(e) = self.driver.play(conn.as_ref(), asset).await {
            tracing::warn!(guild = %ev.guild, error = %e, "Playback gave up");
        }
    }

    /// 从持久化监视设定重推导绑定频道
    async fn derive_attached_channel(&self, session: &GuildSession) -> Option<ChannelRef> {
        let guild = session.guild_id();
        let text_id = self
            .settings
            .guild_config(guild)
            .await
            .ok()
            .and_then(|config| config.watch.text)?;
        self.chat
            .resolve_text_channel(text_id)
            .await
            .filter(|channel| channel.guild == guild)
    }

    /// join 指令
    pub async fn join(
        &self,
        session: &mut GuildSession,
        invoker_voice: Option<ChannelId>,
        text_channel: ChannelId,
    ) {
        let Some(voice) = invoker_voice else {
            self.send_serif(text_channel, "not_in_voice", &[]).await;
            return;
        };
        let channel = ChannelRef::new(text_channel, session.guild_id());
        self.attach(session, voice, channel).await;
    }

    /// leave 指令
    pub async fn leave(&self, session: &mut GuildSession, reply_channel: ChannelId) {
        if self.gateway.connection(session.guild_id()).is_none() {
            self.send_serif(reply_channel, "not_connected", &[]).await;
            return;
        }
        self.leave_voice(session).await;
    }

    /// stop 指令: 停掉当前播放（没有播放则回一句台词）
    pub async fn stop(&self, session: &GuildSession, reply_channel: ChannelId) {
        match self.gateway.connection(session.guild_id()) {
            None => {
                self.send_serif(reply_channel, "stop_nothing", &[]).await;
            }
            Some(conn) => {
                if conn.is_playing() {
                    conn.stop();
                }
            }
        }
    }

    /// auto_join 指令: 在「设防 ↔ 解除」之间切换
    ///
    /// 本身不改变 Attached/Detached
    pub async fn toggle_auto_join(
        &self,
        session: &GuildSession,
        invoker: UserId,
        invoker_voice: Option<ChannelId>,
        text_channel: ChannelId,
    ) {
        let guild = session.guild_id();

        let Some(voice) = invoker_voice else {
            self.send_serif(text_channel, "auto_join_need_voice", &[&invoker.mention()])
                .await;
            return;
        };

        let mut config = match self.settings.guild_config(guild).await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(guild = %guild, error = %e, "Failed to load guild config");
                return;
            }
        };

        let enabling = !config.watch.armed();
        config.watch = if enabling {
            WatchConfig::arm(voice, text_channel)
        } else {
            WatchConfig::disarm()
        };

        if let Err(e) = self.settings.put_guild_config(guild, &config).await {
            tracing::warn!(guild = %guild, error = %e, "Failed to store guild config");
            return;
        }

        let line = if enabling {
            self.catalog.render(
                "auto_join_enable",
                &[&voice.mention(), &text_channel.mention()],
            )
        } else {
            self.catalog.render("auto_join_disable", &[])
        };
        let reply = format!("{} {}", invoker.mention(), line);
        if let Err(e) = self.chat.send(text_channel, &reply).await {
            tracing::warn!(channel = %text_channel, error = %e, "Failed to send reply");
        }
    }

    /// 发送一句台词（目录里没有的名字静默跳过）
    async fn send_serif(&self, channel: ChannelId, name: &str, args: &[&str]) {
        let line = self.catalog.render(name, args);
        if line.is_empty() {
            return;
        }
        if let Err(e) = self.chat.send(channel, &line).await {
            tracing::warn!(channel = %channel, serif = name, error = %e, "Failed to send serif");
        }
    }
}
