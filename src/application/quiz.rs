//! 出题（イントロクイズ）
//!
//! 反应事件驱动的显式状态机：
//! `Idle → Downloading → Converting → Playing → Idle`。
//! 非 Idle 状态下的反应一律忽略，状态不散落在处理函数里。

use rand::seq::SliceRandom;
use std::sync::Arc;

use crate::application::events::ReactionEvent;
use crate::application::playback::PlaybackDriver;
use crate::application::ports::{
    ChatPort, MediaSourcePort, QuizStorePort, QuizTrack, VoiceGatewayPort,
};
use crate::domain::{ChannelId, GuildId, MessageId, SerifCatalog};

/// 操作用的反应表情
const EMOJI_REPEAT: &str = "🔁";
const EMOJI_NEXT: &str = "➡";

/// 出题状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    Idle,
    Downloading,
    Converting,
    Playing,
}

/// 每服务器的出题会话（由该服务器的事件队列独占持有）
#[derive(Debug)]
pub struct QuizSession {
    state: QuizState,
    tracks: Vec<QuizTrack>,
    pos: usize,
    /// 操作面板消息（反应只认这一条）
    panel: Option<MessageId>,
    reply_channel: Option<ChannelId>,
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            state: QuizState::Idle,
            tracks: Vec::new(),
            pos: 0,
            panel: None,
            reply_channel: None,
        }
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    fn begin(&mut self, tracks: Vec<QuizTrack>, panel: MessageId, channel: ChannelId) {
        self.tracks = tracks;
        self.pos = 0;
        self.panel = Some(panel);
        self.reply_channel = Some(channel);
        self.state = QuizState::Idle;
    }

    fn current(&self) -> Option<&QuizTrack> {
        self.tracks.get(self.pos)
    }

    fn is_last(&self) -> bool {
        self.pos + 1 >= self.tracks.len()
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

/// 出题服务
pub struct QuizService {
    store: Arc<dyn QuizStorePort>,
    media: Arc<dyn MediaSourcePort>,
    gateway: Arc<dyn VoiceGatewayPort>,
    driver: Arc<PlaybackDriver>,
    chat: Arc<dyn ChatPort>,
    catalog: Arc<SerifCatalog>,
}

impl QuizService {
    pub fn new(
        store: Arc<dyn QuizStorePort>,
        media: Arc<dyn MediaSourcePort>,
        gateway: Arc<dyn VoiceGatewayPort>,
        driver: Arc<PlaybackDriver>,
        chat: Arc<dyn ChatPort>,
        catalog: Arc<SerifCatalog>,
    ) -> Self {
        Self {
            store,
            media,
            gateway,
            driver,
            chat,
            catalog,
        }
    }

    /// 开始出题
    ///
    /// 按标签筛选曲目并打乱顺序，发送操作面板后播放第一题
    pub async fn start(
        &self,
        quiz: &mut QuizSession,
        guild: GuildId,
        channel: ChannelId,
        tag: Option<&str>,
    ) {
        let mut tracks = match self.store.load_tracks().await {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::warn!(guild = %guild, error = %e, "Failed to load quiz tracks");
                return;
            }
        };

        if let Some(tag) = tag {
            tracks.retain(|track| track.tags.iter().any(|t| t == tag));
        }
        if tracks.is_empty() {
            let line = self.catalog.render("quiz_empty", &[]);
            let _ = self.chat.send(channel, &line).await;
            return;
        }

        tracks.shuffle(&mut rand::rng());
        let total = tracks.len();

        let line = self.catalog.render("quiz_start", &[&total.to_string()]);
        if let Err(e) = self.chat.send(channel, &line).await {
            tracing::warn!(channel = %channel, error = %e, "Failed to announce quiz start");
            return;
        }

        let panel_line = self.catalog.render("quiz_panel", &[]);
        let panel = match self.chat.send(channel, &panel_line).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(channel = %channel, error = %e, "Failed to send quiz panel");
                return;
            }
        };

        quiz.begin(tracks, panel, channel);
        self.play_current(quiz, guild).await;
    }

    /// 面板消息上的反应
    pub async fn on_reaction(&self, quiz: &mut QuizSession, ev: &ReactionEvent) {
        // 待机中以外一律忽略
        if quiz.state != QuizState::Idle {
            return;
        }
        let Some(panel) = quiz.panel else {
            return;
        };
        if ev.is_bot || ev.message != panel {
            return;
        }

        match ev.emoji.as_str() {
            EMOJI_REPEAT => {
                self.play_current(quiz, ev.guild).await;
            }
            EMOJI_NEXT => {
                self.advance(quiz, ev.guild).await;
            }
            _ => {}
        }
    }

    /// 公布当前题的答案并进入下一题
    async fn advance(&self, quiz: &mut QuizSession, guild: GuildId) {
        let Some(channel) = quiz.reply_channel else {
            return;
        };
        let Some(track) = quiz.current() else {
            return;
        };
        let url = track.url.clone();

        if quiz.is_last() {
            let line = self.catalog.render("quiz_finished", &[&url]);
            let _ = self.chat.send(channel, &line).await;
            return;
        }

        let line = self.catalog.render(
            "quiz_answer",
            &[
                &(quiz.pos + 1).to_string(),
                &quiz.tracks.len().to_string(),
                &url,
            ],
        );
        let _ = self.chat.send(channel, &line).await;

        quiz.pos += 1;
        self.play_current(quiz, guild).await;
    }

    /// 下载 → 整形 → 播放当前题
    ///
    /// 任一步失败都回到 Idle，只记录日志
    async fn play_current(&self, quiz: &mut QuizSession, guild: GuildId) {
        let Some(track) = quiz.current() else {
            return;
        };
        let url = track.url.clone();

        quiz.state = QuizState::Downloading;
        let raw = match self.media.download(&url).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Quiz download failed");
                quiz.state = QuizState::Idle;
                return;
            }
        };

        quiz.state = QuizState::Converting;
        let asset = match self.media.convert(raw).await {
            Ok(asset) => asset,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Quiz conversion failed");
                quiz.state = QuizState::Idle;
                return;
            }
        };

        quiz.state = QuizState::Playing;
        match self.gateway.connection(guild) {
            Some(conn) => {
                if let Err(e) = self.driver.play(conn.as_ref(), asset).await {
                    tracing::warn!(guild = %guild, error = %e, "Quiz playback gave up");
                }
            }
            None => {
                // 服务不在语音频道里，音源直接废弃
                asset.discard().await;
            }
        }
        quiz.state = QuizState::Idle;
    }
}
