//! 每服务器事件路由
//!
//! 成员变动与消息事件都能触碰同一份会话状态，
//! 因此把两类事件源显式汇入每服务器一条队列，
//! 由单一 actor 任务独占持有 `GuildSession` / `QuizSession` 消费。
//! 单写者不变量由结构保证，而不是靠约定。
//!
//! 服务器之间相互独立，事件自由交错；同一服务器内按到达顺序处理。

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::events::{GuildEvent, SessionCommand};
use crate::application::{JingleService, QuizService, QuizSession, ReadingService};
use crate::domain::{GuildId, GuildSession};

/// 每服务器队列深度
const QUEUE_DEPTH: usize = 256;

/// 事件到服务的分发
pub struct GuildEngine {
    reading: ReadingService,
    jingle: JingleService,
    quiz: QuizService,
}

impl GuildEngine {
    pub fn new(reading: ReadingService, jingle: JingleService, quiz: QuizService) -> Self {
        Self {
            reading,
            jingle,
            quiz,
        }
    }

    /// 处理一个事件（在 actor 任务里串行调用）
    async fn handle(
        &self,
        session: &mut GuildSession,
        quiz: &mut QuizSession,
        event: GuildEvent,
    ) {
        match event {
            GuildEvent::Membership(ev) => {
                self.reading.on_membership(session, &ev).await;
                self.jingle.on_membership(&ev).await;
            }
            GuildEvent::Message(ev) => {
                self.reading.on_message(session, &ev).await;
            }
            GuildEvent::Reaction(ev) => {
                self.quiz.on_reaction(quiz, &ev).await;
            }
            GuildEvent::Command(command) => match command {
                SessionCommand::Join {
                    invoker_voice,
                    text_channel,
                } => {
                    self.reading.join(session, invoker_voice, text_channel).await;
                }
                SessionCommand::Leave { reply_channel } => {
                    self.reading.leave(session, reply_channel).await;
                }
                SessionCommand::Stop { reply_channel } => {
                    self.reading.stop(session, reply_channel).await;
                }
                SessionCommand::ToggleAutoJoin {
                    invoker,
                    invoker_voice,
                    text_channel,
                } => {
                    self.reading
                        .toggle_auto_join(session, invoker, invoker_voice, text_channel)
                        .await;
                }
                SessionCommand::QuizStart { channel, tag } => {
                    self.quiz
                        .start(quiz, session.guild_id(), channel, tag.as_deref())
                        .await;
                }
            },
        }
    }
}

/// 每服务器事件路由器
pub struct GuildEventRouter {
    engine: Arc<GuildEngine>,
    queues: DashMap<GuildId, mpsc::Sender<GuildEvent>>,
}

impl GuildEventRouter {
    pub fn new(engine: Arc<GuildEngine>) -> Self {
        Self {
            engine,
            queues: DashMap::new(),
        }
    }

    /// 把事件投入所属服务器的队列
    ///
    /// 首个事件到达时惰性启动该服务器的 actor；
    /// 队列满时挂起调用方（事件按到达顺序入队）
    pub async fn dispatch(&self, guild: GuildId, event: GuildEvent) {
        for _ in 0..2 {
            let tx = self
                .queues
                .entry(guild)
                .or_insert_with(|| self.spawn_actor(guild))
                .clone();

            match tx.send(event.clone()).await {
                Ok(()) => return,
                Err(_) => {
                    // actor 意外终止: 丢弃死队列，重启一次
                    tracing::warn!(guild = %guild, "Guild actor gone, respawning");
                    self.queues.remove(&guild);
                }
            }
        }
        tracing::error!(guild = %guild, "Dropping event, guild actor cannot be started");
    }

    fn spawn_actor(&self, guild: GuildId) -> mpsc::Sender<GuildEvent> {
        let (tx, mut rx) = mpsc::channel(QUEUE_DEPTH);
        let engine = self.engine.clone();

        tokio::spawn(async move {
            // 会话状态由本任务独占（单写者）
            let mut session = GuildSession::new(guild);
            let mut quiz = QuizSession::new();
            tracing::debug!(guild = %guild, "Guild actor started");

            while let Some(event) = rx.recv().await {
                engine.handle(&mut session, &mut quiz, event).await;
            }

            tracing::debug!(guild = %guild, "Guild actor stopped");
        });

        tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::events::{MembershipEvent, MessageEvent};
    use crate::application::phrase::PhraseResolver;
    use crate::application::playback::{DriverConfig, PlaybackDriver};
    use crate::application::ports::{
        ChatError, ChatPort, ClipFetcherPort, CompletionHook, DictionaryStorePort, FetchError,
        GatewayError, GuildConfig, MediaError, MediaSourcePort, PhraseDef, PhraseStorePort,
        PlayRejected, QuizStorePort, QuizTrack, RawMedia, SettingsStorePort, StoreError,
        SynthesisError, SynthesizerPort, UserConfig, VoiceConnectionPort, VoiceGatewayPort,
        WatchConfig,
    };
    use crate::application::text::TextService;
    use crate::application::{AudioAcquirer, JingleService, QuizService, ReadingService};
    use crate::domain::asset::{unique_stem, AudioAsset};
    use crate::domain::normalize::Normalizer;
    use crate::domain::{
        ChannelId, ChannelRef, MessageId, SerifCatalog, SynthesisParams, UserId,
    };
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::time::Duration;

    const GUILD: GuildId = GuildId(1);
    const WATCH_VOICE: ChannelId = ChannelId(100);
    const ANNOUNCE_TEXT: ChannelId = ChannelId(200);

    struct RecordingConnection {
        played: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl VoiceConnectionPort for RecordingConnection {
        fn channel(&self) -> ChannelId {
            WATCH_VOICE
        }
        fn is_playing(&self) -> bool {
            false
        }
        fn play(&self, source: &Path, on_complete: CompletionHook) -> Result<(), PlayRejected> {
            self.played.lock().unwrap().push(source.to_path_buf());
            on_complete();
            Ok(())
        }
        fn stop(&self) {}
        async fn disconnect(&self) {}
        fn human_count(&self) -> usize {
            1
        }
    }

    struct TestGateway {
        conn: Arc<RecordingConnection>,
    }

    #[async_trait]
    impl VoiceGatewayPort for TestGateway {
        async fn connect(
            &self,
            _: GuildId,
            _: ChannelId,
        ) -> Result<Arc<dyn VoiceConnectionPort>, GatewayError> {
            Ok(self.conn.clone())
        }
        fn connection(&self, _: GuildId) -> Option<Arc<dyn VoiceConnectionPort>> {
            Some(self.conn.clone())
        }
    }

    struct OpenChat;

    #[async_trait]
    impl ChatPort for OpenChat {
        async fn send(&self, _: ChannelId, _: &str) -> Result<MessageId, ChatError> {
            Ok(MessageId(1))
        }
        async fn resolve_text_channel(&self, channel: ChannelId) -> Option<ChannelRef> {
            Some(ChannelRef::new(channel, GUILD))
        }
    }

    struct ArmedSettings;

    #[async_trait]
    impl SettingsStorePort for ArmedSettings {
        async fn guild_config(&self, _: GuildId) -> Result<GuildConfig, StoreError> {
            Ok(GuildConfig {
                watch: WatchConfig::arm(WATCH_VOICE, ANNOUNCE_TEXT),
            })
        }
        async fn put_guild_config(&self, _: GuildId, _: &GuildConfig) -> Result<(), StoreError> {
            Ok(())
        }
        async fn user_config(&self, _: UserId) -> Result<UserConfig, StoreError> {
            Ok(UserConfig::default())
        }
        async fn put_user_config(&self, _: UserId, _: &UserConfig) -> Result<(), StoreError> {
            Ok(())
        }
    }

    struct EmptyDict;

    #[async_trait]
    impl DictionaryStorePort for EmptyDict {
        async fn load(&self) -> Result<Vec<(String, String)>, StoreError> {
            Ok(vec![])
        }
        async fn put(&self, _: &str, _: &str) -> Result<(), StoreError> {
            Ok(())
        }
        async fn remove(&self, _: &str) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    struct EmptyPhrases;

    #[async_trait]
    impl PhraseStorePort for EmptyPhrases {
        async fn load_table(&self) -> Result<Vec<PhraseDef>, StoreError> {
            Ok(vec![])
        }
        async fn record_usage(&self, _: UserId, _: u32, _: usize) -> Result<(), StoreError> {
            Ok(())
        }
        async fn usage_of(&self, _: UserId) -> Result<Vec<u64>, StoreError> {
            Ok(vec![])
        }
    }

    struct NoFetch;

    #[async_trait]
    impl ClipFetcherPort for NoFetch {
        async fn fetch_to(&self, _: &str, _: &Path) -> Result<(), FetchError> {
            Err(FetchError::Rejected(404))
        }
    }

    struct StubSynth {
        dir: PathBuf,
    }

    #[async_trait]
    impl SynthesizerPort for StubSynth {
        async fn synthesize(
            &self,
            _: &str,
            _: &SynthesisParams,
        ) -> Result<AudioAsset, SynthesisError> {
            let path = self.dir.join(format!("{}.wav", unique_stem()));
            tokio::fs::write(&path, b"wav").await?;
            Ok(AudioAsset::new(path))
        }
    }

    struct NoTracks;

    #[async_trait]
    impl QuizStorePort for NoTracks {
        async fn load_tracks(&self) -> Result<Vec<QuizTrack>, StoreError> {
            Ok(vec![])
        }
    }

    struct NoMedia;

    #[async_trait]
    impl MediaSourcePort for NoMedia {
        async fn download(&self, _: &str) -> Result<RawMedia, MediaError> {
            Err(MediaError::DownloadFailed("unused".to_string()))
        }
        async fn convert(&self, _: RawMedia) -> Result<AudioAsset, MediaError> {
            Err(MediaError::ConvertFailed("unused".to_string()))
        }
    }

    async fn router(dir: &Path) -> (GuildEventRouter, Arc<RecordingConnection>) {
        let conn = Arc::new(RecordingConnection {
            played: Mutex::new(vec![]),
        });
        let gateway = Arc::new(TestGateway { conn: conn.clone() });
        let chat = Arc::new(OpenChat);
        let settings = Arc::new(ArmedSettings);
        let catalog = Arc::new(SerifCatalog::builtin());

        let text = Arc::new(TextService::new(Normalizer::builtin(), Arc::new(EmptyDict)));
        let phrases = Arc::new(PhraseResolver::load(Arc::new(EmptyPhrases)).await.unwrap());
        let acquirer = Arc::new(AudioAcquirer::new(
            phrases,
            Arc::new(NoFetch),
            Arc::new(StubSynth {
                dir: dir.to_path_buf(),
            }),
            settings.clone(),
            dir.to_path_buf(),
        ));
        let driver = Arc::new(PlaybackDriver::new(DriverConfig {
            max_attempts: 3,
            retry_interval: Duration::from_millis(1),
        }));

        let reading = ReadingService::new(
            gateway.clone(),
            chat.clone(),
            settings.clone(),
            text,
            acquirer.clone(),
            driver.clone(),
            catalog.clone(),
            50,
        );
        let jingle = JingleService::new(gateway.clone(), settings, acquirer, driver.clone());
        let quiz = QuizService::new(
            Arc::new(NoTracks),
            Arc::new(NoMedia),
            gateway,
            driver,
            chat,
            catalog,
        );

        let engine = Arc::new(GuildEngine::new(reading, jingle, quiz));
        (GuildEventRouter::new(engine), conn)
    }

    fn message(text: &str) -> GuildEvent {
        GuildEvent::Message(MessageEvent {
            guild: GUILD,
            channel: ANNOUNCE_TEXT,
            author: UserId(10),
            author_is_bot: false,
            text: text.to_string(),
        })
    }

    fn membership_join() -> GuildEvent {
        GuildEvent::Membership(MembershipEvent {
            guild: GUILD,
            user: UserId(10),
            is_bot: false,
            previous: None,
            current: Some(WATCH_VOICE),
        })
    }

    async fn wait_for<F: Fn() -> bool>(cond: F) {
        for _ in 0..200 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached in time");
    }

    #[tokio::test]
    async fn test_actor_spawned_lazily_per_guild() {
        let dir = tempfile::tempdir().unwrap();
        let (router, _) = router(dir.path()).await;
        assert!(router.queues.is_empty());

        router.dispatch(GUILD, membership_join()).await;
        assert_eq!(router.queues.len(), 1);

        router.dispatch(GuildId(2), membership_join()).await;
        assert_eq!(router.queues.len(), 2);
    }

    #[tokio::test]
    async fn test_events_for_one_guild_processed_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let (router, conn) = router(dir.path()).await;

        router.dispatch(GUILD, membership_join()).await;
        for i in 0..3 {
            router.dispatch(GUILD, message(&format!("めっせーじ{}", i))).await;
        }

        wait_for(|| conn.played.lock().unwrap().len() == 3).await;
        // 全部播放完毕且音源已删除
        for path in conn.played.lock().unwrap().iter() {
            assert!(!path.exists());
        }
    }
}
