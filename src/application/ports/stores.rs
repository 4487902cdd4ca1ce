//! Store Ports - 持久化文档存储抽象
//!
//! 所有文档都是 JSON 形态的键值结构，跨服务器/用户共享。
//! 读取前刷新、最后写入者胜，没有乐观并发控制。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::{ChannelId, GuildId, UserId, VoiceProfile};

/// 存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Malformed(err.to_string())
    }
}

/// 自动参加的监视设定
///
/// voice/text 同时为 Some 时为「设防」状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// 监视的语音频道
    #[serde(default)]
    pub voice: Option<ChannelId>,

    /// 自动参加后朗读的文字频道
    #[serde(default)]
    pub text: Option<ChannelId>,
}

impl WatchConfig {
    pub fn armed(&self) -> bool {
        self.voice.is_some()
    }

    /// 设防
    pub fn arm(voice: ChannelId, text: ChannelId) -> Self {
        Self {
            voice: Some(voice),
            text: Some(text),
        }
    }

    /// 解除
    pub fn disarm() -> Self {
        Self::default()
    }
}

/// 服务器设定文档
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuildConfig {
    #[serde(default, rename = "watch_channel")]
    pub watch: WatchConfig,
}

/// 用户设定文档
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// 朗读音色设定
    #[serde(flatten)]
    pub profile: VoiceProfile,

    /// 登场主题: 服务器 ID（十进制字符串）→ 音源 URL
    #[serde(default, rename = "theme")]
    pub themes: HashMap<String, String>,
}

impl UserConfig {
    /// 该服务器的登场主题
    pub fn theme_for(&self, guild: GuildId) -> Option<&str> {
        self.themes.get(&guild.to_string()).map(String::as_str)
    }

    /// 设置该服务器的登场主题
    pub fn set_theme(&mut self, guild: GuildId, url: impl Into<String>) {
        self.themes.insert(guild.to_string(), url.into());
    }
}

/// 设定存储端口
///
/// 未登记的服务器/用户返回名为 `default` 的兜底文档
#[async_trait]
pub trait SettingsStorePort: Send + Sync {
    async fn guild_config(&self, guild: GuildId) -> Result<GuildConfig, StoreError>;

    async fn put_guild_config(
        &self,
        guild: GuildId,
        config: &GuildConfig,
    ) -> Result<(), StoreError>;

    async fn user_config(&self, user: UserId) -> Result<UserConfig, StoreError>;

    async fn put_user_config(&self, user: UserId, config: &UserConfig) -> Result<(), StoreError>;
}

/// 用户词典存储端口
#[async_trait]
pub trait DictionaryStorePort: Send + Sync {
    /// 全部条目（顺序由词典快照装载时重排，这里不保证）
    async fn load(&self) -> Result<Vec<(String, String)>, StoreError>;

    /// 登记或覆盖一个条目
    async fn put(&self, surface: &str, reading: &str) -> Result<(), StoreError>;

    /// 删除一个条目，返回是否确实存在过
    async fn remove(&self, surface: &str) -> Result<bool, StoreError>;
}

/// 定型句定义（未编译形态）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseDef {
    /// 1 起始的表内编号
    pub id: u32,
    /// 全字符串匹配的模式
    pub pattern: String,
    /// 音源 URL
    pub link: String,
}

/// 定型句表与使用计数存储端口
///
/// 表本身运行期只读；使用计数是
/// `{sound_count, user_data: {user_id: [n, ...]}}` 形态的文档，
/// 每次命中做一次读-改-写（实现方必须把它当作临界区串行化）。
#[async_trait]
pub trait PhraseStorePort: Send + Sync {
    /// 定型句表，表内顺序即优先级
    async fn load_table(&self) -> Result<Vec<PhraseDef>, StoreError>;

    /// 使用计数 +1
    ///
    /// 未见过的用户先补零向量，长度不足 `phrase_count` 时补零
    async fn record_usage(
        &self,
        user: UserId,
        phrase_id: u32,
        phrase_count: usize,
    ) -> Result<(), StoreError>;

    /// 读取用户的使用向量
    async fn usage_of(&self, user: UserId) -> Result<Vec<u64>, StoreError>;
}

/// 出题曲目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizTrack {
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// 出题数据存储端口
#[async_trait]
pub trait QuizStorePort: Send + Sync {
    async fn load_tracks(&self) -> Result<Vec<QuizTrack>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_config_arm_disarm() {
        let armed = WatchConfig::arm(ChannelId(1), ChannelId(2));
        assert!(armed.armed());
        assert!(!WatchConfig::disarm().armed());
    }

    #[test]
    fn test_user_config_theme_round_trip() {
        let mut config = UserConfig::default();
        assert!(config.theme_for(GuildId(5)).is_none());

        config.set_theme(GuildId(5), "https://example.com/a.mp3");
        assert_eq!(
            config.theme_for(GuildId(5)),
            Some("https://example.com/a.mp3")
        );
    }

    #[test]
    fn test_guild_config_document_shape() {
        let json = r#"{"watch_channel":{"voice":100,"text":200}}"#;
        let config: GuildConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.watch.voice, Some(ChannelId(100)));
        assert_eq!(config.watch.text, Some(ChannelId(200)));
    }

    #[test]
    fn test_user_config_document_defaults() {
        let config: UserConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.profile.speed, 50.0);
        assert!(config.themes.is_empty());
    }
}
