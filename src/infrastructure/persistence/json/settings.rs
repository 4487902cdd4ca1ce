//! 设定文档存储
//!
//! 服务器设定与用户设定各是一个 JSON 文档：
//! `{ "default": {...}, "<id>": {...} }`。
//! 未登记的 ID 回退到 `default` 条目，没有 `default` 再回退到内置默认值。

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;

use super::{read_document, write_document};
use crate::application::ports::{GuildConfig, SettingsStorePort, StoreError, UserConfig};
use crate::domain::{GuildId, UserId};

/// 兜底条目的键
const DEFAULT_KEY: &str = "default";

/// JSON 设定存储
pub struct JsonSettingsStore {
    guild_path: PathBuf,
    user_path: PathBuf,
    /// 读-改-写的临界区（服务器与用户文档共用一把锁即可）
    write_lock: Mutex<()>,
}

impl JsonSettingsStore {
    pub fn new(guild_path: PathBuf, user_path: PathBuf) -> Self {
        Self {
            guild_path,
            user_path,
            write_lock: Mutex::new(()),
        }
    }

    async fn lookup<T: DeserializeOwned + Default + Clone>(
        path: &PathBuf,
        key: &str,
    ) -> Result<T, StoreError> {
        let Some(all) = read_document::<HashMap<String, T>>(path).await? else {
            return Ok(T::default());
        };
        if let Some(found) = all.get(key) {
            return Ok(found.clone());
        }
        Ok(all.get(DEFAULT_KEY).cloned().unwrap_or_default())
    }

    async fn upsert<T: DeserializeOwned + Serialize>(
        &self,
        path: &PathBuf,
        key: String,
        value: &T,
    ) -> Result<(), StoreError>
    where
        T: Clone,
    {
        let _guard = self.write_lock.lock().await;
        let mut all = read_document::<HashMap<String, T>>(path)
            .await?
            .unwrap_or_default();
        all.insert(key, value.clone());
        write_document(path, &all).await
    }
}

#[async_trait]
impl SettingsStorePort for JsonSettingsStore {
    async fn guild_config(&self, guild: GuildId) -> Result<GuildConfig, StoreError> {
        Self::lookup(&self.guild_path, &guild.to_string()).await
    }

    async fn put_guild_config(
        &self,
        guild: GuildId,
        config: &GuildConfig,
    ) -> Result<(), StoreError> {
        self.upsert(&self.guild_path, guild.to_string(), config).await
    }

    async fn user_config(&self, user: UserId) -> Result<UserConfig, StoreError> {
        Self::lookup(&self.user_path, &user.to_string()).await
    }

    async fn put_user_config(&self, user: UserId, config: &UserConfig) -> Result<(), StoreError> {
        self.upsert(&self.user_path, user.to_string(), config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::WatchConfig;
    use crate::domain::ChannelId;

    fn store(dir: &std::path::Path) -> JsonSettingsStore {
        JsonSettingsStore::new(dir.join("guild.json"), dir.join("user.json"))
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let config = store.guild_config(GuildId(1)).await.unwrap();
        assert!(!config.watch.armed());
    }

    #[tokio::test]
    async fn test_put_then_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let config = GuildConfig {
            watch: WatchConfig::arm(ChannelId(10), ChannelId(20)),
        };
        store.put_guild_config(GuildId(1), &config).await.unwrap();

        let loaded = store.guild_config(GuildId(1)).await.unwrap();
        assert_eq!(loaded.watch, config.watch);
        // 别的服务器仍然是默认值
        let other = store.guild_config(GuildId(2)).await.unwrap();
        assert!(!other.watch.armed());
    }

    #[tokio::test]
    async fn test_default_entry_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.json");
        tokio::fs::write(
            &path,
            r#"{"default":{"voice":"miku","speed":30.0,"tone":50.0,"intone":50.0,"threshold":50.0}}"#,
        )
        .await
        .unwrap();
        let store = JsonSettingsStore::new(dir.path().join("guild.json"), path);

        // 未登记用户回退到 default 条目
        let config = store.user_config(UserId(42)).await.unwrap();
        assert_eq!(config.profile.voice, crate::domain::VoiceKind::Miku);
        assert_eq!(config.profile.speed, 30.0);
    }

    #[tokio::test]
    async fn test_user_update_preserves_other_users() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let mut a = UserConfig::default();
        a.profile.speed = 10.0;
        store.put_user_config(UserId(1), &a).await.unwrap();

        let mut b = UserConfig::default();
        b.profile.speed = 90.0;
        store.put_user_config(UserId(2), &b).await.unwrap();

        assert_eq!(store.user_config(UserId(1)).await.unwrap().profile.speed, 10.0);
        assert_eq!(store.user_config(UserId(2)).await.unwrap().profile.speed, 90.0);
    }
}
