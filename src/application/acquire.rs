//! 音源获取
//!
//! 把「定型句 → 远程音源」与「普通文本 → 语音合成」统一成
//! 一个 `文本/用户 → 音源` 操作。两条路径产出的文件名都保证唯一。

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::error::AcquireError;
use crate::application::phrase::PhraseResolver;
use crate::application::ports::{ClipFetcherPort, FetchError, SettingsStorePort, SynthesizerPort};
use crate::domain::asset::{unique_stem, AudioAsset};
use crate::domain::UserId;

/// 音源获取器
pub struct AudioAcquirer {
    phrases: Arc<PhraseResolver>,
    fetcher: Arc<dyn ClipFetcherPort>,
    synthesizer: Arc<dyn SynthesizerPort>,
    settings: Arc<dyn SettingsStorePort>,
    temp_dir: PathBuf,
}

impl AudioAcquirer {
    pub fn new(
        phrases: Arc<PhraseResolver>,
        fetcher: Arc<dyn ClipFetcherPort>,
        synthesizer: Arc<dyn SynthesizerPort>,
        settings: Arc<dyn SettingsStorePort>,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            phrases,
            fetcher,
            synthesizer,
            settings,
            temp_dir,
        }
    }

    /// 为一条消息获取音源
    ///
    /// 先查定型句表；命中则下载对应音源，下载被拒绝（非成功状态）
    /// 返回 Ok(None) 作为软失败。未命中则按用户设定合成语音。
    pub async fn acquire(
        &self,
        text: &str,
        user: UserId,
    ) -> Result<Option<AudioAsset>, AcquireError> {
        if let Some(link) = self.phrases.resolve(text, user).await {
            return self.fetch_remote(&link).await;
        }

        let profile = self.settings.user_config(user).await?.profile;
        let params = profile.interpolate();
        let asset = self.synthesizer.synthesize(text, &params).await?;
        Ok(Some(asset))
    }

    /// 把远程音源下载到唯一命名的临时文件
    ///
    /// 登场主题等其他远程音源路径也复用这里
    pub async fn fetch_remote(&self, url: &str) -> Result<Option<AudioAsset>, AcquireError> {
        let dest = self
            .temp_dir
            .join(format!("{}.{}", unique_stem(), extension_of(url)));

        match self.fetcher.fetch_to(url, &dest).await {
            Ok(()) => Ok(Some(AudioAsset::new(dest))),
            Err(FetchError::Rejected(status)) => {
                tracing::warn!(url = %url, status, "Clip fetch rejected");
                Ok(None)
            }
            Err(e) => Err(AcquireError::Fetch(e)),
        }
    }
}

/// 从 URL 推断文件扩展名，推断不出时按 wav 处理
fn extension_of(url: &str) -> &str {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .rsplit('/')
        .next()
        .unwrap_or(url);

    match path.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.len() <= 4 => ext,
        _ => "wav",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        GuildConfig, PhraseDef, PhraseStorePort, StoreError, SynthesisError, UserConfig,
    };
    use crate::domain::{GuildId, SynthesisParams};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedPhrases(Vec<PhraseDef>);

    #[async_trait]
    impl PhraseStorePort for FixedPhrases {
        async fn load_table(&self) -> Result<Vec<PhraseDef>, StoreError> {
            Ok(self.0.clone())
        }
        async fn record_usage(&self, _: UserId, _: u32, _: usize) -> Result<(), StoreError> {
            Ok(())
        }
        async fn usage_of(&self, _: UserId) -> Result<Vec<u64>, StoreError> {
            Ok(vec![])
        }
    }

    struct DefaultSettings;

    #[async_trait]
    impl SettingsStorePort for DefaultSettings {
        async fn guild_config(&self, _: GuildId) -> Result<GuildConfig, StoreError> {
            Ok(GuildConfig::default())
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

    /// 按状态码应答的下载桩
    struct StubFetcher {
        status: u16,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ClipFetcherPort for StubFetcher {
        async fn fetch_to(&self, _url: &str, dest: &Path) -> Result<(), FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.status == 200 {
                tokio::fs::write(dest, b"clip").await?;
                Ok(())
            } else {
                Err(FetchError::Rejected(self.status))
            }
        }
    }

    /// 产出固定文件的合成桩
    struct StubSynth {
        dir: PathBuf,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SynthesizerPort for StubSynth {
        async fn synthesize(
            &self,
            _text: &str,
            _params: &SynthesisParams,
        ) -> Result<AudioAsset, SynthesisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let path = self.dir.join(format!("{}.wav", unique_stem()));
            tokio::fs::write(&path, b"wav").await?;
            Ok(AudioAsset::new(path))
        }
    }

    async fn acquirer(
        defs: Vec<PhraseDef>,
        fetch_status: u16,
        dir: &Path,
    ) -> (AudioAcquirer, Arc<StubFetcher>, Arc<StubSynth>) {
        let phrases = PhraseResolver::load(Arc::new(FixedPhrases(defs)))
            .await
            .unwrap();
        let fetcher = Arc::new(StubFetcher {
            status: fetch_status,
            calls: AtomicUsize::new(0),
        });
        let synth = Arc::new(StubSynth {
            dir: dir.to_path_buf(),
            calls: AtomicUsize::new(0),
        });
        let acquirer = AudioAcquirer::new(
            Arc::new(phrases),
            fetcher.clone(),
            synth.clone(),
            Arc::new(DefaultSettings),
            dir.to_path_buf(),
        );
        (acquirer, fetcher, synth)
    }

    fn phrase() -> PhraseDef {
        PhraseDef {
            id: 1,
            pattern: "わーい".to_string(),
            link: "https://example.com/wai.mp3".to_string(),
        }
    }

    #[tokio::test]
    async fn test_phrase_hit_fetches_clip() {
        let dir = tempfile::tempdir().unwrap();
        let (acquirer, fetcher, synth) = acquirer(vec![phrase()], 200, dir.path()).await;

        let asset = acquirer.acquire("わーい", UserId(1)).await.unwrap().unwrap();
        assert!(asset.path().exists());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(synth.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejected_fetch_is_soft_none() {
        let dir = tempfile::tempdir().unwrap();
        let (acquirer, _fetcher, synth) = acquirer(vec![phrase()], 404, dir.path()).await;

        let result = acquirer.acquire("わーい", UserId(1)).await.unwrap();
        assert!(result.is_none());
        // 软失败不会转语音合成
        assert_eq!(synth.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_miss_falls_back_to_synthesis() {
        let dir = tempfile::tempdir().unwrap();
        let (acquirer, fetcher, synth) = acquirer(vec![phrase()], 200, dir.path()).await;

        let asset = acquirer
            .acquire("ただの文", UserId(1))
            .await
            .unwrap()
            .unwrap();
        assert!(asset.path().exists());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(synth.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unique_asset_names() {
        let dir = tempfile::tempdir().unwrap();
        let (acquirer, _, _) = acquirer(vec![], 200, dir.path()).await;

        let a = acquirer.acquire("ひとつ", UserId(1)).await.unwrap().unwrap();
        let b = acquirer.acquire("ひとつ", UserId(1)).await.unwrap().unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_extension_inference() {
        assert_eq!(extension_of("https://example.com/a.mp3"), "mp3");
        assert_eq!(extension_of("https://example.com/a.wav?x=1"), "wav");
        assert_eq!(extension_of("https://example.com/noext"), "wav");
    }
}
