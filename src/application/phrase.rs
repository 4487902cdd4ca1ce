//! 定型句解析
//!
//! 把消息与定型句表逐条比对，命中则返回对应的音源引用并
//! 给该用户的使用计数 +1。表内顺序即优先级，第一个命中即停，
//! 因此不存在歧义解析。

use regex::Regex;
use std::sync::Arc;

use crate::application::ports::{PhraseStorePort, StoreError};
use crate::domain::UserId;

/// 编译完成的定型句
struct PhraseEntry {
    /// 1 起始的表内编号
    id: u32,
    /// 全字符串、大小写不问
    pattern: Regex,
    link: String,
}

/// 定型句解析器
///
/// 表在进程装载时读取并编译一次，运行期只读
pub struct PhraseResolver {
    store: Arc<dyn PhraseStorePort>,
    entries: Vec<PhraseEntry>,
}

impl PhraseResolver {
    /// 装载并编译定型句表
    ///
    /// 编译不过的模式跳过并告警，不让一条坏模式拖垮整表
    pub async fn load(store: Arc<dyn PhraseStorePort>) -> Result<Self, StoreError> {
        let defs = store.load_table().await?;
        let mut entries = Vec::with_capacity(defs.len());

        for def in defs {
            match Regex::new(&format!("(?i)^(?:{})$", def.pattern)) {
                Ok(pattern) => entries.push(PhraseEntry {
                    id: def.id,
                    pattern,
                    link: def.link,
                }),
                Err(e) => {
                    tracing::warn!(id = def.id, pattern = %def.pattern, error = %e, "Skipping invalid phrase pattern");
                }
            }
        }

        tracing::info!(count = entries.len(), "Phrase table loaded");
        Ok(Self { store, entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 解析一条消息
    ///
    /// 命中返回音源 URL；未命中返回 None（调用方转语音合成）。
    /// 使用计数写入失败只记录，不影响本次播放。
    pub async fn resolve(&self, text: &str, user: UserId) -> Option<String> {
        let canonical = canonicalize(text);

        for entry in &self.entries {
            if entry.pattern.is_match(&canonical) {
                if let Err(e) = self
                    .store
                    .record_usage(user, entry.id, self.entries.len())
                    .await
                {
                    tracing::warn!(user = %user, phrase = entry.id, error = %e, "Failed to record phrase usage");
                }
                return Some(entry.link.clone());
            }
        }

        None
    }
}

/// 匹配前的正规化：全角波浪号 U+FF5E → 波线 U+301C
fn canonicalize(text: &str) -> String {
    text.replace('\u{FF5E}', "\u{301C}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::PhraseDef;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 记录使用计数调用的内存存储
    struct MemoryPhrases {
        defs: Vec<PhraseDef>,
        recorded: Mutex<Vec<(UserId, u32, usize)>>,
    }

    impl MemoryPhrases {
        fn new(defs: Vec<PhraseDef>) -> Arc<Self> {
            Arc::new(Self {
                defs,
                recorded: Mutex::new(vec![]),
            })
        }
    }

    #[async_trait]
    impl PhraseStorePort for MemoryPhrases {
        async fn load_table(&self) -> Result<Vec<PhraseDef>, StoreError> {
            Ok(self.defs.clone())
        }

        async fn record_usage(
            &self,
            user: UserId,
            phrase_id: u32,
            phrase_count: usize,
        ) -> Result<(), StoreError> {
            self.recorded
                .lock()
                .unwrap()
                .push((user, phrase_id, phrase_count));
            Ok(())
        }

        async fn usage_of(&self, _user: UserId) -> Result<Vec<u64>, StoreError> {
            Ok(vec![])
        }
    }

    fn def(id: u32, pattern: &str, link: &str) -> PhraseDef {
        PhraseDef {
            id,
            pattern: pattern.to_string(),
            link: link.to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_match_wins_in_table_order() {
        let store = MemoryPhrases::new(vec![
            def(1, "やった.*", "https://example.com/1.mp3"),
            def(2, "やったー", "https://example.com/2.mp3"),
        ]);
        let resolver = PhraseResolver::load(store).await.unwrap();

        // 两条都能命中，但表内靠前的胜出
        let hit = resolver.resolve("やったー", UserId(1)).await;
        assert_eq!(hit.as_deref(), Some("https://example.com/1.mp3"));
    }

    #[tokio::test]
    async fn test_full_match_not_substring() {
        let store = MemoryPhrases::new(vec![def(1, "おめでとう", "https://example.com/1.mp3")]);
        let resolver = PhraseResolver::load(store).await.unwrap();

        assert!(resolver.resolve("おめでとうです", UserId(1)).await.is_none());
        assert!(resolver.resolve("おめでとう", UserId(1)).await.is_some());
    }

    #[tokio::test]
    async fn test_case_insensitive_match() {
        let store = MemoryPhrases::new(vec![def(1, "gg", "https://example.com/gg.mp3")]);
        let resolver = PhraseResolver::load(store).await.unwrap();

        assert!(resolver.resolve("GG", UserId(1)).await.is_some());
    }

    #[tokio::test]
    async fn test_wave_dash_canonicalized_before_match() {
        let store = MemoryPhrases::new(vec![def(1, "わ〜い", "https://example.com/wai.mp3")]);
        let resolver = PhraseResolver::load(store).await.unwrap();

        // 输入里的全角波浪号（U+FF5E）也能命中
        assert!(resolver.resolve("わ～い", UserId(1)).await.is_some());
    }

    #[tokio::test]
    async fn test_usage_recorded_exactly_once_per_hit() {
        let store = MemoryPhrases::new(vec![
            def(1, "a+", "https://example.com/a.mp3"),
            def(2, "b+", "https://example.com/b.mp3"),
        ]);
        let resolver = PhraseResolver::load(store.clone()).await.unwrap();

        resolver.resolve("bbb", UserId(42)).await;

        let recorded = store.recorded.lock().unwrap();
        assert_eq!(recorded.as_slice(), &[(UserId(42), 2, 2)]);
    }

    #[tokio::test]
    async fn test_miss_records_nothing() {
        let store = MemoryPhrases::new(vec![def(1, "x", "https://example.com/x.mp3")]);
        let resolver = PhraseResolver::load(store.clone()).await.unwrap();

        assert!(resolver.resolve("まったく別の文", UserId(1)).await.is_none());
        assert!(store.recorded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_pattern_skipped() {
        let store = MemoryPhrases::new(vec![
            def(1, "[", "https://example.com/bad.mp3"),
            def(2, "ok", "https://example.com/ok.mp3"),
        ]);
        let resolver = PhraseResolver::load(store).await.unwrap();

        assert_eq!(resolver.len(), 1);
        assert!(resolver.resolve("ok", UserId(1)).await.is_some());
    }
}
