//! 文本规范化服务
//!
//! 领域层的流水线是纯函数；这里负责它的词典缓存：
//! 缓存归本服务所有，每次转换前显式刷新（刷新失败沿用上次快照）。

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::ports::DictionaryStorePort;
use crate::domain::normalize::{Normalizer, WordDictionary};

/// 文本规范化服务
pub struct TextService {
    normalizer: Normalizer,
    store: Arc<dyn DictionaryStorePort>,
    cache: RwLock<WordDictionary>,
}

impl TextService {
    pub fn new(normalizer: Normalizer, store: Arc<dyn DictionaryStorePort>) -> Self {
        Self {
            normalizer,
            store,
            cache: RwLock::new(WordDictionary::empty()),
        }
    }

    /// 从存储刷新词典缓存
    pub async fn refresh(&self) -> bool {
        match self.store.load().await {
            Ok(entries) => {
                *self.cache.write().await = WordDictionary::new(entries);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Dictionary refresh failed, keeping cached copy");
                false
            }
        }
    }

    /// 规范化一条消息（转换前刷新词典）
    pub async fn normalize(&self, raw: &str, max_length: Option<usize>) -> String {
        self.refresh().await;
        let dictionary = self.cache.read().await;
        self.normalizer.normalize(raw, &dictionary, max_length)
    }
}
