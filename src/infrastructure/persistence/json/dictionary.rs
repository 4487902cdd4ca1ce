//! 用户词典存储
//!
//! `{"表面形": "读法", ...}` 形态的 JSON 文档。
//! 替换顺序（表面形字符数降序）由词典快照装载时重排，
//! 文档里的键顺序不承载语义。

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;

use super::{read_document, write_document};
use crate::application::ports::{DictionaryStorePort, StoreError};

/// JSON 词典存储
pub struct JsonDictionaryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonDictionaryStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl DictionaryStorePort for JsonDictionaryStore {
    async fn load(&self) -> Result<Vec<(String, String)>, StoreError> {
        let words = read_document::<HashMap<String, String>>(&self.path)
            .await?
            .unwrap_or_default();
        Ok(words.into_iter().collect())
    }

    async fn put(&self, surface: &str, reading: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut words = read_document::<HashMap<String, String>>(&self.path)
            .await?
            .unwrap_or_default();
        words.insert(surface.to_string(), reading.to_string());
        write_document(&self.path, &words).await
    }

    async fn remove(&self, surface: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut words = read_document::<HashMap<String, String>>(&self.path)
            .await?
            .unwrap_or_default();
        let removed = words.remove(surface).is_some();
        if removed {
            write_document(&self.path, &words).await?;
        }
        Ok(removed)
    }
}
