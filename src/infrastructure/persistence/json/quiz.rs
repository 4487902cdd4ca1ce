//! 出题数据存储
//!
//! `[{"url": "...", "tags": ["..."]}]` 的 JSON 数组，运行期只读。

use async_trait::async_trait;
use std::path::PathBuf;

use super::read_document;
use crate::application::ports::{QuizStorePort, QuizTrack, StoreError};

/// JSON 出题数据存储
pub struct JsonQuizStore {
    path: PathBuf,
}

impl JsonQuizStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl QuizStorePort for JsonQuizStore {
    async fn load_tracks(&self) -> Result<Vec<QuizTrack>, StoreError> {
        Ok(read_document::<Vec<QuizTrack>>(&self.path)
            .await?
            .unwrap_or_default())
    }
}
