//! Clip Fetcher Port - 远程音源下载抽象

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 下载失败
#[derive(Debug, Error)]
pub enum FetchError {
    /// 非成功状态响应（软失败，调用方放弃本次请求）
    #[error("Fetch rejected with status {0}")]
    Rejected(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Fetch IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 远程音源下载端口
#[async_trait]
pub trait ClipFetcherPort: Send + Sync {
    /// 把 `url` 指向的音源下载到 `dest`
    async fn fetch_to(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}
