//! HTTP 音源下载适配器
//!
//! 实现 ClipFetcherPort trait，把远程音源流式写入目标文件。
//! 非成功状态作为 Rejected 返回（软失败，由上层决定跳过）。

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio_util::io::StreamReader;

use crate::application::ports::{ClipFetcherPort, FetchError};

/// HTTP 下载适配器配置
#[derive(Debug, Clone)]
pub struct HttpClipFetcherConfig {
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for HttpClipFetcherConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// HTTP 音源下载器
pub struct HttpClipFetcher {
    client: Client,
}

impl HttpClipFetcher {
    pub fn new(config: HttpClipFetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_default_config() -> Result<Self, FetchError> {
        Self::new(HttpClipFetcherConfig::default())
    }
}

#[async_trait]
impl ClipFetcherPort for HttpClipFetcher {
    async fn fetch_to(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Rejected(status.as_u16()));
        }

        // 流式写入，不把整个音源读进内存
        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(std::io::Error::other));
        let mut reader = StreamReader::new(stream);
        let mut file = tokio::fs::File::create(dest).await?;
        let written = tokio::io::copy(&mut reader, &mut file).await?;

        tracing::debug!(url = %url, dest = %dest.display(), bytes = written, "Clip downloaded");
        Ok(())
    }
}
