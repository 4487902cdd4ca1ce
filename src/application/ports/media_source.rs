//! Media Source Port - 出题音源抽象
//!
//! 出题曲目来自外部站点，先下载再整形（裁剪、增益、淡入淡出），
//! 两步分开暴露以便状态机汇报各自的进度。

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::AudioAsset;

/// 音源获取失败
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media download failed: {0}")]
    DownloadFailed(String),

    #[error("Media conversion failed: {0}")]
    ConvertFailed(String),

    #[error("Media IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 下载完成、尚未整形的媒体文件
#[derive(Debug)]
pub struct RawMedia {
    pub path: PathBuf,
}

/// 出题音源端口
#[async_trait]
pub trait MediaSourcePort: Send + Sync {
    /// 下载原始媒体
    async fn download(&self, url: &str) -> Result<RawMedia, MediaError>;

    /// 整形为可播放的短音源（所有权移交调用方）
    async fn convert(&self, raw: RawMedia) -> Result<AudioAsset, MediaError>;
}
