//! 临时音源文件
//!
//! 音源由 AudioAcquirer 创建，所有权随请求移交给 PlaybackDriver，
//! 在一次播放尝试周期结束后（成功、失败或放弃）删除，不会超期存活。

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// 音源格式（按扩展名判断）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
    Unknown,
}

impl AudioFormat {
    /// 从文件扩展名推断格式
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("wav") => AudioFormat::Wav,
            Some("mp3") => AudioFormat::Mp3,
            Some("ogg") => AudioFormat::Ogg,
            _ => AudioFormat::Unknown,
        }
    }
}

/// 进程内单调序号，保证同一微秒内生成的文件名不冲突
static ASSET_SEQ: AtomicU64 = AtomicU64::new(0);

/// 生成唯一的音源文件名主干（单调时间戳 + 序号）
pub fn unique_stem() -> String {
    let stamp = chrono::Utc::now().timestamp_micros();
    let seq = ASSET_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("voice_{}_{}", stamp, seq)
}

/// 临时音源文件
#[derive(Debug)]
pub struct AudioAsset {
    path: PathBuf,
    format: AudioFormat,
}

impl AudioAsset {
    /// 包装一个已经写入磁盘的音源文件
    pub fn new(path: PathBuf) -> Self {
        let format = AudioFormat::from_path(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// 交出文件路径，放弃删除责任（移交给播放完成回调）
    pub fn into_path(self) -> PathBuf {
        self.path
    }

    /// 删除磁盘上的文件
    ///
    /// 删除失败只记录日志，临时目录最终会被清理
    pub async fn discard(self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove audio asset");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            AudioFormat::from_path(Path::new("/tmp/a.wav")),
            AudioFormat::Wav
        );
        assert_eq!(
            AudioFormat::from_path(Path::new("/tmp/a.MP3")),
            AudioFormat::Mp3
        );
        assert_eq!(
            AudioFormat::from_path(Path::new("/tmp/a")),
            AudioFormat::Unknown
        );
    }

    #[test]
    fn test_unique_stem_monotonic() {
        let a = unique_stem();
        let b = unique_stem();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_discard_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.wav");
        tokio::fs::write(&path, b"data").await.unwrap();

        let asset = AudioAsset::new(path.clone());
        assert_eq!(asset.format(), AudioFormat::Wav);
        asset.discard().await;
        assert!(!path.exists());
    }
}
