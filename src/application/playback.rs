//! 有界重试播放
//!
//! 播放资源是每连接独占的：占用中启动会立即失败而不是排队。
//! 这里的有界重试是系统对抗读上げ请求重叠的唯一背压手段，
//! 预算耗尽就丢弃本次请求，绝不堆积、绝不无限等待。

use std::time::Duration;

use crate::application::error::PlaybackError;
use crate::application::ports::{CompletionHook, PlayRejected, VoiceConnectionPort};
use crate::domain::AudioAsset;

/// 播放驱动配置
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// 忙碌时的最大尝试次数
    pub max_attempts: u32,
    /// 每次尝试之间的等待
    pub retry_interval: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_attempts: 600,
            retry_interval: Duration::from_millis(200),
        }
    }
}

/// 播放驱动
///
/// 音源文件在一次播放尝试周期内恰好删除一次：
/// - 启动成功 → 完成回调里删除
/// - 不可恢复失败 → 立即删除
/// - 预算耗尽 → 立即删除并报告丢弃
pub struct PlaybackDriver {
    config: DriverConfig,
}

impl PlaybackDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    /// 在连接上播放音源
    pub async fn play(
        &self,
        conn: &dyn VoiceConnectionPort,
        asset: AudioAsset,
    ) -> Result<(), PlaybackError> {
        let path = asset.into_path();

        for attempt in 1..=self.config.max_attempts {
            let cleanup = path.clone();
            let hook: CompletionHook = Box::new(move || {
                // 完成回调可能在运行时之外的线程触发，用同步删除
                if let Err(e) = std::fs::remove_file(&cleanup) {
                    tracing::warn!(path = %cleanup.display(), error = %e, "Failed to remove played asset");
                }
            });

            match conn.play(&path, hook) {
                Ok(()) => {
                    tracing::debug!(attempt, path = %path.display(), "Playback started");
                    return Ok(());
                }
                Err(PlayRejected::Busy) => {
                    tokio::time::sleep(self.config.retry_interval).await;
                }
                Err(PlayRejected::Terminal(reason)) => {
                    let _ = tokio::fs::remove_file(&path).await;
                    return Err(PlaybackError::Terminal(reason));
                }
            }
        }

        // 预算耗尽: 丢弃本次朗读
        let _ = tokio::fs::remove_file(&path).await;
        tracing::warn!(
            attempts = self.config.max_attempts,
            path = %path.display(),
            "Playback dropped after retry budget"
        );
        Err(PlaybackError::Exhausted {
            attempts: self.config.max_attempts,
        })
    }
}
