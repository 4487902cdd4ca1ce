//! 出题媒体适配器
//!
//! 实现 MediaSourcePort trait：
//! - download: 外部下载器（yt-dlp）抽取音轨
//! - convert: ffmpeg 截出开头几秒并做淡入淡出、响度规整
//!
//! 两个外部命令都可以在配置里替换。

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::application::ports::{MediaError, MediaSourcePort, RawMedia};
use crate::domain::asset::{unique_stem, AudioAsset};

/// 出题媒体适配器配置
#[derive(Debug, Clone)]
pub struct CommandMediaSourceConfig {
    /// 下载器可执行文件
    pub downloader: String,
    /// 变换器可执行文件
    pub converter: String,
    /// 临时文件目录
    pub temp_dir: PathBuf,
    /// 截取秒数
    pub clip_secs: f64,
    /// 淡入淡出秒数
    pub fade_secs: f64,
    /// 单步超时
    pub timeout: Duration,
}

impl Default for CommandMediaSourceConfig {
    fn default() -> Self {
        Self {
            downloader: "yt-dlp".to_string(),
            converter: "ffmpeg".to_string(),
            temp_dir: PathBuf::from("data/tmp"),
            clip_secs: 5.0,
            fade_secs: 0.5,
            timeout: Duration::from_secs(120),
        }
    }
}

/// 外部命令驱动的出题媒体源
pub struct CommandMediaSource {
    config: CommandMediaSourceConfig,
}

impl CommandMediaSource {
    pub fn new(config: CommandMediaSourceConfig) -> Self {
        Self { config }
    }

    async fn run(
        &self,
        command: &str,
        args: &[String],
        label: &str,
    ) -> Result<(), MediaError> {
        let result = tokio::time::timeout(
            self.config.timeout,
            Command::new(command)
                .args(args)
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .output(),
        )
        .await;

        let output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(MediaError::DownloadFailed(format!("{}: {}", label, e))),
            Err(_) => {
                return Err(MediaError::DownloadFailed(format!("{}: timed out", label)));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::ConvertFailed(format!(
                "{} exit {}: {}",
                label,
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaSourcePort for CommandMediaSource {
    async fn download(&self, url: &str) -> Result<RawMedia, MediaError> {
        let path = self.config.temp_dir.join(format!("{}.m4a", unique_stem()));
        let args = vec![
            "-x".to_string(),
            "--audio-format".to_string(),
            "m4a".to_string(),
            "--no-playlist".to_string(),
            "-o".to_string(),
            path.display().to_string(),
            url.to_string(),
        ];
        self.run(&self.config.downloader, &args, "downloader").await?;

        if tokio::fs::metadata(&path).await.is_err() {
            return Err(MediaError::DownloadFailed(
                "downloader produced no file".to_string(),
            ));
        }
        Ok(RawMedia { path })
    }

    async fn convert(&self, raw: RawMedia) -> Result<AudioAsset, MediaError> {
        let out = self.config.temp_dir.join(format!("{}.mp3", unique_stem()));
        let fade_out_start = (self.config.clip_secs - self.config.fade_secs).max(0.0);
        // 先去掉开头的无声段再截取，前后加淡入淡出
        let filter = format!(
            "silenceremove=start_periods=1:start_threshold=-50dB,atrim=0:{},afade=t=in:d={},afade=t=out:st={}:d={},loudnorm",
            self.config.clip_secs, self.config.fade_secs, fade_out_start, self.config.fade_secs
        );
        let args = vec![
            "-y".to_string(),
            "-i".to_string(),
            raw.path.display().to_string(),
            "-af".to_string(),
            filter,
            out.display().to_string(),
        ];
        let result = self.run(&self.config.converter, &args, "converter").await;

        // 原始文件用完即删
        let _ = tokio::fs::remove_file(&raw.path).await;
        result?;

        if tokio::fs::metadata(&out).await.is_err() {
            return Err(MediaError::ConvertFailed(
                "converter produced no file".to_string(),
            ));
        }
        Ok(AudioAsset::new(out))
    }
}
