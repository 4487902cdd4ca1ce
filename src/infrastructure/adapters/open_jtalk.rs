//! Open JTalk 进程适配器
//!
//! 实现 SynthesizerPort trait，调用外部的 open_jtalk 命令行：
//!
//! open_jtalk -x <词典目录> -m <音色模型> -ow <输出wav>
//!            -r <语速> -fm <音调> -jf <抑扬> -u <阈值> <文本文件>
//!
//! 文本先写入临时文件，进程结束后无论成败都删除；
//! 输出 wav 的所有权移交调用方。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::application::ports::{SynthesisError, SynthesizerPort};
use crate::domain::asset::{unique_stem, AudioAsset};
use crate::domain::SynthesisParams;

/// Open JTalk 适配器配置
#[derive(Debug, Clone)]
pub struct OpenJtalkConfig {
    /// 可执行文件
    pub command: String,
    /// 发音词典目录（-x）
    pub dict_dir: PathBuf,
    /// 音色模型根目录
    pub voice_dir: PathBuf,
    /// 临时文件目录
    pub temp_dir: PathBuf,
    /// 进程执行超时
    pub timeout: Duration,
}

impl Default for OpenJtalkConfig {
    fn default() -> Self {
        Self {
            command: "open_jtalk".to_string(),
            dict_dir: PathBuf::from("/var/lib/mecab/dic/open-jtalk/naist-jdic"),
            voice_dir: PathBuf::from("/usr/share/hts-voice"),
            temp_dir: PathBuf::from("data/tmp"),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Open JTalk 合成器
pub struct OpenJtalkSynthesizer {
    config: OpenJtalkConfig,
}

impl OpenJtalkSynthesizer {
    pub fn new(config: OpenJtalkConfig) -> Self {
        Self { config }
    }

    /// 组装命令行参数
    fn build_args(
        &self,
        params: &SynthesisParams,
        out_path: &Path,
        text_path: &Path,
    ) -> Vec<String> {
        let voice_model = params.voice.model_path(&self.config.voice_dir);
        vec![
            "-x".to_string(),
            self.config.dict_dir.display().to_string(),
            "-m".to_string(),
            voice_model.display().to_string(),
            "-ow".to_string(),
            out_path.display().to_string(),
            "-r".to_string(),
            params.speed.to_string(),
            "-fm".to_string(),
            params.tone.to_string(),
            "-jf".to_string(),
            params.intone.to_string(),
            "-u".to_string(),
            params.threshold.to_string(),
            text_path.display().to_string(),
        ]
    }
}

#[async_trait]
impl SynthesizerPort for OpenJtalkSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        params: &SynthesisParams,
    ) -> Result<AudioAsset, SynthesisError> {
        let stem = unique_stem();
        let text_path = self.config.temp_dir.join(format!("{}.txt", stem));
        let out_path = self.config.temp_dir.join(format!("{}.wav", stem));

        tokio::fs::write(&text_path, text).await?;

        let args = self.build_args(params, &out_path, &text_path);
        tracing::debug!(
            command = %self.config.command,
            voice = %params.voice,
            text_len = text.chars().count(),
            "Spawning synthesis process"
        );

        let result = tokio::time::timeout(
            self.config.timeout,
            Command::new(&self.config.command)
                .args(&args)
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .output(),
        )
        .await;

        // 中间文本文件无论成败都删除
        let _ = tokio::fs::remove_file(&text_path).await;

        let output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(SynthesisError::ProcessFailed(e.to_string()));
            }
            Err(_) => {
                let _ = tokio::fs::remove_file(&out_path).await;
                return Err(SynthesisError::Timeout(self.config.timeout.as_secs()));
            }
        };

        if !output.status.success() {
            let _ = tokio::fs::remove_file(&out_path).await;
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SynthesisError::ProcessFailed(format!(
                "exit {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        // 正常退出也可能没有产出文件
        match tokio::fs::metadata(&out_path).await {
            Ok(meta) if meta.len() > 0 => Ok(AudioAsset::new(out_path)),
            _ => Err(SynthesisError::NoOutput),
        }
    }
}
