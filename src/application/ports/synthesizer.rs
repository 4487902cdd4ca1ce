//! Synthesizer Port - 语音合成引擎抽象
//!
//! 本核心只负责把插值后的设定映射成引擎参数并管理中间文件；
//! 引擎本体是外部进程，本层不做重试。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{AudioAsset, SynthesisParams};

/// 合成失败
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// 外部进程启动失败或以非零状态退出
    #[error("Synthesis process failed: {0}")]
    ProcessFailed(String),

    /// 进程执行超时
    #[error("Synthesis timed out after {0}s")]
    Timeout(u64),

    /// 进程正常退出但没有产出音频文件
    #[error("Synthesis produced no output file")]
    NoOutput,

    #[error("Synthesis IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 语音合成端口
#[async_trait]
pub trait SynthesizerPort: Send + Sync {
    /// 合成一段语音，产出的音源所有权移交给调用方
    async fn synthesize(
        &self,
        text: &str,
        params: &SynthesisParams,
    ) -> Result<AudioAsset, SynthesisError>;
}
