//! 应用层错误定义
//!
//! 全部都是「软」错误：作用范围只限一次请求/事件，
//! 由调用方记录日志后跳过，绝不让进程或会话崩溃。

use thiserror::Error;

use super::ports::{FetchError, StoreError, SynthesisError};

/// 音源获取失败
#[derive(Debug, Error)]
pub enum AcquireError {
    /// 远程音源下载失败
    #[error("Clip fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// 语音合成失败
    #[error("Synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    /// 设定文档读取失败
    #[error("Settings load failed: {0}")]
    Store(#[from] StoreError),
}

/// 播放失败
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// 尝试预算用尽，本次朗读被丢弃（音源已删除）
    #[error("Playback dropped after {attempts} busy attempts")]
    Exhausted { attempts: u32 },

    /// 传输层报告的不可恢复失败（音源已删除）
    #[error("Playback failed: {0}")]
    Terminal(String),
}
