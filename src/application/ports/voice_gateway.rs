//! Voice Gateway Port - 语音传输抽象
//!
//! 语音连接是每服务器独占的播放资源：同一时刻只能有一次播放，
//! 播放中再次启动会立即失败（Busy）而不是排队。

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::{ChannelId, GuildId};

/// 连接建立失败
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to connect to voice channel {0}: {1}")]
    ConnectFailed(ChannelId, String),
}

/// 播放启动被拒绝
#[derive(Debug, Error)]
pub enum PlayRejected {
    /// 独占播放资源使用中，稍后重试可能成功
    #[error("Playback resource is busy")]
    Busy,

    /// 不可恢复的失败（连接断开等），重试没有意义
    #[error("Playback failed: {0}")]
    Terminal(String),
}

/// 播放完成回调
///
/// 传输层必须在播放结束时恰好调用一次：
/// 正常播完、被显式停止、连接丢失都算结束。
/// 播放从未成功启动时不得调用。
pub type CompletionHook = Box<dyn FnOnce() + Send + 'static>;

/// 语音网关端口
///
/// 建立与查询每服务器的语音连接
#[async_trait]
pub trait VoiceGatewayPort: Send + Sync {
    /// 连接到语音频道（已在别的频道时由实现负责移动）
    async fn connect(
        &self,
        guild: GuildId,
        channel: ChannelId,
    ) -> Result<Arc<dyn VoiceConnectionPort>, GatewayError>;

    /// 该服务器当前的语音连接
    fn connection(&self, guild: GuildId) -> Option<Arc<dyn VoiceConnectionPort>>;
}

/// 语音连接端口
#[async_trait]
pub trait VoiceConnectionPort: Send + Sync {
    /// 连接所在的语音频道
    fn channel(&self) -> ChannelId;

    /// 是否正在播放
    fn is_playing(&self) -> bool;

    /// 启动播放
    ///
    /// 成功返回后 `on_complete` 的调用义务移交给传输层
    fn play(&self, source: &Path, on_complete: CompletionHook) -> Result<(), PlayRejected>;

    /// 停止当前播放
    fn stop(&self);

    /// 断开连接
    async fn disconnect(&self);

    /// 连接频道内除本服务帐号以外的成员数
    fn human_count(&self) -> usize;
}
