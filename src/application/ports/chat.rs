//! Chat Port - 文字频道抽象

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ChannelId, ChannelRef, MessageId};

/// 消息发送失败
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Failed to send message to channel {0}: {1}")]
    SendFailed(ChannelId, String),
}

/// 文字频道端口
#[async_trait]
pub trait ChatPort: Send + Sync {
    /// 向文字频道发送一条消息，返回消息 ID
    async fn send(&self, channel: ChannelId, text: &str) -> Result<MessageId, ChatError>;

    /// 解析文字频道引用
    ///
    /// 解析不了（不存在、无权限）时返回 None，由调用方静默放弃
    async fn resolve_text_channel(&self, channel: ChannelId) -> Option<ChannelRef>;
}
