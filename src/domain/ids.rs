//! 实体标识
//!
//! 传输层的雪花 ID 在本核心内只作为不透明数值使用

use serde::{Deserialize, Serialize};
use std::fmt;

/// 服务器 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(pub u64);

/// 频道 ID（文字频道与语音频道共用同一 ID 空间）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub u64);

/// 用户 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// 消息 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ChannelId {
    /// 传输层的频道提及记法
    pub fn mention(&self) -> String {
        format!("<#{}>", self.0)
    }
}

impl UserId {
    /// 传输层的用户提及记法
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

/// 已解析的文字频道引用
///
/// 携带所属服务器，供跨服务器校验使用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelRef {
    pub id: ChannelId,
    pub guild: GuildId,
}

impl ChannelRef {
    pub fn new(id: ChannelId, guild: GuildId) -> Self {
        Self { id, guild }
    }
}
