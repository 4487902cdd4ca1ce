//! 语音会话状态机
//!
//! 每个服务器一份，由该服务器的事件队列独占持有（单写者）。
//! 状态只有两个: Detached（未绑定朗读频道）/ Attached（已绑定）。
//!
//! 不变量:
//! - 同一时刻最多绑定一个文字频道
//! - 绑定状态蕴含「可能持有语音连接」，但拆除过程中可以短暂地
//!   只有连接而没有绑定，因此路由判断前必须先与观测到的连接状态对账

use super::ids::{ChannelRef, GuildId};

/// 绑定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// 新绑定（或从别的频道切换过来）
    Started,
    /// 已经绑定在同一频道上（两个加入事件交错时的防护）
    AlreadyReading,
}

/// 服务器语音会话
#[derive(Debug)]
pub struct GuildSession {
    guild_id: GuildId,
    attached_text_channel: Option<ChannelRef>,
}

impl GuildSession {
    pub fn new(guild_id: GuildId) -> Self {
        Self {
            guild_id,
            attached_text_channel: None,
        }
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    pub fn attached_channel(&self) -> Option<ChannelRef> {
        self.attached_text_channel
    }

    pub fn is_attached(&self) -> bool {
        self.attached_text_channel.is_some()
    }

    /// 绑定朗读频道
    pub fn attach(&mut self, channel: ChannelRef) -> AttachOutcome {
        match self.attached_text_channel {
            Some(current) if current.id == channel.id => AttachOutcome::AlreadyReading,
            _ => {
                self.attached_text_channel = Some(channel);
                AttachOutcome::Started
            }
        }
    }

    /// 解除绑定，返回此前绑定的频道
    pub fn detach(&mut self) -> Option<ChannelRef> {
        self.attached_text_channel.take()
    }

    /// 记账状态与观测到的连接状态是否不一致
    ///
    /// 不一致时调用方必须依据持久化的监视设定重新推导绑定频道，
    /// 绝不能拿过期的缓存引用去路由播放
    pub fn out_of_sync(&self, connection_exists: bool) -> bool {
        connection_exists != self.attached_text_channel.is_some()
    }

    /// 依据重新推导出的频道修正记账状态
    pub fn reconcile(&mut self, derived: Option<ChannelRef>) {
        self.attached_text_channel = derived;
    }
}
