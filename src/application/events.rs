//! 入站事件
//!
//! 传输层投递的事件与用户指令统一汇入每服务器的队列，
//! 由单一 actor 按到达顺序处理（单写者）。

use crate::domain::{ChannelId, GuildId, MessageId, UserId};

/// 成员语音状态变动
#[derive(Debug, Clone)]
pub struct MembershipEvent {
    pub guild: GuildId,
    pub user: UserId,
    /// 是否为机器帐号（含本服务自身）
    pub is_bot: bool,
    /// 变动前所在语音频道
    pub previous: Option<ChannelId>,
    /// 变动后所在语音频道
    pub current: Option<ChannelId>,
}

/// 文字消息
///
/// 指令消息由表现层拦截解析，不会作为普通消息投递到这里
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub guild: GuildId,
    pub channel: ChannelId,
    pub author: UserId,
    pub author_is_bot: bool,
    pub text: String,
}

/// 消息上的表情反应
#[derive(Debug, Clone)]
pub struct ReactionEvent {
    pub guild: GuildId,
    pub message: MessageId,
    pub user: UserId,
    pub is_bot: bool,
    pub emoji: String,
}

/// 会话范围的用户指令（表现层已解析完毕）
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// 把服务叫进指令发起者所在的语音频道
    Join {
        invoker_voice: Option<ChannelId>,
        text_channel: ChannelId,
    },
    /// 从语音频道退出
    Leave { reply_channel: ChannelId },
    /// 停止当前播放
    Stop { reply_channel: ChannelId },
    /// 切换自动参加设定
    ToggleAutoJoin {
        invoker: UserId,
        invoker_voice: Option<ChannelId>,
        text_channel: ChannelId,
    },
    /// 开始出题
    QuizStart {
        channel: ChannelId,
        tag: Option<String>,
    },
}

/// 汇入服务器队列的事件
#[derive(Debug, Clone)]
pub enum GuildEvent {
    Membership(MembershipEvent),
    Message(MessageEvent),
    Reaction(ReactionEvent),
    Command(SessionCommand),
}
