//! Domain Layer - 领域层
//!
//! 纯逻辑，不依赖任何端口：
//! - ids: 实体标识（服务器 / 频道 / 用户）
//! - asset: 临时音源文件（唯一命名与所有权）
//! - voice: 音色参数与合成引擎参数的插值映射
//! - catalog: 台词目录（占位符替换）
//! - session: 每服务器语音会话状态机
//! - normalize: 文本规范化流水线

pub mod asset;
pub mod catalog;
pub mod ids;
pub mod normalize;
pub mod session;
pub mod voice;

pub use asset::{AudioAsset, AudioFormat};
pub use catalog::SerifCatalog;
pub use ids::{ChannelId, ChannelRef, GuildId, MessageId, UserId};
pub use session::{AttachOutcome, GuildSession};
pub use voice::{SynthesisParams, VoiceKind, VoiceProfile};
