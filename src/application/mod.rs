//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（VoiceGateway、Chat、Synthesizer、Stores 等）
//! - events: 传输层投递的入站事件
//! - text / phrase / acquire / playback: 朗读流水线的各段
//! - reading: 会话状态机的编排
//! - settings / dictionary / jingle / quiz: 指令与附属功能
//! - error: 应用层错误定义

pub mod acquire;
pub mod dictionary;
pub mod error;
pub mod events;
pub mod jingle;
pub mod phrase;
pub mod playback;
pub mod ports;
pub mod quiz;
pub mod reading;
pub mod settings;
pub mod text;

// Re-exports
pub use acquire::AudioAcquirer;
pub use dictionary::DictionaryService;
pub use error::{AcquireError, PlaybackError};
pub use events::{GuildEvent, MembershipEvent, MessageEvent, ReactionEvent, SessionCommand};
pub use jingle::JingleService;
pub use phrase::PhraseResolver;
pub use playback::{DriverConfig, PlaybackDriver};
pub use quiz::{QuizService, QuizSession, QuizState};
pub use reading::ReadingService;
pub use settings::{SettingsService, VoiceParam};
pub use text::TextService;
