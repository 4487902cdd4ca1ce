//! Application Ports - 出站端口定义
//!
//! 定义应用层与外部协作者（传输层、合成引擎、远程音源、文档存储）
//! 之间的抽象接口，具体实现在 infrastructure/ 层

mod chat;
mod clip_fetcher;
mod media_source;
mod stores;
mod synthesizer;
mod voice_gateway;

pub use chat::{ChatError, ChatPort};
pub use clip_fetcher::{ClipFetcherPort, FetchError};
pub use media_source::{MediaError, MediaSourcePort, RawMedia};
pub use stores::{
    DictionaryStorePort, GuildConfig, PhraseDef, PhraseStorePort, QuizStorePort, QuizTrack,
    SettingsStorePort, StoreError, UserConfig, WatchConfig,
};
pub use synthesizer::{SynthesisError, SynthesizerPort};
pub use voice_gateway::{
    CompletionHook, GatewayError, PlayRejected, VoiceConnectionPort, VoiceGatewayPort,
};
