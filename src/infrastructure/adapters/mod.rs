//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

mod http_fetcher;
mod media_source;
mod open_jtalk;

pub use http_fetcher::{HttpClipFetcher, HttpClipFetcherConfig};
pub use media_source::{CommandMediaSource, CommandMediaSourceConfig};
pub use open_jtalk::{OpenJtalkConfig, OpenJtalkSynthesizer};
