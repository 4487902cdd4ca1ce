//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现：
//! - adapters: Open JTalk 进程、HTTP 音源下载、出题媒体整形
//! - persistence: JSON 文档存储
//! - router: 每服务器单写者的事件队列

pub mod adapters;
pub mod persistence;
pub mod router;

pub use router::{GuildEngine, GuildEventRouter};
