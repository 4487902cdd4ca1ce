//! Yomiage - 语音频道文字朗读系统
//!
//! 架构设计: Hexagonal Architecture（端口与适配器）
//!
//! 领域层 (domain/):
//! - normalize: 文本规范化流水线（正则替换、用户词典、英语/罗马字假名化）
//! - voice: 朗读音色参数（百分比设定与合成引擎参数的插值映射）
//! - session: 每个服务器一份的语音会话状态机（Detached / Attached）
//! - catalog: 台词目录（占位符替换）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（VoiceGateway, Chat, Synthesizer, ClipFetcher, Stores）
//! - phrase / acquire / playback: 定型句解析、音源获取、有界重试播放
//! - reading: 成员变动与消息事件驱动的朗读编排
//! - settings / dictionary / jingle / quiz: 周边指令与附属功能
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: Open JTalk 进程适配器、HTTP 音源下载
//! - Persistence: JSON 文档存储（设定、词典、定型句、使用计数）
//! - Router: 每服务器单写者的事件队列（actor）

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
