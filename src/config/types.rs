//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 合成引擎配置
    #[serde(default)]
    pub synth: SynthConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 朗读配置
    #[serde(default)]
    pub reading: ReadingConfig,

    /// 播放配置
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            synth: SynthConfig::default(),
            storage: StorageConfig::default(),
            reading: ReadingConfig::default(),
            playback: PlaybackConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 合成引擎（Open JTalk）配置
#[derive(Debug, Clone, Deserialize)]
pub struct SynthConfig {
    /// 引擎可执行文件
    #[serde(default = "default_synth_command")]
    pub command: String,

    /// 发音词典目录（-x）
    #[serde(default = "default_dict_dir")]
    pub dict_dir: PathBuf,

    /// 音色模型（.htsvoice）根目录
    #[serde(default = "default_voice_dir")]
    pub voice_dir: PathBuf,

    /// 进程执行超时（秒）
    #[serde(default = "default_synth_timeout")]
    pub timeout_secs: u64,
}

fn default_synth_command() -> String {
    "open_jtalk".to_string()
}

fn default_dict_dir() -> PathBuf {
    PathBuf::from("/var/lib/mecab/dic/open-jtalk/naist-jdic")
}

fn default_voice_dir() -> PathBuf {
    PathBuf::from("/usr/share/hts-voice")
}

fn default_synth_timeout() -> u64 {
    30
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            command: default_synth_command(),
            dict_dir: default_dict_dir(),
            voice_dir: default_voice_dir(),
            timeout_secs: default_synth_timeout(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 临时音源目录（生成的语音文件、下载的音源）
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// JSON 文档目录（设定、词典、定型句表等）
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("data/tmp")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// 服务器设定文档
    pub fn guild_settings_path(&self) -> PathBuf {
        self.data_dir.join("guild_settings.json")
    }

    /// 用户设定文档
    pub fn user_settings_path(&self) -> PathBuf {
        self.data_dir.join("user_settings.json")
    }

    /// 用户词典文档
    pub fn words_path(&self) -> PathBuf {
        self.data_dir.join("words.json")
    }

    /// 全局正则替换表
    pub fn global_words_path(&self) -> PathBuf {
        self.data_dir.join("global_words.json")
    }

    /// 定型句表
    pub fn phrases_path(&self) -> PathBuf {
        self.data_dir.join("sound_links.json")
    }

    /// 定型句使用计数
    pub fn usage_log_path(&self) -> PathBuf {
        self.data_dir.join("sound_log.json")
    }

    /// 台词目录
    pub fn serifs_path(&self) -> PathBuf {
        self.data_dir.join("serifs.json")
    }

    /// 出题数据
    pub fn quiz_data_path(&self) -> PathBuf {
        self.data_dir.join("intro_data.json")
    }
}

/// 朗读配置
#[derive(Debug, Clone, Deserialize)]
pub struct ReadingConfig {
    /// 单条消息的最大朗读字符数（超过则截断）
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_max_chars() -> usize {
    50
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

/// 播放配置
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackConfig {
    /// 播放忙碌时的最大尝试次数
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// 每次尝试之间的等待（毫秒）
    #[serde(default = "default_retry_interval")]
    pub retry_interval_ms: u64,
}

fn default_max_attempts() -> u32 {
    600
}

fn default_retry_interval() -> u64 {
    200
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_interval_ms: default_retry_interval(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
