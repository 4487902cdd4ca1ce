//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `YOMIAGE_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `YOMIAGE_SYNTH__DICT_DIR=/opt/open_jtalk/dic`
/// - `YOMIAGE_STORAGE__DATA_DIR=/data/json`
/// - `YOMIAGE_READING__MAX_CHARS=80`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("synth.command", "open_jtalk")?
        .set_default("synth.dict_dir", "/var/lib/mecab/dic/open-jtalk/naist-jdic")?
        .set_default("synth.voice_dir", "/usr/share/hts-voice")?
        .set_default("synth.timeout_secs", 30)?
        .set_default("storage.temp_dir", "data/tmp")?
        .set_default("storage.data_dir", "data/json")?
        .set_default("reading.max_chars", 50)?
        .set_default("playback.max_attempts", 600)?
        .set_default("playback.retry_interval_ms", 200)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: YOMIAGE_
    // 层级分隔符: __ (双下划线)
    builder = builder.add_source(
        Environment::with_prefix("YOMIAGE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.synth.command.is_empty() {
        return Err(ConfigError::ValidationError(
            "Synth command cannot be empty".to_string(),
        ));
    }

    if config.playback.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "Playback max_attempts cannot be 0".to_string(),
        ));
    }

    if config.reading.max_chars == 0 {
        return Err(ConfigError::ValidationError(
            "Reading max_chars cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Synth Command: {}", config.synth.command);
    tracing::info!("Synth Dict Dir: {:?}", config.synth.dict_dir);
    tracing::info!("Synth Voice Dir: {:?}", config.synth.voice_dir);
    tracing::info!("Temp Directory: {:?}", config.storage.temp_dir);
    tracing::info!("Data Directory: {:?}", config.storage.data_dir);
    tracing::info!("Reading Max Chars: {}", config.reading.max_chars);
    tracing::info!(
        "Playback Retry: {} attempts x {}ms",
        config.playback.max_attempts,
        config.playback.retry_interval_ms
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
