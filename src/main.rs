//! Yomiage - 朗读流水线预览控制台
//!
//! 传输适配器（消息/语音事件的投递与播放）作为外部集成挂接
//! `GuildEventRouter`；本二进制不连传输层，而是把
//! 「规范化 → 定型句/合成 → 音源」流水线暴露成标准输入预览，
//! 方便调词典、定型句表与合成参数。

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use yomiage::application::{AudioAcquirer, PhraseResolver, TextService};
use yomiage::config::{load_config, print_config};
use yomiage::domain::normalize::Normalizer;
use yomiage::domain::UserId;
use yomiage::infrastructure::adapters::{
    HttpClipFetcher, OpenJtalkConfig, OpenJtalkSynthesizer,
};
use yomiage::infrastructure::persistence::json::{
    JsonDictionaryStore, JsonPhraseStore, JsonSettingsStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!("{},yomiage={}", config.log.level, config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Yomiage - 朗读流水线预览控制台");
    print_config(&config);

    // 确保数据目录存在
    tokio::fs::create_dir_all(&config.storage.temp_dir).await?;
    tokio::fs::create_dir_all(&config.storage.data_dir).await?;

    // JSON 文档存储
    let settings = Arc::new(JsonSettingsStore::new(
        config.storage.guild_settings_path(),
        config.storage.user_settings_path(),
    ));
    let dictionary = Arc::new(JsonDictionaryStore::new(config.storage.words_path()));
    let phrase_store = Arc::new(JsonPhraseStore::new(
        config.storage.phrases_path(),
        config.storage.usage_log_path(),
    ));

    // 定型句表在启动时装载并编译
    let resolver = Arc::new(
        PhraseResolver::load(phrase_store)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to load phrase table: {}", e))?,
    );

    // 文本规范化（词典缓存每次转换前刷新）
    let text = TextService::new(Normalizer::builtin(), dictionary);

    // 合成引擎与远程音源
    let synthesizer = Arc::new(OpenJtalkSynthesizer::new(OpenJtalkConfig {
        command: config.synth.command.clone(),
        dict_dir: config.synth.dict_dir.clone(),
        voice_dir: config.synth.voice_dir.clone(),
        temp_dir: config.storage.temp_dir.clone(),
        timeout: std::time::Duration::from_secs(config.synth.timeout_secs),
    }));
    let fetcher = Arc::new(
        HttpClipFetcher::with_default_config()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?,
    );

    let acquirer = AudioAcquirer::new(
        resolver,
        fetcher,
        synthesizer,
        settings,
        config.storage.temp_dir.clone(),
    );

    tracing::info!("Type a line to preview the reading pipeline (Ctrl-C to quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                let normalized = text
                    .normalize(&line, Some(config.reading.max_chars))
                    .await;
                tracing::info!(input = %line, normalized = %normalized, "Normalized");

                match acquirer.acquire(&normalized, UserId(0)).await {
                    Ok(Some(asset)) => {
                        tracing::info!(path = %asset.path().display(), format = ?asset.format(), "Audio acquired");
                        // 预览不保留音源
                        asset.discard().await;
                    }
                    Ok(None) => {
                        tracing::warn!("Clip fetch rejected, nothing to play");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Acquisition failed");
                    }
                }
            }
        }
    }

    Ok(())
}
