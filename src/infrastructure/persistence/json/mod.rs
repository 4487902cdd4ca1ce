//! JSON 文档存储
//!
//! 所有持久化数据都是磁盘上的 JSON 文档：
//! - settings: 服务器/用户设定（带 `default` 兜底条目）
//! - dictionary: 用户词典
//! - phrases: 定型句表（只读）+ 使用计数（读-改-写）
//! - serifs: 台词目录
//! - quiz: 出题数据（只读）
//!
//! 写路径都在各自的异步互斥量下完成读-改-写，
//! 跨进程则是最后写入者胜。

mod dictionary;
mod phrases;
mod quiz;
mod serifs;
mod settings;

pub use dictionary::JsonDictionaryStore;
pub use phrases::JsonPhraseStore;
pub use quiz::JsonQuizStore;
pub use serifs::load_catalog;
pub use settings::JsonSettingsStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::application::ports::StoreError;

/// 读入 JSON 文档；文件不存在时返回 None
async fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// 写出 JSON 文档（建好父目录，缩进格式）
async fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let bytes = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
