//! 台词目录装载
//!
//! `{"名字": "台词", ...}` 的 JSON 文档，叠加在内置台词之上。
//! 文档缺失或损坏时退回内置目录（启动不因台词而失败）。

use std::collections::HashMap;
use std::path::Path;

use super::read_document;
use crate::domain::SerifCatalog;

/// 装载台词目录
pub async fn load_catalog(path: &Path) -> SerifCatalog {
    match read_document::<HashMap<String, String>>(path).await {
        Ok(Some(overlay)) => SerifCatalog::builtin_overlaid(overlay),
        Ok(None) => SerifCatalog::builtin(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Serif document unreadable, using builtin");
            SerifCatalog::builtin()
        }
    }
}
