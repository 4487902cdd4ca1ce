//! 定型句表与使用计数存储
//!
//! 表是 `[{"id":1,"pattern":"...","link":"..."}]` 的 JSON 数组，
//! 数组顺序即优先级，运行期只读。
//!
//! 使用计数是 `{"sound_count": N, "user_data": {"<user>": [n,...]}}`，
//! 每次命中做一次读-改-写；整个读-改-写在互斥量下完成，
//! 同一用户的并发命中不会相互覆盖。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;

use super::{read_document, write_document};
use crate::application::ports::{PhraseDef, PhraseStorePort, StoreError};
use crate::domain::UserId;

/// 使用计数文档
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UsageLog {
    /// 当前定型句数（向量长度的基准）
    #[serde(default)]
    sound_count: usize,

    /// 用户 ID（十进制字符串）→ 各定型句的使用次数
    #[serde(default)]
    user_data: HashMap<String, Vec<u64>>,
}

/// JSON 定型句存储
pub struct JsonPhraseStore {
    table_path: PathBuf,
    log_path: PathBuf,
    /// 使用计数读-改-写的临界区
    log_lock: Mutex<()>,
}

impl JsonPhraseStore {
    pub fn new(table_path: PathBuf, log_path: PathBuf) -> Self {
        Self {
            table_path,
            log_path,
            log_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl PhraseStorePort for JsonPhraseStore {
    async fn load_table(&self) -> Result<Vec<PhraseDef>, StoreError> {
        Ok(read_document::<Vec<PhraseDef>>(&self.table_path)
            .await?
            .unwrap_or_default())
    }

    async fn record_usage(
        &self,
        user: UserId,
        phrase_id: u32,
        phrase_count: usize,
    ) -> Result<(), StoreError> {
        let _guard = self.log_lock.lock().await;

        let mut log = read_document::<UsageLog>(&self.log_path)
            .await?
            .unwrap_or_default();

        let slot = phrase_id.saturating_sub(1) as usize;
        let needed = phrase_count.max(slot + 1);

        let counts = log.user_data.entry(user.to_string()).or_default();
        // 表扩张后残留的短向量补零
        if counts.len() < needed {
            counts.resize(needed, 0);
        }
        counts[slot] += 1;
        log.sound_count = phrase_count;

        write_document(&self.log_path, &log).await
    }

    async fn usage_of(&self, user: UserId) -> Result<Vec<u64>, StoreError> {
        let log = read_document::<UsageLog>(&self.log_path)
            .await?
            .unwrap_or_default();
        Ok(log
            .user_data
            .get(&user.to_string())
            .cloned()
            .unwrap_or_else(|| vec![0; log.sound_count]))
    }
}
