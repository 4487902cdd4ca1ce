//! 词典指令
//!
//! 登记/删除/一览。登记与删除前先剥掉自定义表情标记，
//! 存储在变更后重排（排序本身由词典快照装载时保证）。

use std::sync::Arc;

use crate::application::ports::{ChatPort, DictionaryStorePort};
use crate::domain::normalize::{EmojiMarkup, WordDictionary};
use crate::domain::{ChannelId, SerifCatalog};

/// 词典指令服务
pub struct DictionaryService {
    store: Arc<dyn DictionaryStorePort>,
    chat: Arc<dyn ChatPort>,
    catalog: Arc<SerifCatalog>,
    emoji: EmojiMarkup,
}

impl DictionaryService {
    pub fn new(
        store: Arc<dyn DictionaryStorePort>,
        chat: Arc<dyn ChatPort>,
        catalog: Arc<SerifCatalog>,
    ) -> Self {
        Self {
            store,
            chat,
            catalog,
            emoji: EmojiMarkup::new(),
        }
    }

    /// 登记一个读法
    pub async fn add_word(&self, reply_channel: ChannelId, surface: &str, reading: &str) {
        let surface = self.emoji.strip(surface);
        let reading = self.emoji.strip(reading);

        if let Err(e) = self.store.put(&surface, &reading).await {
            tracing::warn!(surface = %surface, error = %e, "Failed to store word");
            return;
        }

        let line = self
            .catalog
            .render("complete_word_add", &[&surface, &reading]);
        self.reply(reply_channel, &line).await;
    }

    /// 删除一个读法
    pub async fn remove_word(&self, reply_channel: ChannelId, surface: &str) {
        let surface = self.emoji.strip(surface);

        match self.store.remove(&surface).await {
            Ok(true) => {
                let line = self.catalog.render("complete_word_delete", &[&surface]);
                self.reply(reply_channel, &line).await;
            }
            Ok(false) => {
                let line = self.catalog.render("error_word_delete", &[""]);
                self.reply(reply_channel, &line).await;
            }
            Err(e) => {
                tracing::warn!(surface = %surface, error = %e, "Failed to remove word");
            }
        }
    }

    /// 一览（按表面形字符数降序，与替换顺序一致）
    pub async fn list_words(&self, reply_channel: ChannelId) {
        let entries = match self.store.load().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load dictionary");
                return;
            }
        };

        let ordered = WordDictionary::new(entries);
        let mut lines = vec![
            self.catalog.render("show_word_list", &[]),
            "単語（読み）".to_string(),
        ];
        for (surface, reading) in ordered.entries() {
            lines.push(format!("・{}（{}）", surface, reading));
        }
        self.reply(reply_channel, &lines.join("\n")).await;
    }

    async fn reply(&self, channel: ChannelId, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Err(e) = self.chat.send(channel, text).await {
            tracing::warn!(channel = %channel, error = %e, "Failed to send reply");
        }
    }
}
