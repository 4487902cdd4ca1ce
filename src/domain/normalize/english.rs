//! 英语发音词典
//!
//! 「英语单词（小写）→ 假名读法」的查找表。内置一份常用词种子，
//! 可以用外部文档整体替换或叠加。

use std::collections::HashMap;

/// 内置种子（JSON 形式随二进制编译）
const SEED: &str = include_str!("english_seed.json");

/// 英语发音词典
#[derive(Debug, Clone)]
pub struct EnglishLexicon {
    words: HashMap<String, String>,
}

impl EnglishLexicon {
    /// 从「单词 → 读法」映射构建，键一律转为小写
    pub fn new(words: HashMap<String, String>) -> Self {
        let words = words
            .into_iter()
            .map(|(word, kana)| (word.to_ascii_lowercase(), kana))
            .collect();
        Self { words }
    }

    /// 内置种子词典
    pub fn builtin() -> Self {
        let words: HashMap<String, String> =
            serde_json::from_str(SEED).expect("builtin lexicon is valid JSON");
        Self::new(words)
    }

    /// 以内置种子为底，叠加外部条目
    pub fn builtin_overlaid(overlay: HashMap<String, String>) -> Self {
        let mut lexicon = Self::builtin();
        for (word, kana) in overlay {
            lexicon.words.insert(word.to_ascii_lowercase(), kana);
        }
        lexicon
    }

    /// 查找单词读法（大小写不问）
    pub fn kana_for(&self, word: &str) -> Option<String> {
        self.words.get(&word.to_ascii_lowercase()).cloned()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
