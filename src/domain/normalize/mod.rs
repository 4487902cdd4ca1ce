//! 文本规范化流水线
//!
//! 把聊天原文转换为可朗读的字符串。各阶段固定顺序执行，
//! 每一阶段消费上一阶段的输出：
//!
//! 1. 固定正则替换表（表内顺序即优先级）
//! 2. 用户词典（表面形按字符数降序，字面量子串替换）
//! 3. 结构化表情标记 `<:name:id>` → `:name:`
//! 4. 英语单词 → 假名（发音词典命中才替换）
//! 5. 罗马字 → 假名（整段可解释时才替换）
//! 6. 超长截断 + 「以下略」
//!
//! 阶段 4 必须先于阶段 5: 两者匹配同样的拉丁字母连续段，
//! 真正的英语要先拿到词典发音，否则会被笼统的罗马字规则弄坏。

mod dictionary;
mod emoji;
mod english;
mod replacement;
mod romaji;

pub use dictionary::WordDictionary;
pub use emoji::EmojiMarkup;
pub use english::EnglishLexicon;
pub use replacement::ReplacementTable;
pub use romaji::to_hiragana;

use regex::Regex;

/// 截断后缀
pub const OMITTED_MARKER: &str = "以下略";

/// 拉丁字母连续段（2 文字以上、大小写不问）
const LATIN_RUN: &str = "[A-Za-z]{2,}";

/// 文本规范化器
///
/// 固定替换表与发音词典在构建时编译完成；
/// 用户词典随每次调用以快照传入（缓存刷新由应用层负责）。
pub struct Normalizer {
    replacements: ReplacementTable,
    english: EnglishLexicon,
    emoji: EmojiMarkup,
    latin_run: Regex,
}

impl Normalizer {
    pub fn new(replacements: ReplacementTable, english: EnglishLexicon) -> Self {
        Self {
            replacements,
            english,
            emoji: EmojiMarkup::new(),
            latin_run: Regex::new(LATIN_RUN).unwrap(),
        }
    }

    /// 内置替换表与内置发音词典
    pub fn builtin() -> Self {
        Self::new(ReplacementTable::builtin(), EnglishLexicon::builtin())
    }

    /// 规范化一条消息
    ///
    /// `max_length` 为 Some 且结果超长时，截断到该字符数并追加「以下略」
    pub fn normalize(
        &self,
        raw: &str,
        dictionary: &WordDictionary,
        max_length: Option<usize>,
    ) -> String {
        if raw.is_empty() {
            return String::new();
        }

        // 1. 固定正则替换
        let msg = self.replacements.apply(raw);

        // 2. 用户词典
        let msg = dictionary.apply(&msg);

        // 3. 结构化表情标记
        let msg = self.emoji.to_name(&msg);

        // 4. 英语 → 假名（词典未命中的段原样保留）
        let msg = self
            .latin_run
            .replace_all(&msg, |caps: &regex::Captures<'_>| {
                self.english
                    .kana_for(&caps[0])
                    .unwrap_or_else(|| caps[0].to_string())
            });

        // 5. 罗马字 → 假名（整段解释不通的原样保留）
        let msg = self
            .latin_run
            .replace_all(&msg, |caps: &regex::Captures<'_>| {
                to_hiragana(&caps[0]).unwrap_or_else(|| caps[0].to_string())
            });

        // 6. 截断
        let msg = msg.into_owned();
        match max_length {
            Some(max) if msg.chars().count() > max => {
                let mut cut: String = msg.chars().take(max).collect();
                cut.push_str(OMITTED_MARKER);
                cut
            }
            _ => msg,
        }
    }
}
