//! 结构化表情标记
//!
//! 传输层的自定义表情以 `<:name:id>`（动画表情为 `<a:name:id>`）
//! 的标记形式出现在消息正文里。朗读时转为 `:name:`，
//! 登记词典条目时剥掉标记只留名字。

use regex::Regex;

/// 自定义表情标记
#[derive(Debug, Clone)]
pub struct EmojiMarkup {
    markup: Regex,
}

impl EmojiMarkup {
    pub fn new() -> Self {
        Self {
            markup: Regex::new(r"<a?:(\w+):\d+>").unwrap(),
        }
    }

    /// 标记 → 括起的名字 `:name:`
    pub fn to_name(&self, text: &str) -> String {
        self.markup.replace_all(text, ":$1:").into_owned()
    }

    /// 标记 → 裸名字（词典登记用）
    pub fn strip(&self, text: &str) -> String {
        self.markup.replace_all(text, "$1").into_owned()
    }
}

impl Default for EmojiMarkup {
    fn default() -> Self {
        Self::new()
    }
}
