//! 固定正则替换表
//!
//! 全局的用词修正，表内顺序即应用顺序。模式在装载时编译完成，
//! 运行期只做替换（替换串里可以引用捕获组 `$1`）。

use regex::Regex;
use thiserror::Error;

/// 替换表装载错误
#[derive(Debug, Error)]
pub enum ReplacementError {
    #[error("Invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// 内置替换规则
const BUILTIN_RULES: &[(&str, &str)] = &[
    // URL 不朗读
    (r"https?://\S+", "ユーアールエル"),
    // 代码块不朗读
    (r"```[\s\S]*?```", "コード"),
    // 连续的笑（草）
    (r"[wｗ]{2,}", "わらわら"),
];

/// 编译后的替换表
pub struct ReplacementTable {
    rules: Vec<(Regex, String)>,
}

impl ReplacementTable {
    /// 从有序的「模式 → 替换串」对构建
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ReplacementError>
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut rules = Vec::new();
        for (pattern, replacement) in pairs {
            let pattern = pattern.into();
            let regex = Regex::new(&pattern).map_err(|source| {
                ReplacementError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                }
            })?;
            rules.push((regex, replacement.into()));
        }
        Ok(Self { rules })
    }

    /// 内置替换表
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_RULES.iter().copied()).expect("builtin rules are valid")
    }

    /// 依次应用所有规则
    pub fn apply(&self, text: &str) -> String {
        let mut msg = text.to_string();
        for (regex, replacement) in &self.rules {
            msg = regex.replace_all(&msg, replacement.as_str()).into_owned();
        }
        msg
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
