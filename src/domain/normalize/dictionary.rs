//! 用户词典
//!
//! 「表面形 → 读法」的有序映射。表面形按字符数降序排列，
//! 共享子串时长的先替换。条目一律按字面量子串处理，
//! 即使包含正则元字符也不当作模式。

/// 用户词典快照
#[derive(Debug, Clone, Default)]
pub struct WordDictionary {
    /// (表面形, 读法)，字符数降序
    entries: Vec<(String, String)>,
}

impl WordDictionary {
    /// 从条目构建，按表面形字符数降序排列
    ///
    /// 等长条目保持传入顺序
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut entries: Vec<(String, String)> = entries.into_iter().collect();
        entries.sort_by_key(|(surface, _)| std::cmp::Reverse(surface.chars().count()));
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// 把每个条目的表面形在整串里替换为读法
    pub fn apply(&self, text: &str) -> String {
        let mut msg = text.to_string();
        for (surface, reading) in &self.entries {
            if msg.contains(surface.as_str()) {
                msg = msg.replace(surface.as_str(), reading);
            }
        }
        msg
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(pairs: &[(&str, &str)]) -> WordDictionary {
        WordDictionary::new(
            pairs
                .iter()
                .map(|(s, r)| (s.to_string(), r.to_string())),
        )
    }

    #[test]
    fn test_longer_surface_wins() {
        // 「おはよう」は「おは」より先に置換される
        let d = dict(&[("おは", "x"), ("おはよう", "おはようございます")]);
        assert_eq!(d.apply("おはよう"), "おはようございます");
    }

    #[test]
    fn test_ordering_invariant_after_construction() {
        let d = dict(&[("ab", "1"), ("abcd", "2"), ("abc", "3")]);
        let lengths: Vec<usize> = d
            .entries()
            .iter()
            .map(|(s, _)| s.chars().count())
            .collect();
        assert_eq!(lengths, vec![4, 3, 2]);
    }

    #[test]
    fn test_replaces_all_occurrences() {
        let d = dict(&[("ねこ", "きゃっと")]);
        assert_eq!(d.apply("ねことねこ"), "きゃっとときゃっと");
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let d = dict(&[("(笑)", "かっこわらい")]);
        assert_eq!(d.apply("そう(笑)です"), "そうかっこわらいです");
        // 不会被当作正则模式解释
        assert_eq!(d.apply("笑"), "笑");
    }

    #[test]
    fn test_empty_dictionary_is_identity() {
        assert_eq!(WordDictionary::empty().apply("text"), "text");
    }
}
