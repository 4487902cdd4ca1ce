//! 罗马字 → 平假名
//!
//! 整段转换: 一段拉丁字母要么完整地解释为罗马字音节序列，
//! 要么原样保留（返回 None），不做半截转换。

/// 把一段拉丁字母解释为平假名
///
/// 规则:
/// - 重叠子音（n 以外）→ 促音「っ」
/// - n 后面跟子音或到达末尾 → 拨音「ん」
/// - 其余按最长一致（3 → 2 → 1 字符）查音节表
/// - 任一位置查不到 → 整段放弃
pub fn to_hiragana(run: &str) -> Option<String> {
    // 罗马字只可能是 ASCII，混入其他字符的段整段放弃
    if !run.is_ascii() {
        return None;
    }
    let s = run.to_ascii_lowercase();
    let bytes = s.as_bytes();
    let mut out = String::new();
    let mut i = 0;

    while i < bytes.len() {
        // 促音
        if i + 1 < bytes.len()
            && bytes[i] == bytes[i + 1]
            && is_consonant(bytes[i])
            && bytes[i] != b'n'
        {
            out.push('っ');
            i += 1;
            continue;
        }

        // 拨音
        if bytes[i] == b'n' {
            match bytes.get(i + 1) {
                None => {
                    out.push('ん');
                    i += 1;
                    continue;
                }
                Some(&next) if !is_vowel(next) && next != b'y' => {
                    out.push('ん');
                    i += 1;
                    continue;
                }
                _ => {}
            }
        }

        // 最长一致
        let mut matched = false;
        for len in (1..=3).rev() {
            if i + len <= bytes.len() {
                if let Some(kana) = syllable(&s[i..i + len]) {
                    out.push_str(kana);
                    i += len;
                    matched = true;
                    break;
                }
            }
        }
        if !matched {
            return None;
        }
    }

    Some(out)
}

fn is_vowel(c: u8) -> bool {
    matches!(c, b'a' | b'i' | b'u' | b'e' | b'o')
}

fn is_consonant(c: u8) -> bool {
    c.is_ascii_lowercase() && !is_vowel(c)
}

/// 音节表
fn syllable(s: &str) -> Option<&'static str> {
    let kana = match s {
        "a" => "あ",
        "i" => "い",
        "u" => "う",
        "e" => "え",
        "o" => "お",
        "n" => "ん",

        "ka" => "か",
        "ki" => "き",
        "ku" => "く",
        "ke" => "け",
        "ko" => "こ",
        "ga" => "が",
        "gi" => "ぎ",
        "gu" => "ぐ",
        "ge" => "げ",
        "go" => "ご",
        "sa" => "さ",
        "si" => "し",
        "su" => "す",
        "se" => "せ",
        "so" => "そ",
        "za" => "ざ",
        "zi" => "じ",
        "zu" => "ず",
        "ze" => "ぜ",
        "zo" => "ぞ",
        "ta" => "た",
        "ti" => "ち",
        "tu" => "つ",
        "te" => "て",
        "to" => "と",
        "da" => "だ",
        "di" => "ぢ",
        "du" => "づ",
        "de" => "で",
        "do" => "ど",
        "na" => "な",
        "ni" => "に",
        "nu" => "ぬ",
        "ne" => "ね",
        "no" => "の",
        "ha" => "は",
        "hi" => "ひ",
        "hu" => "ふ",
        "he" => "へ",
        "ho" => "ほ",
        "ba" => "ば",
        "bi" => "び",
        "bu" => "ぶ",
        "be" => "べ",
        "bo" => "ぼ",
        "pa" => "ぱ",
        "pi" => "ぴ",
        "pu" => "ぷ",
        "pe" => "ぺ",
        "po" => "ぽ",
        "ma" => "ま",
        "mi" => "み",
        "mu" => "む",
        "me" => "め",
        "mo" => "も",
        "ya" => "や",
        "yu" => "ゆ",
        "yo" => "よ",
        "ra" => "ら",
        "ri" => "り",
        "ru" => "る",
        "re" => "れ",
        "ro" => "ろ",
        "wa" => "わ",
        "wi" => "うぃ",
        "we" => "うぇ",
        "wo" => "を",
        "fa" => "ふぁ",
        "fi" => "ふぃ",
        "fu" => "ふ",
        "fe" => "ふぇ",
        "fo" => "ふぉ",
        "ja" => "じゃ",
        "ji" => "じ",
        "ju" => "じゅ",
        "je" => "じぇ",
        "jo" => "じょ",
        "va" => "ゔぁ",
        "vi" => "ゔぃ",
        "vu" => "ゔ",
        "ve" => "ゔぇ",
        "vo" => "ゔぉ",

        "kya" => "きゃ",
        "kyu" => "きゅ",
        "kyo" => "きょ",
        "gya" => "ぎゃ",
        "gyu" => "ぎゅ",
        "gyo" => "ぎょ",
        "sha" => "しゃ",
        "shi" => "し",
        "shu" => "しゅ",
        "sho" => "しょ",
        "sya" => "しゃ",
        "syu" => "しゅ",
        "syo" => "しょ",
        "cha" => "ちゃ",
        "chi" => "ち",
        "chu" => "ちゅ",
        "cho" => "ちょ",
        "tya" => "ちゃ",
        "tyu" => "ちゅ",
        "tyo" => "ちょ",
        "tsu" => "つ",
        "nya" => "にゃ",
        "nyu" => "にゅ",
        "nyo" => "にょ",
        "hya" => "ひゃ",
        "hyu" => "ひゅ",
        "hyo" => "ひょ",
        "bya" => "びゃ",
        "byu" => "びゅ",
        "byo" => "びょ",
        "pya" => "ぴゃ",
        "pyu" => "ぴゅ",
        "pyo" => "ぴょ",
        "mya" => "みゃ",
        "myu" => "みゅ",
        "myo" => "みょ",
        "rya" => "りゃ",
        "ryu" => "りゅ",
        "ryo" => "りょ",
        "jya" => "じゃ",
        "jyu" => "じゅ",
        "jyo" => "じょ",
        "zya" => "じゃ",
        "zyu" => "じゅ",
        "zyo" => "じょ",

        _ => return None,
    };
    Some(kana)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_words() {
        assert_eq!(to_hiragana("ninja").as_deref(), Some("にんじゃ"));
        assert_eq!(to_hiragana("sakura").as_deref(), Some("さくら"));
        assert_eq!(to_hiragana("konnichiwa").as_deref(), Some("こんにちわ"));
    }

    #[test]
    fn test_sokuon() {
        assert_eq!(to_hiragana("kitte").as_deref(), Some("きって"));
        assert_eq!(to_hiragana("zasshi").as_deref(), Some("ざっし"));
    }

    #[test]
    fn test_trailing_n() {
        assert_eq!(to_hiragana("hon").as_deref(), Some("ほん"));
        assert_eq!(to_hiragana("sensei").as_deref(), Some("せんせい"));
    }

    #[test]
    fn test_youon() {
        assert_eq!(to_hiragana("kyoto").as_deref(), Some("きょと"));
        assert_eq!(to_hiragana("shashin").as_deref(), Some("しゃしん"));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(to_hiragana("Ninja"), to_hiragana("ninja"));
    }

    #[test]
    fn test_unconvertible_returns_none() {
        // 只有子音的串解释不通
        assert!(to_hiragana("qqq").is_none());
        assert!(to_hiragana("xyz").is_none());
    }
}
