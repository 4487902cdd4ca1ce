//! 台词目录
//!
//! 机器人发往文字频道的台词统一从目录取出，
//! 台词内的 `$0` `$1` … 占位符在取出时替换为调用方给出的参数。

use regex::Regex;
use std::collections::HashMap;

/// 内置台词（目录文档缺失对应条目时不使用，名字未知一律返回空串）
const BUILTIN_SERIFS: &[(&str, &str)] = &[
    ("start_reading", "$0 の読み上げを始めるわ"),
    ("already_reading", "もう $0 を読み上げているわよ"),
    ("leave_voice_channel", "ボイスチャンネルから抜けるわね。お疲れ様"),
    (
        "auto_join_enable",
        "$0 への接続を監視して、$1 を自動で読み上げるようにしたわ",
    ),
    ("auto_join_disable", "自動参加をやめておくわね"),
    (
        "auto_join_need_voice",
        "$0 自動参加の設定はVCに入った状態でやってちょうだい",
    ),
    ("status_change", "$0 $1 を $2 から $3 に変えたわ"),
    ("show_user_status", "$0 の読み上げ設定はこんな感じよ"),
    ("voice_not_exist", "$0 そのボイスは知らないわ…"),
    ("complete_word_add", "「$0」は「$1」と読むのね。覚えたわ"),
    ("error_word_add", "$0wa 単語 読み の形式で登録してちょうだい"),
    ("complete_word_delete", "「$0」の読みを忘れたわ"),
    ("error_word_delete", "$0wd 単語 の形式で削除してちょうだい"),
    ("show_word_list", "覚えている読みの一覧よ"),
    ("stop_nothing", "何も喋ってないわ。作業に集中しましょ"),
    ("not_in_voice", "私を呼ぶ時はVCに入った状態で呼んで"),
    ("not_connected", "VCにいないわ…"),
    ("quiz_start", "イントロクイズを開始するわ。（全$0問）"),
    (
        "quiz_panel",
        "このメッセージにスタンプを押すことで操作できるわ。\n🔁でもう一度再生、➡で次の問題へ",
    ),
    ("quiz_answer", "正解はこれよ。（$0/$1問）\n$2"),
    ("quiz_finished", "問題は全て終了したわ。お疲れ様。\n$0"),
    ("quiz_empty", "出題できる曲が見つからなかったわ"),
];

/// 台词目录
#[derive(Debug, Clone)]
pub struct SerifCatalog {
    lines: HashMap<String, String>,
    placeholder: Regex,
}

impl SerifCatalog {
    /// 从名字→台词映射构建目录
    pub fn new(lines: HashMap<String, String>) -> Self {
        Self {
            lines,
            placeholder: Regex::new(r"\$(\d+)").unwrap(),
        }
    }

    /// 内置台词目录
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_SERIFS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// 以内置台词为底，叠加外部目录文档中的台词
    pub fn builtin_overlaid(overlay: HashMap<String, String>) -> Self {
        let mut catalog = Self::builtin();
        catalog.lines.extend(overlay);
        catalog
    }

    /// 取出台词并替换占位符
    ///
    /// 未登记的名字返回空串；参数范围外的占位符原样保留
    pub fn render(&self, name: &str, args: &[&str]) -> String {
        let Some(line) = self.lines.get(name) else {
            return String::new();
        };

        self.placeholder
            .replace_all(line, |caps: &regex::Captures<'_>| {
                let index: usize = caps[1].parse().unwrap_or(usize::MAX);
                match args.get(index) {
                    Some(arg) => (*arg).to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_args() {
        let catalog = SerifCatalog::builtin();
        let line = catalog.render("start_reading", &["#general"]);
        assert!(line.contains("#general"));
        assert!(!line.contains("$0"));
    }

    #[test]
    fn test_unknown_name_renders_empty() {
        let catalog = SerifCatalog::builtin();
        assert_eq!(catalog.render("no_such_serif", &[]), "");
    }

    #[test]
    fn test_out_of_range_placeholder_kept() {
        let mut lines = HashMap::new();
        lines.insert("two_slots".to_string(), "$0 と $1".to_string());
        let catalog = SerifCatalog::new(lines);

        assert_eq!(catalog.render("two_slots", &["a"]), "a と $1");
    }

    #[test]
    fn test_overlay_replaces_builtin() {
        let mut overlay = HashMap::new();
        overlay.insert("start_reading".to_string(), "reading $0".to_string());
        let catalog = SerifCatalog::builtin_overlaid(overlay);

        assert_eq!(catalog.render("start_reading", &["here"]), "reading here");
        // 内置条目仍然可用
        assert!(!catalog.render("auto_join_disable", &[]).is_empty());
    }

    #[test]
    fn test_argument_containing_placeholder_not_rescanned() {
        let mut lines = HashMap::new();
        lines.insert("echo".to_string(), "$0 $1".to_string());
        let catalog = SerifCatalog::new(lines);

        // 单趟替换，参数里的 $1 不会被二次展开
        assert_eq!(catalog.render("echo", &["$1", "x"]), "$1 x");
    }
}
