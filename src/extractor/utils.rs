// src/extractor/utils.rs

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// 合并连续空白并去掉首尾空白
pub fn clean_text(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// 用户名的首字母缩写: "jane doe" -> "JD"，单个单词只取首字母
pub fn initials(name: &str) -> Option<String> {
    let initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if initials.is_empty() { None } else { Some(initials) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  hello \n\t world  "), "hello world");
        assert_eq!(clean_text("\n \n"), "");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("jane doe"), Some("JD".to_string()));
        assert_eq!(initials("  rustacean "), Some("R".to_string()));
        assert_eq!(initials("   "), None);
    }
}
