// src/utils.rs

use crate::error::AppResult;
use std::path::Path;
use url::Url;

/// 小写并去掉 `www.` 前缀
pub fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim().to_lowercase();
    domain
        .strip_prefix("www.")
        .map(str::to_string)
        .unwrap_or(domain)
}

/// 从 URL 中提取用于平台匹配的域名，无法解析时返回 None
pub fn extract_domain(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    url.host_str().map(normalize_domain)
}

/// 读取 URL 列表文件：每行一个，忽略空行和 `#` 开头的注释
pub fn read_url_list(path: &Path) -> AppResult<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        log::error!("读取 URL 文件 '{}' 失败: {}", path.display(), e);
        e
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with('#'))
        .map(str::to_string)
        .collect())
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}
