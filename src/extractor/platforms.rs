// src/extractor/platforms.rs

use super::{Extractor, utils};
use crate::{
    constants::{self, platforms},
    error::ParseError,
    models::Record,
};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static TIME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("time[datetime]").unwrap());

/// 基于 CSS 选择器的通用提取器。
///
/// `content_selectors` 按顺序尝试，第一个有匹配的选择器生效。
/// 作者和时间从内容元素所在的祖先元素中就近查找。
pub struct SelectorExtractor {
    platform: String,
    content_selectors: Vec<Selector>,
    author_selector: Option<Selector>,
    limit: usize,
}

impl SelectorExtractor {
    pub fn new(
        platform: impl Into<String>,
        content_selectors: &[&str],
        author_selector: Option<&str>,
    ) -> Result<Self, ParseError> {
        let content_selectors = content_selectors
            .iter()
            .map(|css| parse_selector(css))
            .collect::<Result<Vec<_>, _>>()?;
        let author_selector = author_selector.map(parse_selector).transpose()?;

        Ok(Self {
            platform: platform.into(),
            content_selectors,
            author_selector,
            limit: constants::MAX_RECORDS_PER_DOCUMENT,
        })
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn reddit() -> Self {
        Self::builtin(
            platforms::REDDIT,
            &["div.md", r#"div[data-type="comment"]"#],
            ".author",
        )
    }

    pub fn stackoverflow() -> Self {
        Self::builtin(
            platforms::STACKOVERFLOW,
            &["div.s-prose", "div.post-text"],
            ".user-details a",
        )
    }

    pub fn medium() -> Self {
        Self::builtin(
            platforms::MEDIUM,
            &["article", "div.article-content"],
            ".author-name",
        )
    }

    pub fn devto() -> Self {
        Self::builtin(
            platforms::DEVTO,
            &["div.body", "div.comment__body"],
            ".user-profile",
        )
    }

    fn builtin(platform: &str, content: &[&str], author: &str) -> Self {
        Self::new(platform, content, Some(author)).unwrap()
    }

    fn find_author(&self, element: ElementRef<'_>) -> Option<String> {
        let selector = self.author_selector.as_ref()?;
        nearest_match(element, selector).map(|author| element_text(author))
    }
}

fn parse_selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError(format!("无效的选择器 '{}': {:?}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    utils::clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

/// 从元素自身开始向上查找，返回第一个包含匹配项的祖先中的匹配元素
fn nearest_match<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .find_map(|scope| scope.select(selector).next())
}

fn find_timestamp(element: ElementRef<'_>) -> Option<DateTime<Utc>> {
    let time = nearest_match(element, &TIME_SELECTOR)?;
    let raw = time.value().attr("datetime")?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| debug!("无法解析时间 '{}': {}", raw, e))
        .ok()
}

impl Extractor for SelectorExtractor {
    fn extract(&self, document: &str, source_url: &str) -> Result<Vec<Record>, ParseError> {
        if document.trim().is_empty() {
            return Err(ParseError("HTML content must be a non-empty string".to_string()));
        }

        let html = Html::parse_document(document);
        let elements: Vec<ElementRef<'_>> = self
            .content_selectors
            .iter()
            .map(|selector| html.select(selector).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default();

        let records: Vec<Record> = elements
            .into_iter()
            .take(self.limit)
            .filter_map(|element| {
                let content = element_text(element);
                if content.is_empty() {
                    return None;
                }
                let author_hint = self.find_author(element).and_then(|name| utils::initials(&name));
                Some(
                    Record::new(content, self.platform.as_str(), source_url)
                        .with_author_hint(author_hint)
                        .with_occurred_at(find_timestamp(element)),
                )
            })
            .collect();

        if records.is_empty() {
            warn!("未从 '{}' 提取到任何 {} 内容", source_url, self.platform);
        } else {
            debug!("从 '{}' 提取到 {} 条 {} 记录", source_url, records.len(), self.platform);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REDDIT_PAGE: &str = r#"
        <html><body>
          <div class="thing">
            <a class="author">jane doe</a>
            <time datetime="2024-03-01T10:00:00Z">1 hour ago</time>
            <div class="md"><p>Rust   is
              great</p></div>
          </div>
          <div class="thing">
            <a class="author">bob</a>
            <div class="md">   </div>
          </div>
        </body></html>"#;

    #[test]
    fn test_reddit_extracts_content_author_and_time() {
        let records = SelectorExtractor::reddit()
            .extract(REDDIT_PAGE, "https://reddit.com/r/rust/1")
            .unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.content(), "Rust is great");
        assert_eq!(record.author_hint(), Some("JD"));
        assert_eq!(record.platform(), "reddit");
        assert_eq!(record.source_url(), "https://reddit.com/r/rust/1");
        assert_eq!(
            record.occurred_at().map(|t| t.to_rfc3339()),
            Some("2024-03-01T10:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_falls_back_to_second_selector() {
        let page = r#"<html><body><div class="post-text">Use a Vec.</div></body></html>"#;
        let records = SelectorExtractor::stackoverflow()
            .extract(page, "https://stackoverflow.com/q/1")
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content(), "Use a Vec.");
        assert_eq!(records[0].author_hint(), None);
    }

    #[test]
    fn test_limit_caps_records() {
        let page: String = (0..5).map(|i| format!("<article>post {}</article>", i)).collect();
        let records = SelectorExtractor::medium()
            .with_limit(3)
            .extract(&page, "https://medium.com/a")
            .unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_empty_document_is_a_parse_error() {
        assert!(SelectorExtractor::devto().extract("  ", "https://dev.to/a").is_err());
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        assert!(SelectorExtractor::new("custom", &["div[["], None).is_err());
    }
}
