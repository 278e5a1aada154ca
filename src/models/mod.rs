// src/models/mod.rs

pub mod export;

use crate::error::ScrapeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use export::ResultsDocument;

/// 从页面中提取出的一条会话内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    content: String,
    author_hint: Option<String>,
    occurred_at: Option<DateTime<Utc>>,
    platform: String,
    source_url: String,
}

impl Record {
    pub fn new(
        content: impl Into<String>,
        platform: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            author_hint: None,
            occurred_at: None,
            platform: platform.into(),
            source_url: source_url.into(),
        }
    }

    pub fn with_author_hint(mut self, author_hint: Option<String>) -> Self {
        self.author_hint = author_hint;
        self
    }

    pub fn with_occurred_at(mut self, occurred_at: Option<DateTime<Utc>>) -> Self {
        self.occurred_at = occurred_at;
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author_hint(&self) -> Option<&str> {
        self.author_hint.as_deref()
    }

    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        self.occurred_at
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }
}

/// 单个 URL 的抓取结果。
///
/// 只能通过 [`FetchOutcome::succeeded`] 和 [`FetchOutcome::failed`] 构造，
/// 因此成功时 `error` 必为空，失败时 `record_count` 必为 0。
/// 从结果文件读入时同样检查这两条约束。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredOutcome")]
pub struct FetchOutcome {
    success: bool,
    #[serde(rename = "url")]
    source_url: String,
    #[serde(rename = "messages_count")]
    record_count: usize,
    error: Option<String>,
    #[serde(rename = "timestamp")]
    completed_at: DateTime<Utc>,
}

/// 结果文件中一条结果的原始形式，校验后才转换为 [`FetchOutcome`]
#[derive(Deserialize)]
struct StoredOutcome {
    success: bool,
    url: String,
    #[serde(default)]
    messages_count: usize,
    #[serde(default)]
    error: Option<String>,
    timestamp: DateTime<Utc>,
}

impl TryFrom<StoredOutcome> for FetchOutcome {
    type Error = String;

    fn try_from(raw: StoredOutcome) -> Result<Self, Self::Error> {
        if raw.success && raw.error.is_some() {
            return Err(format!("成功的结果不应带有 error: {}", raw.url));
        }
        if !raw.success && raw.messages_count != 0 {
            return Err(format!(
                "失败的结果不应有记录 (messages_count={}): {}",
                raw.messages_count, raw.url
            ));
        }
        Ok(Self {
            success: raw.success,
            source_url: raw.url,
            record_count: raw.messages_count,
            error: raw.error,
            completed_at: raw.timestamp,
        })
    }
}

impl FetchOutcome {
    pub fn succeeded(source_url: impl Into<String>, record_count: usize) -> Self {
        Self {
            success: true,
            source_url: source_url.into(),
            record_count,
            error: None,
            completed_at: Utc::now(),
        }
    }

    pub fn failed(source_url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            source_url: source_url.into(),
            record_count: 0,
            error: Some(error.into()),
            completed_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

/// 一次处理的完整产出：结果 + 提取到的记录
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub outcome: FetchOutcome,
    pub records: Vec<Record>,
}

impl ScrapeReport {
    pub fn success(source_url: &str, records: Vec<Record>) -> Self {
        Self {
            outcome: FetchOutcome::succeeded(source_url, records.len()),
            records,
        }
    }

    pub fn failure(source_url: &str, error: &ScrapeError) -> Self {
        Self {
            outcome: FetchOutcome::failed(source_url, error.to_string()),
            records: Vec::new(),
        }
    }
}

/// 由结果集合推导出的汇总，从不单独持久化
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    #[serde(rename = "total_urls")]
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    #[serde(rename = "total_messages")]
    pub total_records: usize,
    pub success_rate: f64,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[FetchOutcome]) -> Self {
        let total = outcomes.len();
        let successful = outcomes.iter().filter(|o| o.is_success()).count();
        let total_records = outcomes
            .iter()
            .filter(|o| o.is_success())
            .map(FetchOutcome::record_count)
            .sum();
        let success_rate = if total == 0 {
            0.0
        } else {
            successful as f64 / total as f64 * 100.0
        };

        Self {
            total,
            successful,
            failed: total - successful,
            total_records,
            success_rate,
        }
    }
}
