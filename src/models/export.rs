// src/models/export.rs

use super::{BatchSummary, FetchOutcome};
use serde::{Deserialize, Serialize};

/// 结果文件的磁盘格式: `{ "results": [...], "summary": {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsDocument {
    pub results: Vec<FetchOutcome>,
    pub summary: BatchSummary,
}

impl ResultsDocument {
    pub fn new(results: Vec<FetchOutcome>) -> Self {
        let summary = BatchSummary::from_outcomes(&results);
        Self { results, summary }
    }

    /// CSV 投影的一行: url, success, messages_count, error
    pub fn csv_rows(&self) -> impl Iterator<Item = [String; 4]> + '_ {
        self.results.iter().map(|r| {
            [
                r.source_url().to_string(),
                r.is_success().to_string(),
                r.record_count().to_string(),
                r.error().unwrap_or_default().to_string(),
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_uses_storage_field_names() {
        let doc = ResultsDocument::new(vec![
            FetchOutcome::succeeded("https://reddit.com/r/rust", 3),
            FetchOutcome::failed("https://example.com", "No scraper supports URL"),
        ]);
        let value = serde_json::to_value(&doc).unwrap();

        let first = &value["results"][0];
        assert_eq!(first["url"], "https://reddit.com/r/rust");
        assert_eq!(first["messages_count"], 3);
        assert!(first["error"].is_null());
        assert!(first["timestamp"].is_string());

        assert_eq!(value["summary"]["total_urls"], 2);
        assert_eq!(value["summary"]["total_messages"], 3);
        assert_eq!(value["summary"]["success_rate"], 50.0);

        let restored: ResultsDocument = serde_json::from_value(value).unwrap();
        assert_eq!(restored, doc);
    }

    #[test]
    fn test_csv_rows_leave_error_empty_on_success() {
        let doc = ResultsDocument::new(vec![FetchOutcome::succeeded("https://dev.to/a", 2)]);
        let rows: Vec<_> = doc.csv_rows().collect();
        assert_eq!(rows[0], ["https://dev.to/a", "true", "2", ""].map(String::from));
    }
}
