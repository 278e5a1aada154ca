// src/storage.rs

use crate::{
    error::{AppError, AppResult},
    models::{BatchSummary, FetchOutcome, ResultsDocument},
};
use log::{debug, info};
use std::{fs, path::Path};

pub const CSV_HEADER: [&str; 4] = ["url", "success", "messages_count", "error"];

/// 把结果和汇总写成 JSON 结果文件
pub fn save_results(path: &Path, outcomes: &[FetchOutcome], summary: BatchSummary) -> AppResult<()> {
    let document = ResultsDocument {
        results: outcomes.to_vec(),
        summary,
    };
    export_json(&document, path)?;
    info!("已保存 {} 条结果到: {}", outcomes.len(), path.display());
    Ok(())
}

pub fn load_results(path: &Path) -> AppResult<ResultsDocument> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    if value.get("results").is_none() || value.get("summary").is_none() {
        return Err(AppError::InvalidResults(format!(
            "'{}' 缺少 results 或 summary 字段",
            path.display()
        )));
    }
    let document: ResultsDocument = serde_json::from_value(value)
        .map_err(|e| AppError::InvalidResults(format!("'{}': {}", path.display(), e)))?;
    debug!("从 '{}' 读取到 {} 条结果", path.display(), document.results.len());
    Ok(document)
}

pub fn export_json(document: &ResultsDocument, path: &Path) -> AppResult<()> {
    ensure_parent_dir(path)?;
    let json_content = serde_json::to_string_pretty(document)?;
    fs::write(path, json_content)?;
    Ok(())
}

pub fn export_csv(document: &ResultsDocument, path: &Path) -> AppResult<()> {
    ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_HEADER)?;
    for row in document.csv_rows() {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    info!("已导出 {} 行 CSV 到: {}", document.results.len(), path.display());
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
