// src/error.rs

use thiserror::Error;

/// 整个调用级别的错误，只在无法继续执行时抛出。
#[derive(Error, Debug)]
pub enum AppError {
    #[error("配置错误: {0}")]
    Configuration(String),
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV 写入错误: {0}")]
    Csv(#[from] csv::Error),
    #[error("结果文件格式无效: {0}")]
    InvalidResults(String),
    #[error("用户中断")]
    UserInterrupt,
    #[error("{0}")] // 只打印内部信息，不加任何前缀
    UserInputError(String),
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// 单个 URL 的失败类型。这些错误从不向批处理调用方抛出，
/// 而是被转换成 `success == false` 的 `FetchOutcome`。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Network(String),
    #[error("Parsing failed: {0}")]
    Parse(String),
    #[error("Operation cancelled")]
    Cancelled,
}

impl ScrapeError {
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::Validation(_) => "validation",
            ScrapeError::Network(_) => "network",
            ScrapeError::Parse(_) => "parse",
            ScrapeError::Cancelled => "cancelled",
        }
    }
}

/// 提取器返回的解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ParseError(pub String);

impl From<ParseError> for ScrapeError {
    fn from(err: ParseError) -> Self {
        ScrapeError::Parse(err.0)
    }
}
