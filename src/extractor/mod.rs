// src/extractor/mod.rs

pub mod platforms;
mod utils;

pub use platforms::SelectorExtractor;

use crate::{error::ParseError, models::Record};

/// 把原始文档文本转换为记录列表。每次成功获取后只调用一次。
pub trait Extractor: Send + Sync {
    fn extract(&self, document: &str, source_url: &str) -> Result<Vec<Record>, ParseError>;
}

impl<F> Extractor for F
where
    F: Fn(&str, &str) -> Result<Vec<Record>, ParseError> + Send + Sync,
{
    fn extract(&self, document: &str, source_url: &str) -> Result<Vec<Record>, ParseError> {
        self(document, source_url)
    }
}
