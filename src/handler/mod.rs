// src/handler/mod.rs

//! 平台处理器。
//!
//! 每个平台只提供三处差异：URL 判定、实际请求地址和提取器；
//! 处理流程本身由 [`process`] 统一实现：
//!
//! 1. 校验 URL（格式错误或不被认领时返回 Validation 失败）
//! 2. 通过 [`Fetcher`] 获取原始文档（重试耗尽时返回 Network 失败）
//! 3. 调用提取器（任何错误都转换为 Parse 失败）
//! 4. 把记录包装为成功的 `FetchOutcome`

mod domain;
mod registry;

pub use domain::DomainHandler;
pub use registry::{PlatformRegistry, RegistryError};

use crate::{
    client::Fetcher,
    constants::messages,
    error::ScrapeError,
    extractor::Extractor,
    models::{Record, ScrapeReport},
};
use log::{info, warn};
use tokio_util::sync::CancellationToken;
use url::Url;

pub trait Handler: Send + Sync {
    fn platform_id(&self) -> &str;

    fn can_handle(&self, url: &str) -> bool;

    /// 实际请求的地址，默认就是输入的 URL
    fn fetch_target(&self, url: &Url) -> Url {
        url.clone()
    }

    fn extractor(&self) -> &dyn Extractor;
}

/// 对单个 URL 执行一次完整处理。每次调用最多发起一次获取，从不 panic 或抛错。
pub async fn process(
    handler: &dyn Handler,
    fetcher: &dyn Fetcher,
    url: &str,
    cancellation: &CancellationToken,
) -> ScrapeReport {
    info!("[{}] 开始处理: {}", handler.platform_id(), url);
    match run_steps(handler, fetcher, url, cancellation).await {
        Ok(records) => {
            info!("[{}] 成功提取 {} 条记录: {}", handler.platform_id(), records.len(), url);
            ScrapeReport::success(url, records)
        }
        Err(e) => {
            warn!("[{}] 处理失败 ({}): {} - {}", handler.platform_id(), e.kind(), url, e);
            ScrapeReport::failure(url, &e)
        }
    }
}

async fn run_steps(
    handler: &dyn Handler,
    fetcher: &dyn Fetcher,
    url: &str,
    cancellation: &CancellationToken,
) -> Result<Vec<Record>, ScrapeError> {
    let parsed = validate(handler, url)?;
    let target = handler.fetch_target(&parsed);

    let document = tokio::select! {
        biased;
        _ = cancellation.cancelled() => Err(ScrapeError::Cancelled),
        result = fetcher.fetch(target.as_str(), None) => result,
    }?;

    if document.trim().is_empty() {
        return Err(ScrapeError::Parse(messages::NO_CONTENT.to_string()));
    }

    handler
        .extractor()
        .extract(&document, url)
        .map_err(ScrapeError::from)
}

fn validate(handler: &dyn Handler, url: &str) -> Result<Url, ScrapeError> {
    let parsed = Url::parse(url)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .ok_or_else(|| ScrapeError::Validation(format!("Invalid URL: {}", url)))?;
    if !handler.can_handle(url) {
        return Err(ScrapeError::Validation(format!(
            "This scraper does not support URL: {}",
            url
        )));
    }
    Ok(parsed)
}
