// src/testing.rs

//! 集成测试使用的替身实现，仅在 `testing` feature 下编译。

use crate::{
    client::Fetcher,
    error::{ParseError, ScrapeError},
    extractor::Extractor,
    handler::DomainHandler,
    models::Record,
};
use async_trait::async_trait;
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

/// 按 URL 预先编排响应的 fetcher。
///
/// 同一 URL 的多个响应按顺序依次返回，最后一个会一直重复。
/// 没有编排的 URL 返回 Network 错误。
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: Mutex<HashMap<String, VecDeque<Result<String, ScrapeError>>>>,
    calls: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn respond(self, url: &str, body: &str) -> Self {
        self.push(url, Ok(body.to_string()))
    }

    pub fn fail(self, url: &str, error: ScrapeError) -> Self {
        self.push(url, Err(error))
    }

    fn push(self, url: &str, response: Result<String, ScrapeError>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str, _timeout: Option<Duration>) -> Result<String, ScrapeError> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(ScrapeError::Network(format!("no response for {}", url)))),
            None => Err(ScrapeError::Network(format!("no response for {}", url))),
        }
    }
}

/// 把文档按非空行拆成记录
pub struct LineExtractor {
    platform: String,
}

impl LineExtractor {
    pub fn new(platform: &str) -> Self {
        Self {
            platform: platform.to_string(),
        }
    }
}

impl Extractor for LineExtractor {
    fn extract(&self, document: &str, source_url: &str) -> Result<Vec<Record>, ParseError> {
        if document.contains("<broken>") {
            return Err(ParseError("unexpected markup".to_string()));
        }
        Ok(document
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| Record::new(l, self.platform.as_str(), source_url))
            .collect())
    }
}

/// 认领 `domains` 的处理器，提取器为 [`LineExtractor`]
pub fn line_handler(platform: &str, domains: &[&str]) -> Arc<DomainHandler> {
    Arc::new(DomainHandler::new(
        platform,
        domains,
        Arc::new(LineExtractor::new(platform)),
    ))
}
