// src/orchestrator.rs

use crate::{
    client::Fetcher,
    constants::messages,
    error::{AppError, AppResult, ScrapeError},
    handler::{self, PlatformRegistry},
    models::{BatchSummary, FetchOutcome, Record, ScrapeReport},
};
use futures::{StreamExt, stream};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// 批处理状态: `Idle -> Running -> {Completed, Aborted}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Running,
    Completed,
    Aborted,
}

/// 负责把 URL 分派给处理器并汇总结果。
///
/// 所有单个 URL 的失败都会变成 `success == false` 的结果，
/// 唯一向调用方返回错误的情况是 `scrape_platform` 的平台未注册。
pub struct Orchestrator {
    registry: Arc<PlatformRegistry>,
    fetcher: Arc<dyn Fetcher>,
    cancellation: CancellationToken,
    state: BatchState,
    outcomes: Vec<FetchOutcome>,
    records: Vec<Record>,
}

impl Orchestrator {
    pub fn new(registry: PlatformRegistry, fetcher: Arc<dyn Fetcher>) -> Self {
        info!("Orchestrator 初始化，已注册平台: {}", registry.platforms().join(", "));
        Self {
            registry: Arc::new(registry),
            fetcher,
            cancellation: CancellationToken::new(),
            state: BatchState::Idle,
            outcomes: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// 自创建或上次 `reset` 以来的全部结果
    pub fn outcomes(&self) -> &[FetchOutcome] {
        &self.outcomes
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn reset(&mut self) {
        self.outcomes.clear();
        self.records.clear();
        self.state = BatchState::Idle;
        info!("Orchestrator 已重置");
    }

    pub fn summary(outcomes: &[FetchOutcome]) -> BatchSummary {
        BatchSummary::from_outcomes(outcomes)
    }

    pub fn results_summary(&self) -> BatchSummary {
        Self::summary(&self.outcomes)
    }

    pub async fn scrape_one(&mut self, url: &str) -> FetchOutcome {
        self.state = BatchState::Running;
        let outcome = if self.cancellation.is_cancelled() {
            self.keep(ScrapeReport::failure(url, &ScrapeError::Cancelled))
        } else {
            self.attempt(url).await
        };
        self.finish(false);
        outcome
    }

    /// 按顺序处理一批 URL。
    ///
    /// `fail_fast` 为真时，遇到第一个失败就停止，之后的 URL 不会出现在结果中。
    pub async fn scrape_many<S: AsRef<str>>(&mut self, urls: &[S], fail_fast: bool) -> Vec<FetchOutcome> {
        info!("开始处理 {} 个 URL (fail_fast={})", urls.len(), fail_fast);
        self.state = BatchState::Running;

        let mut batch = Vec::with_capacity(urls.len());
        let mut aborted = false;
        for (idx, url) in urls.iter().enumerate() {
            let url = url.as_ref();
            if self.cancellation.is_cancelled() {
                warn!("批处理已取消，剩余 {} 个 URL 未处理", urls.len() - idx);
                aborted = true;
                break;
            }
            debug!("处理 URL {}/{}: {}", idx + 1, urls.len(), url);
            let outcome = self.attempt(url).await;
            let failed = !outcome.is_success();
            batch.push(outcome);
            if failed && fail_fast {
                warn!("URL '{}' 失败，fail-fast 模式下停止，剩余 {} 个 URL 未处理", url, urls.len() - idx - 1);
                aborted = true;
                break;
            }
        }

        self.finish(aborted);
        log_batch_summary(&batch);
        batch
    }

    /// 用指定平台的处理器处理所有 URL，总是尝试全部 URL。
    ///
    /// 平台未注册时在发起任何请求之前返回 `AppError::Configuration`。
    pub async fn scrape_platform<S: AsRef<str>>(
        &mut self,
        platform_id: &str,
        urls: &[S],
    ) -> AppResult<Vec<FetchOutcome>> {
        let handler = self.registry.get(platform_id).map_err(|e| {
            error!("{}", e);
            AppError::from(e)
        })?;

        info!("开始处理平台 '{}' 的 {} 个 URL", handler.platform_id(), urls.len());
        self.state = BatchState::Running;

        let mut batch = Vec::with_capacity(urls.len());
        let mut aborted = false;
        for (idx, url) in urls.iter().enumerate() {
            if self.cancellation.is_cancelled() {
                warn!("批处理已取消，剩余 {} 个 URL 未处理", urls.len() - idx);
                aborted = true;
                break;
            }
            let url = url.as_ref();
            debug!("处理 {} URL {}/{}: {}", handler.platform_id(), idx + 1, urls.len(), url);
            let report =
                handler::process(handler.as_ref(), self.fetcher.as_ref(), url, &self.cancellation).await;
            batch.push(self.keep(report));
        }

        self.finish(aborted);
        log_batch_summary(&batch);
        Ok(batch)
    }

    /// 多个 worker 并发处理，失败不会中断批处理，结果顺序与输入一致。
    ///
    /// 所有 worker 共享同一个 fetcher，因此仍然遵守请求间隔。
    pub async fn scrape_many_concurrent<S: AsRef<str>>(
        &mut self,
        urls: &[S],
        workers: usize,
    ) -> Vec<FetchOutcome> {
        let workers = workers.max(1);
        info!("开始并发处理 {} 个 URL (workers={})", urls.len(), workers);
        self.state = BatchState::Running;

        let registry = Arc::clone(&self.registry);
        let fetcher = Arc::clone(&self.fetcher);
        let cancellation = self.cancellation.clone();

        let reports: Vec<Option<ScrapeReport>> = stream::iter(urls.iter().map(|u| u.as_ref().to_string()))
            .map(|url| {
                let registry = Arc::clone(&registry);
                let fetcher = Arc::clone(&fetcher);
                let cancellation = cancellation.clone();
                async move {
                    if cancellation.is_cancelled() {
                        return None;
                    }
                    Some(resolve_and_process(&registry, fetcher.as_ref(), &url, &cancellation).await)
                }
            })
            .buffered(workers)
            .collect()
            .await;

        let batch: Vec<FetchOutcome> = reports
            .into_iter()
            .flatten()
            .map(|report| self.keep(report))
            .collect();

        self.finish(batch.len() < urls.len());
        log_batch_summary(&batch);
        batch
    }

    async fn attempt(&mut self, url: &str) -> FetchOutcome {
        let report =
            resolve_and_process(&self.registry, self.fetcher.as_ref(), url, &self.cancellation).await;
        self.keep(report)
    }

    fn keep(&mut self, report: ScrapeReport) -> FetchOutcome {
        self.records.extend(report.records);
        self.outcomes.push(report.outcome.clone());
        report.outcome
    }

    fn finish(&mut self, aborted: bool) {
        self.state = if aborted || self.cancellation.is_cancelled() {
            BatchState::Aborted
        } else {
            BatchState::Completed
        };
        debug!("批处理结束，状态: {:?}", self.state);
    }
}

async fn resolve_and_process(
    registry: &PlatformRegistry,
    fetcher: &dyn Fetcher,
    url: &str,
    cancellation: &CancellationToken,
) -> ScrapeReport {
    match registry.resolve(url) {
        Some(handler) => handler::process(handler.as_ref(), fetcher, url, cancellation).await,
        None => {
            warn!("{}: {}", messages::NO_SCRAPER, url);
            ScrapeReport::failure(url, &ScrapeError::Validation(messages::NO_SCRAPER.to_string()))
        }
    }
}

fn log_batch_summary(batch: &[FetchOutcome]) {
    let summary = BatchSummary::from_outcomes(batch);
    info!(
        "批处理完成: 共 {} 个, 成功 {}, 失败 {}, 记录 {}",
        summary.total, summary.successful, summary.failed, summary.total_records
    );
}
