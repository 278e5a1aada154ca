// src/client.rs

pub mod throttle;

use self::throttle::{RequestPacer, ThrottleMiddleware};
use crate::{config::AppConfig, error::*};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
    Jitter, RetryTransientMiddleware, Retryable, RetryableStrategy, default_on_request_failure,
    policies::ExponentialBackoff,
};
use std::{sync::Arc, time::Duration};

/// 处理器获取原始文档所经过的接口
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// 获取 `url` 的文本内容。`timeout` 为空时使用配置的默认超时。
    async fn fetch(&self, url: &str, timeout: Option<Duration>) -> Result<String, ScrapeError>;
}

/// 带限速与指数退避重试的 HTTP 客户端。
///
/// 中间件顺序: 重试层在外，限速层在内，因此每一次尝试（包括重试）都会经过限速。
/// 瞬时错误（超时、连接失败、5xx、429）会被重试，其余 4xx 立即失败。
#[derive(Clone)]
pub struct ResilientFetcher {
    client: ClientWithMiddleware,
    pacer: Arc<RequestPacer>,
    timeout: Duration,
}

impl ResilientFetcher {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let pacer = Arc::new(RequestPacer::new(config.min_request_interval));

        // 第 n 次重试前等待 base_retry_delay * 2^(n-1)，不加抖动
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(config.base_retry_delay, max_backoff(config))
            .jitter(Jitter::None)
            .base(2)
            .build_with_max_retries(config.max_retries);

        let inner = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;

        let client = ClientBuilder::new(inner)
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                retry_policy,
                TransientFailures,
            ))
            .with(ThrottleMiddleware::new(pacer.clone()))
            .build();

        debug!(
            "创建 ResilientFetcher: timeout={:?}, max_retries={}, base_retry_delay={:?}, min_request_interval={:?}",
            config.timeout, config.max_retries, config.base_retry_delay, config.min_request_interval
        );
        Ok(Self {
            client,
            pacer,
            timeout: config.timeout,
        })
    }

    /// 已经发出的请求次数（每次重试都计入）
    pub fn attempts(&self) -> u64 {
        self.pacer.issued()
    }
}

/// 只有 5xx、429 和传输层的超时/连接失败会被重试
struct TransientFailures;

impl RetryableStrategy for TransientFailures {
    fn handle(&self, res: &Result<Response, reqwest_middleware::Error>) -> Option<Retryable> {
        match res {
            Ok(response) => classify_status(response.status()),
            Err(err) => default_on_request_failure(err),
        }
    }
}

fn classify_status(status: StatusCode) -> Option<Retryable> {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        Some(Retryable::Transient)
    } else if status.is_client_error() {
        Some(Retryable::Fatal)
    } else {
        None
    }
}

fn max_backoff(config: &AppConfig) -> Duration {
    let factor = 2u32.saturating_pow(config.max_retries);
    config
        .base_retry_delay
        .saturating_mul(factor)
        .max(config.base_retry_delay)
}

#[async_trait]
impl Fetcher for ResilientFetcher {
    async fn fetch(&self, url: &str, timeout: Option<Duration>) -> Result<String, ScrapeError> {
        let timeout = timeout.unwrap_or(self.timeout);
        debug!("GET 请求: {}", url);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| match e {
                reqwest_middleware::Error::Reqwest(err) => describe_request_error(url, timeout, &err),
                // 重试耗尽后错误被包装过一层，取出最后一次的底层原因
                reqwest_middleware::Error::Middleware(err) => match last_request_error(&err) {
                    Some(inner) => describe_request_error(url, timeout, inner),
                    None => ScrapeError::Network(format!("Request failed for {}: {}", url, err)),
                },
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP 错误 {} : {}", status, url);
            return Err(ScrapeError::Network(format!(
                "HTTP {} error for {}",
                status.as_u16(),
                url
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| describe_request_error(url, timeout, &e))?;
        info!("成功获取: {} (status: {})", url, status);
        Ok(body)
    }
}

fn last_request_error(err: &anyhow::Error) -> Option<&reqwest::Error> {
    err.chain().find_map(|cause| {
        cause.downcast_ref::<reqwest::Error>().or_else(|| {
            match cause.downcast_ref::<reqwest_middleware::Error>() {
                Some(reqwest_middleware::Error::Reqwest(inner)) => Some(inner),
                _ => None,
            }
        })
    })
}

fn describe_request_error(url: &str, timeout: Duration, err: &reqwest::Error) -> ScrapeError {
    warn!("请求 '{}' 失败: {}", url, err);
    let reason = if err.is_timeout() {
        format!("Request to {} timed out after {}s", url, timeout.as_secs_f64())
    } else if err.is_connect() {
        format!("Failed to connect to {}", url)
    } else {
        format!("Request failed for {}: {}", url, err)
    };
    ScrapeError::Network(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_server_errors_and_rate_limits_are_transient() {
        for code in [500u16, 502, 503, 504, 429] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(matches!(classify_status(status), Some(Retryable::Transient)), "{}", code);
        }
        for code in [400u16, 401, 403, 404, 408, 410] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(matches!(classify_status(status), Some(Retryable::Fatal)), "{}", code);
        }
        assert!(classify_status(StatusCode::OK).is_none());
    }
}
