// src/client/throttle.rs

use async_trait::async_trait;
use http::Extensions;
use log::debug;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::{
    sync::Mutex,
    time::{Instant, sleep},
};

/// 保证相邻两次请求之间至少间隔 `min_interval`。
///
/// 等待期间持有锁，多个 worker 共享同一个实例时请求也会被依次错开。
#[derive(Debug)]
pub struct RequestPacer {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
    issued: AtomicU64,
}

impl RequestPacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
            issued: AtomicU64::new(0),
        }
    }

    pub async fn wait_turn(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                debug!("限速: 等待 {:.2}s", remaining.as_secs_f64());
                sleep(remaining).await;
            }
        }
        *last = Some(Instant::now());
        self.issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }
}

pub struct ThrottleMiddleware {
    pacer: Arc<RequestPacer>,
}

impl ThrottleMiddleware {
    pub fn new(pacer: Arc<RequestPacer>) -> Self {
        Self { pacer }
    }
}

#[async_trait]
impl Middleware for ThrottleMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        self.pacer.wait_turn().await;
        next.run(req, extensions).await
    }
}
