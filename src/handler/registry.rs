// src/handler/registry.rs

use super::{DomainHandler, Handler};
use crate::error::AppError;
use log::{debug, info};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Platform '{platform}' not supported. Supported: {supported}")]
    NotFound { platform: String, supported: String },
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// 平台标识到处理器的有序映射。
///
/// `resolve` 按注册顺序线性扫描，先注册的处理器优先认领 URL。
#[derive(Clone, Default)]
pub struct PlatformRegistry {
    entries: Vec<(String, Arc<dyn Handler>)>,
}

fn normalize_id(platform_id: &str) -> String {
    platform_id.trim().to_lowercase()
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 内置的全部平台: reddit, stackoverflow, medium, devto
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("reddit", Arc::new(DomainHandler::reddit()));
        registry.register("stackoverflow", Arc::new(DomainHandler::stackoverflow()));
        registry.register("medium", Arc::new(DomainHandler::medium()));
        registry.register("devto", Arc::new(DomainHandler::devto()));
        registry
    }

    /// 注册处理器。同名平台会被覆盖，但保留其原有的扫描位置。
    pub fn register(&mut self, platform_id: &str, handler: Arc<dyn Handler>) {
        let platform_id = normalize_id(platform_id);
        match self.entries.iter_mut().find(|(id, _)| *id == platform_id) {
            Some(entry) => {
                info!("覆盖平台处理器: {}", platform_id);
                entry.1 = handler;
            }
            None => {
                info!("注册平台处理器: {}", platform_id);
                self.entries.push((platform_id, handler));
            }
        }
    }

    pub fn unregister(&mut self, platform_id: &str) -> bool {
        let platform_id = normalize_id(platform_id);
        let before = self.entries.len();
        self.entries.retain(|(id, _)| *id != platform_id);
        before != self.entries.len()
    }

    /// 返回第一个能处理该 URL 的处理器
    pub fn resolve(&self, url: &str) -> Option<Arc<dyn Handler>> {
        let found = self
            .entries
            .iter()
            .find(|(_, handler)| handler.can_handle(url))
            .map(|(_, handler)| handler.clone());
        match &found {
            Some(handler) => debug!("URL '{}' 匹配平台: {}", url, handler.platform_id()),
            None => debug!("没有平台能处理 URL: {}", url),
        }
        found
    }

    /// 按平台标识直接查找，不做 URL 匹配
    pub fn get(&self, platform_id: &str) -> Result<Arc<dyn Handler>, RegistryError> {
        let platform_id = normalize_id(platform_id);
        self.entries
            .iter()
            .find(|(id, _)| *id == platform_id)
            .map(|(_, handler)| handler.clone())
            .ok_or_else(|| RegistryError::NotFound {
                platform: platform_id,
                supported: self.platforms().join(", "),
            })
    }

    pub fn contains(&self, platform_id: &str) -> bool {
        let platform_id = normalize_id(platform_id);
        self.entries.iter().any(|(id, _)| *id == platform_id)
    }

    /// 按注册顺序列出平台标识
    pub fn platforms(&self) -> Vec<&str> {
        self.entries.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
