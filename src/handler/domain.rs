// src/handler/domain.rs

use super::Handler;
use crate::{
    constants::platforms,
    extractor::{Extractor, SelectorExtractor},
    utils,
};
use std::sync::Arc;

/// 按域名认领 URL 的处理器，`www.` 前缀不参与比较
pub struct DomainHandler {
    platform_id: String,
    domains: Vec<String>,
    extractor: Arc<dyn Extractor>,
}

impl DomainHandler {
    pub fn new(platform_id: impl Into<String>, domains: &[&str], extractor: Arc<dyn Extractor>) -> Self {
        Self {
            platform_id: platform_id.into(),
            domains: domains.iter().map(|d| utils::normalize_domain(d)).collect(),
            extractor,
        }
    }

    pub fn reddit() -> Self {
        Self::new(
            platforms::REDDIT,
            &["reddit.com", "old.reddit.com"],
            Arc::new(SelectorExtractor::reddit()),
        )
    }

    pub fn stackoverflow() -> Self {
        Self::new(
            platforms::STACKOVERFLOW,
            &["stackoverflow.com"],
            Arc::new(SelectorExtractor::stackoverflow()),
        )
    }

    pub fn medium() -> Self {
        Self::new(
            platforms::MEDIUM,
            &["medium.com"],
            Arc::new(SelectorExtractor::medium()),
        )
    }

    pub fn devto() -> Self {
        Self::new(
            platforms::DEVTO,
            &["dev.to"],
            Arc::new(SelectorExtractor::devto()),
        )
    }
}

impl Handler for DomainHandler {
    fn platform_id(&self) -> &str {
        &self.platform_id
    }

    fn can_handle(&self, url: &str) -> bool {
        utils::extract_domain(url).is_some_and(|domain| self.domains.contains(&domain))
    }

    fn extractor(&self) -> &dyn Extractor {
        self.extractor.as_ref()
    }
}
