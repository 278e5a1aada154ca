// src/config.rs

pub mod file;

use crate::{constants, error::AppResult};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub request_delay_ms: Option<u64>,
    pub user_agent: Option<String>,
}

/// `config.json` 的文件格式，所有字段都可以省略
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExternalConfig {
    #[serde(default)]
    pub network: NetworkConfig,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        // 写入磁盘的默认配置，方便用户直接修改
        Self {
            network: NetworkConfig {
                timeout_secs: Some(constants::DEFAULT_TIMEOUT_SECS),
                connect_timeout_secs: Some(constants::DEFAULT_CONNECT_TIMEOUT_SECS),
                max_retries: Some(constants::DEFAULT_MAX_RETRIES),
                retry_delay_ms: Some(constants::DEFAULT_RETRY_DELAY_MS),
                request_delay_ms: Some(constants::DEFAULT_REQUEST_DELAY_MS),
                user_agent: None,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// 首次请求之外的最大重试次数
    pub max_retries: u32,
    pub base_retry_delay: Duration,
    pub min_request_interval: Duration,
    pub user_agent: String,
    pub max_workers: usize,
}

impl AppConfig {
    /// 从配置文件加载，`path` 为空时使用用户主目录下的默认位置
    pub fn load(path: Option<&Path>, workers: Option<usize>) -> AppResult<Self> {
        let external_config = file::load_or_create_external_config(path)?;
        let mut config = Self::from_external(external_config);
        if let Some(workers) = workers {
            config.max_workers = workers.max(1);
        }
        Ok(config)
    }

    pub fn from_external(external_config: ExternalConfig) -> Self {
        let network = external_config.network;
        Self {
            timeout: Duration::from_secs(
                network.timeout_secs.unwrap_or(constants::DEFAULT_TIMEOUT_SECS),
            ),
            connect_timeout: Duration::from_secs(
                network
                    .connect_timeout_secs
                    .unwrap_or(constants::DEFAULT_CONNECT_TIMEOUT_SECS),
            ),
            max_retries: network.max_retries.unwrap_or(constants::DEFAULT_MAX_RETRIES),
            base_retry_delay: Duration::from_millis(
                network.retry_delay_ms.unwrap_or(constants::DEFAULT_RETRY_DELAY_MS),
            ),
            min_request_interval: Duration::from_millis(
                network
                    .request_delay_ms
                    .unwrap_or(constants::DEFAULT_REQUEST_DELAY_MS),
            ),
            user_agent: network
                .user_agent
                .unwrap_or_else(|| constants::USER_AGENT.to_string()),
            max_workers: 1,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_external(ExternalConfig::default())
    }
}
