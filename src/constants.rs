// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const URL_TRUNCATE_LENGTH: usize = 60;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2000;
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;

/// 单个页面最多提取的记录数
pub const MAX_RECORDS_PER_DOCUMENT: usize = 100;

pub mod messages {
    pub const NO_SCRAPER: &str = "No scraper supports URL";
    pub const NO_CONTENT: &str = "No content retrieved from URL";
}

pub mod platforms {
    pub const REDDIT: &str = "reddit";
    pub const STACKOVERFLOW: &str = "stackoverflow";
    pub const MEDIUM: &str = "medium";
    pub const DEVTO: &str = "devto";
}
