// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod storage;
pub mod symbols;
pub mod ui;
pub mod utils;
mod workflows;

#[cfg(feature = "testing")]
pub mod testing;

use crate::{
    cli::{Cli, Command},
    client::ResilientFetcher,
    config::AppConfig,
    error::AppResult,
    handler::PlatformRegistry,
    orchestrator::Orchestrator,
};
use log::debug;
use std::{path::Path, sync::Arc};
use tokio_util::sync::CancellationToken;

/// 用内置平台和真实的 HTTP 客户端组装 Orchestrator
pub fn build_orchestrator(
    config: &AppConfig,
    cancellation: CancellationToken,
) -> AppResult<Orchestrator> {
    let fetcher = Arc::new(ResilientFetcher::new(config)?);
    Ok(Orchestrator::new(PlatformRegistry::with_defaults(), fetcher).with_cancellation(cancellation))
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>, cancellation: CancellationToken) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);
    let config_path = args.config.as_deref();

    match &args.command {
        Command::ListPlatforms => {
            workflows::list_platforms(&PlatformRegistry::with_defaults());
            Ok(())
        }
        Command::ScrapeUrl { url, output } => {
            let mut orchestrator = network_orchestrator(config_path, None, cancellation)?;
            workflows::scrape_url(&mut orchestrator, url, output.as_deref()).await
        }
        Command::ScrapeUrls {
            file,
            output,
            skip_errors,
            workers,
        } => {
            let config = load_config(config_path, *workers)?;
            let mut orchestrator = build_orchestrator(&config, cancellation)?;
            workflows::scrape_urls(&mut orchestrator, file, output, *skip_errors, config.max_workers)
                .await
        }
        Command::ScrapePlatform {
            platform,
            urls,
            output,
        } => {
            let mut orchestrator = network_orchestrator(config_path, None, cancellation)?;
            workflows::scrape_platform(&mut orchestrator, platform, urls, output.as_deref()).await
        }
        Command::ShowSummary { file } => workflows::show_summary(file),
        Command::ExportResults {
            input,
            output,
            format,
        } => workflows::export_results(input, output, *format),
    }
}

fn load_config(path: Option<&Path>, workers: Option<usize>) -> AppResult<AppConfig> {
    let config = AppConfig::load(path, workers)?;
    debug!("加载的应用配置: {:?}", config);
    Ok(config)
}

fn network_orchestrator(
    path: Option<&Path>,
    workers: Option<usize>,
    cancellation: CancellationToken,
) -> AppResult<Orchestrator> {
    let config = load_config(path, workers)?;
    build_orchestrator(&config, cancellation)
}
