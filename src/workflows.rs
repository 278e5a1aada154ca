// src/workflows.rs

use crate::{
    cli::ExportFormat,
    error::{AppError, AppResult},
    handler::PlatformRegistry,
    orchestrator::{BatchState, Orchestrator},
    storage, symbols, ui, utils,
};
use anyhow::anyhow;
use colored::*;
use log::{info, warn};
use std::path::Path;

pub(crate) fn list_platforms(registry: &PlatformRegistry) {
    ui::print_header("支持的平台");
    for platform in registry.platforms() {
        println!("  {} {}", *symbols::BULLET, platform);
    }
    println!("\n使用示例:");
    println!("  {} scrape-url https://reddit.com/r/python", clap::crate_name!());
    println!("  {} scrape-platform reddit url1 url2 url3", clap::crate_name!());
}

pub(crate) async fn scrape_url(
    orchestrator: &mut Orchestrator,
    url: &str,
    output: Option<&Path>,
) -> AppResult<()> {
    ui::info(&format!("正在抓取: {}", url));
    let outcome = orchestrator.scrape_one(url).await;
    ui::print_outcome(&outcome);

    if let Some(path) = output {
        save(orchestrator, path)?;
    }

    match outcome.error() {
        None => Ok(()),
        Some(_) if orchestrator.state() == BatchState::Aborted => Err(AppError::UserInterrupt),
        Some(err) => Err(AppError::Other(anyhow!("抓取失败: {}", err))),
    }
}

pub(crate) async fn scrape_urls(
    orchestrator: &mut Orchestrator,
    file: &Path,
    output: &Path,
    skip_errors: bool,
    workers: usize,
) -> AppResult<()> {
    let urls = utils::read_url_list(file)?;
    if urls.is_empty() {
        warn!("URL 文件 '{}' 为空或不含有效行。", file.display());
        return Err(AppError::UserInputError(format!(
            "{} 文件 '{}' 中没有找到任何链接。",
            *symbols::ERROR,
            file.display()
        )));
    }

    ui::print_header(&format!(
        "开始批量抓取 {} 个链接 (来自 {})",
        urls.len(),
        file.display()
    ));

    let outcomes = if skip_errors && workers > 1 {
        orchestrator.scrape_many_concurrent(&urls, workers).await
    } else {
        orchestrator.scrape_many(&urls, !skip_errors).await
    };
    for outcome in &outcomes {
        ui::print_outcome(outcome);
    }
    if outcomes.len() < urls.len() {
        ui::warn(&format!("{} 个链接未被处理。", urls.len() - outcomes.len()));
    }

    ui::print_summary(&Orchestrator::summary(&outcomes));
    save(orchestrator, output)?;

    if orchestrator.state() == BatchState::Aborted {
        if skip_errors || outcomes.iter().all(|o| o.is_success()) {
            return Err(AppError::UserInterrupt);
        }
        return Err(AppError::Other(anyhow!(
            "遇到失败的链接，批量任务已中止 (使用 --skip-errors 可继续处理)。"
        )));
    }
    Ok(())
}

pub(crate) async fn scrape_platform(
    orchestrator: &mut Orchestrator,
    platform: &str,
    urls: &[String],
    output: Option<&Path>,
) -> AppResult<()> {
    ui::print_header(&format!("使用平台 '{}' 抓取 {} 个链接", platform, urls.len()));
    let outcomes = orchestrator.scrape_platform(platform, urls).await?;
    for outcome in &outcomes {
        ui::print_outcome(outcome);
    }
    ui::print_summary(&Orchestrator::summary(&outcomes));

    if let Some(path) = output {
        save(orchestrator, path)?;
    }
    if orchestrator.state() == BatchState::Aborted {
        return Err(AppError::UserInterrupt);
    }
    Ok(())
}

pub(crate) fn show_summary(file: &Path) -> AppResult<()> {
    let document = storage::load_results(file)?;
    ui::print_summary(&document.summary);
    Ok(())
}

pub(crate) fn export_results(input: &Path, output: &Path, format: ExportFormat) -> AppResult<()> {
    let document = storage::load_results(input)?;
    match format {
        ExportFormat::Json => storage::export_json(&document, output)?,
        ExportFormat::Csv => storage::export_csv(&document, output)?,
    }
    let label = match format {
        ExportFormat::Json => "JSON",
        ExportFormat::Csv => "CSV",
    };
    println!(
        "{} {}",
        *symbols::OK,
        format!("已导出为 {}: {}", label, output.display()).green()
    );
    Ok(())
}

fn save(orchestrator: &Orchestrator, path: &Path) -> AppResult<()> {
    storage::save_results(path, orchestrator.outcomes(), orchestrator.results_summary())?;
    info!("结果文件: {}", path.display());
    ui::info(&format!("结果已保存至: {}", path.display()));
    Ok(())
}
