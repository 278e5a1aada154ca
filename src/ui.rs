// src/ui.rs

use crate::{
    constants,
    models::{BatchSummary, FetchOutcome},
    symbols, utils,
};
use chrono::Local;
use colored::*;

pub fn print_header(title: &str) {
    println!("\n{}", "═".repeat(constants::UI_WIDTH));
    println!(" {}", title.cyan().bold());
    println!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn box_message(title: &str, content: &[&str], color_func: fn(ColoredString) -> ColoredString) {
    println!("\n┌{}┐", "─".repeat(constants::UI_WIDTH - 2));
    println!("  {}", color_func(title.bold()));
    println!("├{}┤", "─".repeat(constants::UI_WIDTH - 2));
    for line in content {
        println!("  {}", line);
    }
    println!("└{}┘", "─".repeat(constants::UI_WIDTH - 2));
}

pub fn info(message: &str) {
    println!("{} {}", *symbols::INFO, message);
}

pub fn warn(message: &str) {
    eprintln!("{} {}", *symbols::WARN, message.yellow());
}

/// 单个 URL 的结果行
pub fn print_outcome(outcome: &FetchOutcome) {
    let url = utils::truncate_text(outcome.source_url(), constants::URL_TRUNCATE_LENGTH);
    let finished = outcome.completed_at().with_timezone(&Local).format("%H:%M:%S");
    if outcome.is_success() {
        println!(
            "{} [{}] {} ({} 条记录)",
            *symbols::OK,
            finished,
            url,
            outcome.record_count().to_string().green()
        );
    } else {
        println!(
            "{} [{}] {} - {}",
            *symbols::ERROR,
            finished,
            url,
            outcome.error().unwrap_or("未知错误").red()
        );
    }
}

pub fn print_summary(summary: &BatchSummary) {
    let failed = format!("失败:       {}", summary.failed);
    let lines = [
        format!("URL 总数:   {}", summary.total),
        format!("{}", format!("成功:       {}", summary.successful).green()),
        format!(
            "{}",
            if summary.failed > 0 { failed.red() } else { failed.green() }
        ),
        format!("记录总数:   {}", summary.total_records),
        format!("成功率:     {:.1}%", summary.success_rate),
    ];
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    box_message("抓取汇总", &lines, |s| s.cyan());
}
