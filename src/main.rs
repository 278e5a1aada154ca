// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use std::{env, sync::Arc, time::Duration};
use thinkscraper::{cli::Cli, error::AppError, logging, run_from_cli};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "thinkscraper".to_string());
    let after_help = format!(
        "示例:\n  # 列出支持的平台\n  {bin} list-platforms\n\n  # 抓取单个链接并保存\n  {bin} scrape-url \"https://reddit.com/r/python\" -o result.json\n\n  # 批量抓取，失败时继续\n  {bin} scrape-urls urls.txt -o results.json --skip-errors\n\n  # 导出为 CSV\n  {bin} export-results results.json results.csv --format csv",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };

    let log_path = args.log_file.clone().unwrap_or_else(logging::default_log_path);
    if let Err(e) = logging::setup_logging(args.log_level.into(), &log_path) {
        eprintln!("{} 无法写入日志文件 {}: {}", "[!]".yellow(), log_path.display(), e);
    }

    // 第一次 Ctrl+C 请求取消，第二次直接退出
    let cancellation = CancellationToken::new();
    let signal_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        log::warn!("收到 Ctrl+C，正在取消剩余任务");
        println!("\n{} 正在停止，再次按 Ctrl+C 强制退出。", "[!]".yellow());
        signal_token.cancel();
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{} 用户强制中断程序。", "[!]".yellow());
            tokio::time::sleep(Duration::from_millis(100)).await;
            std::process::exit(130);
        }
    });

    match run_from_cli(args, cancellation).await {
        Ok(()) => {}
        Err(AppError::UserInterrupt) => {
            eprintln!("\n{} {}", "[!]".yellow(), "操作已被用户中断。".yellow());
            std::process::exit(130);
        }
        Err(e) => {
            log::error!("程序执行出错: {}", e);
            eprintln!("\n{} {}", "[X]".red(), format!("程序执行出错: {}", e).red());
            std::process::exit(1);
        }
    }
}
