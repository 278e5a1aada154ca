// src/cli.rs

use clap::{Parser, Subcommand, ValueEnum, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// 结果导出格式
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    // --- 通用选项 (General) ---
    /// 指定配置文件路径 (默认: ~/.thinkscraper/config.json)
    #[arg(long, value_name = "FILE", global = true, help_heading = "General")]
    pub config: Option<PathBuf>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
    /// (隐藏参数) 日志文件路径 (默认: ~/.thinkscraper/thinkscraper.log)
    #[arg(long, value_name = "FILE", global = true, hide = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// 列出所有支持的平台
    ListPlatforms,
    /// 抓取单个链接
    ScrapeUrl {
        url: String,
        /// 将结果保存为 JSON 文件
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// 从文本文件批量抓取多个链接 (每行一个)
    ScrapeUrls {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// 将结果保存为 JSON 文件
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
        /// 某个链接失败时继续处理剩余链接
        #[arg(long, action = clap::ArgAction::SetTrue)]
        skip_errors: bool,
        /// [配合 --skip-errors] 设置最大并发数
        #[arg(short, long, value_parser = clap::value_parser!(usize))]
        workers: Option<usize>,
    },
    /// 使用指定平台抓取一个或多个链接
    ScrapePlatform {
        platform: String,
        #[arg(required = true)]
        urls: Vec<String>,
        /// 将结果保存为 JSON 文件
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// 显示结果文件的汇总信息
    ShowSummary {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// 将结果文件导出为其他格式
    ExportResults {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
    },
}
