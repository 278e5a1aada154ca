// src/logging.rs

use crate::constants;
use log::LevelFilter;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// 默认日志位置: `~/.thinkscraper/thinkscraper.log`，取不到主目录时放在临时目录
pub fn default_log_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(constants::CONFIG_DIR_NAME))
        .unwrap_or_else(env::temp_dir)
        .join(constants::LOG_FILE_NAME)
}

/// 把日志写入 `path`。级别为 Off 时不安装任何日志器。
pub fn setup_logging(filter: LevelFilter, path: &Path) -> Result<(), fern::InitError> {
    if filter == LevelFilter::Off {
        return Ok(());
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    fern::Dispatch::new()
        .level(filter)
        // 屏蔽依赖库的连接细节
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("rustls", LevelFilter::Warn)
        .level_for("html5ever", LevelFilter::Warn)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {} - {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or_else(|| record.target()),
                message
            ))
        })
        .chain(fern::log_file(path)?)
        .apply()?;

    log::info!("日志级别 {}，写入 {}", filter, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path_uses_crate_file_name() {
        let path = default_log_path();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some(constants::LOG_FILE_NAME)
        );
    }

    #[test]
    fn test_off_installs_nothing() {
        let path = env::temp_dir().join("thinkscraper-never-created").join("x.log");
        setup_logging(LevelFilter::Off, &path).unwrap();
        assert!(!path.exists());
    }
}
