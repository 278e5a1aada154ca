// src/config/file.rs

use crate::{
    config::ExternalConfig,
    constants,
    error::{AppError, AppResult},
};
use anyhow::anyhow;
use log::{debug, info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub(crate) fn get_config_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("无法获取用户主目录")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

pub(crate) fn load_or_create_external_config(path: Option<&Path>) -> AppResult<ExternalConfig> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => match get_config_path() {
            Ok(p) => p,
            Err(e) => {
                warn!("{}，使用内置默认配置", e);
                return Ok(ExternalConfig::default_app_config());
            }
        },
    };

    if config_path.is_file() {
        debug!("读取配置文件: {}", config_path.display());
        let content = fs::read_to_string(&config_path)?;
        return serde_json::from_str(&content).map_err(|e| {
            AppError::Configuration(format!(
                "解析配置文件 '{}' 失败: {}",
                config_path.display(),
                e
            ))
        });
    }

    info!("配置文件 {:?} 不存在，将创建默认配置。", config_path);
    let config = ExternalConfig::default_app_config();
    if let Err(e) = write_config(&config_path, &config) {
        // 只读的主目录不应阻止程序运行
        warn!("无法写入默认配置文件 '{}': {}", config_path.display(), e);
    }
    Ok(config)
}

fn write_config(config_path: &Path, config: &ExternalConfig) -> AppResult<()> {
    if let Some(dir) = config_path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json_content = serde_json::to_string_pretty(config)?;
    fs::write(config_path, json_content)?;
    Ok(())
}
