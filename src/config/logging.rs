use serde::Deserialize;
use std::path::Path;

use crate::{config::file::Root, error::ConfigParseResult};

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// 日志级别文本: "error", "warn", "info", "debug", "trace"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 日志输出文件路径，默认输出到 logs 目录
    #[serde(default = "default_log_path")]
    pub path: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            level: "info".to_string(),
            path: "logs".to_string(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigParseResult<Self> {
        Ok(Root::from_file(path)?.logging.unwrap_or_default())
    }

    pub fn set_level(mut self, level: &str) -> Self {
        self.level = level.to_string();
        self
    }

    pub fn set_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }
}
