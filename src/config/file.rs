use serde::Deserialize;
use std::path::Path;

use crate::{
    config::{
        filters::FilterRule, logging::LogConfig, statsd::StatsdConfig,
        tracking::MessageTrackingConfig,
    },
    error::ConfigParseResult,
};

/// 配置文件的顶层结构，每个部分都是可选的
#[derive(Debug, Default, Deserialize)]
pub struct Root {
    pub logging: Option<LogConfig>,
    pub statsd: Option<StatsdConfig>,
    pub message_tracking: Option<MessageTrackingConfig>,
    pub filters: Option<Vec<FilterRule>>,
}

impl Root {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigParseResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> ConfigParseResult<Self> {
        let root: Root = toml::from_str(s)?;
        Ok(root)
    }

    pub fn set_logging(mut self, logging: LogConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    pub fn set_statsd(mut self, statsd: StatsdConfig) -> Self {
        self.statsd = Some(statsd);
        self
    }

    pub fn set_message_tracking(mut self, tracking: MessageTrackingConfig) -> Self {
        self.message_tracking = Some(tracking);
        self
    }

    pub fn set_filters(mut self, filters: Vec<FilterRule>) -> Self {
        self.filters = Some(filters);
        self
    }
}
