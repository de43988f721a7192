use serde::Deserialize;
use std::path::Path;

use crate::{config::file::Root, error::ConfigParseResult};

/// 序列号跟踪配置，用于发现 kaudit 丢失或乱序投递的事件
#[derive(Debug, Clone, Deserialize)]
pub struct MessageTrackingConfig {
    /// 是否启用跟踪
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// 乱序恢复时是否记日志
    #[serde(default)]
    pub log_out_of_order: bool,

    /// 超过该距离仍未补齐的序列号视为丢失
    #[serde(default = "default_max_out_of_order")]
    pub max_out_of_order: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_max_out_of_order() -> u64 {
    500
}

impl Default for MessageTrackingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageTrackingConfig {
    pub fn new() -> Self {
        Self {
            enabled: true,
            log_out_of_order: false,
            max_out_of_order: 500,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigParseResult<Self> {
        Ok(Root::from_file(path)?.message_tracking.unwrap_or_default())
    }

    pub fn set_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn set_log_out_of_order(mut self, log_out_of_order: bool) -> Self {
        self.log_out_of_order = log_out_of_order;
        self
    }

    pub fn set_max_out_of_order(mut self, max_out_of_order: u64) -> Self {
        self.max_out_of_order = max_out_of_order;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_tracking_config_has_expected_values() {
        let cfg = MessageTrackingConfig::new();

        assert!(cfg.enabled);
        assert!(!cfg.log_out_of_order);
        assert_eq!(cfg.max_out_of_order, 500);
    }

    #[test]
    fn setters_update_values() {
        let cfg = MessageTrackingConfig::new()
            .set_enabled(false)
            .set_log_out_of_order(true)
            .set_max_out_of_order(32);

        assert!(!cfg.enabled);
        assert!(cfg.log_out_of_order);
        assert_eq!(cfg.max_out_of_order, 32);
    }

    #[test]
    fn from_file_parses_config_correctly() {
        let toml_str = r#"
            [message_tracking]
            enabled = true
            log_out_of_order = true
            max_out_of_order = 64
        "#;
        let mut config_file = NamedTempFile::new().unwrap();
        config_file.write_all(toml_str.as_bytes()).unwrap();
        let cfg = MessageTrackingConfig::from_file(config_file.path()).unwrap();

        assert!(cfg.enabled);
        assert!(cfg.log_out_of_order);
        assert_eq!(cfg.max_out_of_order, 64);
    }
}
