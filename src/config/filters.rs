use regex::Regex;
use serde::Deserialize;
use std::path::Path;

use crate::{config::file::Root, error::ConfigParseResult, filter::AuditFilter};

/// 过滤规则的配置形式，正则在加载阶段统一编译
/// (配置文件中形如 `[[filters]]`)
#[derive(Debug, Clone, Deserialize)]
pub struct FilterRule {
    /// 规则绑定的 syscall 名
    pub syscall: String,

    /// 规则绑定的 record type
    pub message_type: u16,

    pub regex: String,
}

impl FilterRule {
    pub fn new(syscall: &str, message_type: u16, regex: &str) -> Self {
        Self {
            syscall: syscall.to_string(),
            message_type,
            regex: regex.to_string(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigParseResult<Vec<Self>> {
        Ok(Root::from_file(path)?.filters.unwrap_or_default())
    }

    /// 编译为可执行的过滤规则；无效正则是配置错误
    pub fn compile(&self) -> ConfigParseResult<AuditFilter> {
        Ok(AuditFilter {
            syscall: self.syscall.clone(),
            message_type: self.message_type,
            regex: Regex::new(&self.regex)?,
        })
    }
}
