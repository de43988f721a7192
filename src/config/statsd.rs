use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::{config::file::Root, error::ConfigParseResult};

/// 上报协议风格，none 表示完全关闭指标上报
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsdKind {
    #[default]
    None,
    Statsd,
    Dogstatsd,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsdConfig {
    #[serde(default)]
    pub kind: StatsdKind,

    /// 指标接收端地址
    #[serde(default = "default_statsd_ip")]
    pub ip: String,

    #[serde(default = "default_statsd_port")]
    pub port: u16,

    /// record type -> token 名 -> 别名，别名为空字符串表示按原名输出
    /// (配置文件中形如 `[statsd.tokens.1300]`)
    #[serde(default, deserialize_with = "de_token_tables")]
    pub tokens: HashMap<u16, HashMap<String, String>>,
}

fn default_statsd_ip() -> String {
    "127.0.0.1".to_string()
}

fn default_statsd_port() -> u16 {
    8125
}

// TOML 的表键一律是字符串，这里把 "1300" 之类的键还原成 record type
fn de_token_tables<'de, D>(
    deserializer: D,
) -> Result<HashMap<u16, HashMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw: HashMap<String, HashMap<String, String>> = HashMap::deserialize(deserializer)?;
    let mut tables = HashMap::with_capacity(raw.len());
    for (rtype, table) in raw {
        let rtype = rtype.parse::<u16>().map_err(|_| {
            D::Error::custom(format!("statsd.tokens 的键必须是 record type 数字: {rtype}"))
        })?;
        tables.insert(rtype, table);
    }
    Ok(tables)
}

impl Default for StatsdConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsdConfig {
    pub fn new() -> Self {
        Self {
            kind: StatsdKind::None,
            ip: default_statsd_ip(),
            port: default_statsd_port(),
            tokens: HashMap::new(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigParseResult<Self> {
        Ok(Root::from_file(path)?.statsd.unwrap_or_default())
    }

    pub fn set_kind(mut self, kind: StatsdKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn set_ip(mut self, ip: &str) -> Self {
        self.ip = ip.to_string();
        self
    }

    pub fn set_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// 登记一个提取 token：record type 下的 token 名及其别名
    pub fn set_token(mut self, rtype: u16, token: &str, alias: &str) -> Self {
        self.tokens
            .entry(rtype)
            .or_default()
            .insert(token.to_string(), alias.to_string());
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }

    /// 某个 record type 下某 token 的别名；Some("") 表示登记过但未取别名
    pub fn token_alias(&self, rtype: u16, token: &str) -> Option<&str> {
        self.tokens
            .get(&rtype)
            .and_then(|table| table.get(token))
            .map(String::as_str)
    }
}
