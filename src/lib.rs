#[cfg(feature = "cli")]
pub mod command;
pub mod config;
pub mod error;
pub mod filter;
#[cfg(feature = "logging")]
pub mod logging;
pub mod marshaller;
pub mod statsd;
pub mod tracker;
pub mod writer;

// 重新导出主要的公共接口
#[cfg(feature = "cli")]
pub use command::cli::Cli;
pub use config::file::Root;
pub use config::filters::FilterRule;
pub use config::logging::LogConfig;
pub use config::statsd::{StatsdConfig, StatsdKind};
pub use config::tracking::MessageTrackingConfig;
pub use error::{
    ConfigParseError, ConfigParseResult, LogError, LogResult, MarshalError, MarshalResult,
};
pub use filter::{AuditFilter, FilterSet};
#[cfg(feature = "logging")]
pub use logging::{init_default_logging, init_logging};
pub use marshaller::AuditMarshaller;
pub use statsd::{StatsdClient, format_datagram};
pub use tracker::SequenceTracker;
pub use writer::AuditWriter;

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
