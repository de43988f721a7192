/// 定义配置、日志与事件写出相关的错误类型和结果类型
pub type ConfigParseResult<T> = std::result::Result<T, ConfigParseError>;
pub type LogResult<T> = std::result::Result<T, LogError>;
pub type MarshalResult<T> = std::result::Result<T, MarshalError>;

/// 日志相关错误枚举
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("日志初始化错误: {0}")]
    Init(String),
}

/// 配置解析错误枚举
#[derive(Debug, thiserror::Error)]
pub enum ConfigParseError {
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML 解析错误: {0}")]
    Parser(#[from] toml::de::Error),

    #[error("过滤规则正则无效: {0}")]
    Pattern(#[from] regex::Error),
}

/// marshaller 的致命错误：写出端是唯一的持久化出口，写出失败后
/// 不能带着已经分叉的状态继续运行
#[derive(Debug, thiserror::Error)]
pub enum MarshalError {
    #[error("审计事件写出失败: {0}")]
    Write(#[from] std::io::Error),
}
