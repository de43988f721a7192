use clap::Parser;

use goaudit::LogConfig;
use goaudit::command::cli::Cli;
use goaudit::config::filters::FilterRule;
use goaudit::config::statsd::StatsdConfig;
use goaudit::config::tracking::MessageTrackingConfig;
use goaudit::error::{ConfigParseError, ConfigParseResult};
use goaudit::filter::FilterSet;

use tracing::{debug, info};

fn init_logging(log_cfg: &LogConfig) {
    if goaudit::init_logging(log_cfg).is_err() {
        let _ = goaudit::init_default_logging();
    }
}

fn main() -> Result<(), ConfigParseError> {
    let cli = Cli::parse();

    // 加载日志配置，配置文件缺失或损坏时退回默认
    let log_cfg = LogConfig::from_file(&cli.config_path).unwrap_or_default();
    init_logging(&log_cfg);

    info!("goaudit 事件转发工具启动");

    let statsd_cfg = StatsdConfig::from_file(&cli.config_path)?;
    let tracking_cfg = MessageTrackingConfig::from_file(&cli.config_path)?;
    let filter_rules = FilterRule::from_file(&cli.config_path)?;

    // 启动前统一编译过滤规则，坏正则在这里就报出来
    let compiled = filter_rules
        .iter()
        .map(FilterRule::compile)
        .collect::<ConfigParseResult<Vec<_>>>()?;
    let filters = FilterSet::new(compiled);

    info!("配置文件路径: {}", cli.config_path);
    info!("已编译 {} 条过滤规则", filter_rules.len());

    debug!("日志配置: {:?}", log_cfg);
    debug!("statsd 配置: {:?}", statsd_cfg);
    debug!("序列跟踪配置: {:?}", tracking_cfg);
    debug!("过滤规则: {:?}", filters);

    Ok(())
}
