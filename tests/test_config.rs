use goaudit::config::file::Root;
use goaudit::{LogConfig, MessageTrackingConfig, StatsdConfig, StatsdKind};

const FULL_CONFIG: &str = r#"
[logging]
level = "debug"
path = "/var/log/goaudit"

[statsd]
kind = "dogstatsd"
ip = "10.1.2.3"
port = 8126

[statsd.tokens.1300]
key = "rule_group"
uid = "user"

[statsd.tokens.1309]
args = ""

[message_tracking]
enabled = true
log_out_of_order = true
max_out_of_order = 500

[[filters]]
syscall = "49"
message_type = 1306
regex = "saddr=(10..|01..)"
"#;

#[test]
fn full_config_round_trips_through_every_section() {
    let root = Root::from_toml_str(FULL_CONFIG).unwrap();

    let logging = root.logging.unwrap();
    assert_eq!(logging.level, "debug".to_string());
    assert_eq!(logging.path, "/var/log/goaudit".to_string());

    let statsd = root.statsd.unwrap();
    assert_eq!(statsd.kind, StatsdKind::Dogstatsd);
    assert_eq!(statsd.address(), "10.1.2.3:8126".to_string());
    assert_eq!(statsd.token_alias(1300, "key"), Some("rule_group"));
    assert_eq!(statsd.token_alias(1300, "uid"), Some("user"));
    assert_eq!(statsd.token_alias(1309, "args"), Some(""));

    let tracking = root.message_tracking.unwrap();
    assert!(tracking.enabled);
    assert!(tracking.log_out_of_order);
    assert_eq!(tracking.max_out_of_order, 500);

    let filters = root.filters.unwrap();
    assert_eq!(filters.len(), 1);
    let compiled = filters[0].compile().unwrap();
    assert_eq!(compiled.syscall, "49".to_string());
    assert_eq!(compiled.message_type, 1306);
    assert!(compiled.regex.is_match("saddr=0100007F"));
}

#[test]
fn empty_config_leaves_every_section_unset() {
    let root = Root::from_toml_str("").unwrap();

    assert!(root.logging.is_none());
    assert!(root.statsd.is_none());
    assert!(root.message_tracking.is_none());
    assert!(root.filters.is_none());
}

#[test]
fn builder_setters_assemble_a_root() {
    let root = Root::new()
        .set_logging(LogConfig::new().set_level("warn"))
        .set_statsd(StatsdConfig::new().set_kind(StatsdKind::Statsd))
        .set_message_tracking(MessageTrackingConfig::new().set_enabled(false))
        .set_filters(vec![]);

    assert_eq!(root.logging.unwrap().level, "warn".to_string());
    assert_eq!(root.statsd.unwrap().kind, StatsdKind::Statsd);
    assert!(!root.message_tracking.unwrap().enabled);
    assert!(root.filters.unwrap().is_empty());
}

#[test]
fn malformed_toml_is_a_parse_error() {
    assert!(Root::from_toml_str("[statsd\nkind = ").is_err());
}
