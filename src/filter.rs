use std::collections::HashMap;

use goaudit_message_parser::AuditMessageGroup;
use regex::Regex;

/// A single compiled suppression rule.
#[derive(Debug, Clone)]
pub struct AuditFilter {
    pub syscall: String,
    pub message_type: u16,
    pub regex: Regex,
}

/// Compiled rules indexed the way lookups happen:
/// syscall name -> record type -> patterns.
#[derive(Debug, Default)]
pub struct FilterSet {
    rules: HashMap<String, HashMap<u16, Vec<Regex>>>,
}

impl FilterSet {
    pub fn new(filters: Vec<AuditFilter>) -> Self {
        let mut rules: HashMap<String, HashMap<u16, Vec<Regex>>> = HashMap::new();
        for filter in filters {
            rules
                .entry(filter.syscall)
                .or_default()
                .entry(filter.message_type)
                .or_default()
                .push(filter.regex);
        }
        FilterSet { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// True when the group must be suppressed: some record of a matching
    /// type matches some pattern registered for the group's syscall name.
    /// No rules for the syscall is the fast-path accept.
    pub fn drops(&self, group: &AuditMessageGroup) -> bool {
        let Some(per_type) = self.rules.get(&group.syscall) else {
            return false;
        };
        for record in &group.records {
            if let Some(patterns) = per_type.get(&record.rtype) {
                if patterns.iter().any(|regex| regex.is_match(&record.body)) {
                    return true;
                }
            }
        }
        false
    }
}
