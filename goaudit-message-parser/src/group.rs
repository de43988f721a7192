use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::record::AuditRecord;
use crate::tools::cutout;

/// How long a group may wait for more records before it is considered done.
/// The kernel gives no length prefix, so the deadline is the only fallback
/// when the end-of-event record never arrives.
pub const COMPLETE_AFTER: Duration = Duration::from_secs(2);

const SYSCALL_TYPE: u16 = 1300;

/// All records sharing one sequence number, awaiting completion.
#[derive(Debug, Clone, Serialize)]
pub struct AuditMessageGroup {
    #[serde(rename = "sequence")]
    pub seq: u64,
    #[serde(rename = "timestamp")]
    pub timestamp: String,
    #[serde(rename = "messages")]
    pub records: Vec<AuditRecord>,
    #[serde(rename = "uid_map")]
    pub uid_map: HashMap<String, String>,
    #[serde(skip)]
    pub syscall: String,
    #[serde(skip)]
    pub complete_after: Instant,
}

impl AuditMessageGroup {
    /// Start a new group from its first record. The deadline is fixed here
    /// and never advanced.
    pub fn new(record: AuditRecord, resolver: &HashMap<String, String>) -> Self {
        let mut group = AuditMessageGroup {
            seq: record.seq,
            timestamp: record.timestamp.clone(),
            // Groups rarely grow past a handful of records.
            records: Vec::with_capacity(6),
            uid_map: HashMap::new(),
            syscall: String::new(),
            complete_after: Instant::now() + COMPLETE_AFTER,
        };
        group.add_record(record, resolver);
        group
    }

    /// Append a record in arrival order. The first 1300 record whose body
    /// carries a ` syscall=` token fixes the group's syscall name.
    pub fn add_record(&mut self, record: AuditRecord, resolver: &HashMap<String, String>) {
        if record.rtype == SYSCALL_TYPE && self.syscall.is_empty() {
            self.syscall = cutout(&record.body, " syscall=");
        }
        self.map_uids(&record.body, resolver);
        self.records.push(record);
    }

    // Every `uid=`-suffixed token (uid=, auid=, euid=, ...) gets its value
    // translated through the supplied resolution map into the group-local
    // map; unknown uids map to the empty string.
    fn map_uids(&mut self, body: &str, resolver: &HashMap<String, String>) {
        for (at, _) in body.match_indices("uid=") {
            let value = body[at + 4..].split(' ').next().unwrap_or("");
            if value.is_empty() || self.uid_map.contains_key(value) {
                continue;
            }
            let name = resolver.get(value).cloned().unwrap_or_default();
            self.uid_map.insert(value.to_string(), name);
        }
    }
}

/// In-memory mapping from active sequence number to the group currently
/// accumulating records for it.
#[derive(Debug, Default)]
pub struct GroupStore {
    groups: HashMap<u64, AuditMessageGroup>,
}

impl GroupStore {
    pub fn new() -> Self {
        GroupStore {
            // It is not typical to have more than 2 groups open at a time.
            groups: HashMap::with_capacity(5),
        }
    }

    /// Route a record to its group, creating the group on first sight.
    pub fn admit(&mut self, record: AuditRecord, resolver: &HashMap<String, String>) {
        match self.groups.entry(record.seq) {
            Entry::Occupied(mut entry) => entry.get_mut().add_record(record, resolver),
            Entry::Vacant(entry) => {
                entry.insert(AuditMessageGroup::new(record, resolver));
            }
        }
    }

    /// Remove and return the group for `seq`, if one is open.
    pub fn take(&mut self, seq: u64) -> Option<AuditMessageGroup> {
        self.groups.remove(&seq)
    }

    /// Sequences whose deadline has passed at `now`.
    pub fn expired(&self, now: Instant) -> Vec<u64> {
        self.groups
            .iter()
            .filter(|(_, group)| group.complete_after <= now)
            .map(|(seq, _)| *seq)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(rtype: u16, seq: u64, body: &str) -> AuditRecord {
        AuditRecord {
            rtype,
            seq,
            timestamp: "10000001".to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn first_syscall_record_fixes_the_name() {
        let resolver = HashMap::new();
        let mut group = group_of(record(1300, 1, "arch=c000003e syscall=connect"), &resolver);
        group.add_record(record(1300, 1, "syscall=open"), &resolver);

        assert_eq!(group.syscall, "connect");
    }

    #[test]
    fn syscall_record_without_token_does_not_pin_empty_name() {
        let resolver = HashMap::new();
        let mut group = group_of(record(1300, 1, "no token here"), &resolver);
        assert_eq!(group.syscall, "");

        group.add_record(record(1300, 1, "syscall=open"), &resolver);
        assert_eq!(group.syscall, "open");
    }

    #[test]
    fn records_keep_admission_order() {
        let resolver = HashMap::new();
        let mut store = GroupStore::new();
        store.admit(record(1300, 7, "first"), &resolver);
        store.admit(record(1302, 7, "second"), &resolver);
        store.admit(record(1301, 7, "third"), &resolver);

        let group = store.take(7).unwrap();
        let types: Vec<u16> = group.records.iter().map(|r| r.rtype).collect();
        assert_eq!(types, vec![1300, 1302, 1301]);
        assert!(store.is_empty());
    }

    #[test]
    fn uid_tokens_are_translated_into_the_group_map() {
        let resolver = HashMap::from([
            ("0".to_string(), "root".to_string()),
            ("1000".to_string(), "joe".to_string()),
        ]);
        let group = group_of(record(1300, 1, "uid=0 auid=1000 euid=4242 comm=cat"), &resolver);

        assert_eq!(group.uid_map.get("0").unwrap(), "root");
        assert_eq!(group.uid_map.get("1000").unwrap(), "joe");
        // Unknown uids still land in the map, unresolved.
        assert_eq!(group.uid_map.get("4242").unwrap(), "");
        assert_eq!(group.uid_map.len(), 3);
    }

    #[test]
    fn group_without_uids_serializes_an_empty_map() {
        let resolver = HashMap::from([("0".to_string(), "root".to_string())]);
        let group = group_of(record(1300, 1, "hi there"), &resolver);

        assert!(group.uid_map.is_empty());
    }

    #[test]
    fn expired_honors_the_probe_instant() {
        let resolver = HashMap::new();
        let mut store = GroupStore::new();
        store.admit(record(1300, 4, "hi there"), &resolver);

        assert!(store.expired(Instant::now()).is_empty());
        let later = Instant::now() + COMPLETE_AFTER + Duration::from_millis(10);
        assert_eq!(store.expired(later), vec![4]);
        // expired() only reports; nothing is removed until take().
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn take_on_unknown_sequence_is_none() {
        let mut store = GroupStore::new();
        assert!(store.take(99).is_none());
    }

    fn group_of(record: AuditRecord, resolver: &HashMap<String, String>) -> AuditMessageGroup {
        AuditMessageGroup::new(record, resolver)
    }
}
