use std::collections::{HashMap, HashSet};
use std::io;
use std::net::UdpSocket;

use goaudit_message_parser::{AuditMessageGroup, cutout};
use lazy_static::lazy_static;

use crate::config::statsd::{StatsdConfig, StatsdKind};

lazy_static! {
    // Token keys eligible for dogstatsd counter tags.
    static ref METRIC_TAGABLE: HashSet<&'static str> =
        ["comm", "success", "exit", "tty", "cwd"].into_iter().collect();
    // Keys the generic pass captures but never routes itself; the
    // type-specific rules decide where these go.
    static ref RESERVED_TOKENS: HashSet<&'static str> =
        ["auid", "uid", "name", "key"].into_iter().collect();
}

fn append_key_tag(list: &mut Vec<String>, alias: &str, key: &str, value: &str) {
    if !alias.is_empty() {
        list.push(format!("{alias}{value}"));
    } else {
        list.push(format!("{key}{value}"));
    }
}

/// Project an accepted group into one line-protocol datagram, or the empty
/// string when nothing should be emitted (no flavor configured, or no
/// usable syscall record in the group).
pub fn format_datagram(group: &AuditMessageGroup, config: &StatsdConfig) -> String {
    let delim = match config.kind {
        StatsdKind::Statsd => "_",
        _ => ":",
    };

    let mut tokens: HashMap<String, String> = HashMap::new();
    let mut content = String::new();
    let mut syscall = String::new();
    let mut comm = String::new();
    let mut arg_string = String::new();
    let mut event = false;
    let mut tags: Vec<String> = Vec::new();
    let mut etags: Vec<String> = Vec::new();

    for record in &group.records {
        let cont = format!(" {} ", record.body.replace('"', ""));
        content.push_str(&cont);

        if let Some(keys) = config.tokens.get(&record.rtype) {
            for (key, alias) in keys {
                let value = cutout(&cont, &format!(" {key}="));
                if value.is_empty() {
                    continue;
                }
                if METRIC_TAGABLE.contains(key.as_str()) {
                    append_key_tag(&mut tags, alias, key, &format!("{delim}{value}"));
                } else if !RESERVED_TOKENS.contains(key.as_str()) {
                    append_key_tag(&mut etags, alias, key, &format!("{delim}{value}"));
                }
                tokens.insert(key.clone(), value);
            }
        }

        match record.rtype {
            // Syscall record: authoritative for syscall, comm and key.
            1300 => {
                let sys = cutout(&cont, " syscall=");
                if sys.is_empty() {
                    return String::new();
                }
                syscall = sys;

                let com = cutout(&cont, " comm=");
                if !com.is_empty() {
                    comm = com;
                }

                let key = cutout(&cont, " key=");
                if !key.is_empty() {
                    for piece in key.split(',') {
                        if piece == "event" {
                            event = true;
                        } else if let Some(alias) = config.token_alias(record.rtype, "key") {
                            append_key_tag(&mut tags, alias, "key", &format!("{delim}{piece}"));
                            if piece.contains(':') {
                                tags.push(piece.replace(':', delim));
                            }
                        }
                    }
                }
            }
            // Path record: only NORMAL entries contribute the captured name.
            1302 => {
                if let Some(name) = tokens.get("name") {
                    if cutout(&cont, " nametype=") == "NORMAL" {
                        let alias = config.token_alias(record.rtype, "name").unwrap_or("");
                        append_key_tag(&mut etags, alias, "name", &format!("{delim}{name}"));
                    }
                }
            }
            // Execve record: kept whole for the argument post-pass.
            1309 => {
                if config.token_alias(record.rtype, "args").is_some() {
                    arg_string = cont.clone();
                }
            }
            _ => {}
        }
    }

    if !arg_string.is_empty() && !comm.is_empty() {
        let arg_val = cutout(&arg_string, &format!("{comm} "));
        let tail = match arg_val.find('=') {
            Some(at) => &arg_val[at + 1..],
            None => arg_val.as_str(),
        };
        let tail = tail.trim();
        if !tail.is_empty() {
            let alias = config.token_alias(1309, "args").unwrap_or("");
            append_key_tag(&mut tags, alias, "arg", &format!("{delim}{tail}"));
        }
    }

    for user_token in ["uid", "auid"] {
        if let Some(alias) = config.token_alias(1300, user_token) {
            if let Some(value) = tokens.get(user_token) {
                let name = group.uid_map.get(value).map(String::as_str).unwrap_or("");
                append_key_tag(&mut tags, alias, user_token, &format!("{delim}{name}"));
            }
        }
    }

    if syscall.is_empty() {
        return String::new();
    }

    match config.kind {
        StatsdKind::None => String::new(),
        StatsdKind::Dogstatsd if !event => {
            let mut datagram = format!("goaudit.syscall.{syscall}.count:1|c");
            // Counters carry only the tagable list; extended tags are
            // reserved for event packets.
            if !tags.is_empty() {
                tags.sort();
                datagram.push_str("|#");
                datagram.push_str(&tags.join(","));
            }
            datagram
        }
        StatsdKind::Dogstatsd => {
            let mut title = format!("Go-Audit Syscall {syscall} ocurred");
            if let Some(key) = tokens.get("key") {
                title.push_str(" and matched on Key Group ");
                title.push_str(&key.replace(",event", "").replace("event,", ""));
            }
            let mut datagram = format!(
                "_e{{{},{}}}:{title}|{content}|s:goaudit",
                title.len(),
                content.len()
            );
            tags.append(&mut etags);
            if !tags.is_empty() {
                tags.sort();
                datagram.push_str("|#");
                datagram.push_str(&tags.join(","));
            }
            datagram
        }
        StatsdKind::Statsd => {
            let mut datagram = format!("goaudit.syscall.{syscall}.count");
            tags.append(&mut etags);
            if !tags.is_empty() {
                tags.sort();
                datagram.push('.');
                datagram.push_str(&tags.join("."));
            }
            datagram.push_str(":1|c");
            datagram
        }
    }
}

/// One scoped datagram socket: bound on creation, written once, released
/// on drop whatever happens in between.
pub struct StatsdClient {
    socket: UdpSocket,
}

impl StatsdClient {
    pub fn new(addr: &str) -> io::Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket.connect(addr)?;
        Ok(StatsdClient { socket })
    }

    pub fn send(&self, payload: &[u8]) -> io::Result<usize> {
        self.socket.send(payload)
    }
}
