use serde::Serialize;

/// First audit record type id we assemble into groups.
pub const EVENT_START: u16 = 1300;
/// Last audit record type id we assemble into groups.
pub const EVENT_END: u16 = 1399;
/// End of a multi packet event.
pub const EVENT_EOE: u16 = 1320;

/// One datagram from the kernel audit netlink socket, as handed over by the
/// socket reader. The header sequence is carried for completeness; grouping
/// keys on the sequence parsed from the payload preamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetlinkFrame {
    pub frame_type: u16,
    pub seq: u32,
    pub data: Vec<u8>,
}

impl NetlinkFrame {
    pub fn new(frame_type: u16, data: &[u8]) -> Self {
        Self {
            frame_type,
            seq: 0,
            data: data.to_vec(),
        }
    }
}

/// A parsed frame. `seq == 0` marks an unusable record, either an explicit
/// zero sequence or a malformed preamble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    #[serde(rename = "type")]
    pub rtype: u16,
    #[serde(skip)]
    pub seq: u64,
    #[serde(skip)]
    pub timestamp: String,
    #[serde(rename = "data")]
    pub body: String,
}

impl AuditRecord {
    /// Parse the `audit(T:S):` preamble out of a frame payload.
    pub fn from_frame(frame: &NetlinkFrame) -> Self {
        let payload = String::from_utf8_lossy(&frame.data);
        let (timestamp, seq, body) = parse_preamble(&payload);
        AuditRecord {
            rtype: frame.frame_type,
            seq,
            timestamp: timestamp.to_string(),
            body: body.to_string(),
        }
    }
}

/// Split `audit(T:S): body` into its pieces. A payload that does not look
/// like an audit preamble comes back with sequence 0 and the payload left
/// intact as the body.
fn parse_preamble(payload: &str) -> (&str, u64, &str) {
    let Some(stop) = payload.find("):") else {
        return ("", 0, payload);
    };
    let header = &payload[..stop];
    if !header.starts_with("audit(") {
        return ("", 0, payload);
    }
    let Some(sep) = header.find(':') else {
        return ("", 0, payload);
    };
    let timestamp = &header["audit(".len()..sep];
    let seq = header[sep + 1..].parse().unwrap_or(0);
    // The body starts past the "): " terminator.
    let body = payload.get(stop + 3..).unwrap_or("");
    (timestamp, seq, body)
}
