use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Instant;

use goaudit_message_parser::{
    AuditMessageGroup, AuditRecord, EVENT_END, EVENT_EOE, EVENT_START, GroupStore, NetlinkFrame,
};
use tracing::{debug, error};

use crate::config::statsd::{StatsdConfig, StatsdKind};
use crate::config::tracking::MessageTrackingConfig;
use crate::error::MarshalResult;
use crate::filter::FilterSet;
use crate::statsd::{StatsdClient, format_datagram};
use crate::tracker::SequenceTracker;
use crate::writer::AuditWriter;

/// Receives netlink frames one at a time, reassembles multi-packet events,
/// and drives filtering, metrics emission and the writer. Strictly serial:
/// deadlines only fire on calls into it.
pub struct AuditMarshaller<W: Write> {
    store: GroupStore,
    writer: AuditWriter<W>,
    filters: FilterSet,
    statsd: StatsdConfig,
    tracker: Option<SequenceTracker>,
    uid_map: HashMap<String, String>,
}

impl<W: Write> AuditMarshaller<W> {
    pub fn new(
        writer: AuditWriter<W>,
        tracking: &MessageTrackingConfig,
        filters: FilterSet,
        statsd: StatsdConfig,
    ) -> Self {
        let tracker = tracking
            .enabled
            .then(|| SequenceTracker::new(tracking.log_out_of_order, tracking.max_out_of_order));
        AuditMarshaller {
            store: GroupStore::new(),
            writer,
            filters,
            statsd,
            tracker,
            uid_map: HashMap::new(),
        }
    }

    /// Attach the externally resolved uid -> username map; new groups
    /// translate the uids they see through it.
    pub fn with_uid_map(mut self, uid_map: HashMap<String, String>) -> Self {
        self.uid_map = uid_map;
        self
    }

    /// Ingest one frame. The only fatal outcome is a writer failure.
    pub fn consume(&mut self, frame: &NetlinkFrame) -> MarshalResult<()> {
        let record = AuditRecord::from_frame(frame);

        if record.seq == 0 {
            // Invalid audit message; flush anything due and move on.
            return self.flush_old();
        }

        if let Some(tracker) = self.tracker.as_mut() {
            tracker.observe(record.seq);
        }

        if frame.frame_type < EVENT_START || frame.frame_type > EVENT_END {
            // Record types we do not assemble.
            return self.flush_old();
        }
        if frame.frame_type == EVENT_EOE {
            // End of event: complete that sequence, the sentinel itself
            // is never part of the group.
            return self.complete_message(record.seq);
        }

        self.store.admit(record, &self.uid_map);
        self.flush_old()
    }

    /// Number of groups still waiting on completion.
    pub fn pending(&self) -> usize {
        self.store.len()
    }

    // Completes every group whose deadline has passed. kaudit gives no
    // length prefix, so this is the only way partial groups ever leave.
    fn flush_old(&mut self) -> MarshalResult<()> {
        let now = Instant::now();
        for seq in self.store.expired(now) {
            self.complete_message(seq)?;
        }
        Ok(())
    }

    fn complete_message(&mut self, seq: u64) -> MarshalResult<()> {
        let Some(group) = self.store.take(seq) else {
            // Completing a sequence we never opened is a no-op.
            return Ok(());
        };

        if self.filters.drops(&group) {
            return Ok(());
        }

        if self.statsd.kind != StatsdKind::None {
            if let Err(err) = self.send_datagram(&group) {
                error!("Failed to send statsd datagram. Error: {}", err);
            }
        }

        if let Err(err) = self.writer.write(&group) {
            error!("Failed to write message. Error: {}", err);
            return Err(err.into());
        }
        Ok(())
    }

    fn send_datagram(&self, group: &AuditMessageGroup) -> io::Result<()> {
        let datagram = format_datagram(group, &self.statsd);
        if datagram.is_empty() {
            return Ok(());
        }
        let addr = self.statsd.address();
        debug!("sending datagram to address {} with content: {}", addr, datagram);
        let client = StatsdClient::new(&addr)?;
        client.send(datagram.as_bytes())?;
        Ok(())
    }
}
