pub mod group;
pub mod record;
mod tools;

pub use group::{AuditMessageGroup, COMPLETE_AFTER, GroupStore};
pub use record::{AuditRecord, EVENT_END, EVENT_EOE, EVENT_START, NetlinkFrame};
pub use tools::cutout;
