use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use goaudit_message_parser::AuditMessageGroup;
use tracing::warn;

/// Serializes accepted groups as newline-delimited JSON onto any writer,
/// retrying a fixed number of times before giving up.
pub struct AuditWriter<W: Write> {
    writer: W,
    attempts: usize,
}

impl<W: Write> AuditWriter<W> {
    pub fn new(writer: W, attempts: usize) -> Self {
        AuditWriter { writer, attempts }
    }

    pub fn write(&mut self, group: &AuditMessageGroup) -> io::Result<()> {
        let mut result = Ok(());
        for attempt in 1..=self.attempts {
            result = self.encode(group);
            match &result {
                Ok(()) => return Ok(()),
                Err(err) if attempt < self.attempts => {
                    warn!("Failed to write message, retrying in 1 second. Error: {}", err);
                    thread::sleep(Duration::from_secs(1));
                }
                Err(_) => {}
            }
        }
        result
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    fn encode(&mut self, group: &AuditMessageGroup) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, group)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}
