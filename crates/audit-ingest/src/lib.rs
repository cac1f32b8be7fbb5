//! Turns raw audit log lines into enriched event records.

mod classify;
mod decode;
mod message;

pub use audit_types::{ActionKind, EventRecord, Severity};
pub use classify::{classify, SENSITIVE_ENTITIES};
pub use decode::{decode_line, decode_object, parse_timestamp, LogLine, RawFields};
pub use message::derive_message;

/// Decode one raw line and enrich it into a record. `seq` is the line's position in the file.
pub fn ingest_line(raw: &str, seq: u64) -> Option<EventRecord> {
    decode_line(raw).map(|line| line.into_record(seq))
}
