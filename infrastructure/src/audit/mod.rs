//! Audit infrastructure: durable deliberation records.
//!
//! Provides [`JsonlAuditSink`], a JSONL file writer that implements
//! the [`AuditSink`](council_application::AuditSink) port.

mod jsonl_sink;

pub use jsonl_sink::JsonlAuditSink;
