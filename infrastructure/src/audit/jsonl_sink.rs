//! JSONL file writer for audit records.
//!
//! Each [`AuditRecord`] is serialized as a single JSON line with a `type`
//! field and `timestamp`, appended to the file via a buffered writer.

use async_trait::async_trait;
use council_application::ports::audit_sink::{AuditError, AuditSink};
use council_domain::AuditRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Event type written on every audit line
const EVENT_TYPE: &str = "deliberation_complete";

/// JSONL audit sink that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record
/// and on `Drop`.
pub struct JsonlAuditSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditSink {
    /// Open (or create) the audit file at `path` in append mode.
    ///
    /// Creates parent directories if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the audit file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn to_line(record: &AuditRecord) -> Result<String, AuditError> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        // Merge the record with type + timestamp
        let line = match serde_json::to_value(record)? {
            serde_json::Value::Object(mut map) => {
                map.insert(
                    "type".to_string(),
                    serde_json::Value::String(EVENT_TYPE.to_string()),
                );
                map.insert(
                    "timestamp".to_string(),
                    serde_json::Value::String(timestamp),
                );
                serde_json::Value::Object(map)
            }
            other => serde_json::json!({
                "type": EVENT_TYPE,
                "timestamp": timestamp,
                "data": other,
            }),
        };

        Ok(serde_json::to_string(&line)?)
    }
}

#[async_trait]
impl AuditSink for JsonlAuditSink {
    async fn emit(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let line = Self::to_line(record)?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| AuditError::Unavailable("audit writer lock poisoned".to_string()))?;
        writeln!(writer, "{}", line)?;
        // JSONL is append-only; flush each record for crash safety
        writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlAuditSink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{
        DeliberationLifecycle, DeliberationOutcome, DeliberationTask, ExaminationPolicy,
        ModerationContext, Opinion, OpinionSet, SpecialistWeights, examine, synthesize,
        Decision,
    };

    fn record(content: &str) -> AuditRecord {
        let task = DeliberationTask::create(content, ModerationContext::new(), 1000).unwrap();
        let opinion = Opinion::succeeded("utilitarian", Decision::Allow, 0.8, "fine");
        let opinions: OpinionSet = [(opinion.specialist_id.clone(), opinion)].into();
        let cross_examination = examine(&opinions, &ExaminationPolicy::default());
        let result = synthesize(
            &task,
            &opinions,
            &cross_examination,
            &SpecialistWeights::equal(["utilitarian"]),
        );
        AuditRecord::from_outcome(&DeliberationOutcome {
            task,
            result,
            opinions,
            cross_examination,
            lifecycle: DeliberationLifecycle::new(),
        })
    }

    #[tokio::test]
    async fn test_jsonl_sink_appends_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit").join("council-audit.jsonl");

        let sink = JsonlAuditSink::open(&path).unwrap();
        sink.emit(&record("first")).await.unwrap();
        drop(sink);

        // Reopening appends instead of truncating
        let sink = JsonlAuditSink::open(&path).unwrap();
        sink.emit(&record("second")).await.unwrap();
        assert_eq!(sink.path(), path.as_path());
        drop(sink);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);

        for line in &lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["type"], "deliberation_complete");
            assert!(value.get("timestamp").is_some());
            assert_eq!(value["result"]["final_decision"], "ALLOW");
            assert_eq!(value["content_digest"].as_str().unwrap().len(), 64);
        }
    }

    #[tokio::test]
    async fn test_record_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = JsonlAuditSink::open(&path).unwrap();

        let original = record("round trip");
        sink.emit(&original).await.unwrap();
        drop(sink);

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: AuditRecord = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(parsed, original);
    }
}
