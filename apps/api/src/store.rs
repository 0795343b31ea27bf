//! Content Record Store — the session-scoped history of generated content.
//!
//! Append-only: records are immutable once added, and the store only grows or
//! is wholly cleared. Caption failures are typed errors upstream and can never
//! reach `append`, so every exported row is a successful generation. That is
//! an intentional policy, not an accident of control flow.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::generation::tone::Tone;

/// Display format for record timestamps, in table rows and CSV alike.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// CSV header — the full record field set, in field order.
const CSV_HEADER: [&str; 7] = [
    "timestamp",
    "topic",
    "tone",
    "caption",
    "image_url",
    "photographer",
    "photographer_url",
];

/// One successful generation. Image fields are optional in the type, though
/// the current orchestration only appends records that carry an image.
#[derive(Debug, Clone, Serialize)]
pub struct ContentRecord {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub topic: String,
    pub tone: Tone,
    pub caption: String,
    pub image_url: Option<String>,
    pub photographer: Option<String>,
    pub photographer_url: Option<String>,
}

/// One history-table row: the record minus the image columns.
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub timestamp: String,
    pub topic: String,
    pub tone: Tone,
    pub caption: String,
}

fn serialize_timestamp<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string())
}

/// In-memory, insertion-ordered record list. Created empty at session start,
/// discarded when the process exits.
#[derive(Debug, Default)]
pub struct ContentStore {
    records: Vec<ContentRecord>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ContentRecord) {
        self.records.push(record);
    }

    /// Discards all records. Irreversible within the session.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// History-table view: `(timestamp, topic, tone, caption)` in insertion order.
    pub fn as_table(&self) -> Vec<TableRow> {
        self.records
            .iter()
            .map(|r| TableRow {
                timestamp: r.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                topic: r.topic.clone(),
                tone: r.tone,
                caption: r.caption.clone(),
            })
            .collect()
    }

    /// Serializes every field of every record, insertion order, UTF-8 CSV.
    /// The header row is always present, even for an empty store.
    pub fn export_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer
            .write_record(CSV_HEADER)
            .context("Failed to write CSV header")?;

        for record in &self.records {
            writer
                .serialize(record)
                .context("Failed to serialize content record")?;
        }

        writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV export buffer: {e}"))
    }
}
