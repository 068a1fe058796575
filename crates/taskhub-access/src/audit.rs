//! Audit records and sinks
//!
//! Every permission decision and navigation transition is reported as an
//! [`AuditRecord`]. Sinks are fire-and-forget: [`emit`] swallows any sink
//! error so that auditing can never change the outcome of a check.

use crate::error::AuditError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Severity of an audit record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    /// Diagnostic detail
    Debug,
    /// Normal operation
    Info,
    /// Denials and recoverable failures
    Warn,
    /// Failures that dropped work
    Error,
}

/// Structured audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Severity
    pub level: AuditLevel,
    /// Subsystem (`permission`, `navigation`, `route`, `session`)
    pub category: String,
    /// Short human-readable message
    pub message: String,
    /// Structured payload
    pub details: serde_json::Value,
    /// Creation time
    pub at: DateTime<Utc>,
}

impl AuditRecord {
    /// Create record with empty details
    #[must_use]
    pub fn new(level: AuditLevel, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            category: category.into(),
            message: message.into(),
            details: serde_json::Value::Null,
            at: Utc::now(),
        }
    }

    /// Attach structured details
    #[inline]
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

/// Destination for audit records
#[cfg_attr(test, mockall::automock)]
pub trait AuditSink: Send + Sync {
    /// Accept one record
    ///
    /// # Errors
    /// Sink-specific; callers must not propagate it.
    fn record(&self, record: AuditRecord) -> Result<(), AuditError>;
}

impl fmt::Debug for dyn AuditSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn AuditSink")
    }
}

/// Shared sink handle
pub type SharedAuditSink = Arc<dyn AuditSink>;

/// Send a record to a sink, swallowing failures
pub fn emit(sink: &dyn AuditSink, record: AuditRecord) {
    let category = record.category.clone();
    if let Err(e) = sink.record(record) {
        tracing::debug!(%category, error = %e, "audit sink rejected record");
    }
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn record(&self, _record: AuditRecord) -> Result<(), AuditError> {
        Ok(())
    }
}

/// Sink that forwards records as `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: AuditRecord) -> Result<(), AuditError> {
        let AuditRecord {
            level,
            category,
            message,
            details,
            ..
        } = record;
        match level {
            AuditLevel::Debug => {
                tracing::debug!(target: "taskhub::audit", %category, %details, "{message}");
            }
            AuditLevel::Info => {
                tracing::info!(target: "taskhub::audit", %category, %details, "{message}");
            }
            AuditLevel::Warn => {
                tracing::warn!(target: "taskhub::audit", %category, %details, "{message}");
            }
            AuditLevel::Error => {
                tracing::error!(target: "taskhub::audit", %category, %details, "{message}");
            }
        }
        Ok(())
    }
}

/// Bounded in-memory sink keeping the most recent records
#[derive(Debug)]
pub struct MemoryAuditSink {
    capacity: usize,
    records: Mutex<VecDeque<AuditRecord>>,
}

impl MemoryAuditSink {
    /// Create sink holding at most `capacity` records
    #[inline]
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
        }
    }

    /// Copy of retained records, oldest first
    #[must_use]
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().iter().cloned().collect()
    }

    /// Records of one category
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<AuditRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect()
    }

    /// Number of retained records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether no record is retained
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Drop all records
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Default for MemoryAuditSink {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, record: AuditRecord) -> Result<(), AuditError> {
        let mut records = self.records.lock();
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);
        Ok(())
    }
}

/// Non-blocking sink backed by a bounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelAuditSink {
    sender: mpsc::Sender<AuditRecord>,
}

impl ChannelAuditSink {
    /// Create sink and the receiving half
    #[must_use]
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<AuditRecord>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (Self { sender }, receiver)
    }
}

impl AuditSink for ChannelAuditSink {
    fn record(&self, record: AuditRecord) -> Result<(), AuditError> {
        self.sender.try_send(record).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => AuditError::Full,
            mpsc::error::TrySendError::Closed(_) => AuditError::Closed,
        })
    }
}

/// Sink that copies each record to several sinks
#[derive(Debug, Default)]
pub struct FanoutAuditSink {
    sinks: Vec<SharedAuditSink>,
}

impl FanoutAuditSink {
    /// Create empty fanout
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink
    #[must_use]
    pub fn with(mut self, sink: SharedAuditSink) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl AuditSink for FanoutAuditSink {
    fn record(&self, record: AuditRecord) -> Result<(), AuditError> {
        // one failing sink must not starve the others
        for sink in &self.sinks {
            emit(sink.as_ref(), record.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(message: &str) -> AuditRecord {
        AuditRecord::new(AuditLevel::Info, "permission", message)
    }

    #[test]
    fn memory_sink_is_bounded() {
        let sink = MemoryAuditSink::new(2);
        for m in ["a", "b", "c"] {
            sink.record(sample(m)).unwrap();
        }
        let messages: Vec<_> = sink.records().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["b", "c"]);
    }

    #[test]
    fn memory_sink_filters_by_category() {
        let sink = MemoryAuditSink::default();
        sink.record(sample("p")).unwrap();
        sink.record(AuditRecord::new(AuditLevel::Warn, "navigation", "n"))
            .unwrap();
        assert_eq!(sink.by_category("navigation").len(), 1);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn emit_swallows_sink_errors() {
        let mut mock = MockAuditSink::new();
        mock.expect_record()
            .times(1)
            .returning(|_| Err(AuditError::Sink("boom".into())));
        emit(&mock, sample("x"));
    }

    #[test]
    fn channel_sink_reports_full() {
        let (sink, _rx) = ChannelAuditSink::channel(1);
        assert!(sink.record(sample("1")).is_ok());
        assert_eq!(sink.record(sample("2")), Err(AuditError::Full));
    }

    #[test]
    fn channel_sink_reports_closed() {
        let (sink, rx) = ChannelAuditSink::channel(4);
        drop(rx);
        assert_eq!(sink.record(sample("1")), Err(AuditError::Closed));
    }

    #[tokio::test]
    async fn channel_sink_delivers() {
        let (sink, mut rx) = ChannelAuditSink::channel(4);
        sink.record(sample("hello")).unwrap();
        let got = rx.recv().await.unwrap();
        assert_eq!(got.message, "hello");
    }

    #[test]
    fn fanout_survives_failing_sink() {
        let mut failing = MockAuditSink::new();
        failing
            .expect_record()
            .returning(|_| Err(AuditError::Closed));
        let memory = Arc::new(MemoryAuditSink::default());
        let fanout = FanoutAuditSink::new()
            .with(Arc::new(failing))
            .with(memory.clone());

        fanout.record(sample("x")).unwrap();
        assert_eq!(memory.len(), 1);
    }
}
