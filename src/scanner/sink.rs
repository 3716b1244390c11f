//! Destinations for records discovered during a scan.
//!
//! The scanner hands each fully populated [`FileRecord`] to a [`FileSink`]
//! exactly once. A sink that fails does not stop the scan: the failure is
//! recorded against the record's path and traversal continues.
//!
//! Any `FnMut(&FileRecord) -> Result<(), SinkError>` closure is a sink. A
//! [`ChannelSink`] forwards records to another thread, such as a
//! persistence worker, over a `crossbeam-channel`.

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

use super::FileRecord;

/// Error returned by a sink that could not accept a record.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The receiving side of a channel has gone away.
    #[error("record receiver disconnected")]
    Disconnected,

    /// The sink refused the record.
    #[error("record rejected: {0}")]
    Rejected(String),
}

/// Receives each record produced by a scan.
pub trait FileSink {
    /// Accept one record.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] when the record could not be stored; the
    /// scanner records it as a per-entry failure.
    fn accept(&mut self, record: &FileRecord) -> Result<(), SinkError>;
}

impl<F> FileSink for F
where
    F: FnMut(&FileRecord) -> Result<(), SinkError>,
{
    fn accept(&mut self, record: &FileRecord) -> Result<(), SinkError> {
        self(record)
    }
}

/// Sink that discards records.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FileSink for NullSink {
    fn accept(&mut self, _record: &FileRecord) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink that forwards clones of every record over a channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<FileRecord>,
}

impl ChannelSink {
    /// Wrap an existing sender.
    #[must_use]
    pub fn new(sender: Sender<FileRecord>) -> Self {
        Self { sender }
    }

    /// Create an unbounded channel and return the sink with its receiver.
    #[must_use]
    pub fn unbounded() -> (Self, Receiver<FileRecord>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self::new(sender), receiver)
    }

    /// Create a bounded channel; the scan blocks while the receiver lags.
    #[must_use]
    pub fn bounded(capacity: usize) -> (Self, Receiver<FileRecord>) {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        (Self::new(sender), receiver)
    }
}

impl FileSink for ChannelSink {
    fn accept(&mut self, record: &FileRecord) -> Result<(), SinkError> {
        self.sender
            .send(record.clone())
            .map_err(|_| SinkError::Disconnected)
    }
}
