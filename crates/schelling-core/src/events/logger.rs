//! Move Log
//!
//! JSON Lines sink for relocations: one `MoveEvent` object per line, in the
//! order the moves happened.

use schelling_events::MoveEvent;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::warn;

use crate::systems::StepReport;

/// Buffered writer for move events. Without a file it only counts.
pub struct EventLogger {
    sink: Option<BufWriter<File>>,
    event_count: u64,
}

impl EventLogger {
    /// Truncates `path` and buffers writes to it.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self {
            sink: Some(BufWriter::new(File::create(path)?)),
            event_count: 0,
        })
    }

    /// A logger with no file behind it. Moves are still counted.
    pub fn null() -> Self {
        Self {
            sink: None,
            event_count: 0,
        }
    }

    /// Moves logged so far.
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn log(&mut self, event: &MoveEvent) -> io::Result<()> {
        if let Some(sink) = self.sink.as_mut() {
            serde_json::to_writer(&mut *sink, event)?;
            sink.write_all(b"\n")?;
        }
        self.event_count += 1;
        Ok(())
    }

    pub fn log_batch<'a, I>(&mut self, events: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'a MoveEvent>,
    {
        events.into_iter().try_for_each(|event| self.log(event))
    }

    /// Every move of a completed step.
    pub fn log_step(&mut self, report: &StepReport) -> io::Result<()> {
        self.log_batch(&report.moves)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("move log not fully written: {}", e);
        }
    }
}
