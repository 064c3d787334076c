//! CSV sink for the `index, penalties, actions` move log (`spec.md` §6).
//!
//! One row is appended per move the [`crate::search::TabuDriver`] commits;
//! wiring it to the driver's `on_commit` hook is the CLI's job.

use std::io::Write;

use thiserror::Error;

use crate::moves::Move;

#[derive(Debug, Error)]
pub enum ActionLogError {
    #[error("writing action log row: {0}")]
    Csv(#[from] csv::Error),
}

/// Wraps a [`csv::Writer`] over any [`Write`] sink, writing the header row
/// up front.
pub struct ActionLog<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ActionLog<W> {
    pub fn new(sink: W) -> Result<Self, ActionLogError> {
        let mut writer = csv::Writer::from_writer(sink);
        writer.write_record(["index", "penalties", "actions"])?;
        Ok(Self { writer })
    }

    /// Appends one committed-move row.
    pub fn record(&mut self, index: u32, penalty: u32, action: &Move) -> Result<(), ActionLogError> {
        self.writer
            .write_record([index.to_string(), penalty.to_string(), action.describe()])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ActionLogError> {
        self.writer.flush().map_err(|e| ActionLogError::Csv(e.into()))
    }
}
