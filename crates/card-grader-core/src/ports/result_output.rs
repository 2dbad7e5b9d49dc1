//! Result output port for writing grading records.

use crate::domain::CardGradeRecord;

/// Port for emitting graded cards.
pub trait ResultOutput: Send + Sync {
    /// Writes a single grading record.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, record: &CardGradeRecord) -> anyhow::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
