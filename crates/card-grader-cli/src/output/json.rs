//! JSON output adapter.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;
use card_grader_core::{CardGradeRecord, ResultOutput};
use serde::Serialize;

/// JSON / JSON Lines output adapter.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Writes any serializable value as one JSON document.
    #[allow(clippy::significant_drop_tightening)]
    pub fn write_value<T: Serialize + ?Sized>(&self, value: &T, pretty: bool) -> Result<()> {
        let json = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }

    /// Writes a batch of records as a JSON array.
    pub fn write_array(&self, records: &[CardGradeRecord], pretty: bool) -> Result<()> {
        self.write_value(records, pretty)
    }
}

impl ResultOutput for JsonOutput {
    fn write(&self, record: &CardGradeRecord) -> Result<()> {
        self.write_value(record, false)
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}
