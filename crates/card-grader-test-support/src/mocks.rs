//! Mock implementations of core port traits.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use card_grader_core::{CardGradeRecord, CardSource, ProgressEvent, ProgressSink, ResultOutput};

/// Mock implementation of `CardSource` for testing.
///
/// Yields pre-set paths or errors and tracks iteration for assertions.
pub struct MockCardSource {
    items: Vec<Result<PathBuf, String>>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockCardSource {
    /// Creates a mock source yielding the given paths.
    #[must_use]
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self::with_items(paths.into_iter().map(Ok).collect())
    }

    /// Creates a mock source yielding paths and errors in order.
    #[must_use]
    pub fn with_items(items: Vec<Result<PathBuf, String>>) -> Self {
        Self {
            items,
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates a mock source yielding a single error.
    #[must_use]
    pub fn failing(reason: &str) -> Self {
        Self::with_items(vec![Err(reason.to_string())])
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl CardSource for MockCardSource {
    fn cards(&self) -> Box<dyn Iterator<Item = anyhow::Result<PathBuf>> + Send + '_> {
        if let Ok(mut c) = self.iteration_count.lock() {
            *c += 1;
        }
        Box::new(
            self.items
                .iter()
                .map(|item| item.clone().map_err(anyhow::Error::msg)),
        )
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures records for later assertions.
pub struct MockResultOutput {
    records: Arc<Mutex<Vec<CardGradeRecord>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured records.
    #[must_use]
    pub fn records(&self) -> Vec<CardGradeRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockResultOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, record: &CardGradeRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Ok(mut c) = self.flush_count.lock() {
            *c += 1;
        }
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Started { .. }))
            .count()
    }

    /// Returns the number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Completed { .. }))
            .count()
    }

    /// Returns the number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Skipped { .. }))
            .count()
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { processed, skipped } => Some((*processed, *skipped)),
            _ => None,
        })
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
