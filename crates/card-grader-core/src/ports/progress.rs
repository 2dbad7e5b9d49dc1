//! Progress reporting port for UI integration.

use crate::domain::Grade;

/// Events emitted while grading a batch of cards.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Grading started for a card.
    Started {
        /// Path to the card image.
        path: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total cards in batch, if known.
        total: Option<usize>,
    },
    /// A card was graded.
    Completed {
        /// Path to the card image.
        path: String,
        /// Predicted grade.
        grade: Grade,
        /// Weighted overall score.
        score: f64,
    },
    /// A card was skipped due to an error.
    Skipped {
        /// Path to the card image.
        path: String,
        /// Reason for skipping.
        reason: String,
    },
    /// All cards have been processed.
    Finished {
        /// Cards graded successfully.
        processed: usize,
        /// Cards skipped.
        skipped: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
