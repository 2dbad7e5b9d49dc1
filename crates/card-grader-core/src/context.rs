//! Per-card request context for log correlation and step tracing.
//!
//! The caller creates one context per card and threads it through the
//! pipeline. The grading engine never sees it.

use std::time::{Duration, Instant};

use tracing::{debug, info, info_span, Span};
use uuid::Uuid;

/// Length of the request id prefix shown in log lines.
const SHORT_ID_LEN: usize = 8;

/// One recorded pipeline step.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStep {
    /// Time since the context was created.
    pub at: Duration,
    /// Step description.
    pub name: String,
    /// How long the step took, when timed.
    pub took: Option<Duration>,
}

impl TraceStep {
    /// Renders the step as a single log-friendly line.
    #[must_use]
    pub fn render(&self) -> String {
        match self.took {
            Some(took) => format!(
                "[{:.4}s] {} ({:.4}s)",
                self.at.as_secs_f64(),
                self.name,
                took.as_secs_f64()
            ),
            None => format!("[{:.4}s] {}", self.at.as_secs_f64(), self.name),
        }
    }
}

/// Request id plus the tracing and timing switches for one card.
#[derive(Debug)]
pub struct RequestContext {
    request_id: Uuid,
    trace: bool,
    timing: bool,
    started: Instant,
    steps: Vec<TraceStep>,
}

impl RequestContext {
    /// Creates a context with a fresh random request id.
    #[must_use]
    pub fn new(trace: bool, timing: bool) -> Self {
        Self::with_id(Uuid::new_v4(), trace, timing)
    }

    /// Creates a context with a caller-supplied request id.
    #[must_use]
    pub fn with_id(request_id: Uuid, trace: bool, timing: bool) -> Self {
        Self {
            request_id,
            trace,
            timing,
            started: Instant::now(),
            steps: Vec::new(),
        }
    }

    /// Full request id.
    #[must_use]
    pub fn request_id(&self) -> String {
        self.request_id.to_string()
    }

    /// First eight characters of the request id.
    #[must_use]
    pub fn short_id(&self) -> String {
        self.request_id
            .simple()
            .to_string()
            .chars()
            .take(SHORT_ID_LEN)
            .collect()
    }

    /// Returns true if steps are being recorded.
    #[must_use]
    pub const fn is_tracing(&self) -> bool {
        self.trace
    }

    /// Returns true if steps are being timed.
    #[must_use]
    pub const fn is_timing(&self) -> bool {
        self.timing
    }

    /// Span that tags every log line emitted inside it with the short id.
    #[must_use]
    pub fn span(&self) -> Span {
        info_span!("card", request_id = %self.short_id())
    }

    /// Records a checkpoint when tracing is on.
    pub fn checkpoint(&mut self, name: impl Into<String>) {
        if !self.trace {
            return;
        }
        let step = TraceStep {
            at: self.started.elapsed(),
            name: name.into(),
            took: None,
        };
        debug!("Checkpoint: {}", step.name);
        self.steps.push(step);
    }

    /// Runs `f` as a named step, recording and timing it as configured.
    pub fn timed<T>(&mut self, name: &str, f: impl FnOnce() -> T) -> T {
        if !self.trace && !self.timing {
            return f();
        }

        let at = self.started.elapsed();
        let begin = Instant::now();
        let value = f();
        let took = begin.elapsed();

        if self.timing {
            info!("Completed: {name} in {:.4}s", took.as_secs_f64());
        }
        if self.trace {
            self.steps.push(TraceStep {
                at,
                name: name.to_string(),
                took: self.timing.then_some(took),
            });
        }
        value
    }

    /// Time since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Recorded steps, oldest first.
    #[must_use]
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    /// Logs a summary of the request when tracing is on.
    pub fn log_summary(&self) {
        if !self.trace {
            return;
        }
        info!(
            "Request {} finished in {:.4}s with {} steps",
            self.short_id(),
            self.elapsed().as_secs_f64(),
            self.steps.len()
        );
        for step in &self.steps {
            debug!("  {}", step.render());
        }
    }

    /// Consumes the context, returning rendered step lines.
    #[must_use]
    pub fn into_step_lines(self) -> Vec<String> {
        self.steps.iter().map(TraceStep::render).collect()
    }
}
