// Step reporting and soft assertions
//
// Every public helper runs inside a named step. Steps nest; the active trail
// is attached to assertion failures so a report reads
// "validate menu > validate Deposit button > Expect Deposit button to be visible"
// instead of a bare stack trace. Soft failures are collected here and turned
// into a single error when the test finishes.

use crate::error::{Error, SoftFailure};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of a finished step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Passed,
    Failed,
}

/// A finished step as recorded by the [`Reporter`]
#[derive(Debug, Clone)]
pub struct StepRecord {
    /// Step names from the outermost step down to this one
    pub path: Vec<String>,
    pub outcome: StepOutcome,
    pub elapsed: Duration,
}

#[derive(Default)]
struct ReporterState {
    trail: Vec<String>,
    records: Vec<StepRecord>,
    soft_failures: Vec<SoftFailure>,
}

/// Shared per-test record of steps and soft failures.
///
/// Cloning shares the same record. A reporter belongs to exactly one test.
#[derive(Clone, Default)]
pub struct Reporter {
    state: Arc<Mutex<ReporterState>>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a named step. The step stays open until the guard is dropped
    /// or finished, whichever happens first.
    pub fn enter(&self, name: impl Into<String>) -> StepGuard {
        let name = name.into();
        let depth = {
            let mut state = self.state.lock();
            state.trail.push(name.clone());
            state.trail.len()
        };
        tracing::debug!(step = %name, depth, "step started");
        StepGuard {
            reporter: self.clone(),
            depth,
            started: Instant::now(),
            outcome: StepOutcome::Passed,
            closed: false,
        }
    }

    /// The currently open steps, outermost first
    pub fn trail(&self) -> Vec<String> {
        self.state.lock().trail.clone()
    }

    /// Finished steps in completion order
    pub fn records(&self) -> Vec<StepRecord> {
        self.state.lock().records.clone()
    }

    pub fn soft_failures(&self) -> Vec<SoftFailure> {
        self.state.lock().soft_failures.clone()
    }

    pub fn has_failures(&self) -> bool {
        !self.state.lock().soft_failures.is_empty()
    }

    /// Records a soft failure. The test keeps running.
    pub fn record_soft(&self, failure: SoftFailure) {
        tracing::warn!(
            message = %failure.message,
            step = %failure.steps.join(" > "),
            "soft assertion failed"
        );
        self.state.lock().soft_failures.push(failure);
    }

    /// Drains the recorded soft failures into an error, if there are any.
    pub fn take_soft_failures(&self) -> Option<Error> {
        let failures = std::mem::take(&mut self.state.lock().soft_failures);
        if failures.is_empty() {
            None
        } else {
            Some(Error::SoftAssertions(failures))
        }
    }

    fn close(&self, depth: usize, outcome: StepOutcome, elapsed: Duration) {
        let mut state = self.state.lock();
        if state.trail.len() < depth {
            return;
        }
        let path = state.trail[..depth].to_vec();
        state.trail.truncate(depth - 1);
        drop(state);

        match outcome {
            StepOutcome::Passed => {
                tracing::debug!(step = %path.join(" > "), ?elapsed, "step passed")
            }
            StepOutcome::Failed => {
                tracing::warn!(step = %path.join(" > "), ?elapsed, "step failed")
            }
        }
        self.state.lock().records.push(StepRecord {
            path,
            outcome,
            elapsed,
        });
    }
}

/// An open step. Closing happens on drop, so the step is popped on every
/// exit path, including `?` returns and panics.
pub struct StepGuard {
    reporter: Reporter,
    depth: usize,
    started: Instant,
    outcome: StepOutcome,
    closed: bool,
}

impl StepGuard {
    /// Marks the step as failed; it is still closed on drop.
    pub fn fail(&mut self) {
        self.outcome = StepOutcome::Failed;
    }

    /// Closes the step now with the given outcome.
    pub fn finish(mut self, outcome: StepOutcome) {
        self.outcome = outcome;
        self.close();
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.reporter
                .close(self.depth, self.outcome, self.started.elapsed());
        }
    }
}

impl Drop for StepGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.outcome = StepOutcome::Failed;
        }
        self.close();
    }
}

/// Default step label for a call: `method(args)` using the args' `Debug` form.
pub fn step_name<A: std::fmt::Debug + ?Sized>(method: &str, args: &A) -> String {
    format!("{method}({args:?})")
}
