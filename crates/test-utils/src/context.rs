// Test context
//
// The handle every helper hangs off: configuration, the step/soft-failure
// reporter, and the failure mode (hard or soft) for assertions issued
// through it.

use crate::config::TestConfig;
use crate::error::{Error, Result, SoftFailure};
use crate::report::{Reporter, StepOutcome};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// Per-test handle to the helper library.
///
/// Cloning is cheap; clones share configuration and reporter. `soft()` and
/// `hard()` return clones that differ only in failure mode.
///
/// # Example
///
/// ```ignore
/// let ctx = TestContext::new(TestConfig::from_env()?);
///
/// // Hard: the first failure returns Err and the test stops.
/// ctx.assert_visible(&landing.logo()).await?;
///
/// // Soft: failures are recorded, execution continues.
/// let soft = ctx.soft();
/// soft.assert_visible(&landing.login_button()).await?;
/// soft.assert_visible(&landing.register_button()).await?;
///
/// // Fails the test if anything soft failed above.
/// ctx.finish()?;
/// ```
#[derive(Clone)]
pub struct TestContext {
    config: Arc<TestConfig>,
    reporter: Reporter,
    soft: bool,
}

impl TestContext {
    pub fn new(config: TestConfig) -> Self {
        Self {
            config: Arc::new(config),
            reporter: Reporter::new(),
            soft: false,
        }
    }

    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// A clone whose assertions record failures instead of returning them
    pub fn soft(&self) -> Self {
        self.with_soft(true)
    }

    /// A clone whose assertions return failures immediately
    pub fn hard(&self) -> Self {
        self.with_soft(false)
    }

    pub fn with_soft(&self, soft: bool) -> Self {
        Self {
            config: Arc::clone(&self.config),
            reporter: self.reporter.clone(),
            soft,
        }
    }

    pub fn is_soft(&self) -> bool {
        self.soft
    }

    /// Runs `body` as a named, nestable step.
    ///
    /// The step is traced as a span and kept on the reporter's trail while
    /// `body` runs. Errors from `body` are returned unchanged.
    pub async fn step<T, F>(&self, name: impl Into<String>, body: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let name = name.into();
        let span = tracing::info_span!("step", name = %name);
        let guard = self.reporter.enter(name);
        let result = body.instrument(span).await;
        guard.finish(if result.is_ok() {
            StepOutcome::Passed
        } else {
            StepOutcome::Failed
        });
        result
    }

    /// Runs `body` as a step whose name is computed from its arguments.
    pub async fn step_param<A, N, T, F>(&self, args: &A, name_fn: N, body: F) -> Result<T>
    where
        A: ?Sized,
        N: FnOnce(&A) -> String,
        F: Future<Output = Result<T>>,
    {
        self.step(name_fn(args), body).await
    }

    /// Builds an assertion failure carrying the current step trail.
    pub fn failure(&self, message: impl Into<String>) -> Error {
        Error::Assertion {
            message: message.into(),
            steps: self.reporter.trail(),
        }
    }

    /// Applies the failure mode to an assertion result.
    ///
    /// In soft mode an assertion failure is recorded and `Ok(())` returned.
    /// Configuration, driver and timeout errors always propagate.
    pub fn settle(&self, result: Result<()>) -> Result<()> {
        self.settle_as(self.soft, result)
    }

    pub(crate) fn settle_as(&self, soft: bool, result: Result<()>) -> Result<()> {
        match result {
            Err(err) if soft && err.is_assertion() => {
                self.reporter.record_soft(soft_failure(err));
                Ok(())
            }
            other => other,
        }
    }

    /// Settles independent checks that ran together.
    ///
    /// Soft mode records every assertion failure; hard mode returns the
    /// first. Non-assertion errors always win over recorded failures.
    pub(crate) fn settle_all(&self, results: Vec<Result<()>>) -> Result<()> {
        let mut first_error = None;
        for result in results {
            if let Err(err) = self.settle(result) {
                if first_error.is_none() || !err.is_assertion() {
                    first_error = Some(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Ends the test: fails with every recorded soft failure, if any.
    pub fn finish(&self) -> Result<()> {
        match self.reporter.take_soft_failures() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Polls `probe` until it yields `true` or `timeout` elapses.
    ///
    /// Returns whether the condition was met. Probe errors propagate.
    pub(crate) async fn poll_until<F, Fut>(&self, timeout: Duration, mut probe: F) -> Result<bool>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let start = tokio::time::Instant::now();
        loop {
            if probe().await? {
                return Ok(true);
            }
            if start.elapsed() >= timeout {
                return Ok(false);
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}

fn soft_failure(err: Error) -> SoftFailure {
    match err {
        Error::Assertion { message, steps } => SoftFailure { message, steps },
        Error::Context(context, inner) => {
            let mut failure = soft_failure(*inner);
            failure.message = format!("{context}: {}", failure.message);
            failure
        }
        other => SoftFailure {
            message: other.to_string(),
            steps: Vec::new(),
        },
    }
}

impl std::fmt::Debug for TestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestContext")
            .field("base_url", &self.config.base_url.as_str())
            .field("soft", &self.soft)
            .finish()
    }
}
