// Error types for casino-test-utils
//
// Three kinds of failure reach callers: assertion failures (a UI condition
// was not met in time), configuration errors (the test itself is wrong) and
// driver errors (the automation engine failed underneath us).

use thiserror::Error;

/// Result type alias for helper operations
pub type Result<T> = std::result::Result<T, Error>;

/// A soft assertion failure recorded while the test kept running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftFailure {
    /// Failure message naming the element and the expected condition
    pub message: String,
    /// Step trail active when the failure was recorded, outermost first
    pub steps: Vec<String>,
}

impl std::fmt::Display for SoftFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.steps.is_empty() {
            write!(f, " [step: {}]", self.steps.join(" > "))?;
        }
        Ok(())
    }
}

/// Errors that can occur while asserting on or interacting with the UI
#[derive(Debug, Error)]
pub enum Error {
    /// Expected condition was not met within the timeout
    ///
    /// Timeouts and plain mismatches share this variant; both name the
    /// element and the condition that was expected.
    #[error("Assertion failed: {message}{}", format_steps(.steps))]
    Assertion {
        message: String,
        steps: Vec<String>,
    },

    /// The test is misconfigured (bad index, null expectation, missing
    /// attribute on a custom component). Never downgraded to a soft failure.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An action (click, fill, ...) could not complete within its timeout
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Soft assertion failures collected over the course of a test
    #[error("{} soft assertion(s) failed:\n{}", .0.len(), format_soft(.0))]
    SoftAssertions(Vec<SoftFailure>),

    /// The browser automation engine reported an error
    #[error("Driver error: {0}")]
    Driver(#[from] playwright_rs::Error),

    /// I/O error (session state files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Returns true for failures that may be recorded softly.
    ///
    /// Only assertion failures qualify; a context wrapper is looked through.
    pub fn is_assertion(&self) -> bool {
        match self {
            Error::Assertion { .. } => true,
            Error::Context(_, inner) => inner.is_assertion(),
            _ => false,
        }
    }

    /// Returns true if the error reports a misconfigured test.
    pub fn is_configuration(&self) -> bool {
        match self {
            Error::Configuration(_) => true,
            Error::Context(_, inner) => inner.is_configuration(),
            _ => false,
        }
    }
}

fn format_steps(steps: &[String]) -> String {
    if steps.is_empty() {
        String::new()
    } else {
        format!("\n  in step: {}", steps.join(" > "))
    }
}

fn format_soft(failures: &[SoftFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("  - {f}"))
        .collect::<Vec<_>>()
        .join("\n")
}
