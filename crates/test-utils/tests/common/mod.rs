// Shared helpers for integration tests
//
// Each test binary compiles this module separately; not every binary uses
// every helper.
#![allow(dead_code)]

use casino_test_utils::fake::FakeElement;
use casino_test_utils::{CompositeLocator, TestConfig, TestContext};
use std::sync::{Arc, Once};
use std::time::Duration;

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber honouring RUST_LOG, once per binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// A context with timeouts short enough for fakes
pub fn fast_context() -> TestContext {
    init_tracing();
    TestContext::new(
        TestConfig::default()
            .assertion_timeout(Duration::from_millis(50))
            .group_text_timeout(Duration::from_millis(30))
            .actionability_probe_timeout(Duration::from_millis(20))
            .load_state_timeout(Duration::from_millis(50))
            .navigation_timeout(Duration::from_millis(80))
            .poll_interval(Duration::from_millis(5)),
    )
}

pub fn locator(name: &str, element: &FakeElement) -> CompositeLocator {
    CompositeLocator::from_element(name, Arc::new(element.clone()))
}
