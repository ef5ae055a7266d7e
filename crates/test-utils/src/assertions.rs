// Element state assertions
//
// One engine dispatches over {visible, enabled, editable} x {positive,
// negative}. Every convenience wrapper below forwards to it.

use crate::context::TestContext;
use crate::driver::Element;
use crate::error::Result;
use crate::locator::CompositeLocator;
use std::time::Duration;

/// Which element state to check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Visible,
    Enabled,
    Editable,
}

impl StateKind {
    fn as_str(self) -> &'static str {
        match self {
            StateKind::Visible => "visible",
            StateKind::Enabled => "enabled",
            StateKind::Editable => "editable",
        }
    }

    /// Asks the element once, without waiting
    pub async fn probe(self, element: &dyn Element) -> Result<bool> {
        match self {
            StateKind::Visible => element.is_visible().await,
            StateKind::Enabled => element.is_enabled().await,
            StateKind::Editable => element.is_editable().await,
        }
    }
}

/// Whether the state must hold or must not hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Positive,
    Negative,
}

/// One state check against an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateCheck {
    pub kind: StateKind,
    pub mode: Mode,
    /// Replaces the element name in the expectation message
    pub description: Option<String>,
}

impl StateCheck {
    pub fn new(kind: StateKind, mode: Mode) -> Self {
        Self {
            kind,
            mode,
            description: None,
        }
    }

    pub fn visible() -> Self {
        Self::new(StateKind::Visible, Mode::Positive)
    }

    pub fn not_visible() -> Self {
        Self::new(StateKind::Visible, Mode::Negative)
    }

    pub fn enabled() -> Self {
        Self::new(StateKind::Enabled, Mode::Positive)
    }

    pub fn not_enabled() -> Self {
        Self::new(StateKind::Enabled, Mode::Negative)
    }

    pub fn editable() -> Self {
        Self::new(StateKind::Editable, Mode::Positive)
    }

    pub fn not_editable() -> Self {
        Self::new(StateKind::Editable, Mode::Negative)
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// "Expect Deposit button to be visible" / "... not to be visible"
    pub fn expectation(&self, element_name: &str) -> String {
        let subject = self.description.as_deref().unwrap_or(element_name);
        let negation = match self.mode {
            Mode::Positive => "",
            Mode::Negative => "not ",
        };
        format!("Expect {subject} {negation}to be {}", self.kind.as_str())
    }
}

impl TestContext {
    /// Asserts one state of `element`, polling up to the assertion timeout.
    ///
    /// Positive mode passes once the state holds; negative mode once it does
    /// not. Failure follows the context's mode (hard or soft).
    pub async fn assert_element_state(
        &self,
        element: &CompositeLocator,
        check: &StateCheck,
    ) -> Result<()> {
        let expectation = check.expectation(element.name());
        let result = self
            .step(expectation.clone(), self.check_state(element, check, &expectation))
            .await;
        self.settle(result)
    }

    /// Asserts several states of one element, in order.
    ///
    /// Soft mode runs every check regardless of earlier failures; hard mode
    /// stops at the first failure.
    pub async fn assert_element_states(
        &self,
        element: &CompositeLocator,
        checks: &[StateCheck],
    ) -> Result<()> {
        let summary = checks
            .iter()
            .map(|c| {
                let negation = if c.mode == Mode::Negative { "not " } else { "" };
                format!("{negation}{}", c.kind.as_str())
            })
            .collect::<Vec<_>>()
            .join(", ");
        self.step(format!("Expect {} to be {summary}", element.name()), async {
            for check in checks {
                self.assert_element_state(element, check).await?;
            }
            Ok(())
        })
        .await
    }

    /// Polls a single state check; no step, no soft handling.
    pub(crate) async fn check_state(
        &self,
        element: &CompositeLocator,
        check: &StateCheck,
        expectation: &str,
    ) -> Result<()> {
        self.check_state_within(element, check, expectation, self.config().assertion_timeout)
            .await
    }

    pub(crate) async fn check_state_within(
        &self,
        element: &CompositeLocator,
        check: &StateCheck,
        expectation: &str,
        timeout: Duration,
    ) -> Result<()> {
        let want = check.mode == Mode::Positive;
        let met = self
            .poll_until(timeout, move || async move {
                let resolved = element.resolve().await?;
                Ok(check.kind.probe(resolved.as_ref()).await? == want)
            })
            .await?;
        if met {
            Ok(())
        } else {
            Err(self.failure(format!("{expectation} (timed out after {timeout:?})")))
        }
    }

    pub async fn assert_visible(&self, element: &CompositeLocator) -> Result<()> {
        self.assert_element_state(element, &StateCheck::visible())
            .await
    }

    pub async fn assert_not_visible(&self, element: &CompositeLocator) -> Result<()> {
        self.assert_element_state(element, &StateCheck::not_visible())
            .await
    }

    pub async fn assert_enabled(&self, element: &CompositeLocator) -> Result<()> {
        self.assert_element_state(element, &StateCheck::enabled())
            .await
    }

    pub async fn assert_not_enabled(&self, element: &CompositeLocator) -> Result<()> {
        self.assert_element_state(element, &StateCheck::not_enabled())
            .await
    }

    pub async fn assert_editable(&self, element: &CompositeLocator) -> Result<()> {
        self.assert_element_state(element, &StateCheck::editable())
            .await
    }

    pub async fn assert_not_editable(&self, element: &CompositeLocator) -> Result<()> {
        self.assert_element_state(element, &StateCheck::not_editable())
            .await
    }

    pub async fn assert_visible_and_enabled(&self, element: &CompositeLocator) -> Result<()> {
        self.assert_element_states(element, &[StateCheck::visible(), StateCheck::enabled()])
            .await
    }

    /// Visible, enabled and editable: a field the user can type into
    pub async fn assert_interactive(&self, element: &CompositeLocator) -> Result<()> {
        self.assert_element_states(
            element,
            &[
                StateCheck::visible(),
                StateCheck::enabled(),
                StateCheck::editable(),
            ],
        )
        .await
    }

    /// Asserts the element is rendered but a click would not land on it
    /// (covered by an overlay, under a spinner).
    ///
    /// The probe is a trial click bounded by the actionability probe
    /// timeout; its errors are swallowed and read as "not actionable".
    pub async fn assert_visible_not_actionable(&self, element: &CompositeLocator) -> Result<()> {
        let name = element.name().to_string();
        self.step(format!("Expect {name} to be visible but not actionable"), async {
            self.assert_visible(element).await?;
            let resolved = element.resolve().await?;
            let actionable = resolved
                .is_actionable(self.config().actionability_probe_timeout)
                .await;
            let result = if actionable {
                Err(self.failure(format!(
                    "Expect {name} not to be actionable, but a trial click succeeded"
                )))
            } else {
                Ok(())
            };
            self.settle(result)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestConfig;
    use crate::error::Error;
    use crate::fake::FakeElement;
    use std::sync::Arc;

    fn ctx() -> TestContext {
        TestContext::new(
            TestConfig::default()
                .assertion_timeout(Duration::from_millis(60))
                .poll_interval(Duration::from_millis(5)),
        )
    }

    fn locator(name: &str, element: &FakeElement) -> CompositeLocator {
        CompositeLocator::from_element(name, Arc::new(element.clone()))
    }

    #[test]
    fn test_expectation_messages() {
        assert_eq!(
            StateCheck::visible().expectation("Deposit button"),
            "Expect Deposit button to be visible"
        );
        assert_eq!(
            StateCheck::not_enabled().expectation("Submit"),
            "Expect Submit not to be enabled"
        );
        assert_eq!(
            StateCheck::editable()
                .described("first name field")
                .expectation("input"),
            "Expect first name field to be editable"
        );
    }

    #[tokio::test]
    async fn test_positive_and_negative_are_complements() {
        let ctx = ctx();
        for kind in [StateKind::Visible, StateKind::Enabled, StateKind::Editable] {
            for state in [true, false] {
                let element = FakeElement::new("#el")
                    .visible(state)
                    .enabled(state)
                    .editable(state);
                let loc = locator("element", &element);
                let positive = ctx
                    .assert_element_state(&loc, &StateCheck::new(kind, Mode::Positive))
                    .await;
                let negative = ctx
                    .assert_element_state(&loc, &StateCheck::new(kind, Mode::Negative))
                    .await;
                assert_eq!(positive.is_ok(), state, "{kind:?} positive with state {state}");
                assert_eq!(negative.is_ok(), !state, "{kind:?} negative with state {state}");
            }
        }
    }

    #[tokio::test]
    async fn test_visibility_assertion_is_idempotent() {
        let ctx = ctx();
        let loc = locator("logo", &FakeElement::new("#logo"));
        assert!(ctx.assert_visible(&loc).await.is_ok());
        assert!(ctx.assert_visible(&loc).await.is_ok());
    }

    #[tokio::test]
    async fn test_polls_until_state_changes() {
        let ctx = ctx();
        let element = FakeElement::new("#modal").visible(false);
        element.change_after(Duration::from_millis(15), |e| e.set_visible(true));
        ctx.assert_visible(&locator("wallet modal", &element))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_hard_failure_names_element() {
        let ctx = ctx();
        let err = ctx
            .assert_visible(&locator("Deposit button", &FakeElement::new("#d").visible(false)))
            .await
            .unwrap_err();
        match err {
            Error::Assertion { message, steps } => {
                assert!(message.starts_with("Expect Deposit button to be visible"));
                assert_eq!(steps, vec!["Expect Deposit button to be visible"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_soft_states_run_every_check() {
        let ctx = ctx().soft();
        let element = FakeElement::new("#submit").visible(false).enabled(false);
        ctx.assert_element_states(
            &locator("Submit", &element),
            &[StateCheck::visible(), StateCheck::enabled()],
        )
        .await
        .unwrap();
        assert_eq!(ctx.reporter().soft_failures().len(), 2);
        assert!(ctx.finish().is_err());
    }

    #[tokio::test]
    async fn test_hard_states_stop_at_first_failure() {
        let ctx = ctx();
        let element = FakeElement::new("#submit").visible(false).enabled(false);
        let err = ctx
            .assert_element_states(
                &locator("Submit", &element),
                &[StateCheck::visible(), StateCheck::enabled()],
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("to be visible"));
        let records = ctx.reporter().records();
        assert!(
            !records
                .iter()
                .any(|r| r.path.last().is_some_and(|s| s.contains("to be enabled")))
        );
    }

    #[tokio::test]
    async fn test_visible_not_actionable() {
        let ctx = ctx();
        let covered = FakeElement::new("#play").actionable(false);
        ctx.assert_visible_not_actionable(&locator("Play button", &covered))
            .await
            .unwrap();

        let free = FakeElement::new("#play");
        assert!(
            ctx.assert_visible_not_actionable(&locator("Play button", &free))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_interactive_requires_editable() {
        let ctx = ctx();
        let readonly = FakeElement::new("#amount").editable(false);
        assert!(ctx.assert_interactive(&locator("amount", &readonly)).await.is_err());
        let input = FakeElement::new("#amount");
        assert!(ctx.assert_interactive(&locator("amount", &input)).await.is_ok());
    }
}
