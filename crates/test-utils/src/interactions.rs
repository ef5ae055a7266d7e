// Interaction engine
//
// click / fill / hover / focus / select share one shape: run the precondition
// checks for the action (unless skipped), then drive the element with the
// action-specific options. Chains run strictly in order.

use crate::assertions::StateCheck;
use crate::attributes::{AttributeMap, Matching};
use crate::context::TestContext;
use crate::driver::Element;
use crate::error::{Error, Result};
use crate::locator::CompositeLocator;
use playwright_rs::protocol::{
    ClickOptions, FillOptions, HoverOptions, KeyboardModifier, MouseButton, SelectOption,
    SelectOptions,
};
use std::future::Future;
use std::time::Duration;

/// Options for a single interaction.
///
/// Every field is optional so that per-step options can be layered over
/// chain-wide defaults with [`InteractionOptions::merge`].
#[derive(Debug, Clone, Default)]
pub struct InteractionOptions {
    pub skip_precondition_checks: Option<bool>,
    /// Replaces the action's default preconditions
    pub preconditions: Option<Vec<StateCheck>>,
    pub force: Option<bool>,
    pub timeout: Option<Duration>,
    /// Overrides the context's failure mode for the preconditions
    pub soft_assert: Option<bool>,

    // click
    pub button: Option<MouseButton>,
    pub click_count: Option<u32>,
    pub modifiers: Option<Vec<KeyboardModifier>>,

    // fill
    pub clear: Option<bool>,
    pub select_all: Option<bool>,
}

impl InteractionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_precondition_checks(mut self) -> Self {
        self.skip_precondition_checks = Some(true);
        self
    }

    pub fn preconditions(mut self, checks: Vec<StateCheck>) -> Self {
        self.preconditions = Some(checks);
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = Some(force);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn soft_assert(mut self, soft: bool) -> Self {
        self.soft_assert = Some(soft);
        self
    }

    pub fn button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    pub fn click_count(mut self, count: u32) -> Self {
        self.click_count = Some(count);
        self
    }

    pub fn modifiers(mut self, modifiers: Vec<KeyboardModifier>) -> Self {
        self.modifiers = Some(modifiers);
        self
    }

    pub fn clear(mut self, clear: bool) -> Self {
        self.clear = Some(clear);
        self
    }

    pub fn select_all(mut self, select_all: bool) -> Self {
        self.select_all = Some(select_all);
        self
    }

    /// Fields set on `self` win; unset fields fall back to `defaults`.
    pub fn merge(self, defaults: &InteractionOptions) -> Self {
        Self {
            skip_precondition_checks: self
                .skip_precondition_checks
                .or(defaults.skip_precondition_checks),
            preconditions: self.preconditions.or_else(|| defaults.preconditions.clone()),
            force: self.force.or(defaults.force),
            timeout: self.timeout.or(defaults.timeout),
            soft_assert: self.soft_assert.or(defaults.soft_assert),
            button: self.button.or(defaults.button),
            click_count: self.click_count.or(defaults.click_count),
            modifiers: self.modifiers.or_else(|| defaults.modifiers.clone()),
            clear: self.clear.or(defaults.clear),
            select_all: self.select_all.or(defaults.select_all),
        }
    }

    fn timeout_ms(&self, ctx: &TestContext) -> f64 {
        self.timeout
            .unwrap_or(ctx.config().action_timeout)
            .as_millis() as f64
    }

    fn click_options(&self, ctx: &TestContext) -> ClickOptions {
        let mut builder = ClickOptions::builder()
            .force(self.force.unwrap_or(false))
            .timeout(self.timeout_ms(ctx));
        if let Some(button) = self.button {
            builder = builder.button(button);
        }
        if let Some(count) = self.click_count {
            builder = builder.click_count(count);
        }
        if let Some(modifiers) = &self.modifiers {
            builder = builder.modifiers(modifiers.clone());
        }
        builder.build()
    }

    fn fill_options(&self, ctx: &TestContext) -> FillOptions {
        FillOptions::builder()
            .force(self.force.unwrap_or(false))
            .timeout(self.timeout_ms(ctx))
            .build()
    }

    fn hover_options(&self, ctx: &TestContext) -> HoverOptions {
        let mut builder = HoverOptions::builder()
            .force(self.force.unwrap_or(false))
            .timeout(self.timeout_ms(ctx));
        if let Some(modifiers) = &self.modifiers {
            builder = builder.modifiers(modifiers.clone());
        }
        builder.build()
    }

    fn select_options(&self, ctx: &TestContext) -> SelectOptions {
        SelectOptions::builder()
            .force(self.force.unwrap_or(false))
            .timeout(self.timeout_ms(ctx))
            .build()
    }
}

/// What to do with an element
#[derive(Debug, Clone)]
pub enum Action {
    Click,
    Fill(String),
    Hover,
    Focus,
    Select(SelectOption),
}

impl Action {
    /// Default preconditions for the action
    pub fn default_preconditions(&self) -> Vec<StateCheck> {
        match self {
            Action::Click | Action::Hover | Action::Focus => vec![StateCheck::visible()],
            Action::Fill(_) => vec![StateCheck::visible(), StateCheck::editable()],
            Action::Select(_) => vec![StateCheck::visible(), StateCheck::enabled()],
        }
    }

    fn describe(&self, element: &str) -> String {
        match self {
            Action::Click => format!("Click {element}"),
            Action::Fill(value) => format!("Fill {element} with '{value}'"),
            Action::Hover => format!("Hover {element}"),
            Action::Focus => format!("Focus {element}"),
            Action::Select(option) => format!("Select {option:?} in {element}"),
        }
    }
}

/// One entry of an interaction chain
#[derive(Debug, Clone)]
pub struct InteractionStep {
    pub element: CompositeLocator,
    pub action: Action,
    pub options: Option<InteractionOptions>,
}

impl InteractionStep {
    pub fn new(element: &CompositeLocator, action: Action) -> Self {
        Self {
            element: element.clone(),
            action,
            options: None,
        }
    }

    pub fn with_options(mut self, options: InteractionOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// Which branch [`TestContext::click_if_visible_or_fallback`] took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Clicked,
    FellBack,
}

/// Attribute values of a custom (non-native) checkbox in each state.
///
/// ```ignore
/// let remember_me = ToggleAttributes::new(
///     AttributeMap::single("aria-checked", "true"),
///     AttributeMap::single("aria-checked", "false"),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ToggleAttributes {
    pub checked: AttributeMap,
    pub unchecked: AttributeMap,
}

impl ToggleAttributes {
    pub fn new(checked: AttributeMap, unchecked: AttributeMap) -> Self {
        Self { checked, unchecked }
    }

    fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .checked
            .iter()
            .chain(self.unchecked.iter())
            .map(|(name, _)| name)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

impl TestContext {
    pub async fn click_element(
        &self,
        element: &CompositeLocator,
        options: Option<InteractionOptions>,
    ) -> Result<()> {
        self.interact(element, &Action::Click, options.unwrap_or_default())
            .await
    }

    pub async fn fill_element(
        &self,
        element: &CompositeLocator,
        value: &str,
        options: Option<InteractionOptions>,
    ) -> Result<()> {
        self.interact(
            element,
            &Action::Fill(value.to_string()),
            options.unwrap_or_default(),
        )
        .await
    }

    pub async fn hover_element(
        &self,
        element: &CompositeLocator,
        options: Option<InteractionOptions>,
    ) -> Result<()> {
        self.interact(element, &Action::Hover, options.unwrap_or_default())
            .await
    }

    pub async fn focus_element(
        &self,
        element: &CompositeLocator,
        options: Option<InteractionOptions>,
    ) -> Result<()> {
        self.interact(element, &Action::Focus, options.unwrap_or_default())
            .await
    }

    pub async fn select_option(
        &self,
        element: &CompositeLocator,
        option: impl Into<SelectOption>,
        options: Option<InteractionOptions>,
    ) -> Result<()> {
        self.interact(
            element,
            &Action::Select(option.into()),
            options.unwrap_or_default(),
        )
        .await
    }

    /// Runs `steps` one after another, each step's options merged over
    /// `defaults`. Stops at the first error.
    pub async fn perform_interaction_chain(
        &self,
        steps: &[InteractionStep],
        defaults: Option<InteractionOptions>,
    ) -> Result<()> {
        let defaults = defaults.unwrap_or_default();
        self.step(format!("Perform {} interactions", steps.len()), async {
            for step in steps {
                let options = step.options.clone().unwrap_or_default().merge(&defaults);
                self.interact(&step.element, &step.action, options).await?;
            }
            Ok(())
        })
        .await
    }

    /// Clicks `element` if it is visible right now, otherwise runs
    /// `fallback` once.
    ///
    /// Visibility is probed once, without waiting. The original click is not
    /// retried after the fallback.
    pub async fn click_if_visible_or_fallback<F, Fut>(
        &self,
        element: &CompositeLocator,
        fallback: F,
    ) -> Result<ClickOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let name = element.name().to_string();
        self.step(format!("Click {name} if visible, otherwise fall back"), async {
            let visible = element.resolve().await?.is_visible().await?;
            if visible {
                self.click_element(
                    element,
                    Some(InteractionOptions::new().skip_precondition_checks()),
                )
                .await?;
                Ok(ClickOutcome::Clicked)
            } else {
                tracing::debug!(element = %name, "not visible, running fallback");
                fallback().await?;
                Ok(ClickOutcome::FellBack)
            }
        })
        .await
    }

    /// Brings a custom checkbox into its checked state.
    ///
    /// Missing state attributes are a configuration error. Already checked
    /// is a no-op; otherwise the element is clicked once and the checked
    /// attributes must then match exactly (hard, never retried).
    pub async fn ensure_button_checkbox_is_checked(
        &self,
        element: &CompositeLocator,
        states: &ToggleAttributes,
    ) -> Result<()> {
        self.ensure_toggle_state(element, states, &states.checked, "checked")
            .await
    }

    /// Counterpart of [`TestContext::ensure_button_checkbox_is_checked`].
    pub async fn ensure_button_checkbox_is_unchecked(
        &self,
        element: &CompositeLocator,
        states: &ToggleAttributes,
    ) -> Result<()> {
        self.ensure_toggle_state(element, states, &states.unchecked, "unchecked")
            .await
    }

    async fn ensure_toggle_state(
        &self,
        element: &CompositeLocator,
        states: &ToggleAttributes,
        desired: &AttributeMap,
        label: &str,
    ) -> Result<()> {
        let name = element.name().to_string();
        self.step(format!("Ensure {name} is {label}"), async {
            let resolved = element.resolve().await?;
            let mut in_state = true;
            for attribute in states.names() {
                if resolved.attribute(attribute).await?.is_none() {
                    return Err(Error::Configuration(format!(
                        "{name} does not expose the '{attribute}' attribute needed to read its state"
                    )));
                }
            }
            for (attribute, expected) in desired.iter() {
                let actual = resolved.attribute(attribute).await?;
                if !expected.matches(actual.as_deref(), Matching::Exact) {
                    in_state = false;
                }
            }
            if in_state {
                tracing::debug!(element = %name, state = label, "already in state");
                return Ok(());
            }

            self.click_element(element, None).await?;
            self.hard().validate_attributes(element, desired).await
        })
        .await
    }

    async fn interact(
        &self,
        element: &CompositeLocator,
        action: &Action,
        options: InteractionOptions,
    ) -> Result<()> {
        self.step(action.describe(element.name()), async {
            if !options.skip_precondition_checks.unwrap_or(false) {
                let soft = options.soft_assert.unwrap_or(self.is_soft());
                let checks = options
                    .preconditions
                    .clone()
                    .unwrap_or_else(|| action.default_preconditions());
                let mut failed = false;
                for check in &checks {
                    let expectation = check.expectation(element.name());
                    let result = self.check_state(element, check, &expectation).await;
                    if result.is_err() {
                        failed = true;
                    }
                    self.settle_as(soft, result)?;
                }
                if failed {
                    tracing::warn!(element = %element.name(), "precondition failed, skipping action");
                    return Ok(());
                }
            }

            let resolved = element.resolve().await?;
            self.perform(resolved.as_ref(), action, &options).await
        })
        .await
    }

    async fn perform(
        &self,
        element: &dyn Element,
        action: &Action,
        options: &InteractionOptions,
    ) -> Result<()> {
        match action {
            Action::Click => element.click(options.click_options(self)).await,
            Action::Fill(value) => {
                if options.clear.unwrap_or(false) {
                    element.clear(options.fill_options(self)).await?;
                }
                if options.select_all.unwrap_or(false) {
                    element.select_all().await?;
                }
                element.fill(value, options.fill_options(self)).await
            }
            Action::Hover => element.hover(options.hover_options(self)).await,
            Action::Focus => element.focus().await,
            Action::Select(option) => element
                .select_option(option.clone(), options.select_options(self))
                .await
                .map(|_| ()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestConfig;
    use crate::fake::FakeElement;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ctx() -> TestContext {
        TestContext::new(
            TestConfig::default()
                .assertion_timeout(Duration::from_millis(40))
                .poll_interval(Duration::from_millis(5)),
        )
    }

    fn locator(name: &str, element: &FakeElement) -> CompositeLocator {
        CompositeLocator::from_element(name, Arc::new(element.clone()))
    }

    #[test]
    fn test_merge_prefers_step_options() {
        let defaults = InteractionOptions::new()
            .force(true)
            .timeout(Duration::from_secs(3))
            .clear(true);
        let merged = InteractionOptions::new().force(false).merge(&defaults);
        assert_eq!(merged.force, Some(false));
        assert_eq!(merged.timeout, Some(Duration::from_secs(3)));
        assert_eq!(merged.clear, Some(true));
        assert_eq!(merged.select_all, None);
    }

    #[test]
    fn test_default_preconditions_per_action() {
        assert_eq!(Action::Click.default_preconditions(), vec![StateCheck::visible()]);
        assert_eq!(
            Action::Fill("x".into()).default_preconditions(),
            vec![StateCheck::visible(), StateCheck::editable()]
        );
        assert_eq!(
            Action::Select("EUR".into()).default_preconditions(),
            vec![StateCheck::visible(), StateCheck::enabled()]
        );
    }

    #[tokio::test]
    async fn test_click_passes_options_through() {
        let ctx = ctx();
        let button = FakeElement::new("#deposit");
        ctx.click_element(
            &locator("Deposit button", &button),
            Some(
                InteractionOptions::new()
                    .button(MouseButton::Right)
                    .click_count(2)
                    .timeout(Duration::from_millis(1500)),
            ),
        )
        .await
        .unwrap();
        let options = button.last_click_options().unwrap();
        assert_eq!(options.button, Some(MouseButton::Right));
        assert_eq!(options.click_count, Some(2));
        assert_eq!(options.timeout, Some(1500.0));
    }

    #[tokio::test]
    async fn test_hard_precondition_failure_prevents_click() {
        let ctx = ctx();
        let hidden = FakeElement::new("#deposit").visible(false);
        let err = ctx
            .click_element(&locator("Deposit button", &hidden), None)
            .await
            .unwrap_err();
        assert!(err.is_assertion());
        assert_eq!(hidden.click_count(), 0);
    }

    #[tokio::test]
    async fn test_soft_precondition_failure_is_recorded() {
        let ctx = ctx();
        let hidden = FakeElement::new("#deposit").visible(false);
        ctx.click_element(
            &locator("Deposit button", &hidden),
            Some(InteractionOptions::new().soft_assert(true)),
        )
        .await
        .unwrap();
        assert_eq!(hidden.click_count(), 0);
        assert_eq!(ctx.reporter().soft_failures().len(), 1);
    }

    #[tokio::test]
    async fn test_fill_clears_and_selects_first() {
        let ctx = ctx();
        let amount = FakeElement::new("#amount");
        ctx.fill_element(
            &locator("amount", &amount),
            "25",
            Some(InteractionOptions::new().clear(true).select_all(true)),
        )
        .await
        .unwrap();
        assert_eq!(amount.actions(), vec!["clear", "select_all", "fill:25"]);
        assert_eq!(amount.value(), "25");
    }

    #[tokio::test]
    async fn test_fill_requires_editable() {
        let ctx = ctx();
        let readonly = FakeElement::new("#amount").editable(false);
        assert!(
            ctx.fill_element(&locator("amount", &readonly), "25", None)
                .await
                .unwrap_err()
                .is_assertion()
        );
    }

    #[tokio::test]
    async fn test_select_option_by_value() {
        let ctx = ctx();
        let currency = FakeElement::new("select#currency").select_options(&["EUR", "USD"]);
        ctx.select_option(&locator("currency", &currency), "USD", None)
            .await
            .unwrap();
        assert_eq!(currency.value(), "USD");
    }

    #[tokio::test]
    async fn test_chain_runs_in_order() {
        let ctx = ctx();
        let field = FakeElement::new("#email");
        let submit = FakeElement::new("#submit");
        ctx.perform_interaction_chain(
            &[
                InteractionStep::new(&locator("email", &field), Action::Focus),
                InteractionStep::new(&locator("email", &field), Action::Fill("a@b.c".into())),
                InteractionStep::new(&locator("submit", &submit), Action::Hover),
                InteractionStep::new(&locator("submit", &submit), Action::Click)
                    .with_options(InteractionOptions::new().click_count(1)),
            ],
            Some(InteractionOptions::new().clear(true)),
        )
        .await
        .unwrap();
        assert_eq!(field.actions(), vec!["focus", "clear", "fill:a@b.c"]);
        assert_eq!(submit.actions(), vec!["hover", "click"]);
    }

    #[tokio::test]
    async fn test_chain_stops_at_first_failure() {
        let ctx = ctx();
        let hidden = FakeElement::new("#menu").visible(false);
        let after = FakeElement::new("#deposit");
        assert!(
            ctx.perform_interaction_chain(
                &[
                    InteractionStep::new(&locator("menu", &hidden), Action::Click),
                    InteractionStep::new(&locator("deposit", &after), Action::Click),
                ],
                None,
            )
            .await
            .is_err()
        );
        assert_eq!(after.click_count(), 0);
    }

    #[tokio::test]
    async fn test_click_if_visible() {
        let ctx = ctx();
        let button = FakeElement::new("#deposit");
        let counter = AtomicUsize::new(0);
        let fallbacks = &counter;
        let outcome = ctx
            .click_if_visible_or_fallback(&locator("Deposit", &button), move || async move {
                fallbacks.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(outcome, ClickOutcome::Clicked);
        assert_eq!(button.click_count(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fallback_runs_once_without_retry() {
        let ctx = ctx();
        let button = FakeElement::new("#deposit").visible(false);
        let revealed = button.clone();
        let outcome = ctx
            .click_if_visible_or_fallback(&locator("Deposit", &button), || async move {
                revealed.set_visible(true);
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(outcome, ClickOutcome::FellBack);
        assert_eq!(button.click_count(), 0);
    }

    fn remember_me(checked: &str) -> FakeElement {
        let element = FakeElement::new("#remember").attr("aria-checked", checked);
        let target = element.clone();
        element.on_click(move || {
            let next = if target.get_attribute("aria-checked").as_deref() == Some("true") {
                "false"
            } else {
                "true"
            };
            target.set_attribute("aria-checked", Some(next));
        })
    }

    fn states() -> ToggleAttributes {
        ToggleAttributes::new(
            AttributeMap::single("aria-checked", "true"),
            AttributeMap::single("aria-checked", "false"),
        )
    }

    #[tokio::test]
    async fn test_ensure_checked_is_idempotent() {
        let ctx = ctx();
        let checkbox = remember_me("false");
        let loc = locator("Remember me", &checkbox);
        ctx.ensure_button_checkbox_is_checked(&loc, &states()).await.unwrap();
        ctx.ensure_button_checkbox_is_checked(&loc, &states()).await.unwrap();
        assert_eq!(checkbox.click_count(), 1);
        assert_eq!(checkbox.get_attribute("aria-checked").as_deref(), Some("true"));

        ctx.ensure_button_checkbox_is_unchecked(&loc, &states()).await.unwrap();
        assert_eq!(checkbox.click_count(), 2);
    }

    #[tokio::test]
    async fn test_ensure_checked_missing_attribute_is_configuration_error() {
        let ctx = ctx().soft();
        let plain = FakeElement::new("#remember");
        let err = ctx
            .ensure_button_checkbox_is_checked(&locator("Remember me", &plain), &states())
            .await
            .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(plain.click_count(), 0);
    }

    #[tokio::test]
    async fn test_ensure_checked_fails_hard_when_click_has_no_effect() {
        let ctx = ctx().soft();
        let stuck = FakeElement::new("#remember").attr("aria-checked", "false");
        let err = ctx
            .ensure_button_checkbox_is_checked(&locator("Remember me", &stuck), &states())
            .await
            .unwrap_err();
        assert!(err.is_assertion());
        assert_eq!(stuck.click_count(), 1);
    }
}
