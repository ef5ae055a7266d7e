// Group assertions
//
// Bulk checks over element groups. Every member check is issued at once and
// awaited together; one failure never cancels its siblings.

use crate::assertions::StateCheck;
use crate::context::TestContext;
use crate::error::{Error, Result};
use crate::group::ElementGroup;
use crate::locator::CompositeLocator;
use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::time::Duration;

impl TestContext {
    /// Asserts every member of `group` is visible. An empty group passes.
    pub async fn validate_all_elements_visibility(&self, group: &ElementGroup) -> Result<()> {
        let entries = group.entries();
        self.step(format!("Validate visibility of {} elements", entries.len()), async {
            let check = StateCheck::visible();
            let checks = entries.iter().map(|(_, locator)| {
                let expectation = check.expectation(locator.name());
                let check = &check;
                async move { self.check_state(locator, check, &expectation).await }
            });
            let results = join_all(checks).await;
            self.settle_all(results)
        })
        .await
    }

    /// Asserts every member of the groups in `groups` contains `text`.
    ///
    /// With `group_key`, only that group is checked; an unknown key is a
    /// configuration error. Each member check is bounded by the short group
    /// text timeout.
    pub async fn validate_groups_contain_text(
        &self,
        groups: &BTreeMap<String, ElementGroup>,
        text: &str,
        group_key: Option<&str>,
    ) -> Result<()> {
        let scope = group_key.unwrap_or("all groups");
        self.step(format!("Validate {scope} contain '{text}'"), async {
            let selected: Vec<&ElementGroup> = match group_key {
                Some(key) => vec![groups.get(key).ok_or_else(|| {
                    Error::Configuration(format!(
                        "no group named '{key}' (known: {})",
                        groups.keys().cloned().collect::<Vec<_>>().join(", ")
                    ))
                })?],
                None => groups.values().collect(),
            };
            let timeout = self.config().group_text_timeout;
            let entries: Vec<_> = selected.iter().flat_map(|g| g.entries()).collect();
            let checks = entries
                .iter()
                .map(|(_, locator)| self.check_contains_text(locator, text, timeout));
            let results = join_all(checks).await;
            self.settle_all(results)
        })
        .await
    }

    /// Asserts the members of `group`, in entry order, have exactly the
    /// `expected` texts (after trimming).
    pub async fn validate_group_texts(&self, group: &ElementGroup, expected: &[&str]) -> Result<()> {
        let entries = group.entries();
        self.step(format!("Validate texts of {} elements", entries.len()), async {
            if entries.len() != expected.len() {
                return Err(Error::Configuration(format!(
                    "group has {} elements but {} texts were expected",
                    entries.len(),
                    expected.len()
                )));
            }
            let timeout = self.config().group_text_timeout;
            let checks = entries
                .iter()
                .zip(expected)
                .map(|((_, locator), want)| self.check_text_equals(locator, want, timeout));
            let results = join_all(checks).await;
            self.settle_all(results)
        })
        .await
    }

    async fn check_contains_text(
        &self,
        element: &CompositeLocator,
        text: &str,
        timeout: Duration,
    ) -> Result<()> {
        self.check_text(element, timeout, "contain", text, |actual| actual.contains(text))
            .await
    }

    async fn check_text_equals(
        &self,
        element: &CompositeLocator,
        text: &str,
        timeout: Duration,
    ) -> Result<()> {
        self.check_text(element, timeout, "have text", text, |actual| actual == text)
            .await
    }

    async fn check_text<P>(
        &self,
        element: &CompositeLocator,
        timeout: Duration,
        verb: &str,
        text: &str,
        predicate: P,
    ) -> Result<()>
    where
        P: Fn(&str) -> bool,
    {
        let predicate = &predicate;
        let met = self
            .poll_until(timeout, move || async move {
                Ok(predicate(&self.get_element_text(element).await?))
            })
            .await?;
        if met {
            return Ok(());
        }
        let actual = self.get_element_text(element).await?;
        Err(self.failure(format!(
            "Expect {} to {verb} '{text}', but it was '{actual}' (timed out after {timeout:?})",
            element.name()
        )))
    }
}
