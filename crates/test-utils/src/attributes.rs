// Attribute validation
//
// Exact and containing attribute checks, "exactly one member of the group is
// active" checks, and toggle pairs. Class-like attributes are matched per
// whitespace-delimited token so that `active` never matches `inactive`.

use crate::context::TestContext;
use crate::error::{Error, Result};
use crate::locator::CompositeLocator;
use futures_util::future::join_all;
use regex::Regex;
use std::time::Duration;

/// Expected value of one attribute
#[derive(Debug, Clone)]
pub enum AttrValue {
    /// Exact value. In containing checks against a token-list attribute
    /// (`class`, `rel`), every whitespace-separated token must be present as
    /// a whole token; against any other attribute it is a substring.
    Text(String),
    /// Raw substring, no token boundaries
    Substring(String),
    /// Regular expression searched anywhere in the value
    Pattern(Regex),
    /// No value. Rejected by every validator: absence is checked with
    /// [`TestContext::validate_attributes_absent`].
    Null,
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<Regex> for AttrValue {
    fn from(value: Regex) -> Self {
        AttrValue::Pattern(value)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Null, Into::into)
    }
}

impl std::fmt::Display for AttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrValue::Text(t) => write!(f, "'{t}'"),
            AttrValue::Substring(s) => write!(f, "*{s}*"),
            AttrValue::Pattern(r) => write!(f, "/{}/", r.as_str()),
            AttrValue::Null => write!(f, "null"),
        }
    }
}

/// How a [`AttrValue::Text`] is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matching {
    Exact,
    Containing,
}

impl AttrValue {
    /// Compares against the live value; an absent attribute never matches.
    pub fn matches(&self, actual: Option<&str>, matching: Matching) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match (self, matching) {
            (AttrValue::Text(expected), Matching::Exact) => actual == expected,
            (AttrValue::Text(expected), Matching::Containing) => {
                matches_class_tokens(actual, expected)
            }
            (AttrValue::Substring(expected), _) => actual.contains(expected.as_str()),
            (AttrValue::Pattern(re), _) => re.is_match(actual),
            (AttrValue::Null, _) => false,
        }
    }

    /// Like [`AttrValue::matches`], but text containment only uses token
    /// boundaries for token-list attributes.
    pub fn matches_attribute(&self, name: &str, actual: Option<&str>, matching: Matching) -> bool {
        match (self, matching, actual) {
            (AttrValue::Text(expected), Matching::Containing, Some(actual))
                if !is_token_list(name) =>
            {
                actual.contains(expected.as_str())
            }
            _ => self.matches(actual, matching),
        }
    }
}

/// Attributes holding a whitespace-separated set of tokens
fn is_token_list(name: &str) -> bool {
    name.eq_ignore_ascii_case("class") || name.eq_ignore_ascii_case("rel")
}

/// Ordered attribute name/expected-value pairs.
///
/// # Example
///
/// ```ignore
/// let active = AttributeMap::new().with("class", "slide active");
/// let link = AttributeMap::new()
///     .with("href", Regex::new(r"/promotions/\d+$")?)
///     .with("target", "_blank");
/// ```
#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    entries: Vec<(String, AttrValue)>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map with a single pair
    pub fn single(name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        Self::new().with(name, value)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rejects null expectations. "Equals null" has no meaning here.
    fn ensure_no_null(&self, element: &str) -> Result<()> {
        if let Some((name, _)) = self
            .entries
            .iter()
            .find(|(_, v)| matches!(v, AttrValue::Null))
        {
            return Err(Error::Configuration(format!(
                "attribute '{name}' of {element} was given a null expected value; \
                 use validate_attributes_absent to check for a missing attribute"
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for AttributeMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.entries.iter().map(|(n, v)| format!("{n}={v}")).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Anchored regex for one class token: preceded by the start of the value
/// or whitespace, followed by whitespace or the end of the value.
pub fn class_token_regex(token: &str) -> Regex {
    let pattern = format!(r"(?:^|\s){}(?:\s|$)", regex::escape(token));
    // Escaped literal between fixed anchors; always a valid pattern
    Regex::new(&pattern).expect("escaped token pattern is valid")
}

/// True when every whitespace-separated token of `expected` appears as a
/// whole token of `actual`, in any order.
///
/// `"active"` matches `"foo active bar"` but not `"foo inactive bar"` or
/// `"foo activewear bar"`. An `expected` without tokens matches vacuously.
pub fn matches_class_tokens(actual: &str, expected: &str) -> bool {
    expected
        .split_whitespace()
        .all(|token| class_token_regex(token).is_match(actual))
}

/// Which of two toggle elements starts out active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    A,
    B,
}

impl TestContext {
    /// Validates that every attribute equals its expected value.
    ///
    /// Attributes are checked concurrently and independently; each polls up
    /// to the assertion timeout. A null expected value is a configuration
    /// error in either failure mode.
    pub async fn validate_attributes(
        &self,
        element: &CompositeLocator,
        attributes: &AttributeMap,
    ) -> Result<()> {
        self.validate_attribute_map(element, attributes, Matching::Exact)
            .await
    }

    /// Validates attributes by containment: whole-token matching for text
    /// values of `class` and `rel`, substring search for text values of any
    /// other attribute, regex search for patterns.
    pub async fn validate_attributes_containing(
        &self,
        element: &CompositeLocator,
        attributes: &AttributeMap,
    ) -> Result<()> {
        self.validate_attribute_map(element, attributes, Matching::Containing)
            .await
    }

    async fn validate_attribute_map(
        &self,
        element: &CompositeLocator,
        attributes: &AttributeMap,
        matching: Matching,
    ) -> Result<()> {
        let verb = match matching {
            Matching::Exact => "have",
            Matching::Containing => "contain",
        };
        self.step(
            format!("Expect {} to {verb} attributes {attributes}", element.name()),
            async {
                attributes.ensure_no_null(element.name())?;
                let checks = attributes.iter().map(|(name, value)| {
                    self.check_attribute(element, name, value, matching, true)
                });
                let results = join_all(checks).await;
                self.settle_all(results)
            },
        )
        .await
    }

    /// Validates that none of the named attributes is present.
    pub async fn validate_attributes_absent(
        &self,
        element: &CompositeLocator,
        names: &[&str],
    ) -> Result<()> {
        self.step(
            format!("Expect {} not to have attributes {}", element.name(), names.join(", ")),
            async {
                let timeout = self.config().assertion_timeout;
                let checks = names.iter().map(|name| async move {
                    let absent = self
                        .poll_until(timeout, move || async move {
                            Ok(element.resolve().await?.attribute(name).await?.is_none())
                        })
                        .await?;
                    if absent {
                        Ok(())
                    } else {
                        Err(self.failure(format!(
                            "Expect {} not to have attribute '{name}' (timed out after {timeout:?})",
                            element.name()
                        )))
                    }
                });
                let results = join_all(checks).await;
                self.settle_all(results)
            },
        )
        .await
    }

    /// Validates that exactly the element at `active_index` carries the
    /// active marker and every other element does not.
    ///
    /// `marker` must hold exactly one attribute pair; it is matched by
    /// containment. An inactive element without the attribute at all counts
    /// as not matching. Out-of-bounds indexes and malformed markers are
    /// configuration errors.
    pub async fn validate_only_one_element_active_group(
        &self,
        elements: &[CompositeLocator],
        active_index: usize,
        marker: &AttributeMap,
        group_description: Option<&str>,
    ) -> Result<()> {
        let description = group_description
            .map(str::to_string)
            .unwrap_or_else(|| format!("group of {} elements", elements.len()));
        self.step(
            format!("Expect only element {active_index} of {description} to be active"),
            async {
                let (name, value) = match (marker.len(), marker.iter().next()) {
                    (1, Some(pair)) => pair,
                    (len, _) => {
                        return Err(Error::Configuration(format!(
                            "active marker for {description} must hold exactly one attribute, got {len}"
                        )));
                    }
                };
                marker.ensure_no_null(&description)?;
                if active_index >= elements.len() {
                    return Err(Error::Configuration(format!(
                        "active index {active_index} is out of bounds for {description} ({} elements)",
                        elements.len()
                    )));
                }

                let checks = elements.iter().enumerate().map(|(i, element)| {
                    self.check_attribute(element, name, value, Matching::Containing, i == active_index)
                });
                let results = join_all(checks).await;
                self.settle_all(results)
            },
        )
        .await
    }

    /// Validates a mutually exclusive pair: checks the initial pairing,
    /// clicks the inactive element, then checks that the pairing flipped.
    pub async fn validate_toggle_between_two_elements(
        &self,
        a: &CompositeLocator,
        b: &CompositeLocator,
        marker: &AttributeMap,
        initially_active: Toggle,
        description: Option<&str>,
    ) -> Result<()> {
        let description = description
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} / {}", a.name(), b.name()));
        self.step(format!("Validate toggle between {description}"), async {
            let pair = [a.clone(), b.clone()];
            let (before, inactive) = match initially_active {
                Toggle::A => (0, b),
                Toggle::B => (1, a),
            };
            self.validate_only_one_element_active_group(&pair, before, marker, Some(&description))
                .await?;
            self.click_element(inactive, None).await?;
            self.validate_only_one_element_active_group(
                &pair,
                1 - before,
                marker,
                Some(&description),
            )
            .await
        })
        .await
    }

    /// Polls one attribute until it matches (`want_match`) or stops
    /// matching (`!want_match`).
    pub(crate) async fn check_attribute(
        &self,
        element: &CompositeLocator,
        name: &str,
        value: &AttrValue,
        matching: Matching,
        want_match: bool,
    ) -> Result<()> {
        self.check_attribute_within(
            element,
            name,
            value,
            matching,
            want_match,
            self.config().assertion_timeout,
        )
        .await
    }

    pub(crate) async fn check_attribute_within(
        &self,
        element: &CompositeLocator,
        name: &str,
        value: &AttrValue,
        matching: Matching,
        want_match: bool,
        timeout: Duration,
    ) -> Result<()> {
        let met = self
            .poll_until(timeout, move || async move {
                let actual = element.resolve().await?.attribute(name).await?;
                Ok(value.matches_attribute(name, actual.as_deref(), matching) == want_match)
            })
            .await?;
        if met {
            return Ok(());
        }

        let actual = element.resolve().await?.attribute(name).await?;
        let verb = match (matching, want_match) {
            (Matching::Exact, true) => "to have",
            (Matching::Exact, false) => "not to have",
            (Matching::Containing, true) => "to contain",
            (Matching::Containing, false) => "not to contain",
        };
        Err(self.failure(format!(
            "Expect {} {verb} attribute {name}={value}, but it was {} (timed out after {timeout:?})",
            element.name(),
            actual.map_or_else(|| "absent".to_string(), |a| format!("'{a}'")),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TestConfig;
    use crate::fake::FakeElement;
    use std::sync::Arc;

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
    fn test_class_token_matching_respects_word_boundaries() {
        assert!(matches_class_tokens("foo active bar", "active"));
        assert!(matches_class_tokens("active", "active"));
        assert!(matches_class_tokens("active\tbar", "active"));
        assert!(!matches_class_tokens("foo inactive bar", "active"));
        assert!(!matches_class_tokens("foo activewear bar", "active"));
        assert!(!matches_class_tokens("foo active-tab bar", "active"));
    }

    #[test]
    fn test_class_tokens_are_anded_in_any_order() {
        assert!(matches_class_tokens("tab selected primary", "primary tab"));
        assert!(!matches_class_tokens("tab primary", "primary selected"));
        assert!(matches_class_tokens("anything", ""));
    }

    #[test]
    fn test_tokens_with_regex_metacharacters() {
        assert!(matches_class_tokens("w-1/2 md:flex", "md:flex w-1/2"));
        assert!(!matches_class_tokens("w-1x2", "w-1.2"));
    }

    #[test]
    fn test_attr_value_matching() {
        let exact = AttrValue::from("slide active");
        assert!(exact.matches(Some("slide active"), Matching::Exact));
        assert!(!exact.matches(Some("active slide"), Matching::Exact));
        assert!(exact.matches(Some("active slide"), Matching::Containing));
        assert!(!exact.matches(None, Matching::Containing));

        let pattern = AttrValue::from(Regex::new(r"^/promotions/\d+$").unwrap());
        assert!(pattern.matches(Some("/promotions/12"), Matching::Exact));
        assert!(!pattern.matches(Some("/promotions/x"), Matching::Containing));

        let href = AttrValue::from("/promotions");
        assert!(href.matches_attribute("href", Some("/promotions/7"), Matching::Containing));
        assert!(!href.matches_attribute("href", Some("/promotions/7"), Matching::Exact));
        assert!(!href.matches_attribute("href", None, Matching::Containing));
        let active = AttrValue::from("active");
        assert!(!active.matches_attribute("class", Some("inactive"), Matching::Containing));
        assert!(!active.matches_attribute("CLASS", Some("inactive"), Matching::Containing));
        assert!(active.matches_attribute("data-state", Some("inactive"), Matching::Containing));

        let sub = AttrValue::Substring("deposit".into());
        assert!(sub.matches(Some("/cashier/deposit?x=1"), Matching::Exact));

        assert!(matches!(AttrValue::from(None::<&str>), AttrValue::Null));
    }

    #[tokio::test]
    async fn test_validate_attributes_exact() {
        let ctx = ctx();
        let link = FakeElement::new("a#promo")
            .attr("href", "/promotions/7")
            .attr("target", "_blank");
        let loc = locator("promo link", &link);

        ctx.validate_attributes(
            &loc,
            &AttributeMap::new()
                .with("href", Regex::new(r"/promotions/\d+").unwrap())
                .with("target", "_blank"),
        )
        .await
        .unwrap();

        let err = ctx
            .validate_attributes(&loc, &AttributeMap::single("target", "_self"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("but it was '_blank'"));
    }

    #[tokio::test]
    async fn test_null_value_is_configuration_error_even_when_soft() {
        let ctx = ctx().soft();
        let loc = locator("link", &FakeElement::new("a"));
        let err = ctx
            .validate_attributes(&loc, &AttributeMap::single("href", None::<&str>))
            .await
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(ctx.reporter().soft_failures().is_empty());
    }

    #[tokio::test]
    async fn test_validate_attributes_containing_classes() {
        let ctx = ctx();
        let tab = FakeElement::new("#deposit-tab").attr("class", "tab tab--primary active");
        let loc = locator("Deposit tab", &tab);
        ctx.validate_attributes_containing(&loc, &AttributeMap::single("class", "active tab"))
            .await
            .unwrap();
        assert!(
            ctx.validate_attributes_containing(&loc, &AttributeMap::single("class", "primary"))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_validate_attributes_containing_plain_attribute_is_substring() {
        let ctx = ctx();
        let link = FakeElement::new("a#promo")
            .attr("href", "/promotions/7")
            .attr("class", "promo inactive");
        let loc = locator("promo link", &link);

        ctx.validate_attributes_containing(&loc, &AttributeMap::single("href", "/promotions"))
            .await
            .unwrap();
        let err = ctx
            .validate_attributes_containing(&loc, &AttributeMap::single("class", "active"))
            .await
            .unwrap_err();
        assert!(err.is_assertion());
    }

    #[tokio::test]
    async fn test_validate_attributes_absent() {
        let ctx = ctx();
        let button = FakeElement::new("#submit").attr("aria-busy", "true");
        let loc = locator("Submit", &button);
        assert!(ctx.validate_attributes_absent(&loc, &["aria-busy"]).await.is_err());
        button.change_after(Duration::from_millis(10), |b| b.set_attribute("aria-busy", None));
        ctx.validate_attributes_absent(&loc, &["aria-busy", "disabled"])
            .await
            .unwrap();
    }

    fn carousel_indicators(active: usize, count: usize) -> (Vec<FakeElement>, Vec<CompositeLocator>) {
        let fakes: Vec<FakeElement> = (0..count)
            .map(|i| {
                let class = if i == active { "dot active" } else { "dot inactive" };
                FakeElement::new(&format!(".dot:nth-child({})", i + 1)).attr("class", class)
            })
            .collect();
        let locators = fakes
            .iter()
            .enumerate()
            .map(|(i, f)| locator(&format!("indicator {i}"), f))
            .collect();
        (fakes, locators)
    }

    #[tokio::test]
    async fn test_only_one_active_for_every_index() {
        let ctx = ctx();
        let marker = AttributeMap::single("class", "active");
        for active in 0..4 {
            let (_, locators) = carousel_indicators(active, 4);
            ctx.validate_only_one_element_active_group(&locators, active, &marker, None)
                .await
                .unwrap();
            let wrong = (active + 1) % 4;
            assert!(
                ctx.validate_only_one_element_active_group(&locators, wrong, &marker, None)
                    .await
                    .is_err()
            );
        }
    }

    #[tokio::test]
    async fn test_only_one_active_tolerates_missing_attribute() {
        let ctx = ctx();
        let active = FakeElement::new("#a").attr("class", "active");
        let bare = FakeElement::new("#b");
        ctx.validate_only_one_element_active_group(
            &[locator("a", &active), locator("b", &bare)],
            0,
            &AttributeMap::single("class", "active"),
            Some("tabs"),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_only_one_active_configuration_errors() {
        let ctx = ctx().soft();
        let (_, locators) = carousel_indicators(0, 2);
        let marker = AttributeMap::single("class", "active");

        let err = ctx
            .validate_only_one_element_active_group(&locators, 2, &marker, None)
            .await
            .unwrap_err();
        assert!(err.is_configuration());

        let two = AttributeMap::new().with("class", "active").with("aria-current", "true");
        let err = ctx
            .validate_only_one_element_active_group(&locators, 0, &two, None)
            .await
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_only_one_active_soft_records_each_offender() {
        let ctx = ctx().soft();
        let elements = [
            FakeElement::new("#0").attr("class", "active"),
            FakeElement::new("#1").attr("class", "active"),
            FakeElement::new("#2").attr("class", "active"),
        ];
        let locators: Vec<_> = elements.iter().map(|e| locator("dot", e)).collect();
        ctx.validate_only_one_element_active_group(
            &locators,
            0,
            &AttributeMap::single("class", "active"),
            None,
        )
        .await
        .unwrap();
        assert_eq!(ctx.reporter().soft_failures().len(), 2);
    }

    fn toggle_pair(initial: Toggle) -> (FakeElement, FakeElement) {
        let (a_class, b_class) = match initial {
            Toggle::A => ("tab active", "tab"),
            Toggle::B => ("tab", "tab active"),
        };
        let a = FakeElement::new("#deposit-tab").attr("class", a_class);
        let b = FakeElement::new("#withdraw-tab").attr("class", b_class);
        let (a2, b2) = (a.clone(), b.clone());
        let a = a.on_click(move || {
            a2.set_attribute("class", Some("tab active"));
            b2.set_attribute("class", Some("tab"));
        });
        let (a3, b3) = (a.clone(), b.clone());
        let b = b.on_click(move || {
            b3.set_attribute("class", Some("tab active"));
            a3.set_attribute("class", Some("tab"));
        });
        (a, b)
    }

    #[tokio::test]
    async fn test_toggle_from_either_side() {
        let ctx = ctx();
        let marker = AttributeMap::single("class", "active");
        for initial in [Toggle::A, Toggle::B] {
            let (a, b) = toggle_pair(initial);
            ctx.validate_toggle_between_two_elements(
                &locator("Deposit tab", &a),
                &locator("Withdraw tab", &b),
                &marker,
                initial,
                None,
            )
            .await
            .unwrap();
            match initial {
                Toggle::A => {
                    assert_eq!(b.click_count(), 1);
                    assert_eq!(a.click_count(), 0);
                    assert_eq!(b.get_attribute("class").as_deref(), Some("tab active"));
                }
                Toggle::B => {
                    assert_eq!(a.click_count(), 1);
                    assert_eq!(a.get_attribute("class").as_deref(), Some("tab active"));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_toggle_that_does_not_flip_fails() {
        let ctx = ctx();
        let a = FakeElement::new("#a").attr("class", "active");
        let b = FakeElement::new("#b");
        assert!(
            ctx.validate_toggle_between_two_elements(
                &locator("A", &a),
                &locator("B", &b),
                &AttributeMap::single("class", "active"),
                Toggle::A,
                Some("broken switch"),
            )
            .await
            .is_err()
        );
        assert_eq!(b.click_count(), 1);
    }
}
