// Navigation helpers

use crate::context::TestContext;
use crate::driver::PageHandle;
use crate::error::{Error, Result};
use crate::locator::CompositeLocator;
use regex::Regex;
use std::time::Duration;

/// Expected page URL
#[derive(Debug, Clone)]
pub enum UrlExpectation {
    /// Absolute URL, or a path resolved against the configured base URL
    Url(String),
    /// Regular expression searched in the full URL
    Pattern(Regex),
}

impl From<&str> for UrlExpectation {
    fn from(url: &str) -> Self {
        UrlExpectation::Url(url.to_string())
    }
}

impl From<String> for UrlExpectation {
    fn from(url: String) -> Self {
        UrlExpectation::Url(url)
    }
}

impl From<Regex> for UrlExpectation {
    fn from(pattern: Regex) -> Self {
        UrlExpectation::Pattern(pattern)
    }
}

enum ResolvedUrl {
    Exact(String),
    Pattern(Regex),
}

impl ResolvedUrl {
    fn matches(&self, actual: &str) -> bool {
        match self {
            ResolvedUrl::Exact(expected) => actual == expected,
            ResolvedUrl::Pattern(re) => re.is_match(actual),
        }
    }

    fn describe(&self) -> String {
        match self {
            ResolvedUrl::Exact(expected) => format!("'{expected}'"),
            ResolvedUrl::Pattern(re) => format!("/{}/", re.as_str()),
        }
    }
}

impl TestContext {
    /// Waits until the document has at least reached `interactive`.
    ///
    /// Bounded by the load state timeout; running out is an
    /// [`Error::Timeout`], not an assertion failure.
    pub async fn wait_for_dom_content_loaded(&self, page: &dyn PageHandle) -> Result<()> {
        let timeout = self.config().load_state_timeout;
        let loaded = self
            .poll_until(timeout, move || async move {
                let state = page.ready_state().await?;
                Ok(state == "interactive" || state == "complete")
            })
            .await?;
        if loaded {
            Ok(())
        } else {
            Err(Error::Timeout(format!(
                "DOM content of {} not loaded after {timeout:?}",
                page.url()
            )))
        }
    }

    /// Asserts the page URL equals (or matches) `expected`.
    pub async fn assert_url(
        &self,
        page: &dyn PageHandle,
        expected: impl Into<UrlExpectation>,
        wait_for_load: bool,
    ) -> Result<()> {
        let expected = self.resolve_expectation(expected.into())?;
        let result = self
            .step(format!("Expect URL to be {}", expected.describe()), async {
                if wait_for_load {
                    self.wait_for_dom_content_loaded(page).await?;
                }
                self.check_url(page, &expected, self.config().assertion_timeout)
                    .await
            })
            .await;
        self.settle(result)
    }

    /// Asserts the page URL contains every one of `fragments`.
    pub async fn assert_url_contains(
        &self,
        page: &dyn PageHandle,
        fragments: &[&str],
        wait_for_load: bool,
    ) -> Result<()> {
        let result = self
            .step(format!("Expect URL to contain {fragments:?}"), async {
                if wait_for_load {
                    self.wait_for_dom_content_loaded(page).await?;
                }
                let timeout = self.config().assertion_timeout;
                let met = self
                    .poll_until(timeout, move || async move {
                        let url = page.url();
                        Ok(fragments.iter().all(|f| url.contains(f)))
                    })
                    .await?;
                if met {
                    return Ok(());
                }
                let url = page.url();
                let missing: Vec<&str> = fragments
                    .iter()
                    .copied()
                    .filter(|f| !url.contains(f))
                    .collect();
                Err(self.failure(format!(
                    "Expect URL to contain {fragments:?}, but '{url}' is missing {missing:?} \
                     (timed out after {timeout:?})"
                )))
            })
            .await;
        self.settle(result)
    }

    /// Clicks `element`, waits for the DOM to load, then asserts the URL.
    ///
    /// The URL is polled up to the navigation timeout rather than read once
    /// after a fixed grace period.
    pub async fn perform_navigation_click(
        &self,
        page: &dyn PageHandle,
        element: &CompositeLocator,
        expected: impl Into<UrlExpectation>,
    ) -> Result<()> {
        let expected = self.resolve_expectation(expected.into())?;
        let result = self
            .step(
                format!("Click {} and expect URL {}", element.name(), expected.describe()),
                async {
                    let before = page.url();
                    self.click_element(element, None).await?;
                    self.wait_for_dom_content_loaded(page).await?;
                    tracing::debug!(from = %before, to = %page.url(), "navigation click");
                    self.check_url(page, &expected, self.config().navigation_timeout)
                        .await
                },
            )
            .await;
        self.settle(result)
    }

    fn resolve_expectation(&self, expected: UrlExpectation) -> Result<ResolvedUrl> {
        Ok(match expected {
            UrlExpectation::Url(url) => ResolvedUrl::Exact(self.config().resolve(&url)?.to_string()),
            UrlExpectation::Pattern(re) => ResolvedUrl::Pattern(re),
        })
    }

    async fn check_url(
        &self,
        page: &dyn PageHandle,
        expected: &ResolvedUrl,
        timeout: Duration,
    ) -> Result<()> {
        let met = self
            .poll_until(timeout, move || async move { Ok(expected.matches(&page.url())) })
            .await?;
        if met {
            Ok(())
        } else {
            Err(self.failure(format!(
                "Expect URL to be {}, but it was '{}' (timed out after {timeout:?})",
                expected.describe(),
                page.url()
            )))
        }
    }
}
