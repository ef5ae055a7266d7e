// Composite locators
//
// A composite locator pairs a lazily evaluated element query with a
// human-readable name. The query runs again on every `resolve()`, so a
// locator can be built before its element exists (modals, animated
// transitions) and is resolved at the moment of use.

use crate::driver::{Element, FrameScope};
use crate::error::Result;
use futures_util::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

type ElementQuery = dyn Fn() -> BoxFuture<'static, Result<Arc<dyn Element>>> + Send + Sync;
type FrameQuery = dyn Fn() -> BoxFuture<'static, Result<Arc<dyn FrameScope>>> + Send + Sync;

/// A named, lazily resolved reference to a single UI element.
///
/// Cloning is cheap and clones share the query. Two locators with the same
/// name are unrelated; there is no identity beyond the query itself.
///
/// # Example
///
/// ```ignore
/// use casino_test_utils::{composite_locator, playwright::PlaywrightElement};
///
/// let page = page.clone();
/// let deposit = composite_locator("Deposit button", move || {
///     let page = page.clone();
///     async move { Ok(PlaywrightElement::new(page, "[data-test=deposit]")) }
/// });
/// ctx.click_element(&deposit, None).await?;
/// ```
#[derive(Clone)]
pub struct CompositeLocator {
    query: Arc<ElementQuery>,
    name: Arc<str>,
}

impl CompositeLocator {
    /// Creates a composite locator. The query is not run here; an invalid
    /// query only surfaces when the locator is first resolved.
    pub fn new<F, Fut, E>(name: impl Into<String>, query: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<E>> + Send + 'static,
        E: Element + 'static,
    {
        let query = Arc::new(move || {
            let fut = query();
            Box::pin(async move {
                let element = fut.await?;
                Ok(Arc::new(element) as Arc<dyn Element>)
            }) as BoxFuture<'static, Result<Arc<dyn Element>>>
        });
        Self {
            query,
            name: Arc::from(name.into()),
        }
    }

    /// Wraps an already shared element. Every resolve hands out the same
    /// element; use this for elements that re-query internally.
    pub fn from_element(name: impl Into<String>, element: Arc<dyn Element>) -> Self {
        Self {
            query: Arc::new(move || {
                let element = Arc::clone(&element);
                Box::pin(async move { Ok(element) }) as BoxFuture<'static, Result<Arc<dyn Element>>>
            }),
            name: Arc::from(name.into()),
        }
    }

    /// Human-readable name used in step names and failure messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the query and returns the element it yields right now.
    pub async fn resolve(&self) -> Result<Arc<dyn Element>> {
        (self.query)().await
    }

    /// Returns a locator sharing this query under a different name.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            query: Arc::clone(&self.query),
            name: Arc::from(name.into()),
        }
    }
}

impl std::fmt::Debug for CompositeLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeLocator")
            .field("name", &self.name)
            .finish()
    }
}

/// A named, lazily resolved frame context (payment widgets and other
/// iframe-embedded content).
#[derive(Clone)]
pub struct CompositeFrameLocator {
    query: Arc<FrameQuery>,
    name: Arc<str>,
}

impl CompositeFrameLocator {
    pub fn new<F, Fut, S>(name: impl Into<String>, query: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<S>> + Send + 'static,
        S: FrameScope + 'static,
    {
        let query = Arc::new(move || {
            let fut = query();
            Box::pin(async move {
                let scope = fut.await?;
                Ok(Arc::new(scope) as Arc<dyn FrameScope>)
            }) as BoxFuture<'static, Result<Arc<dyn FrameScope>>>
        });
        Self {
            query,
            name: Arc::from(name.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the frame query and returns the frame scope it yields right now.
    pub async fn resolve(&self) -> Result<Arc<dyn FrameScope>> {
        (self.query)().await
    }

    /// Creates a composite locator for `selector` inside this frame.
    ///
    /// Both the frame and the element are re-queried on every resolve.
    pub fn locator(&self, selector: &str, name: impl Into<String>) -> CompositeLocator {
        let frame = Arc::clone(&self.query);
        let selector: Arc<str> = Arc::from(selector);
        let query = Arc::new(move || {
            let frame = Arc::clone(&frame);
            let selector = Arc::clone(&selector);
            Box::pin(async move {
                let scope = frame().await?;
                scope.locate(&selector).await
            }) as BoxFuture<'static, Result<Arc<dyn Element>>>
        });
        CompositeLocator {
            query,
            name: Arc::from(name.into()),
        }
    }
}

impl std::fmt::Debug for CompositeFrameLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeFrameLocator")
            .field("name", &self.name)
            .finish()
    }
}

/// Creates a [`CompositeLocator`]. Shorthand for [`CompositeLocator::new`].
pub fn composite_locator<F, Fut, E>(name: impl Into<String>, query: F) -> CompositeLocator
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<E>> + Send + 'static,
    E: Element + 'static,
{
    CompositeLocator::new(name, query)
}

/// Creates a [`CompositeFrameLocator`]. Shorthand for [`CompositeFrameLocator::new`].
pub fn composite_frame_locator<F, Fut, S>(name: impl Into<String>, query: F) -> CompositeFrameLocator
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<S>> + Send + 'static,
    S: FrameScope + 'static,
{
    CompositeFrameLocator::new(name, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeElement, FakeFrame};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_query_runs_on_every_resolve() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let locator = composite_locator("Submit button", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(FakeElement::new("#submit")) }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0, "construction must not query");
        locator.resolve().await.unwrap();
        locator.resolve().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(locator.name(), "Submit button");
    }

    #[tokio::test]
    async fn test_with_name_shares_query() {
        let element = FakeElement::new("#deposit").visible(true);
        let locator = CompositeLocator::from_element("Deposit", Arc::new(element.clone()));
        let renamed = locator.with_name("Deposit (bottom nav)");

        assert_eq!(renamed.name(), "Deposit (bottom nav)");
        element.set_visible(false);
        assert!(!renamed.resolve().await.unwrap().is_visible().await.unwrap());
    }

    #[tokio::test]
    async fn test_frame_locator_resolves_inside_frame() {
        let card = FakeElement::new("#card-number").visible(true);
        let frame = FakeFrame::new("iframe#payment").with_element("#card-number", card);
        let frame_locator = composite_frame_locator("Payment widget", move || {
            let frame = frame.clone();
            async move { Ok(frame) }
        });

        let card_input = frame_locator.locator("#card-number", "Card number");
        let element = card_input.resolve().await.unwrap();
        assert_eq!(element.describe(), "#card-number");
        assert_eq!(card_input.name(), "Card number");

        let missing = frame_locator.locator("#cvv", "CVV");
        assert!(missing.resolve().await.is_err());
    }
}
