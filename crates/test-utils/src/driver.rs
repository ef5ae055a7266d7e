// Driver seam
//
// The helpers never talk to the browser directly. They go through these
// traits, implemented for playwright-rs in `crate::playwright` and by the
// in-memory fakes in `crate::fake`.

use crate::error::Result;
use crate::locator::{CompositeFrameLocator, CompositeLocator};
use async_trait::async_trait;
use playwright_rs::protocol::{ClickOptions, FillOptions, HoverOptions, SelectOption, SelectOptions};
use std::sync::Arc;
use std::time::Duration;

/// A single resolved UI element.
///
/// Probes (`is_*`, `attribute`, `text_content`) answer immediately; polling
/// is layered on top by the assertion helpers. Actions carry their own
/// actionability waiting, as Playwright's do.
#[async_trait]
pub trait Element: Send + Sync {
    /// Selector or other technical description, used in logs
    fn describe(&self) -> String;

    async fn is_visible(&self) -> Result<bool>;

    async fn is_enabled(&self) -> Result<bool>;

    async fn is_editable(&self) -> Result<bool>;

    /// Returns the attribute value, `None` when the attribute is absent
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Returns the text content, `None` for nodes without text
    async fn text_content(&self) -> Result<Option<String>>;

    async fn click(&self, options: ClickOptions) -> Result<()>;

    async fn fill(&self, text: &str, options: FillOptions) -> Result<()>;

    async fn clear(&self, options: FillOptions) -> Result<()>;

    /// Selects the whole current value of a text field
    async fn select_all(&self) -> Result<()>;

    async fn hover(&self, options: HoverOptions) -> Result<()>;

    async fn focus(&self) -> Result<()>;

    async fn select_option(
        &self,
        value: SelectOption,
        options: SelectOptions,
    ) -> Result<Vec<String>>;

    /// Would a click succeed right now?
    ///
    /// Implemented as a trial click bounded by `timeout`; any error counts
    /// as "not actionable" and is never propagated.
    async fn is_actionable(&self, timeout: Duration) -> bool;
}

/// The page an element lives on, as far as navigation checks need it.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Current URL of the main frame
    fn url(&self) -> String;

    /// `document.readyState` of the main frame
    async fn ready_state(&self) -> Result<String>;
}

/// A frame-scoped query context (iframe-embedded content).
///
/// Queries are only valid while the owning frame is attached; this is not
/// tracked here.
#[async_trait]
pub trait FrameScope: Send + Sync {
    fn describe(&self) -> String;

    /// Resolves `selector` inside the frame
    async fn locate(&self, selector: &str) -> Result<Arc<dyn Element>>;
}

/// What a page object sees of a browser tab: locator factories, the page
/// for URL checks, and navigation.
#[async_trait]
pub trait Screen: Send + Sync {
    fn locator(&self, selector: &str, name: &str) -> CompositeLocator;

    fn frame_locator(&self, frame_selector: &str, name: &str) -> CompositeFrameLocator;

    fn page(&self) -> &dyn PageHandle;

    /// Navigates to an absolute URL and waits for the load event.
    async fn goto(&self, url: &str) -> Result<()>;
}
