// playwright-rs implementation of the driver traits
//
// Elements hold a page and a selector and build a fresh `Locator` for every
// call, so nothing here caches a handle to a node that may have been
// re-rendered.

use crate::driver::{Element, FrameScope, PageHandle, Screen};
use crate::error::Result;
use crate::locator::{CompositeFrameLocator, CompositeLocator};
use async_trait::async_trait;
use playwright_rs::protocol::{
    ClickOptions, FillOptions, HoverOptions, Locator, Page, SelectOption, SelectOptions,
};
use std::sync::Arc;
use std::time::Duration;

/// Selector engine step that enters an iframe's content document
const ENTER_FRAME: &str = "internal:control=enter-frame";

/// An element addressed by selector on a page.
#[derive(Clone)]
pub struct PlaywrightElement {
    page: Page,
    selector: String,
}

impl PlaywrightElement {
    pub fn new(page: Page, selector: impl Into<String>) -> Self {
        Self {
            page,
            selector: selector.into(),
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    async fn locator(&self) -> Locator {
        self.page.locator(&self.selector).await
    }
}

#[async_trait]
impl Element for PlaywrightElement {
    fn describe(&self) -> String {
        self.selector.clone()
    }

    async fn is_visible(&self) -> Result<bool> {
        Ok(self.locator().await.is_visible().await?)
    }

    async fn is_enabled(&self) -> Result<bool> {
        Ok(self.locator().await.is_enabled().await?)
    }

    async fn is_editable(&self) -> Result<bool> {
        Ok(self.locator().await.is_editable().await?)
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.locator().await.get_attribute(name).await?)
    }

    async fn text_content(&self) -> Result<Option<String>> {
        Ok(self.locator().await.text_content().await?)
    }

    async fn click(&self, options: ClickOptions) -> Result<()> {
        Ok(self.locator().await.click(Some(options)).await?)
    }

    async fn fill(&self, text: &str, options: FillOptions) -> Result<()> {
        Ok(self.locator().await.fill(text, Some(options)).await?)
    }

    async fn clear(&self, options: FillOptions) -> Result<()> {
        Ok(self.locator().await.clear(Some(options)).await?)
    }

    async fn select_all(&self) -> Result<()> {
        Ok(self.locator().await.press("ControlOrMeta+a", None).await?)
    }

    async fn hover(&self, options: HoverOptions) -> Result<()> {
        Ok(self.locator().await.hover(Some(options)).await?)
    }

    async fn focus(&self) -> Result<()> {
        // A bare modifier press focuses the element and types nothing
        Ok(self.locator().await.press("Shift", None).await?)
    }

    async fn select_option(
        &self,
        value: SelectOption,
        options: SelectOptions,
    ) -> Result<Vec<String>> {
        Ok(self
            .locator()
            .await
            .select_option(value, Some(options))
            .await?)
    }

    async fn is_actionable(&self, timeout: Duration) -> bool {
        let trial = ClickOptions::builder()
            .trial(true)
            .timeout(timeout.as_millis() as f64)
            .build();
        match self.locator().await.click(Some(trial)).await {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(selector = %self.selector, error = %err, "trial click failed");
                false
            }
        }
    }
}

/// A page as seen by the navigation helpers.
#[derive(Clone)]
pub struct PlaywrightPage {
    page: Page,
}

impl PlaywrightPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }
}

#[async_trait]
impl PageHandle for PlaywrightPage {
    fn url(&self) -> String {
        self.page.url()
    }

    async fn ready_state(&self) -> Result<String> {
        let state = self.page.evaluate_value("document.readyState").await?;
        Ok(state.trim_matches('"').to_string())
    }
}

/// An iframe addressed by selector; inner selectors are chained through it.
#[derive(Clone)]
pub struct PlaywrightFrame {
    page: Page,
    frame_selector: String,
}

impl PlaywrightFrame {
    pub fn new(page: Page, frame_selector: impl Into<String>) -> Self {
        Self {
            page,
            frame_selector: frame_selector.into(),
        }
    }
}

/// `iframe#pay >> internal:control=enter-frame >> #card`
fn frame_chain(frame_selector: &str, inner: &str) -> String {
    format!("{frame_selector} >> {ENTER_FRAME} >> {inner}")
}

#[async_trait]
impl FrameScope for PlaywrightFrame {
    fn describe(&self) -> String {
        self.frame_selector.clone()
    }

    async fn locate(&self, selector: &str) -> Result<Arc<dyn Element>> {
        Ok(Arc::new(PlaywrightElement::new(
            self.page.clone(),
            frame_chain(&self.frame_selector, selector),
        )))
    }
}

/// Composite locator for `selector` on `page`.
pub fn locator(page: &Page, selector: &str, name: impl Into<String>) -> CompositeLocator {
    let page = page.clone();
    let selector = selector.to_string();
    CompositeLocator::new(name, move || {
        let element = PlaywrightElement::new(page.clone(), selector.clone());
        async move { Ok(element) }
    })
}

/// Composite frame locator for the iframe matched by `frame_selector`.
pub fn frame_locator(
    page: &Page,
    frame_selector: &str,
    name: impl Into<String>,
) -> CompositeFrameLocator {
    let page = page.clone();
    let frame_selector = frame_selector.to_string();
    CompositeFrameLocator::new(name, move || {
        let frame = PlaywrightFrame::new(page.clone(), frame_selector.clone());
        async move { Ok(frame) }
    })
}

/// A browser tab as a [`Screen`].
#[derive(Clone)]
pub struct PlaywrightScreen {
    handle: PlaywrightPage,
}

impl PlaywrightScreen {
    pub fn new(page: Page) -> Self {
        Self {
            handle: PlaywrightPage::new(page),
        }
    }

    pub fn raw_page(&self) -> &Page {
        self.handle.page()
    }
}

#[async_trait]
impl Screen for PlaywrightScreen {
    fn locator(&self, selector: &str, name: &str) -> CompositeLocator {
        locator(self.handle.page(), selector, name)
    }

    fn frame_locator(&self, frame_selector: &str, name: &str) -> CompositeFrameLocator {
        frame_locator(self.handle.page(), frame_selector, name)
    }

    fn page(&self) -> &dyn PageHandle {
        &self.handle
    }

    async fn goto(&self, url: &str) -> Result<()> {
        tracing::debug!(url, "navigating");
        self.handle.page().goto(url, None).await?;
        Ok(())
    }
}
