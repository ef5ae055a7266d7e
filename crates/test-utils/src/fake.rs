// In-memory fakes for the driver traits
//
// Used by this crate's unit tests and by downstream crates that want to
// exercise page-object logic without launching a browser. State lives behind
// a shared lock so a test can flip it (immediately or after a delay) while a
// helper is polling.

use crate::driver::{Element, FrameScope, PageHandle, Screen};
use crate::locator::{CompositeFrameLocator, CompositeLocator};
use crate::error::{Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use playwright_rs::protocol::{ClickOptions, FillOptions, HoverOptions, SelectOption, SelectOptions};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

type ClickHook = Arc<dyn Fn() + Send + Sync>;

struct FakeState {
    visible: bool,
    enabled: bool,
    editable: bool,
    actionable: bool,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    value: String,
    options: Vec<String>,
    actions: Vec<String>,
    last_click: Option<ClickOptions>,
    on_click: Vec<ClickHook>,
}

/// A fake element whose state is set by the test.
///
/// Defaults: visible, enabled, editable, actionable, no attributes, no text.
/// Actions on an invisible element fail with [`Error::Timeout`] unless
/// forced, like Playwright's actionability checks.
#[derive(Clone)]
pub struct FakeElement {
    selector: Arc<str>,
    state: Arc<Mutex<FakeState>>,
}

impl FakeElement {
    pub fn new(selector: &str) -> Self {
        Self {
            selector: Arc::from(selector),
            state: Arc::new(Mutex::new(FakeState {
                visible: true,
                enabled: true,
                editable: true,
                actionable: true,
                attributes: BTreeMap::new(),
                text: None,
                value: String::new(),
                options: Vec::new(),
                actions: Vec::new(),
                last_click: None,
                on_click: Vec::new(),
            })),
        }
    }

    // Builder-style setters

    pub fn visible(self, visible: bool) -> Self {
        self.set_visible(visible);
        self
    }

    pub fn enabled(self, enabled: bool) -> Self {
        self.set_enabled(enabled);
        self
    }

    pub fn editable(self, editable: bool) -> Self {
        self.state.lock().editable = editable;
        self
    }

    pub fn actionable(self, actionable: bool) -> Self {
        self.state.lock().actionable = actionable;
        self
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, Some(value));
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.set_text(Some(text));
        self
    }

    /// Option values a `<select>` accepts
    pub fn select_options(self, options: &[&str]) -> Self {
        self.state.lock().options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    // Live mutation

    pub fn set_visible(&self, visible: bool) {
        self.state.lock().visible = visible;
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.state.lock().enabled = enabled;
    }

    pub fn set_actionable(&self, actionable: bool) {
        self.state.lock().actionable = actionable;
    }

    pub fn set_attribute(&self, name: &str, value: Option<&str>) {
        let mut state = self.state.lock();
        match value {
            Some(v) => {
                state.attributes.insert(name.to_string(), v.to_string());
            }
            None => {
                state.attributes.remove(name);
            }
        }
    }

    pub fn set_text(&self, text: Option<&str>) {
        self.state.lock().text = text.map(str::to_string);
    }

    /// Applies `change` to this element after `delay`, from a spawned task.
    pub fn change_after<F>(&self, delay: Duration, change: F)
    where
        F: FnOnce(&FakeElement) + Send + 'static,
    {
        let this = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            change(&this);
        });
    }

    /// Registers a hook run after every successful click
    pub fn on_click<F>(self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.state.lock().on_click.push(Arc::new(hook));
        self
    }

    // Inspection

    /// Actions performed so far, e.g. `["click", "fill:42"]`
    pub fn actions(&self) -> Vec<String> {
        self.state.lock().actions.clone()
    }

    pub fn click_count(&self) -> usize {
        self.state
            .lock()
            .actions
            .iter()
            .filter(|a| a.as_str() == "click")
            .count()
    }

    pub fn last_click_options(&self) -> Option<ClickOptions> {
        self.state.lock().last_click.clone()
    }

    pub fn value(&self) -> String {
        self.state.lock().value.clone()
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.state.lock().attributes.get(name).cloned()
    }

    fn ensure_actionable(&self, force: bool, action: &str) -> Result<()> {
        let state = self.state.lock();
        if force {
            return Ok(());
        }
        if !state.visible || !state.actionable {
            return Err(Error::Timeout(format!(
                "{action} on '{}': element is not visible or is covered",
                self.selector
            )));
        }
        Ok(())
    }

    fn record(&self, action: String) {
        self.state.lock().actions.push(action);
    }
}

#[async_trait]
impl Element for FakeElement {
    fn describe(&self) -> String {
        self.selector.to_string()
    }

    async fn is_visible(&self) -> Result<bool> {
        Ok(self.state.lock().visible)
    }

    async fn is_enabled(&self) -> Result<bool> {
        Ok(self.state.lock().enabled)
    }

    async fn is_editable(&self) -> Result<bool> {
        let state = self.state.lock();
        Ok(state.enabled && state.editable)
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.get_attribute(name))
    }

    async fn text_content(&self) -> Result<Option<String>> {
        Ok(self.state.lock().text.clone())
    }

    async fn click(&self, options: ClickOptions) -> Result<()> {
        self.ensure_actionable(options.force.unwrap_or(false), "click")?;
        if options.trial.unwrap_or(false) {
            return Ok(());
        }
        let hooks = {
            let mut state = self.state.lock();
            state.actions.push("click".to_string());
            state.last_click = Some(options);
            state.on_click.clone()
        };
        for hook in hooks {
            hook();
        }
        Ok(())
    }

    async fn fill(&self, text: &str, options: FillOptions) -> Result<()> {
        self.ensure_actionable(options.force.unwrap_or(false), "fill")?;
        {
            let mut state = self.state.lock();
            if !(state.enabled && state.editable) {
                return Err(Error::Timeout(format!(
                    "fill on '{}': element is not editable",
                    self.selector
                )));
            }
            state.value = text.to_string();
        }
        self.record(format!("fill:{text}"));
        Ok(())
    }

    async fn clear(&self, options: FillOptions) -> Result<()> {
        self.ensure_actionable(options.force.unwrap_or(false), "clear")?;
        self.state.lock().value.clear();
        self.record("clear".to_string());
        Ok(())
    }

    async fn select_all(&self) -> Result<()> {
        self.record("select_all".to_string());
        Ok(())
    }

    async fn hover(&self, options: HoverOptions) -> Result<()> {
        self.ensure_actionable(options.force.unwrap_or(false), "hover")?;
        self.record("hover".to_string());
        Ok(())
    }

    async fn focus(&self) -> Result<()> {
        self.record("focus".to_string());
        Ok(())
    }

    async fn select_option(
        &self,
        value: SelectOption,
        options: SelectOptions,
    ) -> Result<Vec<String>> {
        self.ensure_actionable(options.force.unwrap_or(false), "select")?;
        let chosen = {
            let state = self.state.lock();
            match &value {
                SelectOption::Value(v) | SelectOption::Label(v) => {
                    state.options.iter().find(|o| *o == v).cloned()
                }
                SelectOption::Index(i) => state.options.get(*i).cloned(),
                #[allow(unreachable_patterns)]
                _ => None,
            }
        };
        let chosen = chosen.ok_or_else(|| {
            Error::Timeout(format!(
                "select on '{}': no option matching {:?}",
                self.selector, value
            ))
        })?;
        self.state.lock().value = chosen.clone();
        self.record(format!("select:{chosen}"));
        Ok(vec![chosen])
    }

    async fn is_actionable(&self, _timeout: Duration) -> bool {
        let state = self.state.lock();
        state.visible && state.actionable
    }
}

/// A fake page exposing a mutable URL and ready state.
#[derive(Clone)]
pub struct FakePage {
    url: Arc<Mutex<String>>,
    ready_state: Arc<Mutex<String>>,
}

impl FakePage {
    pub fn new(url: &str) -> Self {
        Self {
            url: Arc::new(Mutex::new(url.to_string())),
            ready_state: Arc::new(Mutex::new("complete".to_string())),
        }
    }

    pub fn set_url(&self, url: &str) {
        *self.url.lock() = url.to_string();
    }

    pub fn set_ready_state(&self, state: &str) {
        *self.ready_state.lock() = state.to_string();
    }

    /// Sets the URL after `delay`, from a spawned task.
    pub fn navigate_after(&self, delay: Duration, url: &str) {
        let this = self.clone();
        let url = url.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.set_url(&url);
        });
    }
}

#[async_trait]
impl PageHandle for FakePage {
    fn url(&self) -> String {
        self.url.lock().clone()
    }

    async fn ready_state(&self) -> Result<String> {
        Ok(self.ready_state.lock().clone())
    }
}

/// A fake frame holding elements by selector.
#[derive(Clone)]
pub struct FakeFrame {
    selector: Arc<str>,
    elements: Arc<Mutex<HashMap<String, FakeElement>>>,
}

impl FakeFrame {
    pub fn new(selector: &str) -> Self {
        Self {
            selector: Arc::from(selector),
            elements: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_element(self, selector: &str, element: FakeElement) -> Self {
        self.elements.lock().insert(selector.to_string(), element);
        self
    }
}

#[async_trait]
impl FrameScope for FakeFrame {
    fn describe(&self) -> String {
        self.selector.to_string()
    }

    async fn locate(&self, selector: &str) -> Result<Arc<dyn Element>> {
        let element = self.elements.lock().get(selector).cloned();
        element
            .map(|e| Arc::new(e) as Arc<dyn Element>)
            .ok_or_else(|| {
                Error::Timeout(format!(
                    "no element matching '{selector}' in frame '{}'",
                    self.selector
                ))
            })
    }
}

/// A fake browser tab for page-object tests.
///
/// Elements and frames are created on first use, keyed by selector, so a
/// test can grab the element a page object will resolve and configure it
/// (state, text, click hooks) before or after the page object is built.
#[derive(Clone)]
pub struct FakeScreen {
    page: FakePage,
    elements: Arc<Mutex<HashMap<String, FakeElement>>>,
    frames: Arc<Mutex<HashMap<String, FakeFrame>>>,
}

impl FakeScreen {
    pub fn new(url: &str) -> Self {
        Self {
            page: FakePage::new(url),
            elements: Arc::new(Mutex::new(HashMap::new())),
            frames: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The element behind `selector`, created visible and enabled if new
    pub fn element(&self, selector: &str) -> FakeElement {
        self.elements
            .lock()
            .entry(selector.to_string())
            .or_insert_with(|| FakeElement::new(selector))
            .clone()
    }

    /// Replaces the element behind `selector`
    pub fn insert(&self, selector: &str, element: FakeElement) -> FakeElement {
        self.elements
            .lock()
            .insert(selector.to_string(), element.clone());
        element
    }

    /// The frame behind `frame_selector`, created empty if new
    pub fn frame(&self, frame_selector: &str) -> FakeFrame {
        self.frames
            .lock()
            .entry(frame_selector.to_string())
            .or_insert_with(|| FakeFrame::new(frame_selector))
            .clone()
    }

    pub fn fake_page(&self) -> &FakePage {
        &self.page
    }
}

#[async_trait]
impl Screen for FakeScreen {
    fn locator(&self, selector: &str, name: &str) -> CompositeLocator {
        let screen = self.clone();
        let selector = selector.to_string();
        CompositeLocator::new(name, move || {
            let element = screen.element(&selector);
            async move { Ok(element) }
        })
    }

    fn frame_locator(&self, frame_selector: &str, name: &str) -> CompositeFrameLocator {
        let screen = self.clone();
        let frame_selector = frame_selector.to_string();
        CompositeFrameLocator::new(name, move || {
            let frame = screen.frame(&frame_selector);
            async move { Ok(frame) }
        })
    }

    fn page(&self) -> &dyn PageHandle {
        &self.page
    }

    async fn goto(&self, url: &str) -> Result<()> {
        self.page.set_url(url);
        Ok(())
    }
}
