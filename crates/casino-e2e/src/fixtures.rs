// Browser fixtures per role and device
//
// A fixture owns the whole Playwright stack for one test: driver process,
// browser, context and page. Members start from the stored session state;
// if none exists yet the fixture logs in once and stores it.

use crate::pages::{
    BottomNavigation, CashierModal, LandingPage, LoginModal, SideMenu, SignUpModal, WalletModal,
};
use crate::session::SessionStore;
use casino_test_utils::playwright::PlaywrightScreen;
use casino_test_utils::{Result, Screen, TestConfig, TestContext};
use playwright_rs::{
    Browser, BrowserContext, BrowserContextOptions, LaunchOptions, Playwright, StorageState,
    Viewport,
};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::Instrument;

/// Who is using the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Guest,
    Member,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Guest, Role::Member];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Member => "member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emulated device class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    Desktop,
    Mobile,
}

impl Device {
    pub const ALL: [Device; 2] = [Device::Desktop, Device::Mobile];

    pub fn as_str(self) -> &'static str {
        match self {
            Device::Desktop => "desktop",
            Device::Mobile => "mobile",
        }
    }

    pub fn viewport(self) -> Viewport {
        match self {
            Device::Desktop => Viewport {
                width: 1440,
                height: 900,
            },
            Device::Mobile => Viewport {
                width: 390,
                height: 844,
            },
        }
    }

    pub fn is_mobile(self) -> bool {
        self == Device::Mobile
    }

    /// Context options for this device, optionally seeded with a session
    pub fn context_options(self, state: Option<StorageState>) -> BrowserContextOptions {
        let mut builder = BrowserContextOptions::builder()
            .viewport(self.viewport())
            .is_mobile(self.is_mobile())
            .has_touch(self.is_mobile());
        if let Some(state) = state {
            builder = builder.storage_state(state);
        }
        builder.build()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Device {
    type Err = casino_test_utils::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(Device::Desktop),
            "mobile" => Ok(Device::Mobile),
            other => Err(casino_test_utils::Error::Configuration(format!(
                "unknown device '{other}' (expected desktop or mobile)"
            ))),
        }
    }
}

/// One browser tab for one role on one device, plus the test context that
/// all its page objects share.
pub struct Fixture {
    playwright: Playwright,
    browser: Browser,
    context: BrowserContext,
    screen: Arc<PlaywrightScreen>,
    ctx: TestContext,
    role: Role,
    device: Device,
}

impl Fixture {
    pub async fn launch(config: TestConfig, role: Role, device: Device) -> Result<Self> {
        let span = tracing::info_span!("fixture", role = role.as_str(), device = device.as_str());
        async move {
            let store = SessionStore::new(&config.storage_state_dir);
            let stored = match role {
                Role::Member => store.load(role, device).await?,
                Role::Guest => None,
            };
            let needs_login = role == Role::Member && stored.is_none();

            let playwright = Playwright::launch().await?;
            let browser = playwright
                .chromium()
                .launch_with_options(LaunchOptions::new().headless(config.headless))
                .await?;
            let context = browser
                .new_context_with_options(device.context_options(stored))
                .await?;
            let page = context.new_page().await?;
            tracing::info!(needs_login, "browser ready");

            let fixture = Self {
                playwright,
                browser,
                context,
                screen: Arc::new(PlaywrightScreen::new(page)),
                ctx: TestContext::new(config),
                role,
                device,
            };

            if needs_login {
                fixture.login_and_store(&store).await?;
            }
            Ok(fixture)
        }
        .instrument(span)
        .await
    }

    /// Logs the member in through the UI and writes the session state.
    async fn login_and_store(&self, store: &SessionStore) -> Result<()> {
        self.ctx
            .step(format!("Create {} session for {}", self.role, self.device), async {
                let credentials = self.ctx.config().member_credentials()?.clone();
                self.landing().open().await?;
                self.login_modal().login(&credentials).await?;
                let state = self.context.storage_state().await?;
                store.save(self.role, self.device, &state).await?;
                Ok(())
            })
            .await
    }

    pub fn ctx(&self) -> &TestContext {
        &self.ctx
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn screen(&self) -> Arc<dyn Screen> {
        self.screen.clone()
    }

    pub fn page(&self) -> &playwright_rs::Page {
        self.screen.raw_page()
    }

    pub async fn storage_state(&self) -> Result<StorageState> {
        Ok(self.context.storage_state().await?)
    }

    pub fn landing(&self) -> LandingPage {
        LandingPage::new(&self.ctx, self.screen())
    }

    pub fn side_menu(&self) -> SideMenu {
        SideMenu::new(&self.ctx, self.screen())
    }

    pub fn bottom_nav(&self) -> BottomNavigation {
        BottomNavigation::new(&self.ctx, self.screen())
    }

    pub fn login_modal(&self) -> LoginModal {
        LoginModal::new(&self.ctx, self.screen())
    }

    pub fn sign_up_modal(&self) -> SignUpModal {
        SignUpModal::new(&self.ctx, self.screen())
    }

    pub fn cashier(&self) -> CashierModal {
        CashierModal::new(&self.ctx, self.screen())
    }

    pub fn wallet(&self) -> WalletModal {
        WalletModal::new(&self.ctx, self.screen())
    }

    /// Shuts the browser down, then fails if any soft assertion failed.
    pub async fn close(self) -> Result<()> {
        let shutdown = async {
            self.context.close().await?;
            self.browser.close().await?;
            self.playwright.shutdown().await?;
            Ok::<(), casino_test_utils::Error>(())
        }
        .await;
        if let Err(err) = &shutdown {
            tracing::warn!(error = %err, "browser shutdown failed");
        }
        self.ctx.finish()?;
        shutdown
    }
}
