// Side menu and the mobile bottom navigation bar

use super::cashier::CashierTab;
use super::{by_test_id, read_money};
use crate::fixtures::Role;
use crate::money::Money;
use casino_test_utils::{
    ClickOutcome, CompositeLocator, ElementGroup, Result, Screen, TestContext,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct SideMenu {
    ctx: TestContext,
    screen: Arc<dyn Screen>,
    pub menu_button: CompositeLocator,
    pub panel: CompositeLocator,
    pub close_button: CompositeLocator,
    pub home: CompositeLocator,
    pub casino: CompositeLocator,
    pub live: CompositeLocator,
    pub promotions: CompositeLocator,
    pub login: CompositeLocator,
    pub register: CompositeLocator,
    pub deposit: CompositeLocator,
    pub withdraw: CompositeLocator,
    pub logout: CompositeLocator,
}

impl SideMenu {
    pub fn new(ctx: &TestContext, screen: Arc<dyn Screen>) -> Self {
        let s = screen.as_ref();
        Self {
            menu_button: by_test_id(s, "menu-button", "Menu button"),
            panel: by_test_id(s, "side-menu", "Side menu"),
            close_button: by_test_id(s, "menu-close", "Side menu close button"),
            home: by_test_id(s, "menu-home", "Home menu item"),
            casino: by_test_id(s, "menu-casino", "Casino menu item"),
            live: by_test_id(s, "menu-live", "Live casino menu item"),
            promotions: by_test_id(s, "menu-promotions", "Promotions menu item"),
            login: by_test_id(s, "menu-login", "Log in menu item"),
            register: by_test_id(s, "menu-register", "Sign up menu item"),
            deposit: by_test_id(s, "menu-deposit", "Deposit menu item"),
            withdraw: by_test_id(s, "menu-withdraw", "Withdraw menu item"),
            logout: by_test_id(s, "menu-logout", "Log out menu item"),
            ctx: ctx.clone(),
            screen,
        }
    }

    /// Menu items a role sees, in display order, with their labels
    pub fn items_for(&self, role: Role) -> Vec<(&'static str, CompositeLocator)> {
        let mut items = vec![
            ("Home", self.home.clone()),
            ("Casino", self.casino.clone()),
            ("Live casino", self.live.clone()),
            ("Promotions", self.promotions.clone()),
        ];
        match role {
            Role::Guest => {
                items.push(("Log in", self.login.clone()));
                items.push(("Sign up", self.register.clone()));
            }
            Role::Member => {
                items.push(("Deposit", self.deposit.clone()));
                items.push(("Withdraw", self.withdraw.clone()));
                items.push(("Log out", self.logout.clone()));
            }
        }
        items
    }

    /// Items the other role sees, which must stay hidden
    pub fn hidden_items_for(&self, role: Role) -> Vec<CompositeLocator> {
        match role {
            Role::Guest => vec![self.deposit.clone(), self.withdraw.clone(), self.logout.clone()],
            Role::Member => vec![self.login.clone(), self.register.clone()],
        }
    }

    /// Opens the menu through the menu button. When the button is hidden
    /// (an overlay covers the header), reloads the landing page and tries
    /// again from there.
    pub async fn open(&self) -> Result<ClickOutcome> {
        self.ctx
            .step("Open side menu", async {
                let outcome = self
                    .ctx
                    .click_if_visible_or_fallback(&self.menu_button, move || async move {
                        let url = self.ctx.config().resolve("")?;
                        self.screen.goto(url.as_str()).await?;
                        self.ctx.wait_for_dom_content_loaded(self.screen.page()).await?;
                        self.ctx.click_element(&self.menu_button, None).await
                    })
                    .await?;
                self.ctx.assert_visible(&self.panel).await?;
                Ok(outcome)
            })
            .await
    }

    pub async fn close(&self) -> Result<()> {
        self.ctx
            .step("Close side menu", async {
                self.ctx.click_element(&self.close_button, None).await?;
                self.ctx.assert_not_visible(&self.panel).await
            })
            .await
    }

    pub async fn validate_menu_elements_for(&self, role: Role) -> Result<()> {
        self.ctx
            .step(format!("Validate menu elements for a {}", role.as_str()), async {
                let items = self.items_for(role);
                let named = ElementGroup::named(
                    items.iter().map(|(label, locator)| (*label, locator.clone())),
                );
                self.ctx.validate_all_elements_visibility(&named).await?;

                let labels: Vec<&str> = items.iter().map(|(label, _)| *label).collect();
                let ordered =
                    ElementGroup::ordered(items.iter().map(|(_, l)| l.clone()).collect());
                self.ctx.validate_group_texts(&ordered, &labels).await?;

                for hidden in self.hidden_items_for(role) {
                    self.ctx.assert_not_visible(&hidden).await?;
                }
                Ok(())
            })
            .await
    }

    /// Opens the cashier on `tab` from the member menu.
    pub async fn open_cashier(&self, tab: CashierTab) -> Result<()> {
        let item = match tab {
            CashierTab::Deposit => &self.deposit,
            CashierTab::Withdraw => &self.withdraw,
        };
        self.ctx.click_element(item, None).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.ctx.click_element(&self.logout, None).await
    }
}

#[derive(Clone)]
pub struct BottomNavigation {
    ctx: TestContext,
    pub bar: CompositeLocator,
    pub home: CompositeLocator,
    pub casino: CompositeLocator,
    pub cashier: CompositeLocator,
    pub balance: CompositeLocator,
}

impl BottomNavigation {
    pub fn new(ctx: &TestContext, screen: Arc<dyn Screen>) -> Self {
        let s = screen.as_ref();
        Self {
            ctx: ctx.clone(),
            bar: by_test_id(s, "bottom-nav", "Bottom navigation"),
            home: by_test_id(s, "bottom-nav-home", "Bottom navigation home"),
            casino: by_test_id(s, "bottom-nav-casino", "Bottom navigation casino"),
            cashier: by_test_id(s, "bottom-nav-cashier", "Bottom navigation cashier"),
            balance: by_test_id(s, "bottom-nav-balance", "Bottom navigation balance"),
        }
    }

    pub async fn validate_for(&self, role: Role) -> Result<()> {
        self.ctx
            .step(format!("Validate bottom navigation for a {}", role.as_str()), async {
                let always = ElementGroup::ordered(vec![
                    self.bar.clone(),
                    self.home.clone(),
                    self.casino.clone(),
                ]);
                self.ctx.validate_all_elements_visibility(&always).await?;
                match role {
                    Role::Guest => {
                        self.ctx.assert_not_visible(&self.balance).await?;
                        self.ctx.assert_not_visible(&self.cashier).await
                    }
                    Role::Member => {
                        self.ctx.assert_visible(&self.balance).await?;
                        self.ctx.assert_visible_and_enabled(&self.cashier).await
                    }
                }
            })
            .await
    }

    pub async fn balance(&self) -> Result<Money> {
        read_money(&self.ctx, &self.balance).await
    }

    pub async fn open_cashier(&self) -> Result<()> {
        self.ctx.click_element(&self.cashier, None).await
    }
}
