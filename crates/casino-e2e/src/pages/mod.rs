//! Page objects for the casino web app
//!
//! Each page object owns its [`CompositeLocator`]s and a [`TestContext`];
//! every public method runs as a named step so failures read as a trail
//! ("Deposit €25.00" > "Fill Amount input" > ...). Page objects take the
//! screen as `Arc<dyn Screen>`, so the same code drives a real browser tab
//! or an in-memory fake.

mod cashier;
mod landing;
mod login;
mod menu;
mod sign_up;
mod wallet;

pub use cashier::{CardDetails, CashierModal, CashierTab, PaymentMethod};
pub use landing::{DEFAULT_PROMOTION_COUNT, LandingPage};
pub use login::LoginModal;
pub use menu::{BottomNavigation, SideMenu};
pub use sign_up::{SignUpData, SignUpField, SignUpModal};
pub use wallet::WalletModal;

use crate::money::Money;
use casino_test_utils::{AttributeMap, CompositeLocator, Error, Result, Screen, TestContext};

/// CSS selector for a `data-test` hook
pub fn test_id(id: &str) -> String {
    format!("[data-test=\"{id}\"]")
}

pub(crate) fn by_test_id(screen: &dyn Screen, id: &str, name: &str) -> CompositeLocator {
    screen.locator(&test_id(id), name)
}

/// Marker carried by the selected tab, slide, indicator or payment method
pub(crate) fn active_class() -> AttributeMap {
    AttributeMap::single("class", "active")
}

/// Reads a displayed amount; an unparseable amount means the locator points
/// at the wrong element.
pub(crate) async fn read_money(ctx: &TestContext, element: &CompositeLocator) -> Result<Money> {
    let text = ctx.get_text(element).await?;
    text.parse().map_err(|err| {
        Error::Configuration(format!("{} does not show an amount: {err}", element.name()))
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_id_selector() {
        assert_eq!(test_id("login-button"), "[data-test=\"login-button\"]");
    }

    #[tokio::test]
    async fn test_read_money() {
        let ctx = ctx();
        let (fake, screen) = screen();
        el(&fake, "header-balance").set_text(Some(" €1,250.00 "));
        el(&fake, "logo").set_text(Some("Casino"));

        let balance = by_test_id(screen.as_ref(), "header-balance", "Header balance");
        assert_eq!(read_money(&ctx, &balance).await.unwrap(), Money::euros(1250));

        let logo = by_test_id(screen.as_ref(), "logo", "Logo");
        let err = read_money(&ctx, &logo).await.unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("Logo"));
    }
}
