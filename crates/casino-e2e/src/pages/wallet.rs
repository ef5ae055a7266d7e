// Wallet modal, shown to members by promotion call to actions

use super::{by_test_id, read_money};
use crate::money::Money;
use casino_test_utils::{CompositeLocator, Result, Screen, TestContext};
use std::sync::Arc;

#[derive(Clone)]
pub struct WalletModal {
    ctx: TestContext,
    pub modal: CompositeLocator,
    pub balance: CompositeLocator,
    pub deposit_button: CompositeLocator,
    pub close_button: CompositeLocator,
}

impl WalletModal {
    pub fn new(ctx: &TestContext, screen: Arc<dyn Screen>) -> Self {
        let s = screen.as_ref();
        Self {
            ctx: ctx.clone(),
            modal: by_test_id(s, "wallet-modal", "Wallet modal"),
            balance: by_test_id(s, "wallet-balance", "Wallet balance"),
            deposit_button: by_test_id(s, "wallet-deposit", "Wallet deposit button"),
            close_button: by_test_id(s, "wallet-close", "Wallet close button"),
        }
    }

    pub async fn validate_open(&self) -> Result<()> {
        self.ctx.assert_visible(&self.modal).await
    }

    pub async fn balance(&self) -> Result<Money> {
        read_money(&self.ctx, &self.balance).await
    }

    /// Continues from the wallet into the cashier's deposit tab.
    pub async fn open_cashier(&self) -> Result<()> {
        self.ctx
            .step("Open cashier from wallet", async {
                self.ctx.assert_visible_and_enabled(&self.deposit_button).await?;
                self.ctx.click_element(&self.deposit_button, None).await?;
                self.ctx.assert_not_visible(&self.modal).await
            })
            .await
    }

    pub async fn close(&self) -> Result<()> {
        self.ctx.click_element(&self.close_button, None).await
    }
}
