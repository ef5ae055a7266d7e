// Cashier modal: deposit and withdraw tabs, payment methods and the
// iframe-embedded card widget

use super::{active_class, by_test_id, read_money};
use crate::money::Money;
use casino_test_utils::{
    Action, CompositeFrameLocator, CompositeLocator, ElementGroup, Error, InteractionStep, Result,
    Screen, TestContext, Toggle, matches_class_tokens,
};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashierTab {
    Deposit,
    Withdraw,
}

impl fmt::Display for CashierTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CashierTab::Deposit => "deposit",
            CashierTab::Withdraw => "withdraw",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Card,
    Bank,
    Skrill,
}

impl PaymentMethod {
    /// Display order in the cashier
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Card, PaymentMethod::Bank, PaymentMethod::Skrill];

    fn index(self) -> usize {
        match self {
            PaymentMethod::Card => 0,
            PaymentMethod::Bank => 1,
            PaymentMethod::Skrill => 2,
        }
    }

    fn slug(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Bank => "bank",
            PaymentMethod::Skrill => "skrill",
        }
    }
}

/// Card typed into the payment widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDetails {
    pub number: String,
    pub expiry: String,
    pub cvv: String,
}

impl CardDetails {
    pub fn new(number: impl Into<String>, expiry: impl Into<String>, cvv: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            expiry: expiry.into(),
            cvv: cvv.into(),
        }
    }

    /// Standard Visa test number
    pub fn test_visa() -> Self {
        Self::new("4111 1111 1111 1111", "12/30", "123")
    }
}

#[derive(Clone)]
pub struct CashierModal {
    ctx: TestContext,
    pub modal: CompositeLocator,
    pub deposit_tab: CompositeLocator,
    pub withdraw_tab: CompositeLocator,
    pub amount: CompositeLocator,
    pub methods: Vec<CompositeLocator>,
    pub payment_frame: CompositeFrameLocator,
    pub card_number: CompositeLocator,
    pub card_expiry: CompositeLocator,
    pub card_cvv: CompositeLocator,
    pub submit: CompositeLocator,
    pub balance: CompositeLocator,
    pub success: CompositeLocator,
    pub error: CompositeLocator,
    pub close_button: CompositeLocator,
}

impl CashierModal {
    pub fn new(ctx: &TestContext, screen: Arc<dyn Screen>) -> Self {
        let s = screen.as_ref();
        let payment_frame = s.frame_locator("iframe[name=\"payment-frame\"]", "Payment frame");
        let methods = PaymentMethod::ALL
            .iter()
            .map(|m| {
                by_test_id(
                    s,
                    &format!("method-{}", m.slug()),
                    &format!("{m:?} payment method"),
                )
            })
            .collect();

        Self {
            ctx: ctx.clone(),
            modal: by_test_id(s, "cashier-modal", "Cashier modal"),
            deposit_tab: by_test_id(s, "cashier-tab-deposit", "Deposit tab"),
            withdraw_tab: by_test_id(s, "cashier-tab-withdraw", "Withdraw tab"),
            amount: s.locator("#cashier-amount", "Amount input"),
            methods,
            card_number: payment_frame.locator("#card-number", "Card number input"),
            card_expiry: payment_frame.locator("#card-expiry", "Card expiry input"),
            card_cvv: payment_frame.locator("#card-cvv", "Card CVV input"),
            payment_frame,
            submit: by_test_id(s, "cashier-submit", "Cashier submit button"),
            balance: by_test_id(s, "cashier-balance", "Cashier balance"),
            success: by_test_id(s, "cashier-success", "Cashier success message"),
            error: by_test_id(s, "cashier-error", "Cashier error message"),
            close_button: by_test_id(s, "cashier-close", "Cashier close button"),
        }
    }

    pub fn method(&self, method: PaymentMethod) -> &CompositeLocator {
        &self.methods[method.index()]
    }

    pub async fn validate_open(&self) -> Result<()> {
        self.ctx.assert_visible(&self.modal).await
    }

    /// The tab currently carrying the active class
    pub async fn active_tab(&self) -> Result<CashierTab> {
        let class = self.deposit_tab.resolve().await?.attribute("class").await?;
        Ok(match class {
            Some(class) if matches_class_tokens(&class, "active") => CashierTab::Deposit,
            _ => CashierTab::Withdraw,
        })
    }

    /// Switches to `tab`, checking the two tabs stay mutually exclusive.
    pub async fn select_tab(&self, tab: CashierTab) -> Result<()> {
        self.ctx
            .step(format!("Select {tab} tab"), async {
                let tabs = [self.deposit_tab.clone(), self.withdraw_tab.clone()];
                let current = self.active_tab().await?;
                if current == tab {
                    let index = if tab == CashierTab::Deposit { 0 } else { 1 };
                    return self
                        .ctx
                        .validate_only_one_element_active_group(
                            &tabs,
                            index,
                            &active_class(),
                            Some("cashier tabs"),
                        )
                        .await;
                }
                let initially = match current {
                    CashierTab::Deposit => Toggle::A,
                    CashierTab::Withdraw => Toggle::B,
                };
                self.ctx
                    .validate_toggle_between_two_elements(
                        &self.deposit_tab,
                        &self.withdraw_tab,
                        &active_class(),
                        initially,
                        Some("cashier tabs"),
                    )
                    .await
            })
            .await
    }

    pub async fn choose_method(&self, method: PaymentMethod) -> Result<()> {
        self.ctx
            .step(format!("Choose {method:?} payment"), async {
                self.ctx.click_element(self.method(method), None).await?;
                self.ctx
                    .validate_only_one_element_active_group(
                        &self.methods,
                        method.index(),
                        &active_class(),
                        Some("payment methods"),
                    )
                    .await
            })
            .await
    }

    pub async fn enter_card(&self, card: &CardDetails) -> Result<()> {
        let steps = [
            InteractionStep::new(&self.card_number, Action::Fill(card.number.clone())),
            InteractionStep::new(&self.card_expiry, Action::Fill(card.expiry.clone())),
            InteractionStep::new(&self.card_cvv, Action::Fill(card.cvv.clone())),
        ];
        self.ctx.perform_interaction_chain(&steps, None).await
    }

    /// Deposits `amount` with `card` and waits for the confirmation.
    pub async fn deposit(&self, amount: Money, card: &CardDetails) -> Result<()> {
        self.ctx
            .step(format!("Deposit {amount}"), async {
                self.select_tab(CashierTab::Deposit).await?;
                self.choose_method(PaymentMethod::Card).await?;
                self.ctx
                    .fill_element(&self.amount, &amount.to_input(), None)
                    .await?;
                self.enter_card(card).await?;
                self.ctx.click_element(&self.submit, None).await?;
                self.ctx.assert_visible(&self.success).await
            })
            .await
    }

    /// Deposits `amount` through a method without the card widget.
    pub async fn deposit_by(&self, amount: Money, method: PaymentMethod) -> Result<()> {
        if method == PaymentMethod::Card {
            return Err(Error::Configuration(
                "card deposits need card details, use CashierModal::deposit".to_string(),
            ));
        }
        self.ctx
            .step(format!("Deposit {amount} by {method:?}"), async {
                self.select_tab(CashierTab::Deposit).await?;
                self.choose_method(method).await?;
                self.ctx
                    .fill_element(&self.amount, &amount.to_input(), None)
                    .await?;
                self.ctx.click_element(&self.submit, None).await?;
                self.ctx.assert_visible(&self.success).await
            })
            .await
    }

    pub async fn withdraw(&self, amount: Money) -> Result<()> {
        self.ctx
            .step(format!("Withdraw {amount}"), async {
                self.select_tab(CashierTab::Withdraw).await?;
                self.ctx
                    .fill_element(&self.amount, &amount.to_input(), None)
                    .await?;
                self.ctx.click_element(&self.submit, None).await?;
                self.ctx.assert_visible(&self.success).await
            })
            .await
    }

    pub async fn balance(&self) -> Result<Money> {
        read_money(&self.ctx, &self.balance).await
    }

    pub async fn validate_error(&self, message: &str) -> Result<()> {
        self.ctx
            .validate_group_texts(&ElementGroup::ordered(vec![self.error.clone()]), &[message])
            .await
    }

    pub async fn close(&self) -> Result<()> {
        self.ctx
            .step("Close cashier", async {
                self.ctx.click_element(&self.close_button, None).await?;
                self.ctx.assert_not_visible(&self.modal).await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_id;
    use super::super::test_support::*;
    use super::*;
    use casino_test_utils::Element;
    use casino_test_utils::fake::{FakeElement, FakeScreen};

    const FRAME: &str = "iframe[name=\"payment-frame\"]";

    /// Tabs and methods that move the active class when clicked
    fn wire_exclusive(fake: &FakeScreen, ids: &[&str], base_class: &str, active: usize) {
        let elements: Vec<FakeElement> = ids.iter().map(|id| el(fake, id)).collect();
        for (i, element) in elements.iter().enumerate() {
            let class = if i == active {
                format!("{base_class} active")
            } else {
                base_class.to_string()
            };
            element.set_attribute("class", Some(&class));
        }
        for (i, id) in ids.iter().enumerate() {
            let group = elements.clone();
            let base = base_class.to_string();
            let element = el(fake, id).on_click(move || {
                for (k, other) in group.iter().enumerate() {
                    let class = if k == i { format!("{base} active") } else { base.clone() };
                    other.set_attribute("class", Some(&class));
                }
            });
            fake.insert(&test_id(id), element);
        }
    }

    fn cashier_screen() -> (FakeScreen, Arc<dyn Screen>) {
        let (fake, screen) = screen();
        wire_exclusive(&fake, &["cashier-tab-deposit", "cashier-tab-withdraw"], "cashier-tab", 0);
        wire_exclusive(
            &fake,
            &["method-card", "method-bank", "method-skrill"],
            "payment-method",
            1,
        );
        fake.frame(FRAME)
            .with_element("#card-number", FakeElement::new("#card-number"))
            .with_element("#card-expiry", FakeElement::new("#card-expiry"))
            .with_element("#card-cvv", FakeElement::new("#card-cvv"));
        (fake, screen)
    }

    #[tokio::test]
    async fn test_deposit_fills_amount_and_card() {
        let (fake, screen) = cashier_screen();
        let cashier = CashierModal::new(&ctx(), screen);

        cashier
            .deposit(Money::from_cents(2550), &CardDetails::test_visa())
            .await
            .unwrap();

        assert_eq!(fake.element("#cashier-amount").value(), "25.50");
        assert_eq!(el(&fake, "method-card").click_count(), 1);
        assert_eq!(el(&fake, "cashier-tab-deposit").click_count(), 0);
        assert_eq!(el(&fake, "cashier-submit").click_count(), 1);
        let card = cashier.card_number.resolve().await.unwrap();
        assert_eq!(card.describe(), "#card-number");
    }

    #[tokio::test]
    async fn test_withdraw_switches_tab() {
        let (fake, screen) = cashier_screen();
        let cashier = CashierModal::new(&ctx(), screen);

        assert_eq!(cashier.active_tab().await.unwrap(), CashierTab::Deposit);
        cashier.withdraw(Money::euros(10)).await.unwrap();

        assert_eq!(cashier.active_tab().await.unwrap(), CashierTab::Withdraw);
        assert_eq!(el(&fake, "cashier-tab-withdraw").click_count(), 1);
        assert_eq!(fake.element("#cashier-amount").value(), "10.00");
    }

    #[tokio::test]
    async fn test_deposit_by_card_without_details_is_configuration_error() {
        let (_fake, screen) = cashier_screen();
        let cashier = CashierModal::new(&ctx(), screen);

        let err = cashier
            .deposit_by(Money::euros(5), PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_missing_card_widget_fails_deposit() {
        let (fake, screen) = screen();
        wire_exclusive(&fake, &["cashier-tab-deposit", "cashier-tab-withdraw"], "cashier-tab", 0);
        wire_exclusive(
            &fake,
            &["method-card", "method-bank", "method-skrill"],
            "payment-method",
            0,
        );
        let cashier = CashierModal::new(&ctx(), screen);

        let err = cashier
            .deposit(Money::euros(5), &CardDetails::test_visa())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("#card-number"));
        assert_eq!(el(&fake, "cashier-submit").click_count(), 0);
    }

    #[tokio::test]
    async fn test_balance_and_error() {
        let (fake, screen) = cashier_screen();
        el(&fake, "cashier-balance").set_text(Some("€74.50"));
        el(&fake, "cashier-error").set_text(Some("Insufficient funds"));
        let cashier = CashierModal::new(&ctx(), screen);

        assert_eq!(cashier.balance().await.unwrap(), Money::from_cents(7450));
        cashier.validate_error("Insufficient funds").await.unwrap();
        assert!(cashier.validate_error("Card number is invalid").await.is_err());
    }
}
