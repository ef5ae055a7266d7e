// Landing page: header, promotion carousel and its call to action

use super::{active_class, by_test_id, read_money};
use crate::fixtures::Role;
use crate::money::Money;
use casino_test_utils::{CompositeLocator, Error, Result, Screen, TestContext};
use std::sync::Arc;

/// Slides in the promotion carousel unless told otherwise
pub const DEFAULT_PROMOTION_COUNT: usize = 3;

#[derive(Clone)]
pub struct LandingPage {
    ctx: TestContext,
    screen: Arc<dyn Screen>,
    pub logo: CompositeLocator,
    pub login_button: CompositeLocator,
    pub register_button: CompositeLocator,
    pub header_balance: CompositeLocator,
    pub header_deposit: CompositeLocator,
    pub carousel_next: CompositeLocator,
    pub carousel_prev: CompositeLocator,
    pub slides: Vec<CompositeLocator>,
    pub indicators: Vec<CompositeLocator>,
    pub promo_cta: CompositeLocator,
    pub registration_modal: CompositeLocator,
    pub wallet_modal: CompositeLocator,
}

impl LandingPage {
    pub fn new(ctx: &TestContext, screen: Arc<dyn Screen>) -> Self {
        Self::with_promotion_count(ctx, screen, DEFAULT_PROMOTION_COUNT)
    }

    pub fn with_promotion_count(ctx: &TestContext, screen: Arc<dyn Screen>, count: usize) -> Self {
        let s = screen.as_ref();
        let slides = (0..count)
            .map(|i| by_test_id(s, &format!("slide-{i}"), &format!("Promotion slide {}", i + 1)))
            .collect();
        let indicators = (0..count)
            .map(|i| {
                by_test_id(
                    s,
                    &format!("indicator-{i}"),
                    &format!("Promotion indicator {}", i + 1),
                )
            })
            .collect();

        Self {
            logo: by_test_id(s, "logo", "Logo"),
            login_button: by_test_id(s, "login-button", "Log in button"),
            register_button: by_test_id(s, "register-button", "Sign up button"),
            header_balance: by_test_id(s, "header-balance", "Header balance"),
            header_deposit: by_test_id(s, "header-deposit", "Header deposit button"),
            carousel_next: by_test_id(s, "carousel-next", "Carousel right arrow"),
            carousel_prev: by_test_id(s, "carousel-prev", "Carousel left arrow"),
            slides,
            indicators,
            promo_cta: by_test_id(s, "promo-cta", "Promotion call to action"),
            registration_modal: by_test_id(s, "registration-modal", "Registration modal"),
            wallet_modal: by_test_id(s, "wallet-modal", "Wallet modal"),
            ctx: ctx.clone(),
            screen,
        }
    }

    pub fn promotion_count(&self) -> usize {
        self.slides.len()
    }

    /// Navigates to the base URL and waits for the header to render.
    pub async fn open(&self) -> Result<()> {
        self.ctx
            .step("Open landing page", async {
                let url = self.ctx.config().resolve("")?;
                self.screen.goto(url.as_str()).await?;
                self.ctx.wait_for_dom_content_loaded(self.screen.page()).await?;
                self.ctx.assert_visible(&self.logo).await
            })
            .await
    }

    pub async fn validate_header_for(&self, role: Role) -> Result<()> {
        self.ctx
            .step(format!("Validate header for a {}", role.as_str()), async {
                self.ctx.assert_visible(&self.logo).await?;
                match role {
                    Role::Guest => {
                        self.ctx.assert_visible_and_enabled(&self.login_button).await?;
                        self.ctx.assert_visible_and_enabled(&self.register_button).await?;
                        self.ctx.assert_not_visible(&self.header_balance).await
                    }
                    Role::Member => {
                        self.ctx.assert_visible(&self.header_balance).await?;
                        self.ctx.assert_visible_and_enabled(&self.header_deposit).await?;
                        self.ctx.assert_not_visible(&self.login_button).await?;
                        self.ctx.assert_not_visible(&self.register_button).await
                    }
                }
            })
            .await
    }

    pub async fn header_balance(&self) -> Result<Money> {
        read_money(&self.ctx, &self.header_balance).await
    }

    pub async fn next_promotion(&self) -> Result<()> {
        self.ctx.click_element(&self.carousel_next, None).await
    }

    pub async fn previous_promotion(&self) -> Result<()> {
        self.ctx.click_element(&self.carousel_prev, None).await
    }

    /// Exactly promotion `index` is marked active, on both the indicators
    /// and the slides, and its slide is showing.
    pub async fn validate_active_promotion(&self, index: usize) -> Result<()> {
        self.ctx
            .step(format!("Validate promotion {} is active", index + 1), async {
                let marker = active_class();
                self.ctx
                    .validate_only_one_element_active_group(
                        &self.indicators,
                        index,
                        &marker,
                        Some("promotion indicators"),
                    )
                    .await?;
                self.ctx
                    .validate_only_one_element_active_group(
                        &self.slides,
                        index,
                        &marker,
                        Some("promotion slides"),
                    )
                    .await?;
                let slide = self.slides.get(index).ok_or_else(|| {
                    Error::Configuration(format!("no promotion slide at index {index}"))
                })?;
                self.ctx.assert_visible(slide).await
            })
            .await
    }

    pub async fn open_promotion_cta(&self) -> Result<()> {
        self.ctx.click_element(&self.promo_cta, None).await
    }

    /// Guests land in the registration modal, members in the wallet;
    /// never both.
    pub async fn validate_exclusive_modal_for(&self, role: Role) -> Result<()> {
        let (shown, hidden) = match role {
            Role::Guest => (&self.registration_modal, &self.wallet_modal),
            Role::Member => (&self.wallet_modal, &self.registration_modal),
        };
        self.ctx
            .step(format!("Validate {} opens for a {}", shown.name(), role.as_str()), async {
                self.ctx.assert_visible(shown).await?;
                self.ctx.assert_not_visible(hidden).await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use casino_test_utils::PageHandle;

    fn indicate(fake: &casino_test_utils::fake::FakeScreen, active: usize) {
        for i in 0..DEFAULT_PROMOTION_COUNT {
            let class = if i == active { "slide active" } else { "slide" };
            el(fake, &format!("slide-{i}")).set_attribute("class", Some(class));
            el(fake, &format!("slide-{i}")).set_visible(i == active);
            let class = if i == active {
                "carousel-indicator active"
            } else {
                "carousel-indicator"
            };
            el(fake, &format!("indicator-{i}")).set_attribute("class", Some(class));
        }
    }

    #[tokio::test]
    async fn test_open_navigates_to_base_url() {
        let (fake, screen) = screen();
        fake.fake_page().set_url("about:blank");
        let landing = LandingPage::new(&ctx(), screen);

        landing.open().await.unwrap();
        assert_eq!(fake.fake_page().url(), BASE_URL);
    }

    #[tokio::test]
    async fn test_next_promotion_moves_the_active_marker() {
        let (fake, screen) = screen();
        indicate(&fake, 0);
        let hook = fake.clone();
        fake.insert(
            &super::super::test_id("carousel-next"),
            casino_test_utils::fake::FakeElement::new("carousel-next")
                .on_click(move || indicate(&hook, 1)),
        );
        let landing = LandingPage::new(&ctx(), screen);

        landing.validate_active_promotion(0).await.unwrap();
        landing.next_promotion().await.unwrap();
        landing.validate_active_promotion(1).await.unwrap();

        let err = landing.validate_active_promotion(0).await.unwrap_err();
        assert!(err.is_assertion());
    }

    #[tokio::test]
    async fn test_active_promotion_out_of_range_is_configuration_error() {
        let (fake, screen) = screen();
        indicate(&fake, 0);
        let landing = LandingPage::new(&ctx(), screen);

        let err = landing.validate_active_promotion(7).await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_exclusive_modal() {
        let (fake, screen) = screen();
        el(&fake, "registration-modal").set_visible(true);
        el(&fake, "wallet-modal").set_visible(false);
        let landing = LandingPage::new(&ctx(), screen);

        landing.validate_exclusive_modal_for(Role::Guest).await.unwrap();
        assert!(landing.validate_exclusive_modal_for(Role::Member).await.is_err());

        el(&fake, "wallet-modal").set_visible(true);
        let err = landing
            .validate_exclusive_modal_for(Role::Guest)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Wallet modal"));
    }

    #[tokio::test]
    async fn test_header_for_member() {
        let (fake, screen) = screen();
        el(&fake, "login-button").set_visible(false);
        el(&fake, "register-button").set_visible(false);
        el(&fake, "header-balance").set_text(Some("€100.00"));
        let landing = LandingPage::new(&ctx(), screen);

        landing.validate_header_for(Role::Member).await.unwrap();
        assert_eq!(landing.header_balance().await.unwrap(), Money::euros(100));
        assert!(landing.validate_header_for(Role::Guest).await.is_err());
    }
}
