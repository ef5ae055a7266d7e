// Login modal

use super::by_test_id;
use casino_test_utils::{
    Action, CompositeLocator, Credentials, InteractionStep, Result, Screen, TestContext,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct LoginModal {
    ctx: TestContext,
    pub open_button: CompositeLocator,
    pub modal: CompositeLocator,
    pub username: CompositeLocator,
    pub password: CompositeLocator,
    pub submit: CompositeLocator,
    pub error: CompositeLocator,
    pub close_button: CompositeLocator,
}

impl LoginModal {
    pub fn new(ctx: &TestContext, screen: Arc<dyn Screen>) -> Self {
        let s = screen.as_ref();
        Self {
            ctx: ctx.clone(),
            open_button: by_test_id(s, "login-button", "Log in button"),
            modal: by_test_id(s, "login-modal", "Login modal"),
            username: s.locator("#login-username", "Username input"),
            password: s.locator("#login-password", "Password input"),
            submit: by_test_id(s, "login-submit", "Log in submit button"),
            error: by_test_id(s, "login-error", "Login error message"),
            close_button: by_test_id(s, "login-close", "Login modal close button"),
        }
    }

    pub async fn open(&self) -> Result<()> {
        self.ctx
            .step("Open login modal", async {
                self.ctx.click_element(&self.open_button, None).await?;
                self.ctx.assert_visible(&self.modal).await
            })
            .await
    }

    pub async fn fill(&self, credentials: &Credentials) -> Result<()> {
        let steps = [
            InteractionStep::new(&self.username, Action::Fill(credentials.username.clone())),
            InteractionStep::new(&self.password, Action::Fill(credentials.password.clone())),
        ];
        self.ctx.perform_interaction_chain(&steps, None).await
    }

    /// Opens the modal, submits `credentials` and waits for the modal to
    /// close.
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        self.ctx
            .step(format!("Log in as {}", credentials.username), async {
                self.open().await?;
                self.fill(credentials).await?;
                self.ctx.click_element(&self.submit, None).await?;
                self.ctx.assert_not_visible(&self.modal).await
            })
            .await
    }

    pub async fn validate_error_shown(&self) -> Result<()> {
        self.ctx.assert_visible(&self.error).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_id;
    use super::super::test_support::*;
    use super::*;
    use casino_test_utils::fake::FakeElement;

    #[tokio::test]
    async fn test_login_fills_and_submits() {
        let (fake, screen) = screen();
        let modal = el(&fake, "login-modal");
        let closes = modal.clone();
        fake.insert(
            &test_id("login-submit"),
            FakeElement::new("login-submit").on_click(move || closes.set_visible(false)),
        );
        let login = LoginModal::new(&ctx(), screen);

        login
            .login(&Credentials::new("player1", "hunter22"))
            .await
            .unwrap();

        assert_eq!(fake.element("#login-username").value(), "player1");
        assert_eq!(fake.element("#login-password").value(), "hunter22");
        assert_eq!(el(&fake, "login-button").click_count(), 1);
        assert_eq!(el(&fake, "login-submit").click_count(), 1);
    }

    #[tokio::test]
    async fn test_login_fails_when_modal_stays_open() {
        let (_fake, screen) = screen();
        let ctx = ctx();
        let login = LoginModal::new(&ctx, screen);

        let err = login
            .login(&Credentials::new("player1", "wrong"))
            .await
            .unwrap_err();
        assert!(err.is_assertion());
        assert!(err.to_string().contains("Log in as player1"));
    }
}
