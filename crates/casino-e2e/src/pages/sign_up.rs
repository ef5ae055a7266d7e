// Registration (sign-up) modal

use super::by_test_id;
use casino_test_utils::{
    AttributeMap, CompositeLocator, Result, Screen, TestContext, ToggleAttributes,
};
use std::sync::Arc;

/// A required field of the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignUpField {
    FirstName,
    LastName,
    Email,
    Password,
}

impl SignUpField {
    /// Form order
    pub const ALL: [SignUpField; 4] = [
        SignUpField::FirstName,
        SignUpField::LastName,
        SignUpField::Email,
        SignUpField::Password,
    ];

    fn slug(self) -> &'static str {
        match self {
            SignUpField::FirstName => "first-name",
            SignUpField::LastName => "last-name",
            SignUpField::Email => "email",
            SignUpField::Password => "password",
        }
    }

    fn label(self) -> &'static str {
        match self {
            SignUpField::FirstName => "First name",
            SignUpField::LastName => "Last name",
            SignUpField::Email => "Email",
            SignUpField::Password => "Password",
        }
    }
}

/// Values typed into the form; `None` leaves a field empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpData {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub accept_terms: bool,
}

impl SignUpData {
    pub fn complete(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
            accept_terms: true,
        }
    }

    /// A valid new player
    pub fn sample() -> Self {
        Self::complete("Ada", "Lovelace", "ada@example.com", "analytical1")
    }

    pub fn without(mut self, field: SignUpField) -> Self {
        *self.slot(field) = None;
        self
    }

    pub fn accept_terms(mut self, accept: bool) -> Self {
        self.accept_terms = accept;
        self
    }

    pub fn value(&self, field: SignUpField) -> Option<&str> {
        match field {
            SignUpField::FirstName => self.first_name.as_deref(),
            SignUpField::LastName => self.last_name.as_deref(),
            SignUpField::Email => self.email.as_deref(),
            SignUpField::Password => self.password.as_deref(),
        }
    }

    fn slot(&mut self, field: SignUpField) -> &mut Option<String> {
        match field {
            SignUpField::FirstName => &mut self.first_name,
            SignUpField::LastName => &mut self.last_name,
            SignUpField::Email => &mut self.email,
            SignUpField::Password => &mut self.password,
        }
    }
}

#[derive(Clone)]
pub struct SignUpModal {
    ctx: TestContext,
    screen: Arc<dyn Screen>,
    pub open_button: CompositeLocator,
    pub modal: CompositeLocator,
    pub terms: CompositeLocator,
    pub submit: CompositeLocator,
    pub close_button: CompositeLocator,
}

impl SignUpModal {
    pub fn new(ctx: &TestContext, screen: Arc<dyn Screen>) -> Self {
        let s = screen.as_ref();
        Self {
            ctx: ctx.clone(),
            open_button: by_test_id(s, "register-button", "Sign up button"),
            modal: by_test_id(s, "registration-modal", "Registration modal"),
            terms: by_test_id(s, "signup-terms", "Terms checkbox"),
            submit: by_test_id(s, "signup-submit", "Create account button"),
            close_button: by_test_id(s, "registration-close", "Registration modal close button"),
            screen,
        }
    }

    pub fn input(&self, field: SignUpField) -> CompositeLocator {
        self.screen.locator(
            &format!("#signup-{}", field.slug()),
            &format!("{} input", field.label()),
        )
    }

    pub fn error(&self, field: SignUpField) -> CompositeLocator {
        by_test_id(
            self.screen.as_ref(),
            &format!("error-{}", field.slug()),
            &format!("{} error", field.label()),
        )
    }

    /// `aria-checked` states of the custom terms checkbox
    pub fn terms_states() -> ToggleAttributes {
        ToggleAttributes::new(
            AttributeMap::single("aria-checked", "true"),
            AttributeMap::single("aria-checked", "false"),
        )
    }

    pub async fn open(&self) -> Result<()> {
        self.ctx
            .step("Open registration modal", async {
                self.ctx.click_element(&self.open_button, None).await?;
                self.ctx.assert_visible(&self.modal).await
            })
            .await
    }

    /// Types every provided value. Omitted fields are focused and left
    /// empty, so they count as touched once focus moves on.
    pub async fn fill_form(&self, data: &SignUpData) -> Result<()> {
        self.ctx
            .step("Fill registration form", async {
                for field in SignUpField::ALL {
                    let input = self.input(field);
                    match data.value(field) {
                        Some(value) => self.ctx.fill_element(&input, value, None).await?,
                        None => self.ctx.focus_element(&input, None).await?,
                    }
                }
                self.ctx.focus_element(&self.terms, None).await?;

                let states = Self::terms_states();
                if data.accept_terms {
                    self.ctx
                        .ensure_button_checkbox_is_checked(&self.terms, &states)
                        .await
                } else {
                    self.ctx
                        .ensure_button_checkbox_is_unchecked(&self.terms, &states)
                        .await
                }
            })
            .await
    }

    pub async fn submit(&self) -> Result<()> {
        self.ctx.click_element(&self.submit, None).await
    }

    pub async fn validate_submit_disabled(&self) -> Result<()> {
        self.ctx
            .step("Validate account cannot be created", async {
                self.ctx.assert_visible(&self.submit).await?;
                self.ctx.assert_not_enabled(&self.submit).await
            })
            .await
    }

    pub async fn validate_field_error(&self, field: SignUpField) -> Result<()> {
        self.ctx.assert_visible(&self.error(field)).await
    }

    pub async fn validate_no_field_errors(&self) -> Result<()> {
        self.ctx
            .step("Validate no field errors", async {
                for field in SignUpField::ALL {
                    self.ctx.assert_not_visible(&self.error(field)).await?;
                }
                Ok(())
            })
            .await
    }
}
