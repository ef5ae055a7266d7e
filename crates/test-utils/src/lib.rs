//! casino-test-utils: assertion and interaction helpers for browser tests
//!
//! Every helper hangs off a [`TestContext`], takes [`CompositeLocator`]s
//! (named, lazily resolved element queries) and runs inside a named step, so
//! a failure reads as a trail of steps instead of a bare stack trace.
//!
//! # Example
//!
//! ```ignore
//! use casino_test_utils::{AttributeMap, TestConfig, TestContext, playwright};
//!
//! #[tokio::test]
//! async fn deposit_tab_is_active_by_default() -> anyhow::Result<()> {
//!     let ctx = TestContext::new(TestConfig::from_env()?);
//!     let page = /* launch a browser, open a page */;
//!
//!     let deposit = playwright::locator(&page, "[data-test=tab-deposit]", "Deposit tab");
//!     let withdraw = playwright::locator(&page, "[data-test=tab-withdraw]", "Withdraw tab");
//!
//!     let soft = ctx.soft();
//!     soft.assert_visible(&deposit).await?;
//!     soft.assert_visible(&withdraw).await?;
//!     ctx.validate_only_one_element_active_group(
//!         &[deposit, withdraw],
//!         0,
//!         &AttributeMap::single("class", "active"),
//!         Some("cashier tabs"),
//!     )
//!     .await?;
//!
//!     ctx.finish()?;
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod attributes;
pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod group;
mod groups;
pub mod interactions;
pub mod locator;
pub mod navigation;
pub mod playwright;
pub mod report;
mod text;

// In-memory driver fakes (exposed for downstream and integration tests)
#[doc(hidden)]
pub mod fake;

pub use assertions::{Mode, StateCheck, StateKind};
pub use attributes::{AttrValue, AttributeMap, Toggle, matches_class_tokens};
pub use config::{Credentials, TestConfig};
pub use context::TestContext;
pub use driver::{Element, FrameScope, PageHandle, Screen};
pub use error::{Error, Result, SoftFailure};
pub use group::{ElementGroup, GroupMember, GroupTexts, MemberText};
pub use interactions::{Action, ClickOutcome, InteractionOptions, InteractionStep, ToggleAttributes};
pub use locator::{
    CompositeFrameLocator, CompositeLocator, composite_frame_locator, composite_locator,
};
pub use navigation::UrlExpectation;
pub use report::{Reporter, StepGuard, StepOutcome, StepRecord, step_name};
