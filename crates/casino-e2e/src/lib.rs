//! casino-e2e: page objects, fixtures and scenarios for the casino web app
//!
//! Built on [`casino_test_utils`]. A [`Fixture`] launches a browser for one
//! [`Role`] on one [`Device`] and hands out page objects that share a single
//! test context, so soft failures from every page surface at
//! [`Fixture::close`].
//!
//! ```ignore
//! use casino_e2e::{Device, Fixture, Role, mock::MockCasino};
//! use casino_test_utils::TestConfig;
//!
//! let casino = MockCasino::start().await?;
//! let config = TestConfig::default().base_url(&casino.url())?;
//! let fixture = Fixture::launch(config, Role::Guest, Device::Mobile).await?;
//!
//! let landing = fixture.landing();
//! landing.open().await?;
//! landing.open_promotion_cta().await?;
//! landing.validate_exclusive_modal_for(Role::Guest).await?;
//!
//! fixture.close().await?;
//! ```

pub mod fixtures;
pub mod mock;
pub mod money;
pub mod pages;
pub mod session;

pub use fixtures::{Device, Fixture, Role};
pub use money::{Money, ParseMoneyError};
pub use session::SessionStore;
