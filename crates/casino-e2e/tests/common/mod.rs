// Shared setup for browser scenarios
//
// Each scenario gets its own mock casino on a random port and its own
// session directory, so runs never see each other's stored logins.
#![allow(dead_code)]

use casino_e2e::mock::MockCasino;
use casino_e2e::{Device, Fixture, Role};
use casino_test_utils::{Credentials, TestConfig};
use std::sync::Once;
use tempfile::TempDir;

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// A running mock casino plus a browser fixture pointed at it
pub struct Harness {
    pub fixture: Fixture,
    casino: MockCasino,
    _sessions: TempDir,
}

impl Harness {
    pub async fn launch(role: Role, device: Device) -> anyhow::Result<Self> {
        init_tracing();
        let casino = MockCasino::start().await?;
        let sessions = tempfile::tempdir()?;
        let config = TestConfig::from_env()?
            .base_url(&casino.url())?
            .member(Credentials::new("player1", "secret"))
            .storage_state_dir(sessions.path());
        let fixture = Fixture::launch(config, role, device).await?;
        Ok(Self {
            fixture,
            casino,
            _sessions: sessions,
        })
    }

    pub fn url(&self) -> String {
        self.casino.url()
    }

    /// Closes the browser and fails on any recorded soft assertion.
    pub async fn close(self) -> anyhow::Result<()> {
        self.fixture.close().await?;
        self.casino.shutdown();
        Ok(())
    }
}
