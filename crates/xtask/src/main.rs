//! Developer tasks for the casino e2e workspace
//!
//! ```bash
//! cargo xtask auth-setup                  # member + guest sessions, all devices
//! cargo xtask auth-setup --device mobile  # one device only
//! cargo xtask mock-casino --port 3000     # serve the mock app until Ctrl-C
//! ```

use anyhow::{Context, Result};
use casino_e2e::mock::MockCasino;
use casino_e2e::session::{SessionStore, empty_state};
use casino_e2e::{Device, Fixture, Role};
use casino_test_utils::TestConfig;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "xtask", about = "Casino e2e developer tasks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in once per device and store the session state files
    AuthSetup {
        #[arg(long, value_enum, default_value_t = DeviceArg::All)]
        device: DeviceArg,

        /// Overrides CASINO_BASE_URL
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Serve the mock casino app
    MockCasino {
        /// 0 picks a free port
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DeviceArg {
    Desktop,
    Mobile,
    All,
}

impl DeviceArg {
    fn devices(self) -> Vec<Device> {
        match self {
            DeviceArg::Desktop => vec![Device::Desktop],
            DeviceArg::Mobile => vec![Device::Mobile],
            DeviceArg::All => Device::ALL.to_vec(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::AuthSetup { device, base_url } => auth_setup(device, base_url).await,
        Command::MockCasino { port } => serve_mock(port).await,
    }
}

async fn auth_setup(device: DeviceArg, base_url: Option<String>) -> Result<()> {
    let mut config = TestConfig::from_env().context("reading CASINO_* configuration")?;
    if let Some(url) = base_url {
        config = config.base_url(&url).context("parsing --base-url")?;
    }
    config
        .member_credentials()
        .context("auth-setup logs the member in")?;
    let store = SessionStore::new(&config.storage_state_dir);

    for device in device.devices() {
        let path = store
            .save(Role::Guest, device, &empty_state())
            .await
            .with_context(|| format!("writing guest session for {device}"))?;
        tracing::info!(path = %path.display(), "guest session written");

        // A stale member session would be loaded instead of logging in
        store.clear(Role::Member, device).await?;
        let fixture = Fixture::launch(config.clone(), Role::Member, device)
            .await
            .with_context(|| format!("logging in the member on {device}"))?;
        fixture.close().await?;
        tracing::info!(
            path = %store.path(Role::Member, device).display(),
            "member session written"
        );
    }
    Ok(())
}

async fn serve_mock(port: u16) -> Result<()> {
    let casino = MockCasino::start_on(port)
        .await
        .with_context(|| format!("binding port {port}"))?;
    println!("Mock casino running at {}", casino.url());
    println!("Press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    casino.shutdown();
    Ok(())
}
