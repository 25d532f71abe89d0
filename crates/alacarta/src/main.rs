use alacarta::remote::SimulatedRemote;
use alacarta::stamp::{MonotonicIds, SystemClock};
use alacarta::sync::StorageSyncService;
use alacarta::{logger, Credentials, Store, StoreServices};
use alacarta_config::AppConfig;
use alacarta_storage::FileStorage;
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

mod cli;

use cli::{App, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = logger::init(cli.verbose)?;
    log::info!("Starting alacarta, logging to {:?}", log_file);

    let config = AppConfig::load();
    let storage_dir = config.storage_dir()?;
    let storage = Arc::new(
        FileStorage::open(&storage_dir)
            .with_context(|| format!("Failed to open storage at {:?}", storage_dir))?,
    );

    let transport =
        StorageSyncService::with_poll_interval(Arc::clone(&storage), config.poll_interval());
    let store = Store::new(StoreServices {
        transport,
        remote: Arc::new(SimulatedRemote::new(config.remote_sync_delay())),
        clock: Arc::new(SystemClock),
        ids: Arc::new(MonotonicIds::new()),
        credentials: Credentials::new(&config.admin_username, &config.admin_password),
    });

    let mut app = App {
        config,
        store,
        storage,
    };
    let result = cli.run(&mut app).await;

    log::info!("Exiting alacarta");
    result
}
