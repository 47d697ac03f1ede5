//! services/cli/src/bin/library.rs

use cli_lib::{adapters::JsonStore, config::Config, error::CliError, menu::App};
use library_core::StateStore;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), CliError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Starting library...");

    // --- 2. Load State ---
    let store = JsonStore::new(config.data_dir.clone());
    let library = store.load()?;
    info!(
        books = library.books().len(),
        readers = library.readers().len(),
        "state loaded from {}",
        config.data_dir.display()
    );

    // --- 3. Run the Menu ---
    let mut app = App::new(library, store);
    app.run()
}
