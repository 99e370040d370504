//! Console binary for the Shinon simulation.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `shinon-config.yaml`
//! 2. Initialize structured JSON logging into `<log dir>/shinon.jsonl`
//! 3. Load the catalog (built-in unless `catalog.path` is set)
//! 4. Open the save file and wrap it in the engine and kernel
//! 5. Ask whether to start a new game or load the save
//! 6. Run the chat loop until the operator quits
//! 7. Close the save

mod console;
mod error;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use shinon_core::config::LoggingConfig;
use shinon_core::{SimulationConfig, SimulationEngine};
use shinon_db::SqliteStore;
use shinon_kernel::Kernel;
use shinon_types::Locale;
use shinon_world::Catalog;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::ConsoleError;

/// Configuration file looked up in the working directory.
const CONFIG_FILE: &str = "shinon-config.yaml";

/// Log file name inside the log directory.
const LOG_FILE: &str = "shinon.jsonl";

fn main() -> Result<(), ConsoleError> {
    // 1. Load configuration.
    let config = SimulationConfig::load_or_default(Path::new(CONFIG_FILE))?;

    // 2. Initialize logging.
    init_logging(&config.logging)?;
    info!(
        database = %config.storage.database_path.display(),
        seed = config.game.default_seed,
        locale = %config.game.locale,
        "shinon-engine starting"
    );

    // 3. Load the catalog.
    let catalog = match &config.catalog.path {
        Some(path) => {
            info!(path = %path.display(), "Loading catalog override");
            Catalog::from_file(path)?
        }
        None => Catalog::builtin()?,
    };

    // 4. Open the save and build the kernel.
    if let Some(parent) = config.storage.database_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::open(&config.storage.database_path)?;
    let engine = SimulationEngine::new(catalog, store).with_intel_interval(config.kernel.auto_intel_interval);
    let locale = config.game.locale.parse().unwrap_or_else(|err| {
        warn!(%err, "Falling back to English");
        Locale::En
    });
    let mut kernel = Kernel::new(engine, locale)?.with_memory_limit(config.kernel.memory_limit);

    // 5-6. Session.
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    console::choose_game(&mut kernel, config.game.default_seed, &mut input, &mut output)?;
    let turns = console::run(&mut kernel, &mut input, &mut output)?;

    // 7. Close the save.
    kernel.into_engine().into_store().close();
    info!(turns, "shinon-engine shutdown complete");
    Ok(())
}

/// Install the global subscriber writing to `<directory>/shinon.jsonl`.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &LoggingConfig) -> Result<(), ConsoleError> {
    fs::create_dir_all(&config.directory)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.directory.join(LOG_FILE))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file));
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| ConsoleError::Logging {
        message: err.to_string(),
    })
}
