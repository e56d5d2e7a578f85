#[cfg(not(target_arch = "wasm32"))]
use anyhow::Result;
#[cfg(not(target_arch = "wasm32"))]
use rickmorty_explorer::core::config::Config;
#[cfg(not(target_arch = "wasm32"))]
use rickmorty_explorer::services::explorer;

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {:#}", e);
            eprintln!("Fix or remove 'config.yml' to fall back to the defaults.");
            return Err(e);
        }
    };

    log::info!("Using API at {}", config.api.base_url);
    explorer::run(&config).await
}

// The browser build enters through `start()` in the library.
#[cfg(target_arch = "wasm32")]
fn main() {}
