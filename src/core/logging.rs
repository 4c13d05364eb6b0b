//! Logging initialization
//!
//! Log records go to stderr; stdout belongs to the rendered terminal UI.

use anyhow::Result;
use simplelog::*;
use std::str::FromStr;

/// Level used when `RUST_LOG` is unset or not a plain level name.
fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Level from `RUST_LOG` (e.g. `debug`, `warn`) or the default.
fn level_from_env(verbose: bool) -> LevelFilter {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or_else(|| default_level(verbose))
}

/// Initialize the terminal logger
///
/// Without `--verbose` only this crate's records are shown; with it, dependency
/// records (reqwest, hyper) come through as well.
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - A logger was already installed
pub fn init_logger(verbose: bool) -> Result<()> {
    let mut config = ConfigBuilder::new();
    config.set_target_level(LevelFilter::Off);
    config.set_thread_level(LevelFilter::Off);
    if !verbose {
        config.add_filter_allow_str("tubefetch");
    }

    TermLogger::init(
        level_from_env(verbose),
        config.build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}
