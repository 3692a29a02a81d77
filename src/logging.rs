//! Flipdeck - Tracing setup
//!
//! While the card screen is up, anything written to stderr lands on top of it,
//! so logs go to the file given with `--log-file`. Headless runs may also log
//! to stderr when `RUST_LOG` is set.
//!
//! Filtering follows `RUST_LOG`, e.g. `RUST_LOG=flipdeck=debug`.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global tracing subscriber.
///
/// `console` allows a stderr layer; pass false whenever the TUI is running.
pub fn init(log_file: Option<&Path>, console: bool) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true)
                    .with_filter(filter),
            )
        }
        None => None,
    };

    let console_layer = if console_enabled(console, log_file.is_some()) {
        Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(EnvFilter::from_default_env()),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Stderr logging needs a headless run, no log file, and an explicit `RUST_LOG`
fn console_enabled(console: bool, has_file: bool) -> bool {
    console && !has_file && std::env::var_os("RUST_LOG").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_disabled_for_tui() {
        // Independent of RUST_LOG
        assert!(!console_enabled(false, false));
        assert!(!console_enabled(false, true));
        assert!(!console_enabled(true, true));
    }

    #[test]
    fn test_console_follows_rust_log_when_headless() {
        assert_eq!(
            console_enabled(true, false),
            std::env::var_os("RUST_LOG").is_some()
        );
    }
}
