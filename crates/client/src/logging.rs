//! Logging setup
//!
//! docstore logs through `tracing` under the `docstore::*` targets
//! (`docstore::store`, `docstore::txn`, `docstore::query`, `docstore::events`,
//! `docstore::assets`, `docstore::client`). Hosts that already install their
//! own subscriber can ignore this module entirely.

use crate::config::LogLevel;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured level
pub const LOG_ENV_VAR: &str = "DOCSTORE_LOG";

/// Build the filter for `level`, honouring `DOCSTORE_LOG` when set
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Install a global fmt subscriber at `level`
///
/// Returns `false` if a global subscriber was already installed, in which case
/// nothing changes. Safe to call more than once.
pub fn init_logging(level: LogLevel) -> bool {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}
