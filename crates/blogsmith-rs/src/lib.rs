//! Public SDK surface for Blogsmith.
//!
//! This crate re-exports the building blocks and provides the session file
//! and logging helpers shared by the `blogsmith` binary.

/// Re-export for convenience.
pub use blogsmith_rs_config as config;
pub use blogsmith_rs_core as core;
/// Re-export for convenience.
pub use blogsmith_rs_history as history;
/// Re-export for convenience.
pub use blogsmith_rs_protocol as protocol;

pub mod session;

pub use session::Session;

use blogsmith_rs_config::BlogsmithConfig;

/// Reject history providers that lose records when a one-shot command exits.
pub fn require_durable_history(config: &BlogsmithConfig) -> anyhow::Result<()> {
    if config.history.provider.persists_across_runs() {
        return Ok(());
    }
    anyhow::bail!("history.provider \"memory\" keeps nothing between blogsmith runs; use \"file\"")
}

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogsmith_rs_config::{HistoryConfig, HistoryProviderKind};

    #[test]
    fn only_file_history_is_accepted_for_cli_use() {
        assert!(require_durable_history(&BlogsmithConfig::default()).is_ok());

        let memory = BlogsmithConfig::builder()
            .history(HistoryConfig {
                provider: HistoryProviderKind::Memory,
                path: None,
            })
            .build();
        let err = require_durable_history(&memory).unwrap_err();
        assert!(err.to_string().contains("keeps nothing between blogsmith runs"));
    }
}
