//! CLI bootstrap: settings from the environment and logging setup.
//!
//! Handlers receive a validated [`CliConfig`] and never read process state
//! themselves.

use notiflow_core::{SdkSettings, SettingsUpdate, validate_settings};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub settings: SdkSettings,
}

impl CliConfig {
    /// Load settings from the process environment (after `.env` has been
    /// applied), then apply the command-line server override.
    pub fn from_env(server_url: Option<&str>) -> Result<Self, CliError> {
        Self::from_lookup(|key| std::env::var(key).ok(), server_url)
    }

    /// Same as [`CliConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        server_url: Option<&str>,
    ) -> Result<Self, CliError> {
        let mut settings = SdkSettings::from_lookup(lookup);
        if let Some(url) = server_url {
            settings.merge(&SettingsUpdate {
                server_url: Some(Some(url.to_string())),
                ..SettingsUpdate::default()
            });
        }
        validate_settings(&settings)?;
        debug!(?settings, "Loaded settings");
        Ok(Self { settings })
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins when set; otherwise
/// `--verbose` selects debug and the default is warn.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
