//! Client construction from [`AppConfig`].

use anyhow::Context;
use rankwatch_core::AppConfig;
use rankwatch_serp::{SerpClient, SerpCredentials};
use rankwatch_sheets::{Authenticator, SheetsClient};

/// Builds the SERP client from the configured credentials file.
///
/// # Errors
///
/// Returns an error if the credentials file cannot be loaded or the base
/// URL is invalid.
pub(crate) fn serp_client(config: &AppConfig) -> anyhow::Result<SerpClient> {
    let credentials = SerpCredentials::from_file(&config.dataforseo_credentials_path)
        .context("loading SERP provider credentials")?;
    SerpClient::with_base_url(
        credentials,
        config.request_timeout_secs,
        &config.dataforseo_base_url,
    )
    .context("building SERP client")
}

/// Builds the Drive/Sheets client from the configured Google key file.
///
/// # Errors
///
/// Returns an error if the key file cannot be loaded.
pub(crate) fn sheets_client(config: &AppConfig) -> anyhow::Result<SheetsClient> {
    let auth = Authenticator::from_file(
        &config.google_credentials_path,
        config.request_timeout_secs,
    )
    .context("loading Google credentials")?;
    SheetsClient::new(auth, config.request_timeout_secs).context("building Sheets client")
}
