use crate::settings::Settings;
use crate::utils::http::FetchOptions;

/// Application state structure for the web server
///
/// Read-only after startup; conversions share nothing else between requests.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Global application settings
    pub config: Settings,

    /// Fetch limits derived from `config`
    pub fetch: FetchOptions,
}

impl AppState {
    /// Create a new AppState instance
    pub fn new(config: Settings) -> Self {
        let fetch = config.fetch_options();
        Self { config, fetch }
    }
}
