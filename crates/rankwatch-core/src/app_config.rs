use std::path::PathBuf;

use crate::batch::Locale;

/// Runtime configuration shared by the submit and collect phases.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Drive folder whose spreadsheets hold the targets.
    pub target_folder_id: String,
    /// Sheet read and written in every spreadsheet (the current year by default).
    pub sheet_title: String,
    pub language_code: String,
    pub location_code: u32,
    pub batch_max_size: usize,
    /// Pause after each spreadsheet to stay under the Sheets request quota.
    pub inter_request_delay_ms: u64,
    pub google_credentials_path: PathBuf,
    pub dataforseo_credentials_path: PathBuf,
    pub dataforseo_base_url: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl AppConfig {
    #[must_use]
    pub fn locale(&self) -> Locale {
        Locale {
            language_code: self.language_code.clone(),
            location_code: self.location_code,
        }
    }
}
