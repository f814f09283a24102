//! Google Drive and Sheets access for rank-tracking spreadsheets.

pub mod auth;
pub mod client;
pub mod error;
pub mod types;
pub mod workbook;

pub use auth::{Authenticator, GoogleCredentials};
pub use client::SheetsClient;
pub use error::SheetsError;
pub use types::{DriveFile, SheetProperties};
pub use workbook::YearSheet;
