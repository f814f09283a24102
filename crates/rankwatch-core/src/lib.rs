pub mod a1;
pub mod app_config;
pub mod batch;
pub mod config;
pub mod matcher;
pub mod model;

pub use a1::{a1_range, column_letter};
pub use app_config::AppConfig;
pub use batch::{plan_batches, Locale, TaskRequest};
pub use config::{load_app_config, load_app_config_from_env};
pub use matcher::{domain_of, match_target, match_targets, MatchError};
pub use model::{Rank, RankResult, ResultIndex, SerpEntry, Target};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
