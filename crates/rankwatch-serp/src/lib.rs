//! Client for the DataForSEO SERP API (Google organic, task-based flow).

pub mod client;
pub mod collector;
pub mod credentials;
pub mod error;
pub mod types;

pub use client::SerpClient;
pub use collector::Collection;
pub use credentials::SerpCredentials;
pub use error::SerpError;
pub use types::{KeywordResult, PostedTask, ReadyTask};
