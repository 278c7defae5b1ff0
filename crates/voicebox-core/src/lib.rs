pub mod config;
pub mod error;
pub mod ports;
pub mod types;

pub use config::VoiceboxConfig;
pub use error::{Result, VoiceboxError};
pub use ports::{MediaFetcher, VoiceRepository};
pub use types::*;
