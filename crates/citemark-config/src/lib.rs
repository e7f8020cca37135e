pub mod config;
pub mod error;
pub mod highlight;

pub use config::Config;
pub use error::ConfigError;
pub use highlight::HighlightConfig;
