pub mod settings;

pub use settings::{AppConfig, CacheConfig, DisplayConfig, GenerateConfig, ServerConfig};
