mod settings;

pub use settings::{ApiConfig, BackendConfig, ConsoleConfig, ServerConfig, Settings};
