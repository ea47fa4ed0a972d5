//! Layered server configuration: defaults, `critica.toml`, environment and
//! command line, in increasing precedence.

pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions, ConfigOverrides};
pub use models::{
    Config, ConfigMetadata, CorsConfig, DatabaseConfig, FilterConfig, PaginationConfig,
    ServerConfig, StorageBackend,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
