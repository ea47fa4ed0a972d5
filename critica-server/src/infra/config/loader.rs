use once_cell::sync::Lazy;
use std::{fs, path::PathBuf};
use thiserror::Error;

use super::{
    models::{
        Config, ConfigMetadata, CorsConfig, DatabaseConfig, FilterConfig, PaginationConfig,
        ServerConfig, StorageBackend,
    },
    sources::{EnvConfig, FileConfig},
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("critica.toml"),
        PathBuf::from("config/critica.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

/// Values given on the command line. They win over every other source.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_url: Option<String>,
    pub storage: Option<StorageBackend>,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
    overrides: ConfigOverrides,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self {
            options,
            overrides: ConfigOverrides::default(),
        }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Load `.env`, then merge defaults, the TOML file, the process
    /// environment and the command line overrides.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(|err| match err {
                dotenvy::Error::Io(_) => Ok(false),
                _ => Err(err),
            })?,
            None => dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                dotenvy::Error::Io(_) => Ok(false),
                _ => Err(err),
            })?,
        };

        let mut load = self.load_with_env(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Same as [`ConfigLoader::load`] with an explicit environment snapshot.
    /// Does not read `.env` or the process environment.
    pub fn load_with_env(&self, env: EnvConfig) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        self.compose_config(file_config, env, config_path)
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
            {
                Some(path) => path.clone(),
                None => return Ok((None, None)),
            },
        };

        let contents = fs::read_to_string(&path).map_err(|source| ConfigLoadError::Io {
            path: path.clone(),
            source,
        })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
                path: path.clone(),
                source,
            })?;

        Ok((Some(file_config), Some(path)))
    }

    fn compose_config(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        if config_path.is_none() {
            warnings.push_with_hint(
                "No critica.toml detected; using environment variables and defaults",
                "Create critica.toml or pass --config to pin settings in a file",
            );
        }

        let FileConfig {
            server: file_server,
            database: file_database,
            storage: file_storage,
            cors: file_cors,
            pagination: file_pagination,
            filters: file_filters,
            dev_mode: file_dev_mode,
        } = file_config.unwrap_or_default();
        let overrides = self.overrides.clone();
        let defaults = Config::in_memory();

        let env_storage = env
            .storage_backend
            .as_deref()
            .map(|raw| {
                raw.parse::<StorageBackend>()
                    .map_err(|value| ConfigLoadError::InvalidStorageBackend { value })
            })
            .transpose()?;
        let storage = overrides
            .storage
            .or(env_storage)
            .or(file_storage.backend)
            .unwrap_or_default();

        let server = ServerConfig {
            host: overrides
                .host
                .or(env.server_host)
                .or(file_server.host)
                .unwrap_or(defaults.server.host),
            port: overrides
                .port
                .or(env.server_port)
                .or(file_server.port)
                .unwrap_or(defaults.server.port),
        };

        let database = DatabaseConfig {
            url: overrides
                .database_url
                .or(env.database_url)
                .or(file_database.url)
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            max_connections: env
                .db_max_connections
                .or(file_database.max_connections)
                .unwrap_or(defaults.database.max_connections),
            min_connections: env
                .db_min_connections
                .or(file_database.min_connections)
                .unwrap_or(defaults.database.min_connections),
            acquire_timeout_secs: file_database
                .acquire_timeout_secs
                .unwrap_or(defaults.database.acquire_timeout_secs),
        };

        if storage == StorageBackend::Postgres && database.url.is_none() {
            return Err(ConfigLoadError::MissingDatabaseUrl);
        }

        let cors = CorsConfig {
            allowed_origins: env
                .cors_allowed_origins
                .or(file_cors.allowed_origins)
                .unwrap_or(defaults.cors.allowed_origins),
        };

        let pagination = PaginationConfig {
            default_size: env
                .page_size_default
                .or(file_pagination.default_size)
                .unwrap_or(defaults.pagination.default_size),
            max_size: env
                .page_size_max
                .or(file_pagination.max_size)
                .unwrap_or(defaults.pagination.max_size),
        };

        let filters = FilterConfig {
            strict_keys: env
                .filters_strict_keys
                .or(file_filters.strict_keys)
                .unwrap_or(defaults.filters.strict_keys),
        };

        let dev_mode = overrides
            .dev_mode
            .or(env.dev_mode)
            .or(file_dev_mode)
            .unwrap_or(false);

        let config = Config {
            server,
            database,
            storage,
            cors,
            pagination,
            filters,
            dev_mode,
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded: false,
            },
        };

        warnings.extend(validation::apply_guard_rails(&config)?);

        Ok(ConfigLoad { config, warnings })
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("DATABASE_URL must be provided when the postgres storage backend is selected")]
    MissingDatabaseUrl,
    #[error("unknown storage backend '{value}' (expected postgres or memory)")]
    InvalidStorageBackend { value: String },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn file_values_override_defaults() {
        let file = config_file(
            r#"
            dev_mode = true

            [server]
            port = 9000

            [storage]
            backend = "memory"

            [pagination]
            default_size = 5
            max_size = 50
            "#,
        );

        let load = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(EnvConfig::default())
            .expect("config loads");

        assert_eq!(load.config.server.port, 9000);
        assert_eq!(load.config.server.host, "0.0.0.0");
        assert_eq!(load.config.storage, StorageBackend::Memory);
        assert_eq!(load.config.pagination.default_size, 5);
        assert_eq!(load.config.pagination.max_size, 50);
        assert!(!load.config.filters.strict_keys);
        assert_eq!(load.config.metadata.config_path.as_deref(), Some(file.path()));
        assert!(load.warnings.is_empty());
    }

    #[test]
    fn environment_beats_file_and_cli_beats_environment() {
        let file = config_file(
            "[server]\nport = 9000\nhost = \"10.0.0.1\"\n[database]\nurl = \"postgres://file/db\"\n",
        );
        let env = EnvConfig {
            server_port: Some(9100),
            database_url: Some("postgres://env/db".into()),
            filters_strict_keys: Some(true),
            ..Default::default()
        };

        let load = ConfigLoader::new()
            .with_config_path(file.path())
            .with_overrides(ConfigOverrides {
                port: Some(9200),
                ..Default::default()
            })
            .load_with_env(env)
            .expect("config loads");

        assert_eq!(load.config.server.port, 9200);
        assert_eq!(load.config.server.host, "10.0.0.1");
        assert_eq!(load.config.database.url.as_deref(), Some("postgres://env/db"));
        assert!(load.config.filters.strict_keys);
        assert_eq!(load.config.storage, StorageBackend::Postgres);
    }

    #[test]
    fn postgres_without_url_is_an_error() {
        let file = config_file("[server]\nport = 9000\n");
        let err = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(EnvConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::MissingDatabaseUrl));
    }

    #[test]
    fn unknown_storage_backend_is_an_error() {
        let file = config_file("");
        let env = EnvConfig {
            storage_backend: Some("redis".into()),
            ..Default::default()
        };
        let err = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(env)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::InvalidStorageBackend { ref value } if value == "redis"
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = ConfigLoader::new()
            .with_config_path(dir.path().join("absent.toml"))
            .load_with_env(EnvConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let file = config_file("[server\nport = ");
        let err = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(EnvConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
    }

    #[test]
    fn memory_backend_in_production_loads_with_warning() {
        let file = config_file("[storage]\nbackend = \"memory\"\n");
        let load = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(EnvConfig::default())
            .expect("config loads");

        assert!(!load.config.dev_mode);
        assert_eq!(load.warnings.items.len(), 1);
    }
}
