use thiserror::Error;

use super::models::{Config, StorageBackend};

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("CORS wildcard origins are not allowed when DEV_MODE is false")]
    DangerousCorsWildcard,
    #[error("page size default {default} must be between 1 and the maximum {max}")]
    InvalidPagination { default: u32, max: u32 },
    #[error("database pool minimum {min} exceeds maximum {max}")]
    InvalidPoolBounds { min: u32, max: u32 },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(&mut self, message: S, hint: H) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

pub fn apply_guard_rails(config: &Config) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    let pagination = config.pagination;
    if pagination.max_size == 0
        || pagination.default_size == 0
        || pagination.default_size > pagination.max_size
    {
        return Err(ConfigGuardRailError::InvalidPagination {
            default: pagination.default_size,
            max: pagination.max_size,
        });
    }

    if config.database.min_connections > config.database.max_connections {
        return Err(ConfigGuardRailError::InvalidPoolBounds {
            min: config.database.min_connections,
            max: config.database.max_connections,
        });
    }

    if !config.dev_mode {
        if config.cors.is_wildcard_included() {
            return Err(ConfigGuardRailError::DangerousCorsWildcard);
        }
        if config.storage == StorageBackend::Memory {
            warnings.push_with_hint(
                "In-memory storage selected outside dev mode; all data is lost on restart",
                "Set STORAGE_BACKEND=postgres with DATABASE_URL, or DEV_MODE=true for local runs",
            );
        }
    }

    if config.storage == StorageBackend::Memory && config.database.url.is_some() {
        warnings.push("DATABASE_URL is set but ignored by the in-memory storage backend");
    }

    Ok(warnings)
}
