mod config;
pub mod credentials;

pub use config::{ApiConfig, Config, CredentialBackend, CredentialsConfig, LimitsConfig};
pub use credentials::{Credential, CredentialStore, FileStore, KeyringStore, MemoryStore};

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ConfigError;

/// Returns the directory holding `config.toml` and file-backed credentials.
///
/// `MOMENTUM_HOME` wins when set. Otherwise `~/.config/momentum`, or
/// `~/.config/momentum-dev` when `MOMENTUM_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("MOMENTUM_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("MOMENTUM_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("momentum-dev")
            } else {
                base_dir.join("momentum")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// The credential store selected by `credentials.backend`.
pub fn open_credential_store(config: &Config) -> Result<Arc<dyn CredentialStore>, ConfigError> {
    let store: Arc<dyn CredentialStore> = match config.credentials.backend {
        CredentialBackend::Keyring => Arc::new(KeyringStore::default()),
        CredentialBackend::File => Arc::new(FileStore::in_dir(data_dir()?)),
        CredentialBackend::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}
