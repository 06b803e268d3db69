//! Configuration resolution from a dotenv file, the environment and flags.

use std::path::Path;

use crate::config::env::{Environment, ProcessEnv};
use crate::config::registry::FlagRegistry;
use crate::config::schema::{Config, ConfigKey};
use crate::config::validation::{validate_config, ValidationError};

/// Dotenv file looked up when no path is given.
pub const DEFAULT_DOTENV_PATH: &str = ".env";

/// Error type for configuration resolution.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("loading .env file: {0}")]
    Dotenv(#[source] dotenvy::Error),

    #[error("parsing command-line flags: {0}")]
    Flags(#[from] clap::Error),

    #[error("{}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

impl ConfigError {
    /// Keys reported missing, if this is a validation failure.
    pub fn missing(&self) -> Vec<ConfigKey> {
        match self {
            ConfigError::Validation(errors) => errors.iter().map(|e| e.key).collect(),
            _ => Vec::new(),
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolves a [`Config`] with precedence flag > environment > dotenv file.
///
/// Each key is read under its `env_var` name first, then its bare name.
#[derive(Debug)]
pub struct ConfigResolver<E = ProcessEnv> {
    env: E,
    registry: FlagRegistry,
}

impl ConfigResolver<ProcessEnv> {
    /// Resolver over the process environment and argument list.
    pub fn from_process() -> Self {
        Self::new(ProcessEnv, FlagRegistry::from_process())
    }
}

impl<E: Environment> ConfigResolver<E> {
    pub fn new(env: E, registry: FlagRegistry) -> Self {
        Self { env, registry }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn registry(&self) -> &FlagRegistry {
        &self.registry
    }

    /// Resolve and validate the configuration.
    ///
    /// `path` defaults to [`DEFAULT_DOTENV_PATH`]; a missing file is skipped.
    /// Safe to call repeatedly: flags are registered and parsed only once.
    pub fn resolve(&self, path: Option<&Path>) -> Result<Config, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_DOTENV_PATH));
        self.load_dotenv(path)?;

        let mut config = Config::default();
        for key in ConfigKey::ALL {
            self.registry.register(key);
            let value = self
                .env
                .var(key.env_var())
                .or_else(|| self.env.var(key.bare_name()));
            if let Some(value) = value {
                config.set(key, value);
            }
        }

        self.registry.parse()?;
        for key in ConfigKey::ALL {
            if let Some(value) = self.registry.explicit(key) {
                config.set(key, value);
            }
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn load_dotenv(&self, path: &Path) -> Result<(), ConfigError> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "No dotenv file, skipping");
            return Ok(());
        }

        // Parse everything first so a malformed file applies nothing.
        let pairs = dotenvy::from_path_iter(path)
            .map_err(ConfigError::Dotenv)?
            .collect::<Result<Vec<(String, String)>, _>>()
            .map_err(ConfigError::Dotenv)?;

        for (key, value) in &pairs {
            self.env.set_if_absent(key, value);
        }

        tracing::debug!(path = %path.display(), entries = pairs.len(), "Loaded dotenv file");
        Ok(())
    }
}
