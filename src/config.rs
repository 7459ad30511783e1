// Configuration: the two helpdesk secrets and the API base URL.
//
// Values come from the process environment. `.env` files (working
// directory first, then the user's config directory) are loaded before
// reading so operators can keep credentials out of their shell profile.

use crate::error::ConfigError;
use std::path::PathBuf;
use tracing::debug;

pub const OPERATOR_KEY_VAR: &str = "CHAVE_OPERADOR";
pub const ENVIRONMENT_KEY_VAR: &str = "CHAVE_AMBIENTE";
pub const BASE_URL_VAR: &str = "DESK_API_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.desk.ms";

#[derive(Clone)]
pub struct Config {
    pub operator_key: String,
    pub environment_key: String,
    pub base_url: String,
}

// Keep secrets out of debug logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("operator_key", &"***")
            .field("environment_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    /// Load `.env` files and read the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv_files();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup. Empty
    /// values are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let operator_key = read(OPERATOR_KEY_VAR);
        let environment_key = read(ENVIRONMENT_KEY_VAR);

        let (operator_key, environment_key) = match (operator_key, environment_key) {
            (Some(op), Some(env)) => (op, env),
            (op, env) => {
                let mut missing = Vec::new();
                if op.is_none() {
                    missing.push(OPERATOR_KEY_VAR);
                }
                if env.is_none() {
                    missing.push(ENVIRONMENT_KEY_VAR);
                }
                return Err(ConfigError::Missing(missing));
            }
        };

        let base_url = read(BASE_URL_VAR)
            .unwrap_or_else(|| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        Ok(Config {
            operator_key,
            environment_key,
            base_url,
        })
    }
}

/// Location of the per-user `.env` file, e.g. `~/.config/desk-cli/.env`.
pub fn user_env_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("desk-cli").join(".env"))
}

fn load_dotenv_files() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) => debug!("no .env in working directory: {e}"),
    }
    if let Some(path) = user_env_file() {
        if path.is_file() {
            if let Err(e) = dotenvy::from_path(&path) {
                debug!(path = %path.display(), "failed to load user .env: {e}");
            }
        }
    }
}
