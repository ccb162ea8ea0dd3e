use argon2::Params;
use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_parse_or, server::ServerConfig};
use database::mongodb::MongoConfig;
use domain_users::{Argon2Hasher, UserResult};

pub use core_config::Environment;

/// Argon2 work factor, read from `PASSWORD_HASH_*` variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordHashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl PasswordHashConfig {
    pub fn hasher(&self) -> UserResult<Argon2Hasher> {
        Argon2Hasher::with_params(self.memory_kib, self.iterations, self.parallelism)
    }
}

impl Default for PasswordHashConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// - `PASSWORD_HASH_MEMORY_KIB` (default: 19456)
/// - `PASSWORD_HASH_ITERATIONS` (default: 2)
/// - `PASSWORD_HASH_PARALLELISM` (default: 1)
impl FromEnv for PasswordHashConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            memory_kib: env_parse_or("PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: env_parse_or("PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: env_parse_or("PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
        })
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub password: PasswordHashConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let app = app_info!();
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let password = PasswordHashConfig::from_env()?;

        let mut mongodb = MongoConfig::from_env()?;
        if mongodb.app_name.is_none() {
            mongodb = mongodb.with_app_name(app.name);
        }

        Ok(Self {
            app,
            mongodb,
            server,
            environment,
            password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_config_defaults_match_argon2() {
        temp_env::with_vars_unset(
            [
                "PASSWORD_HASH_MEMORY_KIB",
                "PASSWORD_HASH_ITERATIONS",
                "PASSWORD_HASH_PARALLELISM",
            ],
            || {
                let config = PasswordHashConfig::from_env().unwrap();
                assert_eq!(config, PasswordHashConfig::default());
                assert!(config.hasher().is_ok());
            },
        );
    }

    #[test]
    fn test_password_config_rejects_garbage() {
        temp_env::with_var("PASSWORD_HASH_ITERATIONS", Some("lots"), || {
            let err = PasswordHashConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PASSWORD_HASH_ITERATIONS"));
        });
    }

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("users")),
                ("MONGODB_APP_NAME", None),
                ("PORT", Some("3500")),
                ("APP_ENV", Some("production")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.mongodb.database, "users");
                assert_eq!(config.mongodb.app_name.as_deref(), Some("users_api"));
                assert_eq!(config.server.port, 3500);
                assert!(config.environment.is_production());
            },
        );
    }

    #[test]
    fn test_config_requires_mongodb_url() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None::<&str>),
                ("MONGO_URL", None),
                ("MONGODB_DATABASE", Some("users")),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }
}
