use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;
use tracing::debug;
pub mod models;
pub use models::*;

/// Loads the layered application configuration.
///
/// Sources, later ones overriding earlier ones:
///
/// 1. `{CONFIG_DIR}/default.(toml|json|yaml)` (optional)
/// 2. `{CONFIG_DIR}/{RUN_ENV}.(toml|json|yaml)` (optional, `RUN_ENV` defaults to `debug`)
/// 3. environment variables prefixed with `{PREFIX}__` (prefix defaults to `STAYREAL`),
///    e.g. `STAYREAL__SERVER__PORT=9000`
///
/// `CONFIG_DIR` defaults to `config` relative to the working directory.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "STAYREAL".to_string());
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    load_config_from(&config_dir, &run_env, &prefix)
}

/// Loads the configuration from an explicit directory, environment name and env prefix.
pub fn load_config_from(
    config_dir: &std::path::Path,
    run_env: &str,
    prefix: &str,
) -> Result<AppConfig, ConfigError> {
    let default_path = config_dir.join("default");
    let env_path = config_dir.join(run_env);

    debug!("config: default_path: {}", default_path.display());
    debug!("config: env_path: {}", env_path.display());

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("notifier.regions")
                .try_parsing(true),
        );

    builder.build()?.try_deserialize()
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The path is taken from `DOTENV_OVERRIDE`, then from the first command line
/// argument if it starts with `.env`, and falls back to `.env`. Loading happens
/// once per process; a missing file is not an error.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = std::env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
