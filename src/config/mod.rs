use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Plaintext secrets supplied via environment at startup; hashed once
    /// when the account table is built and never stored beyond that.
    pub valet_password: String,
    pub desk_password: String,
    pub demo_password: String,
    pub cookie_max_age_secs: i64,
    pub throttle_window_secs: i64,
    pub throttle_max_failures: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FlightAwareConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub environment: String,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub flightaware: FlightAwareConfig,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default values
            .set_default("environment", "development")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", num_cpus::get() as i64)?
            // Account secrets have no usable defaults; AuthService::from_config
            // rejects empty ones at startup.
            .set_default("auth.valet_password", "")?
            .set_default("auth.desk_password", "")?
            .set_default("auth.demo_password", "")?
            .set_default("auth.cookie_max_age_secs", 604800)?
            .set_default("auth.throttle_window_secs", 60)?
            .set_default("auth.throttle_max_failures", 10)?
            .set_default("flightaware.api_key", "")?
            .set_default("flightaware.base_url", "https://aeroapi.flightaware.com/aeroapi")?
            // Add in settings from the config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in settings from environment variables (with prefix "APP_")
            // E.g., `APP_AUTH__DEMO_PASSWORD=demo123` sets `Settings.auth.demo_password`
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        s.try_deserialize()
    }

    pub fn new_for_test() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("environment", "test")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("auth.valet_password", "valet-test-pw")?
            .set_default("auth.desk_password", "desk-test-pw")?
            .set_default("auth.demo_password", "demo123")?
            .set_default("auth.cookie_max_age_secs", 604800)?
            .set_default("auth.throttle_window_secs", 60)?
            .set_default("auth.throttle_max_failures", 10)?
            .set_default("flightaware.api_key", "test-api-key")?
            .set_default("flightaware.base_url", "http://127.0.0.1:0/aeroapi")?
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn cleanup_env() {
        env::remove_var("APP_SERVER__PORT");
        env::remove_var("APP_SERVER__WORKERS");
        env::remove_var("APP_AUTH__DEMO_PASSWORD");
        env::remove_var("APP_AUTH__COOKIE_MAX_AGE_SECS");
        env::remove_var("APP_FLIGHTAWARE__API_KEY");
    }

    #[test]
    fn test_settings_defaults() {
        cleanup_env();
        let settings = Settings::new_for_test().expect("Failed to load settings");
        assert_eq!(settings.environment, "test");
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.workers as usize, num_cpus::get());
        assert_eq!(settings.auth.demo_password, "demo123");
        assert_eq!(settings.auth.cookie_max_age_secs, 604800);
        assert_eq!(settings.auth.throttle_max_failures, 10);
    }

    #[test]
    fn test_environment_override() {
        cleanup_env();

        env::set_var("APP_SERVER__PORT", "9000");
        env::set_var("APP_AUTH__DEMO_PASSWORD", "override-pw");
        env::set_var("APP_FLIGHTAWARE__API_KEY", "override-key");

        let config = Config::builder()
            .set_default("environment", "test").unwrap()
            .set_default("server.host", "127.0.0.1").unwrap()
            .set_default("server.port", 8080).unwrap()
            .set_default("server.workers", 2).unwrap()
            .set_default("auth.valet_password", "v").unwrap()
            .set_default("auth.desk_password", "d").unwrap()
            .set_default("auth.demo_password", "demo123").unwrap()
            .set_default("auth.cookie_max_age_secs", 604800).unwrap()
            .set_default("auth.throttle_window_secs", 60).unwrap()
            .set_default("auth.throttle_max_failures", 10).unwrap()
            .set_default("flightaware.api_key", "").unwrap()
            .set_default("flightaware.base_url", "http://localhost/aeroapi").unwrap()
            // Add environment variables last to override defaults
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()
            .expect("Failed to build config")
            .try_deserialize::<Settings>()
            .expect("Failed to deserialize settings");

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.demo_password, "override-pw");
        assert_eq!(config.flightaware.api_key, "override-key");

        cleanup_env();
    }

    #[test]
    fn test_invalid_port() {
        cleanup_env();

        env::set_var("APP_SERVER__PORT", "invalid");

        let result = Config::builder()
            .set_default("environment", "test").unwrap()
            .set_default("server.host", "127.0.0.1").unwrap()
            .set_default("server.port", 8080).unwrap()
            .set_default("server.workers", 2).unwrap()
            .set_default("auth.valet_password", "v").unwrap()
            .set_default("auth.desk_password", "d").unwrap()
            .set_default("auth.demo_password", "demo123").unwrap()
            .set_default("auth.cookie_max_age_secs", 604800).unwrap()
            .set_default("auth.throttle_window_secs", 60).unwrap()
            .set_default("auth.throttle_max_failures", 10).unwrap()
            .set_default("flightaware.api_key", "").unwrap()
            .set_default("flightaware.base_url", "http://localhost/aeroapi").unwrap()
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()
            .and_then(|config| config.try_deserialize::<Settings>());

        assert!(result.is_err(), "Expected error for invalid port");

        cleanup_env();
    }
}
