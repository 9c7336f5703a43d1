use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

/// Runtime settings for the record store, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub allowed_origin: String,
    pub frontend_dist: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            port: try_load("RECORD_STORE_PORT", "3000")?,
            database_url: try_load("DATABASE_URL", "sqlite:responses.db")?,
            allowed_origin: try_load("ALLOWED_ORIGIN", "http://localhost:8080")?,
            frontend_dist: try_load("FRONTEND_DIST", "../frontend/dist")?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow::anyhow!("environment variable {key} is invalid: {e}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_falls_back_to_default() {
        let port: u16 = try_load("TERNARY_TEST_UNSET_PORT", "3000").unwrap();
        assert_eq!(port, 3000);
    }

    #[test]
    fn test_try_load_rejects_unparseable_default() {
        let port: anyhow::Result<u16> = try_load("TERNARY_TEST_UNSET_PORT", "not-a-port");
        assert!(port.is_err());
    }
}
