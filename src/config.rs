use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use crate::pagination::{PaginationConfig, DEFAULT_PER_PAGE, DEFAULT_WINDOW_SIZE};

static DEFAULT_DATABASE_URL: &str = "postgresql://postgres:postgres@db/postgres";

/// Settings read from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub max_db_connections: u32,
    pub port: u16,
    pub jwt_issuer: String,
    pub media_url: String,
    pub pagination: PaginationConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let per_page: u64 = parse_or(&lookup, "PER_PAGE", DEFAULT_PER_PAGE)?;
        if per_page == 0 {
            return Err(anyhow!("PER_PAGE must be at least 1"));
        }
        let window_size: usize =
            parse_or(&lookup, "RECIPES_PAGINATION_WINDOW", DEFAULT_WINDOW_SIZE)?;
        if window_size == 0 {
            return Err(anyhow!("RECIPES_PAGINATION_WINDOW must be at least 1"));
        }

        let jwt_issuer = lookup("RECIPES_JWT_ISSUER")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .context("RECIPES_JWT_ISSUER is not set")?;

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| {
                info!("DATABASE_URL not set, using default");
                DEFAULT_DATABASE_URL.to_string()
            }),
            max_db_connections: parse_or(&lookup, "RECIPES_MAX_DB_CONNECTIONS", 50)?,
            port: parse_or(&lookup, "PORT", 3000)?,
            jwt_issuer,
            media_url: media_url(lookup("RECIPES_MEDIA_URL")),
            pagination: PaginationConfig::new(per_page, window_size),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow!("Cannot parse {key}: {e}")),
        None => {
            debug!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn media_url(value: Option<String>) -> String {
    let mut url = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "/media/".to_string());
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        // Act
        let config = load(&[("RECIPES_JWT_ISSUER", "https://sso.example.com/realms/r")]).unwrap();

        // Assert
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_db_connections, 50);
        assert_eq!(config.media_url, "/media/");
        assert_eq!(config.pagination, PaginationConfig::new(6, 4));
    }

    #[test]
    fn reads_page_size() {
        let config = load(&[
            ("RECIPES_JWT_ISSUER", "issuer"),
            ("PER_PAGE", "9"),
            ("RECIPES_PAGINATION_WINDOW", "5"),
            ("RECIPES_MEDIA_URL", "https://cdn.example.com/media"),
        ])
        .unwrap();
        assert_eq!(config.pagination.per_page(), 9);
        assert_eq!(config.pagination.window_size(), 5);
        assert_eq!(config.media_url, "https://cdn.example.com/media/");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(load(&[]).is_err(), "issuer is required");
        assert!(load(&[("RECIPES_JWT_ISSUER", "issuer"), ("PER_PAGE", "six")]).is_err());
        assert!(load(&[("RECIPES_JWT_ISSUER", "issuer"), ("PER_PAGE", "0")]).is_err());
        assert!(load(&[("RECIPES_JWT_ISSUER", "issuer"), ("PORT", "70000")]).is_err());
        assert!(load(&[
            ("RECIPES_JWT_ISSUER", "issuer"),
            ("RECIPES_PAGINATION_WINDOW", "0")
        ])
        .is_err());
    }
}
