//! Runtime configuration read from the environment.

use std::env;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite:data/bookmarks.db";

/// Order in which unfiltered and filtered bookmark lists are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl ListOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            ListOrder::NewestFirst => "DESC",
            ListOrder::OldestFirst => "ASC",
        }
    }
}

impl std::str::FromStr for ListOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desc" | "newest" => Ok(ListOrder::NewestFirst),
            "asc" | "oldest" => Ok(ListOrder::OldestFirst),
            other => Err(ConfigError::Invalid {
                name: "BOOKMARK_ORDER",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub token: String,
    pub production: bool,
    pub database_url: String,
    pub list_order: ListOrder,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { name: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{name} must be set"),
            ConfigError::Invalid { name, value } => write!(f, "invalid value for {name}: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("AUTH_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::Missing("AUTH_TOKEN"))?;

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let production = lookup("APP_ENV")
            .map(|v| v.trim().eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let list_order = match lookup("BOOKMARK_ORDER") {
            Some(raw) => raw.parse()?,
            None => ListOrder::default(),
        };

        Ok(Self {
            port,
            token,
            production,
            database_url: database_url_from(&lookup),
            list_order,
        })
    }
}

/// The database URL alone, for commands that do not serve HTTP.
pub fn database_url() -> String {
    database_url_from(&|name: &str| env::var(name).ok())
}

fn database_url_from<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}
