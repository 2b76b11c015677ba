use std::collections::HashSet;

use poise::serenity_prelude::UserId;

pub const DEFAULT_PREFIX: &str = ",";
pub const MAX_PREFIX_LEN: usize = 12;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Startup configuration, read from the environment.
#[derive(Clone, Debug)]
pub struct BotConfig {
    pub token: String,
    pub database_url: String,
    /// Used in DMs and in guilds without a prefix of their own.
    pub prefix: String,
    pub owners: HashSet<UserId>,
    pub max_connections: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { var: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "Missing `{var}` environment variable."),
            ConfigError::Invalid { var, value } => {
                write!(f, "Invalid value `{value}` for `{var}`.")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, PartialEq, Eq)]
pub enum PrefixError {
    Empty,
    TooLong,
}

impl std::fmt::Display for PrefixError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PrefixError::Empty => write!(f, "The prefix cannot be empty."),
            PrefixError::TooLong => write!(
                f,
                "The prefix cannot be longer than {MAX_PREFIX_LEN} characters."
            ),
        }
    }
}

impl std::error::Error for PrefixError {}

/// Trims and lowercases a prefix, rejecting empty and overlong ones.
pub fn normalize_prefix(prefix: &str) -> Result<String, PrefixError> {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return Err(PrefixError::Empty);
    }
    if prefix.chars().count() > MAX_PREFIX_LEN {
        return Err(PrefixError::TooLong);
    }
    Ok(prefix)
}

/// Parses a comma separated list of user ids.
pub fn parse_owners(raw: &str) -> Option<HashSet<UserId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| id.parse::<u64>().ok().filter(|id| *id != 0).map(UserId::new))
        .collect()
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let token = required("PAL_TOKEN")?;
        let database_url = required("DATABASE_URL")?;

        let prefix = match lookup("PAL_PREFIX") {
            Some(raw) => normalize_prefix(&raw).map_err(|_| ConfigError::Invalid {
                var: "PAL_PREFIX",
                value: raw.clone(),
            })?,
            None => DEFAULT_PREFIX.to_owned(),
        };

        let owners = match lookup("PAL_OWNERS") {
            Some(raw) => parse_owners(&raw).ok_or(ConfigError::Invalid {
                var: "PAL_OWNERS",
                value: raw.clone(),
            })?,
            None => HashSet::new(),
        };

        let max_connections = match lookup("PAL_DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid {
                    var: "PAL_DB_MAX_CONNECTIONS",
                    value: raw.clone(),
                })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(BotConfig {
            token,
            database_url,
            prefix,
            owners,
            max_connections,
        })
    }
}
