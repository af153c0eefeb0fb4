//! Runtime settings resolved from the process environment.

use std::path::PathBuf;

use thiserror::Error;

/// Default GraphQL endpoint of the code host.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";
/// Default base address for raw file contents.
pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com";
/// Default number of files fetched and analysed per run.
pub const DEFAULT_FILE_BUDGET: usize = 100;
/// Default cache root, relative to the working directory.
pub const DEFAULT_CACHE_ROOT: &str = ".repoprobe/cache";
/// Default model for the `ask` command.
pub const DEFAULT_LLM_MODEL: &str = "claude-sonnet-4-20250514";

/// A setting that could not be interpreted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The variable is set but its value is unusable.
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// Raw value found.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

/// Settings shared by every stage of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Bearer credential for the GraphQL endpoint.
    pub github_token: Option<String>,
    /// Root directory of the response cache.
    pub cache_root: PathBuf,
    /// GraphQL endpoint.
    pub graphql_url: String,
    /// Raw-content base address.
    pub raw_url: String,
    /// Maximum files resolved per run.
    pub file_budget: usize,
    /// Model used for downstream questions.
    pub llm_model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            github_token: None,
            cache_root: PathBuf::from(DEFAULT_CACHE_ROOT),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            raw_url: DEFAULT_RAW_URL.to_string(),
            file_budget: DEFAULT_FILE_BUDGET,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
        }
    }
}

impl Settings {
    /// Loads `.env` (if present) and reads settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is the normal case in production.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let file_budget = match non_empty("REPOPROBE_FILE_BUDGET") {
            Some(raw) => parse_budget(&raw)?,
            None => defaults.file_budget,
        };

        Ok(Self {
            github_token: non_empty("GITHUB_ACCESS_TOKEN"),
            cache_root: non_empty("MOUNT_DIRECTORY").map_or(defaults.cache_root, PathBuf::from),
            graphql_url: non_empty("REPOPROBE_GRAPHQL_URL").unwrap_or(defaults.graphql_url),
            raw_url: non_empty("REPOPROBE_RAW_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.raw_url),
            file_budget,
            llm_model: non_empty("REPOPROBE_LLM_MODEL").unwrap_or(defaults.llm_model),
        })
    }
}

fn parse_budget(raw: &str) -> Result<usize, ConfigError> {
    let invalid = |reason| ConfigError::Invalid {
        var: "REPOPROBE_FILE_BUDGET",
        value: raw.to_string(),
        reason,
    };
    let budget: usize = raw.trim().parse().map_err(|_| invalid("expected a whole number"))?;
    if budget == 0 {
        return Err(invalid("must be at least 1"));
    }
    Ok(budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.file_budget, 100);
    }

    #[test]
    fn reads_all_variables() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("GITHUB_ACCESS_TOKEN", "ghp_x"),
            ("MOUNT_DIRECTORY", "/mnt/cache"),
            ("REPOPROBE_GRAPHQL_URL", "http://localhost:9/graphql"),
            ("REPOPROBE_RAW_URL", "http://localhost:9/raw/"),
            ("REPOPROBE_FILE_BUDGET", "7"),
            ("REPOPROBE_LLM_MODEL", "tiny"),
        ]))
        .unwrap();

        assert_eq!(settings.github_token.as_deref(), Some("ghp_x"));
        assert_eq!(settings.cache_root, PathBuf::from("/mnt/cache"));
        assert_eq!(settings.graphql_url, "http://localhost:9/graphql");
        assert_eq!(settings.raw_url, "http://localhost:9/raw");
        assert_eq!(settings.file_budget, 7);
        assert_eq!(settings.llm_model, "tiny");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let settings =
            Settings::from_lookup(lookup_from(&[("GITHUB_ACCESS_TOKEN", "  ")])).unwrap();
        assert!(settings.github_token.is_none());
    }

    #[test]
    fn rejects_non_numeric_budget() {
        let err = Settings::from_lookup(lookup_from(&[("REPOPROBE_FILE_BUDGET", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("REPOPROBE_FILE_BUDGET"));
    }

    #[test]
    fn rejects_zero_budget() {
        let err =
            Settings::from_lookup(lookup_from(&[("REPOPROBE_FILE_BUDGET", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { reason: "must be at least 1", .. }));
    }
}
