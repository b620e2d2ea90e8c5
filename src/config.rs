//! Configuration loader: merges config.toml, .env, and env vars.

use std::path::Path;

use common::{DashboardConfig, Error};
use tracing::debug;

/// Load configuration: file (if present) → env-var overrides → validation.
pub fn load(path: &Path) -> Result<DashboardConfig, Error> {
    let mut config = if path.exists() {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::Config(format!("{}: {e}", path.display())))?
    } else {
        debug!("{} not found, using built-in defaults", path.display());
        DashboardConfig::default()
    };

    apply_env_overrides(&mut config)?;
    validate_config(&config)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut DashboardConfig) -> Result<(), Error> {
    if let Ok(raw) = std::env::var("DASHBOARD_BASE_URL") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            config.base_url = trimmed.to_string();
        }
    }
    if let Ok(raw) = std::env::var("DASHBOARD_TIMEOUT_SECS") {
        config.timeout_secs = parse_positive_u64(&raw, "DASHBOARD_TIMEOUT_SECS")?;
    }
    if let Ok(raw) = std::env::var("DASHBOARD_CACHE_TTL_SECS") {
        config.cache_ttl_secs = parse_positive_u64(&raw, "DASHBOARD_CACHE_TTL_SECS")?;
    }
    Ok(())
}

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn validate_config(config: &DashboardConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if !config.base_url.starts_with("http") {
        issues.push("base_url must be an http(s) URL".into());
    }
    if config.timeout_secs == 0 {
        issues.push("timeout_secs must be > 0".into());
    }
    if config.indicator_per_page == 0 {
        issues.push("indicator_per_page must be > 0".into());
    }
    if config.country_per_page == 0 {
        issues.push("country_per_page must be > 0".into());
    }
    if config.scoped_per_page == 0 {
        issues.push("scoped_per_page must be > 0".into());
    }
    if config.max_countries == 0 {
        issues.push("max_countries must be >= 1".into());
    }
    if config.catalog.indicators.is_empty() {
        issues.push("catalog.indicators must not be empty".into());
    }
    if config.catalog.sample_countries.is_empty() {
        issues.push("catalog.sample_countries must not be empty".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(issues.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        validate_config(&DashboardConfig::default()).expect("defaults are valid");
    }

    #[test]
    fn test_validation_collects_issues() {
        let config = DashboardConfig {
            base_url: "ftp://nope".into(),
            timeout_secs: 0,
            ..DashboardConfig::default()
        };

        let err = validate_config(&config).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("base_url"));
        assert!(message.contains("timeout_secs"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config =
            load(Path::new("definitely-not-here.toml")).expect("defaults load without a file");
        assert_eq!(config.base_url, "https://api.worldbank.org/v2");
    }

    #[test]
    fn test_parse_positive_rejects_zero_and_garbage() {
        assert!(parse_positive_u64("0", "X").is_err());
        assert!(parse_positive_u64("abc", "X").is_err());
        assert_eq!(parse_positive_u64(" 42 ", "X").expect("valid"), 42);
    }
}
