use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are malformed. Missing provider
/// credentials are not an error — the affected provider falls back locally.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are malformed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("QRAFT_ENV", "development"));
    let bind_addr = parse_addr("QRAFT_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("QRAFT_LOG_LEVEL", "info");

    let search_api_key = lookup("QRAFT_SEARCH_API_KEY").ok();
    let search_base_url = or_default("QRAFT_SEARCH_BASE_URL", "https://api.exa.ai");
    let scrape_api_token = lookup("QRAFT_SCRAPE_API_TOKEN").ok();
    let scrape_base_url = or_default("QRAFT_SCRAPE_BASE_URL", "https://api.browserbase.com");
    let image_api_token = lookup("QRAFT_IMAGE_API_TOKEN").ok();
    let image_base_url = or_default("QRAFT_IMAGE_BASE_URL", "https://api.replicate.com");
    let image_deployment = or_default("QRAFT_IMAGE_DEPLOYMENT", "qraft/qr-art");

    let default_qr_payload = or_default("QRAFT_DEFAULT_QR_PAYLOAD", "qraft.dev/demo");
    let telemetry_url = lookup("QRAFT_TELEMETRY_URL").ok();
    let telemetry_project = or_default("QRAFT_TELEMETRY_PROJECT", "qraft");

    let request_timeout_secs = parse_u64("QRAFT_REQUEST_TIMEOUT_SECS", "30")?;
    let generation_timeout_secs = parse_u64("QRAFT_GENERATION_TIMEOUT_SECS", "180")?;
    let scrape_concurrency = parse_usize("QRAFT_SCRAPE_CONCURRENCY", "3")?;
    let artifact_dir = PathBuf::from(or_default("QRAFT_ARTIFACT_DIR", "./artifacts"));

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        search_api_key,
        search_base_url,
        scrape_api_token,
        scrape_base_url,
        image_api_token,
        image_base_url,
        image_deployment,
        default_qr_payload,
        telemetry_url,
        telemetry_project,
        request_timeout_secs,
        generation_timeout_secs,
        scrape_concurrency,
        artifact_dir,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_development() {
        assert_eq!(parse_environment("development"), Environment::Development);
    }

    #[test]
    fn parse_environment_production() {
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("unknown"), Environment::Development);
    }

    #[test]
    fn build_app_config_succeeds_with_empty_environment() {
        // Provider credentials are optional: an empty environment must still
        // produce a usable config that routes every provider to its fallback.
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.search_api_key.is_none());
        assert!(cfg.scrape_api_token.is_none());
        assert!(cfg.image_api_token.is_none());
        assert!(cfg.telemetry_url.is_none());
        assert_eq!(cfg.search_base_url, "https://api.exa.ai");
        assert_eq!(cfg.scrape_base_url, "https://api.browserbase.com");
        assert_eq!(cfg.image_base_url, "https://api.replicate.com");
        assert_eq!(cfg.image_deployment, "qraft/qr-art");
        assert_eq!(cfg.default_qr_payload, "qraft.dev/demo");
        assert_eq!(cfg.telemetry_project, "qraft");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.generation_timeout_secs, 180);
        assert_eq!(cfg.scrape_concurrency, 3);
        assert_eq!(cfg.artifact_dir.to_string_lossy(), "./artifacts");
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("QRAFT_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "QRAFT_BIND_ADDR"),
            "expected InvalidEnvVar(QRAFT_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_reads_provider_credentials() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("QRAFT_SEARCH_API_KEY", "search-key");
        map.insert("QRAFT_SCRAPE_API_TOKEN", "scrape-token");
        map.insert("QRAFT_IMAGE_API_TOKEN", "image-token");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.search_api_key.as_deref(), Some("search-key"));
        assert_eq!(cfg.scrape_api_token.as_deref(), Some("scrape-token"));
        assert_eq!(cfg.image_api_token.as_deref(), Some("image-token"));
    }

    #[test]
    fn build_app_config_request_timeout_override() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("QRAFT_REQUEST_TIMEOUT_SECS", "60");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.request_timeout_secs, 60);
    }

    #[test]
    fn build_app_config_request_timeout_invalid() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("QRAFT_REQUEST_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "QRAFT_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(QRAFT_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_generation_timeout_override() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("QRAFT_GENERATION_TIMEOUT_SECS", "300");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.generation_timeout_secs, 300);
    }

    #[test]
    fn build_app_config_scrape_concurrency_invalid() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("QRAFT_SCRAPE_CONCURRENCY", "-2");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "QRAFT_SCRAPE_CONCURRENCY"),
            "expected InvalidEnvVar(QRAFT_SCRAPE_CONCURRENCY), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_default_qr_payload_override() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("QRAFT_DEFAULT_QR_PAYLOAD", "example.com/landing");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.default_qr_payload, "example.com/landing");
    }
}
