//! Configuration loader
//!
//! Loads client options from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If no credentials are set there, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! The loader only gathers [`ClientOptions`]; validation (credential
//! exclusivity, URL checks, defaults) happens in [`ClientOptions::resolve`].
//!
//! ## Environment Variables
//! - `MEDREF_API_KEY`: static API key
//! - `MEDREF_CLIENT_ID` / `MEDREF_CLIENT_SECRET`: OAuth2 client credentials
//! - `MEDREF_TOKEN_URL`: token endpoint override
//! - `MEDREF_SCOPES`: scopes, separated by commas or whitespace
//! - `MEDREF_BASE_URL`: API base URL override
//! - `MEDREF_TIMEOUT_MS`: per-attempt timeout in milliseconds
//! - `MEDREF_MAX_RETRIES`: ordinary retry budget
//! - `MEDREF_RETRY_DELAY_MS`: backoff base in milliseconds
//! - `MEDREF_RETRY_ON_TIMEOUT`: whether timeouts are retried (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./medref.toml`, `./medref.json` (current working directory)
//! 2. `./config/medref.toml`, `./config/medref.json`
//! 3. `../medref.toml`, `../medref.json` (parent directory)

use std::path::{Path, PathBuf};
use std::str::FromStr;

use medref_domain::{ClientOptions, ConfigError};

pub const ENV_API_KEY: &str = "MEDREF_API_KEY";
pub const ENV_CLIENT_ID: &str = "MEDREF_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "MEDREF_CLIENT_SECRET";
pub const ENV_TOKEN_URL: &str = "MEDREF_TOKEN_URL";
pub const ENV_SCOPES: &str = "MEDREF_SCOPES";
pub const ENV_BASE_URL: &str = "MEDREF_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "MEDREF_TIMEOUT_MS";
pub const ENV_MAX_RETRIES: &str = "MEDREF_MAX_RETRIES";
pub const ENV_RETRY_DELAY_MS: &str = "MEDREF_RETRY_DELAY_MS";
pub const ENV_RETRY_ON_TIMEOUT: &str = "MEDREF_RETRY_ON_TIMEOUT";

/// Load client options with automatic fallback strategy
///
/// First attempts to load from environment variables. If neither an API key
/// nor a client id is set there, falls back to a config file.
///
/// # Errors
/// Returns [`ConfigError`] if:
/// - An environment variable has an invalid value
/// - No credentials are in the environment and no config file is found
/// - The config file cannot be read or parsed
pub fn load() -> Result<ClientOptions, ConfigError> {
    match load_from_env() {
        Ok(options) => {
            tracing::info!("Client options loaded from environment variables");
            Ok(options)
        }
        Err(ConfigError::MissingCredentials) => {
            tracing::debug!("No credentials in environment, trying config file");
            load_from_file(None)
        }
        Err(err) => Err(err),
    }
}

/// Load client options from `MEDREF_*` environment variables
///
/// # Environment Variables
/// See module documentation for the complete list.
///
/// # Errors
/// Returns [`ConfigError::MissingCredentials`] when neither
/// `MEDREF_API_KEY` nor `MEDREF_CLIENT_ID` is set, or
/// [`ConfigError::InvalidValue`] for an unparseable number or boolean.
pub fn load_from_env() -> Result<ClientOptions, ConfigError> {
    options_from_lookup(|key| std::env::var(key).ok())
}

/// Build options from an arbitrary variable lookup.
fn options_from_lookup<F>(lookup: F) -> Result<ClientOptions, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|value| value.trim().to_string()).filter(|v| !v.is_empty());

    let api_key = var(ENV_API_KEY);
    let client_id = var(ENV_CLIENT_ID);
    if api_key.is_none() && client_id.is_none() {
        return Err(ConfigError::MissingCredentials);
    }

    let scopes = var(ENV_SCOPES).map(|raw| {
        raw.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|scope| !scope.is_empty())
            .map(str::to_owned)
            .collect()
    });

    Ok(ClientOptions {
        api_key,
        client_id,
        client_secret: var(ENV_CLIENT_SECRET),
        token_url: var(ENV_TOKEN_URL),
        scopes,
        base_url: var(ENV_BASE_URL),
        timeout_ms: parse_var(ENV_TIMEOUT_MS, var(ENV_TIMEOUT_MS))?,
        max_retries: parse_var(ENV_MAX_RETRIES, var(ENV_MAX_RETRIES))?,
        retry_delay_ms: parse_var(ENV_RETRY_DELAY_MS, var(ENV_RETRY_DELAY_MS))?,
        retry_on_timeout: var(ENV_RETRY_ON_TIMEOUT)
            .map(|raw| parse_bool(ENV_RETRY_ON_TIMEOUT, &raw))
            .transpose()?,
        ..ClientOptions::default()
    })
}

/// Load client options from a file
///
/// If `path` is `None`, probes the standard locations.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns [`ConfigError`] if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientOptions, ConfigError> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::FileNotFound(p));
            }
            p
        }
        None => probe_config_paths().ok_or(ConfigError::NoConfigFile)?,
    };

    tracing::info!(path = %config_path.display(), "Loading client options from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|source| ConfigError::Read { path: config_path.clone(), source })?;

    parse_config(&contents, &config_path)
}

/// Parse client options from string content
///
/// Format is detected by file extension (`.json` or `.toml`); a missing
/// extension is read as TOML.
///
/// # Errors
/// Returns [`ConfigError::Parse`] if the format is unsupported or parsing
/// fails.
fn parse_config(contents: &str, path: &Path) -> Result<ClientOptions, ConfigError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            format: "TOML",
            reason: e.to_string(),
        }),
        "json" => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            format: "JSON",
            reason: e.to_string(),
        }),
        other => Err(ConfigError::Parse {
            path: path.to_path_buf(),
            format: "config",
            reason: format!("unsupported format: {other}"),
        }),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    candidate_paths(&cwd).into_iter().find(|path| path.is_file())
}

fn candidate_paths(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("medref.toml"),
        dir.join("medref.json"),
        dir.join("config").join("medref.toml"),
        dir.join("config").join("medref.json"),
        dir.join("..").join("medref.toml"),
        dir.join("..").join("medref.json"),
    ]
}

fn parse_var<T>(key: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|raw| {
        raw.parse::<T>().map_err(|e| ConfigError::InvalidValue {
            field: key,
            reason: format!("{raw:?} is not a valid number: {e}"),
        })
    })
    .transpose()
}

/// Parse a boolean variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: key,
            reason: format!("{raw:?} is not a boolean"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    fn temp_config(contents: &str, extension: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(&format!(".{extension}")).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_bool_parsing() {
        for raw in ["1", "true", "YES", "on"] {
            assert!(parse_bool(ENV_RETRY_ON_TIMEOUT, raw).unwrap(), "{raw}");
        }
        for raw in ["0", "false", "No", "off"] {
            assert!(!parse_bool(ENV_RETRY_ON_TIMEOUT, raw).unwrap(), "{raw}");
        }
        assert!(matches!(
            parse_bool(ENV_RETRY_ON_TIMEOUT, "maybe"),
            Err(ConfigError::InvalidValue { field: ENV_RETRY_ON_TIMEOUT, .. })
        ));
    }

    #[test]
    fn test_env_api_key_with_overrides() {
        let options = options_from_lookup(lookup_from(&[
            (ENV_API_KEY, "key-123"),
            (ENV_BASE_URL, "http://localhost:8080"),
            (ENV_TIMEOUT_MS, "5000"),
            (ENV_MAX_RETRIES, "0"),
            (ENV_RETRY_ON_TIMEOUT, "true"),
        ]))
        .unwrap();

        assert_eq!(options.api_key.as_deref(), Some("key-123"));
        assert_eq!(options.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(options.timeout_ms, Some(5000));
        assert_eq!(options.max_retries, Some(0));
        assert_eq!(options.retry_delay_ms, None);
        assert_eq!(options.retry_on_timeout, Some(true));
    }

    #[test]
    fn test_env_client_credentials_split_scopes() {
        let options = options_from_lookup(lookup_from(&[
            (ENV_CLIENT_ID, "client"),
            (ENV_CLIENT_SECRET, "secret"),
            (ENV_SCOPES, "read, search  batch"),
        ]))
        .unwrap();

        assert_eq!(
            options.scopes,
            Some(vec!["read".to_string(), "search".to_string(), "batch".to_string()])
        );
        let config = options.resolve().unwrap();
        assert_eq!(config.credentials.mode(), "oauth2");
    }

    #[test]
    fn test_env_without_credentials_is_missing() {
        let result = options_from_lookup(lookup_from(&[(ENV_BASE_URL, "http://localhost")]));
        assert!(matches!(result, Err(ConfigError::MissingCredentials)));

        let blank = options_from_lookup(lookup_from(&[(ENV_API_KEY, "   ")]));
        assert!(matches!(blank, Err(ConfigError::MissingCredentials)));
    }

    #[test]
    fn test_env_invalid_number() {
        let result = options_from_lookup(lookup_from(&[
            (ENV_API_KEY, "key"),
            (ENV_MAX_RETRIES, "three"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: ENV_MAX_RETRIES, .. })
        ));
    }

    #[test]
    fn test_load_from_file_toml() {
        let file = temp_config(
            r#"
api_key = "file-key"
base_url = "https://sandbox.medref.dev"
max_retries = 5
"#,
            "toml",
        );

        let options = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(options.api_key.as_deref(), Some("file-key"));
        assert_eq!(options.max_retries, Some(5));
        assert_eq!(options.resolve().unwrap().base_url, "https://sandbox.medref.dev");
    }

    #[test]
    fn test_load_from_file_json() {
        let file = temp_config(
            r#"{
                "client_id": "cid",
                "client_secret": "csecret",
                "scopes": ["read"],
                "quota_discriminator": { "field": "type", "values": ["quota"] }
            }"#,
            "json",
        );

        let options = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(options.client_id.as_deref(), Some("cid"));
        assert_eq!(options.quota_discriminator.map(|q| q.field), Some("type".to_string()));
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/medref.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let file = temp_config(r#"{ "api_key": "#, "json");
        let result = load_from_file(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(ConfigError::Parse { format: "JSON", .. })));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("api_key: x", Path::new("medref.yaml"));
        assert!(matches!(result, Err(ConfigError::Parse { format: "config", .. })));
    }

    #[test]
    fn test_candidate_paths_order() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("config")).unwrap();
        std::fs::write(dir.path().join("config").join("medref.toml"), "api_key = \"x\"").unwrap();

        let found = candidate_paths(dir.path()).into_iter().find(|path| path.is_file());
        assert_eq!(found, Some(dir.path().join("config").join("medref.toml")));

        std::fs::write(dir.path().join("medref.json"), "{}").unwrap();
        let found = candidate_paths(dir.path()).into_iter().find(|path| path.is_file());
        assert_eq!(found, Some(dir.path().join("medref.json")));
    }
}
