//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.himasif/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use crate::identity::google::{DEFAULT_OAUTH_BASE_URL, DEFAULT_USERINFO_URL};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HimasifConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub google: GoogleConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SiteConfig {
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GoogleConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub oauth_base_url: Option<String>,
    pub userinfo_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

/// Where the backend binds when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:10000";
pub const DEFAULT_SITE_URL: &str = "https://himasif.org";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleCredentials {
    pub client_id: String,
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub backend_url: String,
    pub site_url: String,
    pub log_level: LevelFilter,
    /// `None` disables sign-in.
    pub google: Option<GoogleCredentials>,
    pub oauth_base_url: String,
    pub userinfo_url: String,
}

/// Values taken from command-line flags.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub backend_url: Option<String>,
    pub no_auth: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.himasif/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".himasif").join("config.toml"))
}

/// Load config from `~/.himasif/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `HimasifConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<HimasifConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(HimasifConfig::default());
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(HimasifConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: HimasifConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# 360 AI HIMASIF Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_level = "debug"                 # "off", "error", "warn", "info", "debug", "trace"

# [backend]
# url = "http://localhost:10000"      # Or set HIMASIF_BACKEND_URL

# [site]
# url = "https://himasif.org"         # Or set HIMASIF_SITE_URL

# [google]
# client_id = "....apps.googleusercontent.com"   # Or set GOOGLE_CLIENT_ID
# client_secret = "..."                          # Or set GOOGLE_CLIENT_SECRET
# oauth_base_url = "https://oauth2.googleapis.com"
# userinfo_url = "https://www.googleapis.com/oauth2/v3/userinfo"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &HimasifConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with(config, cli, |key| std::env::var(key).ok())
}

/// [`resolve`] with an explicit environment lookup.
pub fn resolve_with(
    config: &HimasifConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Backend URL: CLI → env → config → default. Blank means same host as
    // the site, which for a terminal client is the local backend.
    let backend_url = cli
        .backend_url
        .clone()
        .or_else(|| env("HIMASIF_BACKEND_URL"))
        .or_else(|| config.backend.url.clone())
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

    let site_url = env("HIMASIF_SITE_URL")
        .or_else(|| config.site.url.clone())
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_SITE_URL.to_string());

    let log_level = config
        .general
        .log_level
        .as_deref()
        .and_then(|level| match level.parse::<LevelFilter>() {
            Ok(level) => Some(level),
            Err(_) => {
                warn!("Unknown log level {:?}, using {}", level, DEFAULT_LOG_LEVEL);
                None
            }
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    // Google credentials: env → config. `--no-auth` wins over both.
    let client_id = env("GOOGLE_CLIENT_ID")
        .or_else(|| config.google.client_id.clone())
        .filter(|id| !id.trim().is_empty());
    let client_secret = env("GOOGLE_CLIENT_SECRET")
        .or_else(|| config.google.client_secret.clone())
        .filter(|secret| !secret.trim().is_empty());
    let google = match client_id {
        Some(client_id) if !cli.no_auth => Some(GoogleCredentials {
            client_id,
            client_secret,
        }),
        _ => None,
    };

    ResolvedConfig {
        backend_url,
        site_url,
        log_level,
        google,
        oauth_base_url: config
            .google
            .oauth_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_OAUTH_BASE_URL.to_string()),
        userinfo_url: config
            .google
            .userinfo_url
            .clone()
            .unwrap_or_else(|| DEFAULT_USERINFO_URL.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with(&HimasifConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(resolved.site_url, DEFAULT_SITE_URL);
        assert_eq!(resolved.log_level, LevelFilter::Debug);
        assert!(resolved.google.is_none());
        assert_eq!(resolved.oauth_base_url, DEFAULT_OAUTH_BASE_URL);
    }

    #[test]
    fn test_blank_backend_url_falls_back_to_local() {
        let config = HimasifConfig {
            backend: BackendConfig {
                url: Some("  ".to_string()),
            },
            ..Default::default()
        };
        let resolved = resolve_with(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.backend_url, "http://localhost:10000");
    }

    #[test]
    fn test_backend_url_precedence() {
        let config = HimasifConfig {
            backend: BackendConfig {
                url: Some("http://from-file".to_string()),
            },
            ..Default::default()
        };
        let env = env_of(&[("HIMASIF_BACKEND_URL", "http://from-env/")]);

        let resolved = resolve_with(&config, &CliOverrides::default(), &env);
        assert_eq!(resolved.backend_url, "http://from-env");

        let cli = CliOverrides {
            backend_url: Some("http://from-cli".to_string()),
            no_auth: false,
        };
        let resolved = resolve_with(&config, &cli, &env);
        assert_eq!(resolved.backend_url, "http://from-cli");
    }

    #[test]
    fn test_google_credentials_and_no_auth() {
        let env = env_of(&[("GOOGLE_CLIENT_ID", "abc"), ("GOOGLE_CLIENT_SECRET", "s3")]);
        let resolved = resolve_with(&HimasifConfig::default(), &CliOverrides::default(), &env);
        assert_eq!(
            resolved.google,
            Some(GoogleCredentials {
                client_id: "abc".to_string(),
                client_secret: Some("s3".to_string()),
            })
        );

        let cli = CliOverrides {
            backend_url: None,
            no_auth: true,
        };
        assert!(resolve_with(&HimasifConfig::default(), &cli, &env).google.is_none());
    }

    #[test]
    fn test_bad_log_level_uses_default() {
        let config = HimasifConfig {
            general: GeneralConfig {
                log_level: Some("loud".to_string()),
            },
            ..Default::default()
        };
        let resolved = resolve_with(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
log_level = "info"

[backend]
url = "https://api.himasif.org"

[site]
url = "https://himasif.org/"

[google]
client_id = "id.apps.googleusercontent.com"
"#;
        let config: HimasifConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level.as_deref(), Some("info"));
        assert_eq!(config.backend.url.as_deref(), Some("https://api.himasif.org"));
        assert!(config.google.client_secret.is_none());

        let resolved = resolve_with(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.log_level, LevelFilter::Info);
        assert_eq!(resolved.site_url, "https://himasif.org");
        assert_eq!(
            resolved.google.map(|g| g.client_id).as_deref(),
            Some("id.apps.googleusercontent.com")
        );
    }

    #[test]
    fn test_sparse_toml_parses() {
        let config: HimasifConfig = toml::from_str("[site]\nurl = \"x\"\n").unwrap();
        assert_eq!(config.site.url.as_deref(), Some("x"));
        assert!(config.backend.url.is_none());
        assert!(config.google.client_id.is_none());
    }
}
