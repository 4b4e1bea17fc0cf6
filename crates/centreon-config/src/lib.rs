//! Configuration for the Centreon API client.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `centreon_api::ClientConfig` / `TransportConfig`.
//! The API crate never reads files; callers load a profile here and hand
//! the result in.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use centreon_api::{ClientConfig, TlsMode, TransportConfig};

/// Keyring service name under which passwords are stored.
const KEYRING_SERVICE: &str = "centreon";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("unknown profile '{0}'")]
    UnknownProfile(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named central server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named central server profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Legacy API entry point (e.g., "https://central/centreon/api/index.php").
    pub url: String,

    /// API user.
    pub username: Option<String>,

    /// Password (plaintext, prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

impl Config {
    /// Look up a profile by name, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");

        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::UnknownProfile(name.into()))
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "centreon-rs", "centreon").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("centreon");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load Config from a specific file, layered over defaults and under
/// `CENTREON_`-prefixed environment variables.
///
/// A missing file is not an error; the defaults apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CENTREON_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Where credentials are looked up besides the profile itself.
pub trait SecretSource {
    /// Value of an environment variable, if set.
    fn env(&self, name: &str) -> Option<String>;

    /// Password stored for a profile, if any.
    fn stored_password(&self, profile_name: &str) -> Option<String>;
}

/// The process environment and the system keyring
/// (service `centreon`, entry `<profile>/password`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSecrets;

impl SecretSource for SystemSecrets {
    fn env(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn stored_password(&self, profile_name: &str) -> Option<String> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"));
        match entry.and_then(|e| e.get_password()) {
            Ok(secret) => Some(secret),
            Err(e) => {
                debug!(profile = profile_name, error = %e, "no keyring password");
                None
            }
        }
    }
}

/// Resolve the profile password.
///
/// Order: the profile's `password_env` variable, `CENTREON_PASSWORD`,
/// the stored password, then the plaintext `password` field.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
    secrets: &impl SecretSource,
) -> Result<SecretString, ConfigError> {
    let password = profile
        .password_env
        .as_deref()
        .and_then(|name| secrets.env(name))
        .or_else(|| secrets.env("CENTREON_PASSWORD"))
        .or_else(|| secrets.stored_password(profile_name))
        .or_else(|| profile.password.clone())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    Ok(SecretString::from(password))
}

/// Resolve username + password for a profile.
///
/// The username falls back to `CENTREON_USERNAME`.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
    secrets: &impl SecretSource,
) -> Result<(String, SecretString), ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| secrets.env("CENTREON_USERNAME"))
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    let password = resolve_password(profile, profile_name, secrets)?;
    Ok((username, password))
}

// ── Translation ─────────────────────────────────────────────────────

/// Build the transport settings for a profile, applying global defaults.
///
/// `insecure` wins over `ca_cert`; with neither set, the system trust store
/// is used.
pub fn profile_transport(profile: &Profile, defaults: &Defaults) -> TransportConfig {
    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    TransportConfig { tls, timeout }
}

/// Build a `ClientConfig` + `TransportConfig` from a profile.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    secrets: &impl SecretSource,
) -> Result<(ClientConfig, TransportConfig), ConfigError> {
    let base_url: url::Url = profile.url.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {}", profile.url),
    })?;

    if base_url.query().is_some() || base_url.fragment().is_some() {
        return Err(ConfigError::Validation {
            field: "url".into(),
            reason: "must point at the API entry point without a query or fragment".into(),
        });
    }

    let (username, password) = resolve_credentials(profile, profile_name, secrets)?;

    Ok((
        ClientConfig {
            base_url,
            username,
            password,
        },
        profile_transport(profile, defaults),
    ))
}

/// Load the canonical config file and resolve the named (or default) profile
/// against the process environment and system keyring.
pub fn load_client_config(
    profile_name: Option<&str>,
) -> Result<(ClientConfig, TransportConfig), ConfigError> {
    load_client_config_from(&config_path(), profile_name, &SystemSecrets)
}

/// Load `path` and resolve the named (or default) profile.
pub fn load_client_config_from(
    path: &Path,
    profile_name: Option<&str>,
    secrets: &impl SecretSource,
) -> Result<(ClientConfig, TransportConfig), ConfigError> {
    let config = load_config_from(path)?;
    let (name, profile) = config.profile(profile_name)?;
    profile_to_client_config(profile, name, &config.defaults, secrets)
}
