use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::{LtuError, Result};

/// Named service deployment.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Environment {
    Dev,
    Test,
    Labs,
    Live,
    Paris,
}

impl Environment {
    /// Every known profile, in settings lookup order.
    pub const ALL: [Environment; 5] = [
        Environment::Dev,
        Environment::Test,
        Environment::Labs,
        Environment::Live,
        Environment::Paris,
    ];

    /// Lowercase profile name used in settings keys, e.g. `"paris"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Test => "test",
            Self::Labs => "labs",
            Self::Live => "live",
            Self::Paris => "paris",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = LtuError;

    fn from_str(name: &str) -> Result<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|env| env.as_str() == name)
            .ok_or_else(|| LtuError::Configuration(format!("unknown environment '{name}'")))
    }
}

/// Base URL and application key for one environment.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub application_key: String,
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("base_url", &self.base_url)
            .field("application_key", &"<redacted>")
            .finish()
    }
}

impl ServiceConfig {
    /// Builds a profile directly, bypassing the settings store.
    pub fn new(base_url: impl Into<String>, application_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            application_key: application_key.into(),
        }
    }
}

/// Flat key/value settings store using `url.<env>` and `appkey.<env>` keys.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    /// Adds or replaces a single setting.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Loads settings from a JSON object of string values.
    ///
    /// ```json
    /// { "url.test": "https://ltu.example/api/v2.0/", "appkey.test": "..." }
    /// ```
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let values: HashMap<String, String> = serde_json::from_str(&content).map_err(|err| {
            LtuError::Configuration(format!(
                "settings file {} could not be parsed: {err}",
                path.display()
            ))
        })?;
        Ok(Self { values })
    }

    /// Reads `LTU_URL_<ENV>` / `LTU_APPKEY_<ENV>` for every known environment.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        for env in Environment::ALL {
            let suffix = env.as_str().to_ascii_uppercase();
            if let Ok(url) = std::env::var(format!("LTU_URL_{suffix}")) {
                settings = settings.with(url_key(env), url);
            }
            if let Ok(key) = std::env::var(format!("LTU_APPKEY_{suffix}")) {
                settings = settings.with(appkey_key(env), key);
            }
        }
        settings
    }

    /// Resolves the profile named `name`, failing on unknown names or missing entries.
    pub fn resolve(&self, name: &str) -> Result<ServiceConfig> {
        let env = name.parse::<Environment>()?;
        self.resolve_environment(env)
    }

    /// Resolves an already parsed environment, failing on missing or blank entries.
    pub fn resolve_environment(&self, env: Environment) -> Result<ServiceConfig> {
        let base_url = self.require(&url_key(env))?;
        let application_key = self.require(&appkey_key(env))?;
        Ok(ServiceConfig::new(base_url, application_key))
    }

    fn require(&self, key: &str) -> Result<String> {
        match self.values.get(key).map(|value| value.trim()) {
            Some(value) if !value.is_empty() => Ok(value.to_owned()),
            Some(_) => Err(LtuError::Configuration(format!(
                "setting '{key}' is set but empty"
            ))),
            None => Err(LtuError::Configuration(format!(
                "missing setting '{key}'"
            ))),
        }
    }
}

fn url_key(env: Environment) -> String {
    format!("url.{env}")
}

fn appkey_key(env: Environment) -> String {
    format!("appkey.{env}")
}
