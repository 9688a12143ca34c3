use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "gateway.toml";

pub struct Config {
    pub mode: String, // "server" or "stdio"
    pub port: u16,
    pub deprecate_rest: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let mode = std::env::var("MODE").unwrap_or_else(|_| "server".into());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        let deprecate_rest = std::env::var("DEPRECATE_REST")
            .map(|v| !v.is_empty())
            .unwrap_or(false);

        Self {
            mode,
            port,
            deprecate_rest,
        }
    }
}

/// Settings for one upstream client.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ToolConfig {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
    pub retries: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub foundry: ToolConfig,
}

impl AppConfig {
    /// TOML file first (`GATEWAY_CONFIG`, default `gateway.toml`; a missing
    /// file is fine), then `FOUNDRY_*` environment overrides.
    pub fn from_env_and_toml() -> Self {
        let path = std::env::var("GATEWAY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let mut cfg = match std::fs::read_to_string(&path) {
            Ok(raw) => Self::from_toml_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path, error = %e, "ignoring unreadable config file");
                Self::default()
            }),
            Err(_) => Self::default(),
        };
        cfg.apply_env();
        cfg
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    fn apply_env(&mut self) {
        if let Ok(base) = std::env::var("FOUNDRY_BASE_URL") {
            self.foundry.base_url = Some(base);
        }
        if let Some(ms) = env_parse::<u64>("FOUNDRY_TIMEOUT_MS") {
            self.foundry.timeout_ms = Some(ms);
        }
        if let Some(n) = env_parse::<u32>("FOUNDRY_RETRIES") {
            self.foundry.retries = Some(n);
        }
        if self
            .foundry
            .base_url
            .as_deref()
            .is_some_and(|b| b.trim().is_empty())
        {
            self.foundry.base_url = None;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(base) = self.foundry.base_url.as_deref() {
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                return Err(format!(
                    "Invalid FOUNDRY_BASE_URL: {base}. Must start with http:// or https://"
                ));
            }
        }
        if self.foundry.timeout_ms == Some(0) {
            return Err("FOUNDRY_TIMEOUT_MS cannot be 0".into());
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}
