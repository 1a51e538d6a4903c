use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::{env, fs, net::SocketAddr, path::Path};

pub const BINDING_ENV: &str = "CARTCONV_BINDING";

/// Settings of the REST server, read from a JSON file such as
/// `{"APIRoot": "/api/", "Binding": ":1111"}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    #[serde(rename = "APIRoot", alias = "api_root")]
    pub api_root: String,
    #[serde(rename = "Binding", alias = "binding")]
    pub binding: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_root: "/api/".to_string(),
            binding: "0.0.0.0:1111".to_string(),
        }
    }
}

impl ServerConfig {
    /// Defaults, overlaid by the JSON file at `path` (if any) and then by the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("unable to read configuration {}", path.display()))?;
                Self::from_json(&text)
                    .with_context(|| format!("unable to parse configuration {}", path.display()))?
            }
            None => Self::default(),
        };
        if let Ok(binding) = env::var(BINDING_ENV) {
            config.binding = binding;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.api_prefix()?;
        self.socket_addr()?;
        Ok(())
    }

    /// The API root without trailing slashes, e.g. `/api`. The root path itself is rejected
    /// as the banner lives there.
    pub fn api_prefix(&self) -> Result<String> {
        let trimmed = self.api_root.trim().trim_matches('/');
        if trimmed.is_empty() || trimmed == "." {
            return Err(anyhow!(
                "configuration error: APIRoot must be a non-empty path, got '{}'",
                self.api_root
            ));
        }
        Ok(format!("/{trimmed}"))
    }

    /// Socket address to bind; a bare `:port` binds all interfaces
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let binding = self.binding.trim();
        let binding = match binding.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => binding.to_string(),
        };
        binding
            .parse()
            .with_context(|| format!("configuration error: invalid binding '{}'", self.binding))
    }
}
