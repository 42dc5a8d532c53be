use anyhow::Context;
use serde::Deserialize;

/// Runtime configuration, split the way the server consumes it: the
/// listener owns `server`, each connection handler gets a copy of
/// `static_files`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listening socket binds to.
    pub listen_addr: String,
    /// Accept backlog for the listening socket.
    pub backlog: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory prefix joined to request paths by plain concatenation.
    pub root: String,
    /// Page served when a resolved path cannot be read.
    pub fallback: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            backlog: 5,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
            fallback: "./404.html".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the YAML file named by `STATICD_CONFIG`
    /// (default `staticd.yaml`). A missing file means defaults; an
    /// unparsable one is an error. The `LISTEN` env var, when set,
    /// overrides the listen address from either source.
    pub fn load() -> anyhow::Result<Self> {
        let path =
            std::env::var("STATICD_CONFIG").unwrap_or_else(|_| "staticd.yaml".to_string());

        let mut cfg = match std::fs::read_to_string(&path) {
            Ok(raw) => {
                Self::from_yaml(&raw).with_context(|| format!("invalid config file {path}"))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                return Err(
                    anyhow::Error::from(e).context(format!("failed to read config file {path}"))
                );
            }
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = listen_addr;
        }

        Ok(cfg)
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }
}
