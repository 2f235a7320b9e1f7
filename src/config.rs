use serde::Deserialize;

pub const DEFAULT_BIND: &str = "127.0.0.1:9000";
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8080/";
pub const DEFAULT_API_PATH: &str = "services/gameservice/api";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Optional on-disk settings; every field falls back to a default.
#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default)]
struct FileConfig {
    bind: Option<String>,
    service_url: Option<String>,
    api_path: Option<String>,
    api_token: Option<String>,
    log_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub bind: String,
    pub service_url: String,
    pub api_path: String,
    pub api_token: Option<String>,
    pub log_filter: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            service_url: DEFAULT_SERVICE_URL.to_string(),
            api_path: DEFAULT_API_PATH.to_string(),
            api_token: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl GatewayConfig {
    /// File named by `GATEWAY_CONFIG` (or `gateway.json`), then env overrides.
    ///
    /// Returns the config plus the file problem, if any, so the caller can log it
    /// once logging is up.
    pub fn load() -> (Self, Option<ConfigError>) {
        let path = env_value("GATEWAY_CONFIG").unwrap_or_else(|| "gateway.json".to_string());
        let (file, problem) = match read_file_config(&path) {
            Ok(file) => (file.unwrap_or_default(), None),
            Err(e) => (FileConfig::default(), Some(e)),
        };
        let config = Self::from_sources(file, env_value);
        (config, problem)
    }

    fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind: env("GATEWAY_BIND").or(file.bind).unwrap_or(defaults.bind),
            service_url: env("GATEWAY_SERVICE_URL")
                .or(file.service_url)
                .unwrap_or(defaults.service_url),
            api_path: env("GATEWAY_API_PATH")
                .or(file.api_path)
                .unwrap_or(defaults.api_path),
            api_token: env("GATEWAY_API_TOKEN")
                .or(file.api_token)
                .filter(|v| !v.trim().is_empty()),
            log_filter: env("RUST_LOG")
                .or(file.log_filter)
                .unwrap_or(defaults.log_filter),
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_file_config(path: &str) -> Result<Option<FileConfig>, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_string(),
                source,
            })
        }
    };
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
}
