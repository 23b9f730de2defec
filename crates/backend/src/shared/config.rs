use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::dashboards::d400_sales_performance::dataset::GeneratorSettings;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub branding: BrandingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory with the compiled frontend
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    pub seed: u64,
    pub rows: usize,
}

impl DatasetConfig {
    pub fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            seed: self.seed,
            rows: self.rows,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrandingConfig {
    pub logo_path: String,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 3000
static_dir = "dist"

[dataset]
seed = 42
rows = 1000

[branding]
logo_path = "logo.png"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.dataset.rows == 0 {
        anyhow::bail!("dataset.rows must be greater than zero");
    }
    Ok(config)
}

/// Resolve a configured path. Relative paths are taken relative to the
/// executable directory, falling back to the current directory.
pub fn resolve_path(path: &str) -> PathBuf {
    let candidate = Path::new(path);

    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved = exe_dir.join(candidate);
            if resolved.exists() {
                return resolved;
            }
        }
    }

    PathBuf::from(path)
}
