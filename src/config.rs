use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_DB_PATH: &str = "data/vehicles.json";

/// Resolved server configuration: CLI flags win over the config file, which
/// wins over the defaults.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub db_path: PathBuf,
}

impl ServerConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            config,
            bind: cli_bind,
            db_path: cli_db_path,
        } = args;

        let file_config = if let Some(path) = config.as_ref() {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let bind_address = cli_bind.or(file_config.bind).unwrap_or_else(|| {
            DEFAULT_BIND.parse().expect("default bind address valid")
        });
        let db_path = cli_db_path
            .or(file_config.db_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        Ok(Self {
            bind_address,
            db_path,
        })
    }

    /// Fail fast before startup when the seed file is unusable.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.db_path.exists(),
            "vehicle file {:?} does not exist",
            self.db_path
        );
        anyhow::ensure!(
            self.db_path.is_file(),
            "vehicle file {:?} is not a file",
            self.db_path
        );
        Ok(())
    }
}

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "vehicle-registry", about = "Vehicle registry HTTP service", version)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML or JSON)"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "VEHICLE_REGISTRY_BIND",
        value_name = "ADDR",
        help = "Address the HTTP listener binds to"
    )]
    pub bind: Option<SocketAddr>,

    #[arg(
        long,
        env = "VEHICLE_REGISTRY_DB",
        value_name = "FILE",
        help = "JSON file seeding the collection and receiving writes"
    )]
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    bind: Option<SocketAddr>,
    db_path: Option<PathBuf>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}
