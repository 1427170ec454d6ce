use clap::{Parser, ValueEnum};
use detour_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "DETOUR_LISTEN_ADDR";
pub const SOURCE_ENV: &str = "DETOUR_SOURCE";
pub const SOURCE_PATH_ENV: &str = "DETOUR_SOURCE_PATH";
pub const SQLITE_URL_ENV: &str = "DETOUR_SQLITE_URL";
pub const REDIS_URL_ENV: &str = "DETOUR_REDIS_URL";
pub const BUCKET_ENV: &str = "DETOUR_BUCKET";
pub const LOG_FORMAT_ENV: &str = "DETOUR_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_BUCKET: &str = "redirects";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    #[value(name = "yaml")]
    Yaml,
    #[value(name = "json")]
    Json,
    #[value(name = "sqlite")]
    Sqlite,
    #[value(name = "redis")]
    Redis,
}

impl Display for SourceArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceArg::Yaml => write!(f, "yaml"),
            SourceArg::Json => write!(f, "json"),
            SourceArg::Sqlite => write!(f, "sqlite"),
            SourceArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "detour", about = "Redirects mapped paths, forwards the rest")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(long, env = SOURCE_ENV, value_enum, default_value_t = SourceArg::Yaml)]
    pub source: SourceArg,

    /// Redirect document for the `yaml` and `json` sources.
    #[arg(
        long,
        env = SOURCE_PATH_ENV,
        required_if_eq_any([("source", "yaml"), ("source", "json")])
    )]
    pub source_path: Option<PathBuf>,

    #[arg(long, env = SQLITE_URL_ENV, required_if_eq("source", "sqlite"))]
    pub sqlite_url: Option<String>,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("source", "redis"))]
    pub redis_url: Option<String>,

    /// Store bucket holding the redirects.
    #[arg(long, env = BUCKET_ENV, default_value = DEFAULT_BUCKET)]
    pub bucket: String,

    #[arg(long, env = LOG_FORMAT_ENV, default_value = "text")]
    pub log_format: LogFormat,
}
