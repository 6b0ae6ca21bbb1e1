use clap::{Args, Parser, Subcommand, ValueEnum};
use jiff::Timestamp;
use shardflake_sequence::redis::DEFAULT_KEY_PREFIX;
use std::fmt::{Display, Formatter};

pub const STORE_BACKEND_ENV: &str = "SHARDFLAKE_STORE_BACKEND";
pub const REDIS_URL_ENV: &str = "SHARDFLAKE_REDIS_URL";
pub const KEY_PREFIX_ENV: &str = "SHARDFLAKE_KEY_PREFIX";
pub const EPOCH_ENV: &str = "SHARDFLAKE_EPOCH";
pub const LOG_FORMAT_ENV: &str = "SHARDFLAKE_LOG_FORMAT";

pub const DEFAULT_EPOCH: &str = "1970-01-01T00:00:00Z";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StoreBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackendArg::InMemory => write!(f, "in-memory"),
            StoreBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "shardflake", about = "Generate and inspect sharded identifiers")]
pub struct CLI {
    #[arg(
        long,
        env = STORE_BACKEND_ENV,
        value_enum,
        default_value_t = StoreBackendArg::InMemory
    )]
    pub store: StoreBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("store", "redis"))]
    pub redis_url: Option<String>,

    #[arg(long, env = KEY_PREFIX_ENV, default_value = DEFAULT_KEY_PREFIX)]
    pub key_prefix: String,

    /// Zero point of the seconds field, as an RFC 3339 timestamp.
    #[arg(long, env = EPOCH_ENV, default_value = DEFAULT_EPOCH)]
    pub epoch: Timestamp,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate identifiers for a type.
    Generate(GenerateArgs),
    /// Decode an identifier token into its fields.
    Parse {
        token: String,
    },
    /// Delete the sequence counter of a (type, shard) pair.
    Reset(ResetArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[arg(long = "type")]
    pub ty: u32,

    #[arg(long, default_value_t = 1)]
    pub count: usize,

    /// Pin the shard instead of picking one at random.
    #[arg(long)]
    pub shard: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ResetArgs {
    #[arg(long = "type")]
    pub ty: u32,

    #[arg(long)]
    pub shard: u32,
}
