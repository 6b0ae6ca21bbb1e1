mod cli;

use crate::cli::{Command, GenerateArgs, LogFormatArg, ResetArgs, StoreBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use jiff::Timestamp;
use serde::Serialize;
use shardflake_core::{Clock, SystemClock};
use shardflake_generator::{
    parse, Decoded, FixedShard, GeneratorSettings, InMemorySequenceStore, RedisSequenceStore,
    SequenceStore, ShardFlake, ShardHint,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Commands that need a sequence store.
enum StoreCommand {
    Generate(GenerateArgs),
    Reset(ResetArgs),
}

#[derive(Serialize)]
struct ParseOutput {
    #[serde(flatten)]
    decoded: Decoded,
    timestamp: Option<Timestamp>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_format);

    let settings = GeneratorSettings::builder().epoch(config.epoch).build();

    let command = match config.command {
        Command::Parse { token } => {
            let decoded = parse(token.as_str())?;
            let output = ParseOutput {
                decoded,
                timestamp: decoded.timestamp(settings.epoch),
            };
            println!("{}", serde_json::to_string(&output)?);
            return Ok(());
        }
        Command::Generate(args) => StoreCommand::Generate(args),
        Command::Reset(args) => StoreCommand::Reset(args),
    };

    info!(
        store_backend = %config.store,
        key_prefix = %config.key_prefix,
        epoch = %config.epoch,
        "starting shardflake"
    );

    match config.store {
        StoreBackendArg::InMemory => run(InMemorySequenceStore::new(), settings, command).await,
        StoreBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .context("redis url is required when store backend is redis")?;
            let store = RedisSequenceStore::connect(&redis_url, config.key_prefix).await?;
            run(store, settings, command).await
        }
    }
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

async fn run<S: SequenceStore>(
    store: S,
    settings: GeneratorSettings,
    command: StoreCommand,
) -> anyhow::Result<()> {
    match command {
        StoreCommand::Generate(args) => match args.shard {
            Some(shard) => {
                let gen = ShardFlake::with_parts(store, FixedShard(shard), SystemClock, settings)?;
                generate(&gen, &args).await
            }
            None => generate(&ShardFlake::new(store, settings)?, &args).await,
        },
        StoreCommand::Reset(ResetArgs { ty, shard }) => {
            ShardFlake::new(store, settings)?.reset_seq(ty, shard).await?;
            info!(ty, shard, "sequence reset");
            Ok(())
        }
    }
}

async fn generate<S, H, C>(gen: &ShardFlake<S, H, C>, args: &GenerateArgs) -> anyhow::Result<()>
where
    S: SequenceStore,
    H: ShardHint,
    C: Clock,
{
    for generated in gen.generate_many(args.ty, args.count).await? {
        println!("{}", serde_json::to_string(&generated)?);
    }
    Ok(())
}
