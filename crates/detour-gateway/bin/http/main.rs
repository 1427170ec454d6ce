mod cli;

use std::sync::Arc;

use crate::cli::{SourceArg, CLI};
use clap::Parser;
use detour_core::Source;
use detour_gateway::handlers::default_fallback;
use detour_gateway::startup::{build_resolver, read_document, serve};
use detour_gateway::App;
use detour_storage::{RedisStore, SqliteStore, StoreBackend};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::try_parse()?;
    detour_telemetry::init(config.log_format)?;

    info!(
        listen_addr = %config.listen_addr,
        source = %config.source,
        bucket = %config.bucket,
        "starting detour"
    );

    let source = load_source(&config).await?;
    let resolver = build_resolver(source).await?;
    let router = App::router(Arc::new(resolver), default_fallback());

    let listener = TcpListener::bind(config.listen_addr).await?;
    serve(listener, router).await?;

    Ok(())
}

async fn load_source(
    config: &CLI,
) -> Result<Source<StoreBackend>, Box<dyn std::error::Error>> {
    let source = match config.source {
        SourceArg::Yaml | SourceArg::Json => {
            let path = config
                .source_path
                .as_deref()
                .ok_or("source path is required for yaml and json sources")?;
            let bytes = read_document(path).await?;
            if config.source == SourceArg::Yaml {
                Source::Document(bytes)
            } else {
                Source::FlatRecord(bytes)
            }
        }
        SourceArg::Sqlite => {
            let url = config
                .sqlite_url
                .as_deref()
                .ok_or("sqlite url is required when source is sqlite")?;
            let store = SqliteStore::connect(url).await?;
            store.create_schema().await?;
            Source::Store {
                store: store.into(),
                bucket: config.bucket.clone(),
            }
        }
        SourceArg::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or("redis url is required when source is redis")?;
            Source::Store {
                store: RedisStore::connect(url).await?.into(),
                bucket: config.bucket.clone(),
            }
        }
    };

    Ok(source)
}
