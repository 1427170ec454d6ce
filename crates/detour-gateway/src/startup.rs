use std::path::Path;

use axum::Router;
use detour_core::{Resolver, Source, SourceError};
use detour_storage::StoreBackend;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::error::{GatewayError, Result};

/// Reads a YAML or JSON source document from disk.
pub async fn read_document(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|source| GatewayError::ReadSource {
            path: path.to_path_buf(),
            source,
        })
}

/// Loads `source` into a resolver.
///
/// An empty store bucket is not fatal: the gateway starts with an empty
/// table and every request goes to the fallback. Any other failure aborts
/// startup.
pub async fn build_resolver(source: Source<StoreBackend>) -> Result<Resolver> {
    match source.load().await {
        Ok(table) => {
            info!(entries = table.len(), "redirect table loaded");
            Ok(Resolver::new(table))
        }
        Err(SourceError::EmptySource { bucket }) => {
            warn!(bucket = %bucket, "store bucket is empty, all requests will use the fallback");
            Ok(Resolver::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Serves `router` on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, router: Router) -> Result<()> {
    info!(listen_addr = %listener.local_addr()?, "starting gateway server");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
