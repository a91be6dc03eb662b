// src/main.rs
use anyhow::Result;
use messagely::client::Client;
use messagely::db::{init_db_pool, init_schema};
use messagely::{Config, MessageStore, UserDirectory};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    // The pool lives for the whole process and is closed on shutdown.
    let pool = init_db_pool(&config).await?;
    init_schema(&pool).await?;

    let directory = UserDirectory::new(pool.clone(), config.bcrypt_work_factor);
    let messages = MessageStore::new(pool.clone());

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "server listening");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, addr) = accepted?;
                tracing::info!(%addr, "new connection");

                let mut client = Client::new(directory.clone(), messages.clone());
                tokio::spawn(async move {
                    if let Err(e) = client.run(socket).await {
                        tracing::warn!(%addr, error = %e, "client handler failed");
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                break;
            }
        }
    }

    pool.close().await;
    tracing::info!("database pool closed");
    Ok(())
}
