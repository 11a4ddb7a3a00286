//! Scheduler server entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging, open the database and serve HTTP.
//! - Exit non-zero with a readable message when startup fails.

use log::{error, info};
use scheduler_core::db::open_db;
use scheduler_core::{init_logging, init_stderr_logging};
use scheduler_server::{build_router, AppState, ServerConfig};
use std::error::Error;
use std::net::{Ipv4Addr, SocketAddr};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            eprintln!("scheduler: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;

    match config.log_dir.as_deref() {
        Some(dir) => init_logging(&config.log_level, dir)?,
        None => init_stderr_logging(&config.log_level)?,
    }

    let conn = open_db(&config.db_file)?;
    info!(
        "event=server_config module=server status=ok db_file={} web_dir={} auth={}",
        config.db_file.display(),
        config.web_dir.display(),
        config.password.is_some()
    );

    let router = build_router(AppState::new(conn, config.password), &config.web_dir);
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("event=server_start module=server status=ok addr={addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=shutdown_signal module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}
