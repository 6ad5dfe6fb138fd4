use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use common::JobKind;
use leetcode::LeetCodeClient;
use orbit_server::config::AppConfig;
use orbit_server::jobs::ScheduledJob;
use orbit_server::state::AppState;
use orbit_server::{build_router, database};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let db = database::init_db(&config.database)
        .await
        .context("Failed to connect to database")?;
    let provider = Arc::new(
        LeetCodeClient::new(&config.leetcode).context("Failed to build LeetCode client")?,
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState::new(config, db, provider);
    let jobs = start_scheduled_jobs(&state)?;

    let app = build_router(state.clone());
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Stopping background jobs");
    for job in &jobs {
        job.stop().await;
    }
    state.jobs.shutdown();

    Ok(())
}

fn start_scheduled_jobs(state: &AppState) -> anyhow::Result<Vec<ScheduledJob>> {
    let jobs_config = &state.config.jobs;
    let first_delay = jobs_config.anchor().delay_from(Utc::now());

    let mut jobs = Vec::new();
    for kind in JobKind::ALL {
        let schedule = jobs_config.schedule_for(kind);
        if !schedule.enabled {
            info!(%kind, "Scheduled job disabled");
            continue;
        }
        let job = ScheduledJob::new(kind, state.jobs.clone(), first_delay, schedule.interval());
        job.start()?;
        jobs.push(job);
    }
    Ok(jobs)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
