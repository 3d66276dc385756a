//! End-to-end wiring demo for the diaglog workspace.
//!
//! Run with: cargo run -p log-demo-example
//!
//! Set `DIAGLOG_ESCALATE_URL` to forward critical events to an HTTP sink.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use diaglog_core::{Fault, LogLevel, LogStore};
use diaglog_escalate::HttpEscalator;
use diaglog_persist::FilePersistence;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let persistence = Arc::new(FilePersistence::in_data_dir("diaglog-demo", "logs"));
    tracing::info!("persisting to {}", persistence.path().display());

    let escalate_url = std::env::var("DIAGLOG_ESCALATE_URL").ok();

    let mut builder = LogStore::builder().persistence(persistence);
    if let Some(endpoint) = &escalate_url {
        builder = builder.escalator(Arc::new(HttpEscalator::new(endpoint.clone())));
    }
    let store = builder.build().await;

    store.set_user_id("demo-user");
    store.info("demo started").await;
    store
        .record(
            LogLevel::Warn,
            "balance below threshold",
            Some(serde_json::json!({ "account": "checking", "balance": -3.50 })),
        )
        .await;

    let timed: Result<usize, String> = store
        .time_operation("refresh balances", async {
            tokio::time::sleep(Duration::from_millis(25)).await;
            Ok(4)
        })
        .await;
    tracing::info!("refreshed {} accounts", timed.unwrap_or(0));

    let fault = Fault::from_message("connection refused by sync endpoint");
    let user_message = store.record_fault(&fault).await;
    tracing::info!("user notice: {user_message}");

    if escalate_url.is_some() {
        // Give the detached escalation task a moment before exiting.
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    let stats = store.stats();
    tracing::info!(
        "session {} recorded {} entries",
        store.session_id(),
        stats.total
    );

    println!("{}", store.export_logs()?);
    Ok(())
}
