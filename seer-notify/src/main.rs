use std::env;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use seer_notify::{load_env_files, Notifier, NotifyArgs, NotifyOutcome};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    load_env_files(&env::current_dir().unwrap_or_default());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notify_deploy=info,seer_notify=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = NotifyArgs::parse();
    if args.commit.is_none() {
        args.commit = env::var("COMMIT_SHA").ok();
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Deploy notification failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: NotifyArgs) -> anyhow::Result<()> {
    let release = args.release(chrono::Utc::now());
    let delivery = args.delivery()?;
    let notifier = Notifier::new().context("Failed to build HTTP client")?;

    match notifier.notify(&release, &delivery).await? {
        NotifyOutcome::WebhookDelivered => {
            tracing::info!("Release {} announced via webhook", release.version)
        }
        NotifyOutcome::Registered(status) => tracing::info!(
            "Release {} ({:?}) deployed to {}",
            release.version,
            status,
            release.environment
        ),
    }
    Ok(())
}
