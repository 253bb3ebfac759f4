mod actuators;
mod cli;
mod commande;
mod config;
mod heartbeat;
mod vehicle;

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[cfg(unix)]
use tokio::signal::unix::SignalKind;
use tokio::signal::{self};

use crate::cli::Cli;
use crate::commande::Pilot;
use crate::config::Config;
use crate::heartbeat::Heartbeat;
use crate::vehicle::Vehicle;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let config = Config::new();
    let token = CancellationToken::new();

    // Actionneurs
    let channel = actuators::open(cli.dry_run)?;
    let vehicle = Vehicle::new(&config, channel).shared();

    // Homme mort
    let heartbeat = Heartbeat::new(&vehicle, config.heartbeat_interval);
    let watchdog = heartbeat.start(token.child_token());

    // Commandes
    let pilot = Arc::new(Pilot::new(vehicle.clone(), heartbeat.clone()));
    let listener = TcpListener::bind(cli.listen).await?;
    let server = tokio::spawn(commande::serve(pilot, listener, token.child_token()));

    #[cfg(unix)]
    {
        let mut interrupt = signal::unix::signal(SignalKind::interrupt())?;
        let mut terminate = signal::unix::signal(SignalKind::terminate())?;
        tokio::select! {
            _ = interrupt.recv() => {
                tracing::info!("Signal d'interruption reçu");
            },
            _ = terminate.recv() => {
                tracing::info!("Signal de terminaison reçu");
            },
            _ = signal::ctrl_c() => {
                tracing::info!("Signal de contrôle C reçu");
            },
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await?;
        tracing::info!("Signal de contrôle C reçu");
    }

    token.cancel();
    server.await?;
    if let Some(watchdog) = watchdog {
        watchdog.await?;
    }

    // Actionneurs au neutre avant de quitter
    vehicle.lock().await.shutdown();
    tracing::info!("Fin du pilotage.");

    Ok(())
}
