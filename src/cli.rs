use std::net::SocketAddr;

use clap::Parser;

#[derive(Debug, Parser, Clone)]
pub struct Cli {
    /// Adresse d'écoute des commandes.
    #[arg(long, default_value = "0.0.0.0:3001")]
    pub listen: SocketAddr,

    /// Journalise les écritures au lieu de piloter les GPIO.
    #[arg(long)]
    pub dry_run: bool,
}
