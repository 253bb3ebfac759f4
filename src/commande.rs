use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_util::codec::{Framed, LinesCodec};
use tokio_util::sync::CancellationToken;

use crate::heartbeat::Heartbeat;
use crate::vehicle::SharedVehicle;

const MAX_LINE_LENGTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    IncreaseSpeed,
    DecreaseSpeed,
    Brake,
    TurnLeft,
    TurnRight,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Heartbeat,
    Action(Action),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("commande inconnue: {0}")]
pub struct UnknownCommand(String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let route = s.trim().trim_start_matches('/');

        let command = match route {
            "heartbeat" => Command::Heartbeat,
            "engine/increase-speed" => Command::Action(Action::IncreaseSpeed),
            "engine/decrease-speed" => Command::Action(Action::DecreaseSpeed),
            "engine/break" | "engine/brake" => Command::Action(Action::Brake),
            "wheels/turn-left" => Command::Action(Action::TurnLeft),
            "wheels/turn-right" => Command::Action(Action::TurnRight),
            "wheels/center" => Command::Action(Action::Center),
            _ => return Err(UnknownCommand(route.to_string())),
        };

        Ok(command)
    }
}

/// Action refusée, aucun état modifié.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    #[error("véhicule à l'arrêt, envoyer un heartbeat d'abord")]
    NotRunning,
}

/// Réponse renvoyée au client, une ligne par commande.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ok,
    NotReady,
    Unknown(String),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => write!(f, "200 OK"),
            Reply::NotReady => write!(f, "409 NOT READY"),
            Reply::Unknown(route) => write!(f, "404 UNKNOWN {}", route),
        }
    }
}

/// Surface de commande : keep-alive et actions filtrées sur l'état de marche.
pub struct Pilot {
    vehicle: SharedVehicle,
    heartbeat: Arc<Heartbeat>,
}

impl Pilot {
    pub fn new(vehicle: SharedVehicle, heartbeat: Arc<Heartbeat>) -> Self {
        Pilot { vehicle, heartbeat }
    }

    /// Signal de vie du client. Démarre le véhicule s'il est à l'arrêt.
    pub async fn keep_alive(&self) {
        self.heartbeat.beat();

        let mut vehicle = self.vehicle.lock().await;
        if !vehicle.is_running() {
            vehicle.startup();
        }
    }

    pub async fn act(&self, action: Action) -> Result<(), Rejected> {
        let mut vehicle = self.vehicle.lock().await;
        if !vehicle.is_running() {
            tracing::debug!("[COMMANDE] {:?} refusée, véhicule à l'arrêt.", action);
            return Err(Rejected::NotRunning);
        }

        match action {
            Action::IncreaseSpeed => vehicle.motor().increase_speed(),
            Action::DecreaseSpeed => vehicle.motor().decrease_speed(),
            Action::Brake => vehicle.motor().stop(),
            Action::TurnLeft => vehicle.steering().turn_left(),
            Action::TurnRight => vehicle.steering().turn_right(),
            Action::Center => vehicle.steering().center(),
        }

        Ok(())
    }

    pub async fn handle(&self, command: Command) -> Result<(), Rejected> {
        match command {
            Command::Heartbeat => {
                self.keep_alive().await;
                Ok(())
            }
            Command::Action(action) => self.act(action).await,
        }
    }

    pub async fn reply(&self, line: &str) -> Reply {
        match line.parse::<Command>() {
            Ok(command) => match self.handle(command).await {
                Ok(()) => Reply::Ok,
                Err(Rejected::NotRunning) => Reply::NotReady,
            },
            Err(UnknownCommand(route)) => Reply::Unknown(route),
        }
    }
}

/// Accepte les clients jusqu'à l'annulation du token.
pub async fn serve(pilot: Arc<Pilot>, listener: TcpListener, token: CancellationToken) {
    tracing::info!("[COMMANDE] En écoute sur {:?} ...", listener.local_addr().ok());

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            accepted = listener.accept() => {
                match accepted {
                    Ok((socket, addr)) => {
                        let pilot = pilot.clone();
                        let token = token.child_token();
                        tokio::spawn(async move {
                            if let Err(e) = session(pilot, socket, addr, token).await {
                                tracing::warn!("[COMMANDE][{}] ERREUR: {}", addr, e);
                            }
                        });
                    }
                    Err(e) => {
                        tracing::warn!("[COMMANDE] Connexion refusée: {}", e);
                    }
                }
            }
        }
    }

    tracing::info!("[COMMANDE] Fin de réception des commandes.");
}

/// Une commande par ligne, une réponse par ligne.
async fn session<S>(
    pilot: Arc<Pilot>,
    socket: S,
    addr: SocketAddr,
    token: CancellationToken,
) -> anyhow::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    tracing::info!("[COMMANDE][{}] Client connecté.", addr);
    let mut lines = Framed::new(socket, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));

    loop {
        let line = tokio::select! {
            _ = token.cancelled() => break,
            line = lines.next() => line,
        };

        let Some(line) = line else {
            break;
        };

        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let reply = pilot.reply(&line).await;
        lines.send(reply.to_string()).await?;
    }

    tracing::info!("[COMMANDE][{}] Client déconnecté.", addr);
    Ok(())
}
