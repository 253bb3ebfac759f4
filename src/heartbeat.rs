use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tokio_util::sync::CancellationToken;

use crate::vehicle::{SharedVehicle, Vehicle};

// Nombre d'intervalles sans signal avant l'arrêt d'urgence
const MISSED_BEATS: u32 = 3;

/// Résultat d'un contrôle du heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pulse {
    /// Signal récent.
    Alive,
    /// Signal perdu, véhicule déjà à l'arrêt.
    Idle,
    /// Signal perdu, le véhicule vient d'être arrêté.
    Tripped,
    /// Le véhicule n'existe plus.
    Orphaned,
}

/// Homme mort : arrête le véhicule quand le client ne donne plus signe de vie.
///
/// Le client doit battre toutes les `interval`. Au-delà de trois intervalles
/// sans signal, le véhicule est arrêté. Le heartbeat ne garde qu'une
/// référence faible vers le véhicule.
pub struct Heartbeat {
    interval: Duration,
    last: watch::Sender<Option<Instant>>,
    vehicle: Weak<Mutex<Vehicle>>,
    armed: AtomicBool,
}

impl Heartbeat {
    pub fn new(vehicle: &SharedVehicle, interval: Duration) -> Arc<Self> {
        Arc::new(Heartbeat {
            interval,
            last: watch::Sender::new(None),
            vehicle: Arc::downgrade(vehicle),
            armed: AtomicBool::new(false),
        })
    }

    /// Dernier signal reçu, `None` si jamais.
    pub fn last_beat(&self) -> Option<Instant> {
        *self.last.borrow()
    }

    pub fn beat(&self) {
        self.last.send_replace(Some(Instant::now()));
    }

    fn threshold(&self) -> Duration {
        self.interval * MISSED_BEATS
    }

    fn is_stale(&self) -> bool {
        match self.last_beat() {
            Some(last) => last.elapsed() > self.threshold(),
            None => true,
        }
    }

    /// Un tick de surveillance.
    pub async fn check(&self) -> Pulse {
        if !self.is_stale() {
            return Pulse::Alive;
        }

        let Some(vehicle) = self.vehicle.upgrade() else {
            return Pulse::Orphaned;
        };
        let mut vehicle = vehicle.lock().await;

        if !vehicle.is_running() {
            return Pulse::Idle;
        }

        // Un signal a pu arriver pendant l'attente du verrou
        if !self.is_stale() {
            return Pulse::Alive;
        }

        tracing::warn!(
            "[HEARTBEAT] Aucun signal depuis plus de {:?}. Arrêt d'urgence {}.",
            self.threshold(),
            *vehicle
        );
        vehicle.shutdown();
        Pulse::Tripped
    }

    /// Lance la surveillance périodique. Une seule fois par processus.
    pub fn start(self: &Arc<Self>, token: CancellationToken) -> Option<JoinHandle<()>> {
        if self.armed.swap(true, Ordering::SeqCst) {
            tracing::warn!("[HEARTBEAT] Surveillance déjà active.");
            return None;
        }

        // Premier tick un intervalle après le démarrage
        let mut interval = interval_at(Instant::now() + self.interval, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = IntervalStream::new(interval);

        let heartbeat = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tracing::info!("[HEARTBEAT] Surveillance toutes les {:?} ...", heartbeat.interval);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    tick = ticks.next() => {
                        if tick.is_none() {
                            break;
                        }

                        if heartbeat.check().await == Pulse::Orphaned {
                            tracing::warn!("[HEARTBEAT] Véhicule disparu.");
                            break;
                        }
                    }
                }
            }

            tracing::info!("[HEARTBEAT] Fin de la surveillance.");
        });

        Some(handle)
    }
}
