#[cfg(feature = "real-actuators")]
pub mod servo;

pub mod journal;
pub mod light;
pub mod motor;
pub mod steering;

use std::sync::Arc;

/// Sortie matérielle adressée par un numéro de canal.
///
/// Une écriture = une valeur envoyée, sans attendre d'acquittement.
/// Les erreurs matérielles sont journalisées par l'implémentation, jamais
/// remontées aux contrôleurs.
pub trait Channel: Send + Sync {
    fn write(&self, id: u8, value: i32);
}

/// Ouvre la sortie matérielle (ou le journal en mode `dry_run`).
pub fn open(dry_run: bool) -> anyhow::Result<Arc<dyn Channel>> {
    if dry_run {
        tracing::info!("[ACTIONNEURS] Mode simulation, aucune sortie GPIO.");
        return Ok(Arc::new(journal::Journal));
    }

    hardware()
}

#[cfg(feature = "real-actuators")]
fn hardware() -> anyhow::Result<Arc<dyn Channel>> {
    Ok(Arc::new(servo::Servo::new()?))
}

#[cfg(not(feature = "real-actuators"))]
fn hardware() -> anyhow::Result<Arc<dyn Channel>> {
    Err(anyhow::anyhow!(
        "compilé sans la feature 'real-actuators', utilisez --dry-run"
    ))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::Channel;

    /// Enregistre les écritures dans l'ordre reçu.
    #[derive(Default)]
    pub(crate) struct Recorder {
        writes: Mutex<Vec<(u8, i32)>>,
    }

    impl Recorder {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub(crate) fn writes(&self) -> Vec<(u8, i32)> {
            self.writes.lock().unwrap().clone()
        }

        pub(crate) fn on(&self, id: u8) -> Vec<i32> {
            self.writes()
                .into_iter()
                .filter(|(channel, _)| *channel == id)
                .map(|(_, value)| value)
                .collect()
        }

        pub(crate) fn clear(&self) {
            self.writes.lock().unwrap().clear();
        }
    }

    impl Channel for Recorder {
        fn write(&self, id: u8, value: i32) {
            self.writes.lock().unwrap().push((id, value));
        }
    }
}
