use super::Channel;

/// Sortie simulée : chaque écriture est seulement journalisée.
pub struct Journal;

impl Channel for Journal {
    fn write(&self, id: u8, value: i32) {
        tracing::info!("[SIMULATION] Canal {} <- {}", id, value);
    }
}
