use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use rppal::gpio::{Gpio, OutputPin};

use super::Channel;

// Période servo standard (50 Hz)
const PERIOD: Duration = Duration::from_millis(20);

// Une unité = 10 µs de largeur d'impulsion
const PULSE_UNIT_US: u64 = 10;

/// Correspondance canal -> GPIO (BCM), numérotation ServoBlaster.
const PINS: [u8; 8] = [4, 17, 18, 27, 22, 23, 24, 25];

/// PWM logiciel sur les GPIO du Raspberry Pi.
pub struct Servo {
    gpio: Gpio,
    pins: Mutex<HashMap<u8, OutputPin>>,
}

impl Servo {
    pub fn new() -> anyhow::Result<Self> {
        tracing::info!("[SERVO] Initialisation ...");
        let gpio = Gpio::new()?;

        Ok(Servo {
            gpio,
            pins: Mutex::new(HashMap::new()),
        })
    }

    fn pulse_width(value: i32) -> Duration {
        let value = u64::try_from(value).unwrap_or(0);
        Duration::from_micros(value * PULSE_UNIT_US).min(PERIOD)
    }
}

impl Channel for Servo {
    fn write(&self, id: u8, value: i32) {
        let Some(&bcm) = PINS.get(usize::from(id)) else {
            tracing::warn!("[SERVO] Canal inconnu: {}", id);
            return;
        };

        let mut pins = match self.pins.lock() {
            Ok(pins) => pins,
            Err(poisoned) => poisoned.into_inner(),
        };

        // La broche reste ouverte, sinon le PWM s'arrête
        if !pins.contains_key(&id) {
            match self.gpio.get(bcm) {
                Ok(pin) => {
                    pins.insert(id, pin.into_output());
                }
                Err(e) => {
                    tracing::warn!("[SERVO] GPIO{} indisponible: {}", bcm, e);
                    return;
                }
            }
        }

        if let Some(pin) = pins.get_mut(&id) {
            tracing::debug!("[SERVO] Canal {} (GPIO{}) <- {}", id, bcm, value);
            if let Err(e) = pin.set_pwm(PERIOD, Self::pulse_width(value)) {
                tracing::warn!("[SERVO] Erreur d'écriture GPIO{}: {}", bcm, e);
            }
        }
    }
}
