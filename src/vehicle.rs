use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::actuators::light::Light;
use crate::actuators::motor::Motor;
use crate::actuators::steering::Steering;
use crate::actuators::Channel;
use crate::config::Config;

/// Véhicule partagé entre la surface de commande et le heartbeat.
///
/// Toutes les mutations passent par ce verrou : actions, keep-alive et
/// contrôle du heartbeat ne s'exécutent jamais en parallèle.
pub type SharedVehicle = Arc<Mutex<Vehicle>>;

/// Seule autorité pour démarrer et arrêter le véhicule.
///
/// À chaque passage à l'arrêt, le moteur revient au neutre et la direction
/// au centre.
pub struct Vehicle {
    running: bool,
    motor: Motor,
    steering: Steering,
    light: Light,
}

impl Vehicle {
    pub fn new(config: &Config, channel: Arc<dyn Channel>) -> Self {
        tracing::info!("[VEHICULE] Initialisation ...");

        Vehicle {
            running: false,
            motor: Motor::new(config.motor, channel.clone()),
            steering: Steering::new(config.steering, channel.clone()),
            light: Light::new(config.light, channel),
        }
    }

    pub fn shared(self) -> SharedVehicle {
        Arc::new(Mutex::new(self))
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn startup(&mut self) {
        tracing::info!("[VEHICULE] Démarrage.");
        self.running = true;
        self.light.turn_on();
        self.steering.center();
        self.motor.stop();
    }

    pub fn shutdown(&mut self) {
        tracing::info!("[VEHICULE] Arrêt.");
        self.running = false;
        self.light.turn_off();
        self.steering.center();
        self.motor.stop();
    }

    // Accès directs : le contrôle de `is_running` revient à l'appelant.

    pub fn motor(&mut self) -> &mut Motor {
        &mut self.motor
    }

    pub fn steering(&mut self) -> &mut Steering {
        &mut self.steering
    }

    pub fn speed(&self) -> i32 {
        self.motor.speed()
    }

    pub fn wheel_position(&self) -> i32 {
        self.steering.position()
    }

    pub fn light_on(&self) -> bool {
        self.light.is_on()
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(Marche: {} Vitesse: {} Direction: {} Feux: {})",
            self.is_running(),
            self.speed(),
            self.wheel_position(),
            self.light_on()
        )
    }
}
