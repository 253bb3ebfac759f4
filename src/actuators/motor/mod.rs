use std::sync::Arc;

use super::Channel;
use crate::config::MotorConfig;

/// Variateur de vitesse (ESC) du moteur de propulsion.
///
/// Le variateur ne réagit pas autour du neutre : les valeurs dans
/// `]zero, min_forward[` et `]min_reverse, zero[` ne sont jamais conservées.
pub struct Motor {
    channel: Arc<dyn Channel>,
    config: MotorConfig,
    speed: i32,
}

impl Motor {
    pub fn new(config: MotorConfig, channel: Arc<dyn Channel>) -> Self {
        tracing::info!("[MOTEUR] Initialisation ...");

        Motor {
            channel,
            config,
            speed: config.zero,
        }
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn increase_speed(&mut self) {
        let c = self.config;
        self.speed += c.step;

        // Zone morte avant, ou sortie de marche arrière
        if self.speed > c.zero && self.speed < c.min_forward {
            self.speed = c.min_forward;
        } else if self.speed > c.min_reverse && self.speed < c.zero {
            self.speed = c.zero;
        }

        if self.speed > c.max_forward {
            self.speed = c.max_forward;
        }

        self.set_speed();
    }

    pub fn decrease_speed(&mut self) {
        let c = self.config;
        self.speed -= c.step;

        // Zone morte arrière, ou sortie de marche avant
        if self.speed < c.zero && self.speed > c.min_reverse {
            self.speed = c.min_reverse;
        } else if self.speed < c.min_forward && self.speed > c.zero {
            self.speed = c.zero;
        }

        if self.speed < c.max_reverse {
            self.speed = c.max_reverse;
        }

        self.set_speed();
    }

    pub fn stop(&mut self) {
        self.speed = self.config.zero;
        self.set_speed();
    }

    // Toujours une écriture, même si la valeur n'a pas changé
    fn set_speed(&self) {
        tracing::debug!("[MOTEUR] Vitesse: {}", self.speed);
        self.channel.write(self.config.channel, self.speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuators::testing::Recorder;
    use crate::config::Config;

    fn motor() -> (Motor, Arc<Recorder>, MotorConfig) {
        let config = Config::new().motor;
        let recorder = Recorder::new();
        (Motor::new(config, recorder.clone()), recorder, config)
    }

    fn assert_valid(speed: i32, c: &MotorConfig) {
        assert!(speed >= c.max_reverse && speed <= c.max_forward, "hors bornes: {}", speed);
        assert!(!(speed > c.zero && speed < c.min_forward), "zone morte avant: {}", speed);
        assert!(!(speed > c.min_reverse && speed < c.zero), "zone morte arrière: {}", speed);
    }

    #[test]
    fn starts_at_neutral_without_writing() {
        let (motor, recorder, c) = motor();
        assert_eq!(motor.speed(), c.zero);
        assert!(recorder.writes().is_empty());
    }

    #[test]
    fn first_step_forward_skips_dead_zone() {
        let (mut motor, recorder, _) = motor();
        motor.increase_speed();
        assert_eq!(motor.speed(), 138);
        assert_eq!(recorder.writes(), vec![(1, 138)]);
    }

    #[test]
    fn first_step_reverse_skips_dead_zone() {
        let (mut motor, _, _) = motor();
        motor.decrease_speed();
        assert_eq!(motor.speed(), 121);
    }

    #[test]
    fn leaving_forward_lands_on_neutral() {
        let (mut motor, _, _) = motor();
        motor.increase_speed();
        motor.decrease_speed();
        assert_eq!(motor.speed(), 130);
    }

    #[test]
    fn leaving_reverse_lands_on_neutral() {
        let (mut motor, _, _) = motor();
        motor.decrease_speed();
        motor.increase_speed();
        assert_eq!(motor.speed(), 130);
    }

    #[test]
    fn saturates_at_max_forward_and_still_writes() {
        let (mut motor, recorder, c) = motor();
        for _ in 0..200 {
            motor.increase_speed();
        }
        assert_eq!(motor.speed(), c.max_forward);

        recorder.clear();
        motor.increase_speed();
        assert_eq!(motor.speed(), 220);
        assert_eq!(recorder.writes(), vec![(1, 220)]);
    }

    #[test]
    fn saturates_at_max_reverse() {
        let (mut motor, _, c) = motor();
        for _ in 0..200 {
            motor.decrease_speed();
        }
        assert_eq!(motor.speed(), c.max_reverse);
        assert_eq!(motor.speed(), 80);
    }

    #[test]
    fn any_step_sequence_stays_valid() {
        let (mut motor, recorder, c) = motor();

        // Séquences déterministes variées : bits d'un compteur
        for pattern in 0u32..512 {
            for bit in 0..32 {
                if pattern.rotate_left(bit) & 1 == 1 {
                    motor.increase_speed();
                } else {
                    motor.decrease_speed();
                }
                assert_valid(motor.speed(), &c);
            }
        }

        for _ in 0..120 {
            motor.increase_speed();
            assert_valid(motor.speed(), &c);
        }
        for _ in 0..240 {
            motor.decrease_speed();
            assert_valid(motor.speed(), &c);
        }

        assert_eq!(recorder.writes().len(), 512 * 32 + 360);
    }

    #[test]
    fn stop_is_idempotent() {
        let (mut motor, recorder, _) = motor();
        for _ in 0..20 {
            motor.increase_speed();
        }
        motor.stop();
        motor.stop();
        assert_eq!(motor.speed(), 130);
        let writes = recorder.on(1);
        assert_eq!(&writes[writes.len() - 2..], &[130, 130]);
    }

    #[test]
    fn writes_follow_call_order() {
        let (mut motor, recorder, _) = motor();
        motor.increase_speed();
        motor.increase_speed();
        motor.stop();
        motor.decrease_speed();
        assert_eq!(recorder.on(1), vec![138, 139, 130, 121]);
    }
}
