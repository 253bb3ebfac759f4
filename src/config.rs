use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub struct MotorConfig {
    pub(crate) channel: u8,
    pub(crate) zero: i32,
    pub(crate) step: i32,
    pub(crate) min_forward: i32,
    pub(crate) max_forward: i32,
    pub(crate) min_reverse: i32,
    pub(crate) max_reverse: i32,
}

#[derive(Clone, Copy, Debug)]
pub struct SteeringConfig {
    pub(crate) channel: u8,
    pub(crate) center: i32,
    pub(crate) step: i32,
    pub(crate) max_left: i32,
    pub(crate) max_right: i32,
}

#[derive(Clone, Copy, Debug)]
pub struct LightConfig {
    pub(crate) channel: u8,
    pub(crate) on: i32,
    pub(crate) off: i32,
}

/// Calibration du véhicule. Valeurs en unités ServoBlaster (pas de 10 µs).
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) motor: MotorConfig,
    pub(crate) steering: SteeringConfig,
    pub(crate) light: LightConfig,
    pub(crate) heartbeat_interval: Duration,
}

const SPEED_ZERO: i32 = 130;

impl Config {
    pub fn new() -> Self {
        let config = Config {
            // Canal 1 = GPIO17
            motor: MotorConfig {
                channel: 1,
                zero: SPEED_ZERO,
                step: 1,
                min_forward: SPEED_ZERO + 8,
                max_forward: SPEED_ZERO + 90,
                min_reverse: SPEED_ZERO - 9,
                max_reverse: SPEED_ZERO - 50,
            },

            // Canal 2 = GPIO18
            steering: SteeringConfig {
                channel: 2,
                center: 155,
                step: 5,
                max_left: 120,
                max_right: 190,
            },

            // Canal 6 = GPIO24
            light: LightConfig {
                channel: 6,
                on: 250,
                off: 0,
            },

            heartbeat_interval: Duration::from_millis(150),
        };

        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
