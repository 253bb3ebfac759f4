use std::sync::Arc;

use super::Channel;
use crate::config::SteeringConfig;

pub struct Steering {
    channel: Arc<dyn Channel>,
    config: SteeringConfig,
    position: i32,
}

impl Steering {
    pub fn new(config: SteeringConfig, channel: Arc<dyn Channel>) -> Self {
        tracing::info!("[DIRECTION] Initialisation ...");

        Steering {
            channel,
            config,
            position: config.center,
        }
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn turn_left(&mut self) {
        self.position = (self.position - self.config.step).max(self.config.max_left);
        self.set_steer();
    }

    pub fn turn_right(&mut self) {
        self.position = (self.position + self.config.step).min(self.config.max_right);
        self.set_steer();
    }

    pub fn center(&mut self) {
        self.position = self.config.center;
        self.set_steer();
    }

    fn set_steer(&self) {
        tracing::debug!("[DIRECTION] Position: {}", self.position);
        self.channel.write(self.config.channel, self.position);
    }
}
