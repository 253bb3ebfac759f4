use std::sync::Arc;

use super::Channel;
use crate::config::LightConfig;

/// Témoin lumineux de marche.
pub struct Light {
    channel: Arc<dyn Channel>,
    config: LightConfig,
    on: bool,
}

impl Light {
    pub fn new(config: LightConfig, channel: Arc<dyn Channel>) -> Self {
        Light {
            channel,
            config,
            on: false,
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn turn_on(&mut self) {
        self.on = true;
        self.set_light();
    }

    pub fn turn_off(&mut self) {
        self.on = false;
        self.set_light();
    }

    fn set_light(&self) {
        let value = if self.on { self.config.on } else { self.config.off };
        tracing::debug!("[FEUX] {}", if self.on { "Allumés" } else { "Éteints" });
        self.channel.write(self.config.channel, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuators::testing::Recorder;
    use crate::config::Config;

    #[test]
    fn maps_state_to_channel_values() {
        let recorder = Recorder::new();
        let mut light = Light::new(Config::new().light, recorder.clone());
        assert!(!light.is_on());

        light.turn_on();
        assert!(light.is_on());
        light.turn_off();
        light.turn_off();
        assert!(!light.is_on());

        assert_eq!(recorder.writes(), vec![(6, 250), (6, 0), (6, 0)]);
    }
}
