use crate::config::DampingConfig;
use crate::prelude::ConfigError;

/// Magnitude-dependent decay applied to the integrator's running pose.
///
/// Small drift is multiplied by a factor close to `ceiling`, drift at or
/// beyond the axis threshold by `floor`, so large offsets are pulled back
/// toward zero faster.
#[derive(Debug, Clone, Copy)]
pub struct DampingSmoother {
    config: DampingConfig,
}

impl DampingSmoother {
    pub fn new(config: DampingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DampingConfig {
        &self.config
    }

    fn factor(&self, value: f64, threshold: f64) -> f64 {
        let DampingConfig { floor, ceiling, .. } = self.config;
        let magnitude = value.abs();
        if magnitude > threshold {
            return floor;
        }
        (ceiling - (magnitude / threshold) * (ceiling - floor)).max(floor)
    }

    pub fn translation_factor(&self, value: f64) -> f64 {
        self.factor(value, self.config.translation_threshold)
    }

    pub fn rotation_factor(&self, value: f64) -> f64 {
        self.factor(value, self.config.rotation_threshold)
    }

    pub fn damp_translation(&self, value: f64) -> f64 {
        value * self.translation_factor(value)
    }

    pub fn damp_rotation(&self, value: f64) -> f64 {
        value * self.rotation_factor(value)
    }

    /// Damps an `[x, y, rotation]` state in place.
    pub fn apply(&self, state: &mut [f64; 3]) {
        state[0] = self.damp_translation(state[0]);
        state[1] = self.damp_translation(state[1]);
        state[2] = self.damp_rotation(state[2]);
    }
}
