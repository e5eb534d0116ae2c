//! Tunable parameters for the import pipeline.

use crate::prelude::ConfigError;
use serde::{Deserialize, Serialize};

/// Which smoothing strategy runs after trajectory integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingStrategy {
    /// Pure integration, no smoothing.
    None,
    /// Magnitude-dependent decay applied to the running pose.
    Damping,
    /// Non-causal windowed-sinc FIR with streaming lookahead.
    #[default]
    WindowedSinc,
}

/// Whether the windowed-sinc kernel is spectrally inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterResponse {
    /// Keeps the shake, removes the intended camera path.
    #[default]
    HighPass,
    /// Keeps the smoothed camera path.
    LowPass,
}

/// Parameters of the damping smoother.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DampingConfig {
    /// Accumulated translation (pixels) at which the floor factor is reached.
    pub translation_threshold: f64,
    /// Accumulated rotation (degrees) at which the floor factor is reached.
    pub rotation_threshold: f64,
    pub floor: f64,
    pub ceiling: f64,
}

impl Default for DampingConfig {
    fn default() -> Self {
        Self {
            translation_threshold: 400.0,
            rotation_threshold: 15.0,
            floor: 0.35,
            ceiling: 0.95,
        }
    }
}

impl DampingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.translation_threshold > 0.0 && self.translation_threshold.is_finite()) {
            return Err(ConfigError::InvalidDamping(format!(
                "translation threshold {} must be positive",
                self.translation_threshold
            )));
        }
        if !(self.rotation_threshold > 0.0 && self.rotation_threshold.is_finite()) {
            return Err(ConfigError::InvalidDamping(format!(
                "rotation threshold {} must be positive",
                self.rotation_threshold
            )));
        }
        if !(self.floor > 0.0 && self.floor <= self.ceiling && self.ceiling < 1.0) {
            return Err(ConfigError::InvalidDamping(format!(
                "expected 0 < floor ({}) <= ceiling ({}) < 1",
                self.floor, self.ceiling
            )));
        }
        Ok(())
    }
}

/// Parameters of the windowed-sinc strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SincConfig {
    pub cutoff_frequency_hz: f64,
    pub frame_rate: f64,
    /// Kernel length is `2 * kernel_half_width + 1` taps.
    pub kernel_half_width: usize,
    pub response: FilterResponse,
}

impl Default for SincConfig {
    fn default() -> Self {
        Self {
            cutoff_frequency_hz: 1.0,
            frame_rate: 30.0,
            kernel_half_width: 32,
            response: FilterResponse::HighPass,
        }
    }
}

impl SincConfig {
    /// Cutoff as a fraction of the sampling (frame) rate.
    pub fn normalized_cutoff(&self) -> f64 {
        self.cutoff_frequency_hz / self.frame_rate
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frame_rate > 0.0 && self.frame_rate.is_finite()) {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        if self.kernel_half_width == 0 {
            return Err(ConfigError::InvalidHalfWidth(self.kernel_half_width));
        }
        let cutoff = self.normalized_cutoff();
        if !(cutoff > 0.0 && cutoff < 0.5) {
            return Err(ConfigError::CutoffOutOfRange(cutoff));
        }
        Ok(())
    }
}

/// Full pipeline configuration handed to each component at construction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub reset_to_zero_on_new_scene: bool,
    pub smoothing: SmoothingStrategy,
    pub damping: DampingConfig,
    pub sinc: SincConfig,
}

impl PipelineConfig {
    /// Validates only the parameters of the selected strategy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.smoothing {
            SmoothingStrategy::None => Ok(()),
            SmoothingStrategy::Damping => self.damping.validate(),
            SmoothingStrategy::WindowedSinc => self.sinc.validate(),
        }
    }
}
