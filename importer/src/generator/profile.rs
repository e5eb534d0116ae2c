use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fs;
use std::path::Path;

/// Configuration for generating synthetic Deshaker logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of data rows; frame indices run from 1 to `frames`.
    pub frames: u64,
    /// Peak hand-shake amplitude per frame, in pixels.
    pub jitter_px: f64,
    /// Peak hand-shake amplitude per frame, in degrees.
    pub jitter_deg: f64,
    /// Amplitude of the slow horizontal sway, in pixels per frame.
    pub sway_px: f64,
    /// Sway period in frames.
    pub sway_period: f64,
    /// Every n-th frame is written as `skipped`.
    pub skip_every: Option<u64>,
    /// Frames that start a new scene.
    pub scene_cuts: Vec<u64>,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            frames: 300,
            jitter_px: 2.0,
            jitter_deg: 0.1,
            sway_px: 1.5,
            sway_period: 120.0,
            skip_every: None,
            scene_cuts: Vec::new(),
            seed: 0,
        }
    }
}

fn jitter(rng: &mut StdRng, amplitude: f64) -> f64 {
    if amplitude > 0.0 {
        rng.gen_range(-amplitude..amplitude)
    } else {
        0.0
    }
}

/// Builds the log rows in Deshaker's `frame dx dy rotation zoom [new_scene]` layout.
pub fn build_log_lines(config: &GeneratorConfig) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let period = config.sway_period.max(1.0);

    (1..=config.frames)
        .map(|frame| {
            if config
                .skip_every
                .is_some_and(|every| every > 0 && frame % every == 0)
            {
                return format!("{} skipped", frame);
            }
            let sway = (frame as f64 / period * 2.0 * PI).sin() * config.sway_px;
            let dx = sway + jitter(&mut rng, config.jitter_px);
            let dy = jitter(&mut rng, config.jitter_px);
            let rotation = jitter(&mut rng, config.jitter_deg);
            let mut line = format!("{} {:.2} {:.2} {:.3} 1.00000", frame, dx, dy, rotation);
            if config.scene_cuts.contains(&frame) {
                line.push_str(" new_scene");
            }
            line
        })
        .collect()
}

pub fn write_log(path: &Path, config: &GeneratorConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    let mut contents = build_log_lines(config).join("\n");
    contents.push('\n');
    fs::write(path, contents).with_context(|| format!("writing log {}", path.display()))
}
