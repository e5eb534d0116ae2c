use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One parsed line of a Deshaker log, already converted to the target axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaRecord {
    pub frame_index: u64,
    pub dx: f64,
    pub dy: f64,
    pub d_rotation_deg: f64,
    pub is_skipped: bool,
    pub is_new_scene: bool,
}

impl DeltaRecord {
    pub fn new(frame_index: u64, dx: f64, dy: f64, d_rotation_deg: f64) -> Self {
        Self {
            frame_index,
            dx,
            dy,
            d_rotation_deg,
            is_skipped: false,
            is_new_scene: false,
        }
    }

    pub fn skipped(frame_index: u64) -> Self {
        Self {
            is_skipped: true,
            ..Self::new(frame_index, 0.0, 0.0, 0.0)
        }
    }

    pub fn with_new_scene(mut self, is_new_scene: bool) -> Self {
        self.is_new_scene = is_new_scene;
        self
    }
}

/// Camera displacement at a frame, cumulative or filtered depending on the stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub frame_index: u64,
    pub x: f64,
    pub y: f64,
    pub rotation_deg: f64,
    pub is_new_scene: bool,
}

impl Pose {
    pub fn new(frame_index: u64, x: f64, y: f64, rotation_deg: f64) -> Self {
        Self {
            frame_index,
            x,
            y,
            rotation_deg,
            is_new_scene: false,
        }
    }

    /// Axis values in filter order: x, y, rotation.
    pub fn axes(&self) -> [f64; 3] {
        [self.x, self.y, self.rotation_deg]
    }

    pub fn from_axes(frame_index: u64, axes: [f64; 3], is_new_scene: bool) -> Self {
        Self {
            frame_index,
            x: axes[0],
            y: axes[1],
            rotation_deg: axes[2],
            is_new_scene,
        }
    }
}

/// A log line that could not be turned into a [`DeltaRecord`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line_number}: expected at least {expected} tokens, found {found}: {line:?}")]
    MissingTokens {
        line_number: usize,
        line: String,
        expected: usize,
        found: usize,
    },
    #[error("line {line_number}: invalid frame index {token:?}: {line:?}")]
    InvalidFrameIndex {
        line_number: usize,
        line: String,
        token: String,
    },
    #[error("line {line_number}: invalid {field} value {token:?}: {line:?}")]
    InvalidNumber {
        line_number: usize,
        line: String,
        field: &'static str,
        token: String,
    },
}

/// Filter or damping parameters rejected before any data is processed.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("normalized cutoff {0} must lie strictly between 0 and 0.5 of the frame rate")]
    CutoffOutOfRange(f64),
    #[error("frame rate must be positive and finite, got {0}")]
    InvalidFrameRate(f64),
    #[error("kernel half width must be at least 1, got {0}")]
    InvalidHalfWidth(usize),
    #[error("kernel order must be a positive even number, got {0}")]
    OddKernelOrder(usize),
    #[error("invalid damping parameters: {0}")]
    InvalidDamping(String),
    #[error("kernel taps sum to {0}, cannot normalize")]
    DegenerateKernel(f64),
}

/// Common error type for running the import pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("reading log: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse failure: {0}")]
    Parse(#[from] ParseError),
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("log contains no usable records")]
    EmptyInput,
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// A streaming stage sitting between the integrator and the host renderer.
///
/// Each call may emit zero or more poses into `output`; `finish` flushes
/// whatever the stage still holds once the input is exhausted.
pub trait PoseStage {
    fn execute(&mut self, pose: Pose, output: &mut VecDeque<Pose>);
    fn finish(&mut self, output: &mut VecDeque<Pose>);
    fn cleanup(&mut self);
}

/// Stage used when smoothing happens inside the integrator or not at all.
#[derive(Debug, Default)]
pub struct PassThroughStage;

impl PoseStage for PassThroughStage {
    fn execute(&mut self, pose: Pose, output: &mut VecDeque<Pose>) {
        output.push_back(pose);
    }

    fn finish(&mut self, _output: &mut VecDeque<Pose>) {}

    fn cleanup(&mut self) {}
}
