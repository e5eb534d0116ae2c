//! Trajectory reconstruction and smoothing for Deshaker motion logs.
//!
//! Log lines are parsed into frame deltas, integrated into an absolute
//! camera pose and smoothed either by magnitude-dependent damping or by a
//! windowed-sinc FIR run over the stream with bounded lookahead.

pub mod config;
pub mod deshaker_log;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use config::{DampingConfig, FilterResponse, PipelineConfig, SincConfig, SmoothingStrategy};
pub use prelude::{DeltaRecord, PipelineError, PipelineResult, Pose, PoseStage};
pub use processing::PoseStream;
