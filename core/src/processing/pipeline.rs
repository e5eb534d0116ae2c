use crate::config::{PipelineConfig, SmoothingStrategy};
use crate::deshaker_log::reader::{LogRecords, RecordSource};
use crate::prelude::{ConfigError, PassThroughStage, PipelineError, PipelineResult, Pose, PoseStage};
use crate::processing::damping::DampingSmoother;
use crate::processing::integrator::{Trajectory, TrajectoryIntegrator};
use crate::processing::kernel::SincKernel;
use crate::processing::scheduler::StreamingConvolutionScheduler;
use crate::telemetry::metrics::MetricsSnapshot;
use log::info;
use std::collections::VecDeque;
use std::io::BufRead;
use std::rc::Rc;

/// Lazy pose stream: records -> integrator -> smoothing stage.
///
/// The first error ends the stream; everything the stage still buffers is
/// only flushed when the records run out cleanly.
pub struct PoseStream<I> {
    trajectory: Trajectory<I>,
    stage: Box<dyn PoseStage>,
    kernel: Option<Rc<SincKernel>>,
    ready: VecDeque<Pose>,
    finished: bool,
}

impl<R: BufRead> PoseStream<LogRecords<R>> {
    /// Builds the full pipeline over a Deshaker log.
    pub fn from_reader(reader: R, config: &PipelineConfig) -> Result<Self, ConfigError> {
        Self::new(LogRecords::new(reader), config)
    }
}

impl<I: RecordSource> PoseStream<I> {
    /// Validates `config` and wires the stages; no record is read yet.
    pub fn new(records: I, config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut integrator = TrajectoryIntegrator::new(config.reset_to_zero_on_new_scene);
        let mut kernel = None;
        let stage: Box<dyn PoseStage> = match config.smoothing {
            SmoothingStrategy::None => Box::new(PassThroughStage),
            SmoothingStrategy::Damping => {
                integrator = integrator.with_damping(DampingSmoother::new(config.damping)?);
                Box::new(PassThroughStage)
            }
            SmoothingStrategy::WindowedSinc => {
                let scheduler = StreamingConvolutionScheduler::new(
                    &config.sinc,
                    config.reset_to_zero_on_new_scene,
                )?;
                kernel = Some(scheduler.shared_kernel());
                Box::new(scheduler)
            }
        };

        Ok(Self {
            trajectory: Trajectory::new(records, integrator),
            stage,
            kernel,
            ready: VecDeque::new(),
            finished: false,
        })
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.trajectory.integrator().metrics()
    }

    /// Coefficients of the windowed-sinc stage, when that strategy is active.
    pub fn kernel(&self) -> Option<&SincKernel> {
        self.kernel.as_deref()
    }

    /// Drives the stream to completion.
    pub fn collect_poses(mut self) -> PipelineResult<(Vec<Pose>, MetricsSnapshot)> {
        let poses = self.by_ref().collect::<PipelineResult<Vec<_>>>()?;
        Ok((poses, self.metrics()))
    }
}

impl<I: RecordSource> Iterator for PoseStream<I> {
    type Item = PipelineResult<Pose>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pose) = self.ready.pop_front() {
                self.trajectory.integrator_mut().metrics_mut().record_emitted();
                return Some(Ok(pose));
            }
            if self.finished {
                return None;
            }
            let next = self.trajectory.next();
            let lines = self.trajectory.records().lines_read();
            self.trajectory
                .integrator_mut()
                .metrics_mut()
                .record_lines_read(lines);
            match next {
                Some(Ok(pose)) => self.stage.execute(pose, &mut self.ready),
                Some(Err(err)) => {
                    self.finished = true;
                    self.ready.clear();
                    self.stage.cleanup();
                    return Some(Err(err));
                }
                None => {
                    self.stage.finish(&mut self.ready);
                    self.finished = true;
                    let metrics = self.metrics();
                    info!(
                        "log exhausted after {} lines: {} records integrated, {} skipped, {} scene cuts",
                        metrics.lines_read,
                        metrics.records_integrated,
                        metrics.records_skipped,
                        metrics.scene_cuts
                    );
                }
            }
        }
    }
}

/// Reports an import that produced no keyframes at all.
pub fn ensure_non_empty(poses: &[Pose]) -> PipelineResult<()> {
    if poses.is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    Ok(())
}
