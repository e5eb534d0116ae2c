use crate::math::matrix::MatrixHelper;
use crate::prelude::{DeltaRecord, PipelineResult, Pose};
use crate::processing::damping::DampingSmoother;
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::{MetricsRecorder, MetricsSnapshot};
use log::warn;

/// Accumulates per-frame deltas into an absolute pose.
///
/// Each delta is rotated by the rotation accumulated *before* it, then added.
/// Deshaker reports each delta one frame late, so a record for frame `n`
/// describes pose `n - 1`; records for frame 0 only prime the state.
pub struct TrajectoryIntegrator {
    state: [f64; 3],
    reset_on_new_scene: bool,
    damping: Option<DampingSmoother>,
    last_frame: Option<u64>,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl TrajectoryIntegrator {
    pub fn new(reset_on_new_scene: bool) -> Self {
        Self {
            state: [0.0; 3],
            reset_on_new_scene,
            damping: None,
            last_frame: None,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new("integrator"),
        }
    }

    /// Applies `damping` to the running pose after every integrated record.
    pub fn with_damping(mut self, damping: DampingSmoother) -> Self {
        self.damping = Some(damping);
        self
    }

    /// Running `[x, y, rotation_deg]`.
    pub fn state(&self) -> [f64; 3] {
        self.state
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub(crate) fn metrics_mut(&mut self) -> &mut MetricsRecorder {
        &mut self.metrics
    }

    /// Advances the running pose by one record and returns the pose it
    /// describes, if any.
    pub fn step(&mut self, record: &DeltaRecord) -> Option<Pose> {
        if record.is_skipped {
            self.metrics.record_skipped();
            self.logger
                .detail(&format!("frame {} skipped", record.frame_index));
            return None;
        }

        if let Some(last) = self.last_frame {
            if record.frame_index <= last {
                warn!(
                    "frame index {} does not advance past {}",
                    record.frame_index,
                    last
                );
            }
        }
        self.last_frame = Some(record.frame_index);

        if self.reset_on_new_scene && record.is_new_scene {
            self.metrics.record_scene_cut();
            self.logger
                .record(&format!("new scene at frame {}, pose reset", record.frame_index));
            self.state = [0.0; 3];
        } else {
            let [x, y, rotation] = &mut self.state;
            let (dx, dy) = MatrixHelper::rotate(rotation.to_radians(), record.dx, record.dy);
            *x += dx;
            *y += dy;
            *rotation += record.d_rotation_deg;
        }
        self.metrics.record_integrated();

        if let Some(damping) = &self.damping {
            damping.apply(&mut self.state);
        }

        if record.frame_index == 0 {
            self.metrics.record_suppressed();
            return None;
        }

        Some(Pose::from_axes(
            record.frame_index - 1,
            self.state,
            record.is_new_scene,
        ))
    }
}

/// Iterator adapter turning a record stream into the integrated pose stream.
pub struct Trajectory<I> {
    records: I,
    integrator: TrajectoryIntegrator,
}

impl<I> Trajectory<I>
where
    I: Iterator<Item = PipelineResult<DeltaRecord>>,
{
    pub fn new(records: I, integrator: TrajectoryIntegrator) -> Self {
        Self {
            records,
            integrator,
        }
    }

    pub fn integrator(&self) -> &TrajectoryIntegrator {
        &self.integrator
    }

    pub(crate) fn integrator_mut(&mut self) -> &mut TrajectoryIntegrator {
        &mut self.integrator
    }

    pub fn records(&self) -> &I {
        &self.records
    }
}

impl<I> Iterator for Trajectory<I>
where
    I: Iterator<Item = PipelineResult<DeltaRecord>>,
{
    type Item = PipelineResult<Pose>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.records.next()? {
                Ok(record) => {
                    if let Some(pose) = self.integrator.step(&record) {
                        return Some(Ok(pose));
                    }
                }
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
