use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use deshakecore::math::stats::StatsHelper;
use deshakecore::processing::{ensure_non_empty, PoseStream, SincKernel};
use deshakecore::telemetry::MetricsSnapshot;
use deshakecore::Pose;
use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub struct WorkflowResult {
    pub poses: Vec<Pose>,
    pub metrics: MetricsSnapshot,
    /// RMS of x, y and rotation over the emitted trajectory.
    pub rms: [f64; 3],
    /// Largest absolute x, y and rotation over the emitted trajectory.
    pub peak: [f64; 3],
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, log_path: &Path) -> anyhow::Result<WorkflowResult> {
        let file = File::open(log_path)
            .with_context(|| format!("opening Deshaker log {}", log_path.display()))?;
        self.execute_reader(BufReader::new(file))
            .with_context(|| format!("importing {}", log_path.display()))
    }

    pub fn execute_reader<R: BufRead>(&self, reader: R) -> anyhow::Result<WorkflowResult> {
        let pipeline_config = self.config.to_pipeline_config();
        let stream = PoseStream::from_reader(reader, &pipeline_config)
            .context("configuring smoothing pipeline")?;
        if let Some(kernel) = stream.kernel() {
            let [dc, cutoff, nyquist] = kernel_gains(kernel);
            info!(
                "kernel gain: dc {:.4}, at cutoff {:.4}, nyquist {:.4}",
                dc, cutoff, nyquist
            );
        }
        let (poses, metrics) = stream.collect_poses().context("running smoothing pipeline")?;

        if let Err(err) = ensure_non_empty(&poses) {
            if self.config.allow_empty {
                warn!("{}; producing no keyframes", err);
            } else {
                return Err(err).context("no keyframes to publish");
            }
        }

        let axis = |index: usize| poses.iter().map(|p| p.axes()[index]).collect::<Vec<_>>();
        let (xs, ys, rs) = (axis(0), axis(1), axis(2));
        let rms = [
            StatsHelper::rms(&xs),
            StatsHelper::rms(&ys),
            StatsHelper::rms(&rs),
        ];
        let peak = [
            StatsHelper::peak_abs(&xs),
            StatsHelper::peak_abs(&ys),
            StatsHelper::peak_abs(&rs),
        ];

        Ok(WorkflowResult {
            poses,
            metrics,
            rms,
            peak,
        })
    }

}

const RESPONSE_BINS: usize = 512;

/// Magnitude response at DC, at the cutoff and at Nyquist.
fn kernel_gains(kernel: &SincKernel) -> [f64; 3] {
    let response = kernel.frequency_response(RESPONSE_BINS);
    let size = (response.len() - 1) * 2;
    let cutoff_bin = ((kernel.cutoff() * size as f64).round() as usize).min(response.len() - 1);
    [response[0], response[cutoff_bin], response[response.len() - 1]]
}
