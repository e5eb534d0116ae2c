use crate::config::SincConfig;
use crate::prelude::{ConfigError, Pose, PoseStage};
use crate::processing::kernel::SincKernel;
use crate::processing::sinc_filter::WindowedSincFilter;
use crate::telemetry::log::LogManager;
use std::collections::VecDeque;
use std::rc::Rc;

/// Lifecycle of the lookahead buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No pose seen yet.
    Idle,
    /// Loading future samples; nothing is emitted.
    Filling,
    /// One output per input, lagging by `max_prefetch` frames.
    Steady,
    /// Flushing pending frames against the last known sample.
    Draining,
    /// Input exhausted and every pending frame emitted.
    Done,
}

#[derive(Debug, Clone, Copy)]
struct PendingFrame {
    frame_index: u64,
    is_new_scene: bool,
}

/// Drives three [`WindowedSincFilter`]s (x, y, rotation) over a one-pass
/// pose stream, buffering `half_width` frames of lookahead.
pub struct StreamingConvolutionScheduler {
    filters: [WindowedSincFilter; 3],
    max_prefetch: usize,
    pending: VecDeque<PendingFrame>,
    state: SchedulerState,
    last_sample: [f64; 3],
    reset_on_new_scene: bool,
    logger: LogManager,
}

impl StreamingConvolutionScheduler {
    pub fn new(config: &SincConfig, reset_on_new_scene: bool) -> Result<Self, ConfigError> {
        config.validate()?;
        let kernel = Rc::new(SincKernel::new(
            config.kernel_half_width,
            config.normalized_cutoff(),
            config.response,
        )?);
        let logger = LogManager::new("sinc");
        logger.record(&format!(
            "kernel {} taps, cutoff {:.4} of frame rate, {:?}",
            kernel.len(),
            kernel.cutoff(),
            kernel.response()
        ));
        Ok(Self::with_kernel(kernel, reset_on_new_scene, logger))
    }

    fn with_kernel(kernel: Rc<SincKernel>, reset_on_new_scene: bool, logger: LogManager) -> Self {
        let max_prefetch = kernel.half_width();
        Self {
            filters: std::array::from_fn(|_| WindowedSincFilter::new(kernel.clone())),
            max_prefetch,
            pending: VecDeque::with_capacity(max_prefetch + 1),
            state: SchedulerState::Idle,
            last_sample: [0.0; 3],
            reset_on_new_scene,
            logger,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Frames loaded but not yet emitted.
    pub fn prefetch(&self) -> usize {
        self.pending.len()
    }

    pub fn max_prefetch(&self) -> usize {
        self.max_prefetch
    }

    pub fn kernel(&self) -> &SincKernel {
        self.filters[0].kernel()
    }

    pub fn shared_kernel(&self) -> Rc<SincKernel> {
        self.filters[0].shared_kernel()
    }

    fn seed(&mut self, sample: [f64; 3]) {
        for (filter, value) in self.filters.iter_mut().zip(sample) {
            filter.preload(value);
        }
        self.state = SchedulerState::Filling;
    }

    fn load(&mut self, sample: [f64; 3]) {
        for (filter, value) in self.filters.iter_mut().zip(sample) {
            filter.preload_more(value);
        }
    }

    fn evaluate(&mut self, sample: [f64; 3]) -> [f64; 3] {
        let [x, y, rotation] = &mut self.filters;
        [
            x.evaluate(sample[0]),
            y.evaluate(sample[1]),
            rotation.evaluate(sample[2]),
        ]
    }

    /// Emits every pending frame, standing in the last sample for the future.
    ///
    /// When the lookahead never filled up, the window is first topped up so
    /// that each output stays centred on its own frame.
    fn drain(&mut self, output: &mut VecDeque<Pose>) {
        self.state = SchedulerState::Draining;
        let sample = self.last_sample;
        for _ in self.pending.len()..self.max_prefetch {
            self.load(sample);
        }
        let flushed = self.pending.len();
        while let Some(frame) = self.pending.pop_front() {
            let values = self.evaluate(sample);
            output.push_back(Pose::from_axes(frame.frame_index, values, frame.is_new_scene));
        }
        self.logger.detail(&format!("drained {} pending frames", flushed));
    }
}

impl PoseStage for StreamingConvolutionScheduler {
    fn execute(&mut self, pose: Pose, output: &mut VecDeque<Pose>) {
        let sample = pose.axes();
        match self.state {
            SchedulerState::Idle | SchedulerState::Done => self.seed(sample),
            _ if self.reset_on_new_scene && pose.is_new_scene => {
                self.logger.record(&format!(
                    "scene reset at frame {}, flushing {} pending frames",
                    pose.frame_index,
                    self.pending.len()
                ));
                self.drain(output);
                self.seed(sample);
            }
            _ => {}
        }

        self.pending.push_back(PendingFrame {
            frame_index: pose.frame_index,
            is_new_scene: pose.is_new_scene,
        });

        if self.state == SchedulerState::Filling && self.pending.len() <= self.max_prefetch {
            self.load(sample);
        } else {
            self.state = SchedulerState::Steady;
            let values = self.evaluate(sample);
            if let Some(frame) = self.pending.pop_front() {
                output.push_back(Pose::from_axes(frame.frame_index, values, frame.is_new_scene));
            }
        }
        self.last_sample = sample;
    }

    fn finish(&mut self, output: &mut VecDeque<Pose>) {
        if matches!(self.state, SchedulerState::Filling | SchedulerState::Steady) {
            self.drain(output);
        }
        self.state = SchedulerState::Done;
    }

    fn cleanup(&mut self) {
        self.filters.iter_mut().for_each(WindowedSincFilter::reset);
        self.pending.clear();
        self.last_sample = [0.0; 3];
        self.state = SchedulerState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterResponse;

    fn config(half_width: usize, response: FilterResponse) -> SincConfig {
        SincConfig {
            cutoff_frequency_hz: 3.0,
            frame_rate: 30.0,
            kernel_half_width: half_width,
            response,
        }
    }

    fn run(scheduler: &mut StreamingConvolutionScheduler, poses: &[Pose]) -> Vec<Pose> {
        let mut output = VecDeque::new();
        for pose in poses {
            scheduler.execute(*pose, &mut output);
        }
        scheduler.finish(&mut output);
        output.into_iter().collect()
    }

    fn ramp(count: u64, value: impl Fn(u64) -> f64) -> Vec<Pose> {
        (0..count)
            .map(|frame| {
                let v = value(frame);
                Pose::new(frame, v, -v, v / 10.0)
            })
            .collect()
    }

    #[test]
    fn filling_emits_nothing_until_prefetch_reaches_max() {
        let mut scheduler =
            StreamingConvolutionScheduler::new(&config(4, FilterResponse::HighPass), false)
                .unwrap();
        let mut output = VecDeque::new();
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        for frame in 0..4 {
            scheduler.execute(Pose::new(frame, 1.0, 1.0, 0.0), &mut output);
            assert_eq!(scheduler.state(), SchedulerState::Filling);
            assert_eq!(scheduler.prefetch(), frame as usize + 1);
        }
        assert!(output.is_empty());
        assert_eq!(scheduler.prefetch(), scheduler.max_prefetch());

        scheduler.execute(Pose::new(4, 1.0, 1.0, 0.0), &mut output);
        assert_eq!(scheduler.state(), SchedulerState::Steady);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].frame_index, 0);
        assert_eq!(scheduler.prefetch(), 4);
    }

    #[test]
    fn drain_counts_down_pending_frames() {
        let mut scheduler =
            StreamingConvolutionScheduler::new(&config(3, FilterResponse::HighPass), false)
                .unwrap();
        let mut output = VecDeque::new();
        for pose in ramp(10, |f| f as f64) {
            scheduler.execute(pose, &mut output);
        }
        assert_eq!(output.len(), 7);
        assert_eq!(output.back().map(|p| p.frame_index), Some(6));

        scheduler.finish(&mut output);
        assert_eq!(scheduler.state(), SchedulerState::Done);
        assert_eq!(scheduler.prefetch(), 0);
        let frames: Vec<u64> = output.iter().map(|p| p.frame_index).collect();
        assert_eq!(frames, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn stream_shorter_than_lookahead_emits_every_frame() {
        let mut scheduler =
            StreamingConvolutionScheduler::new(&config(8, FilterResponse::LowPass), false)
                .unwrap();
        let output = run(&mut scheduler, &ramp(3, |_| 2.0));
        let frames: Vec<u64> = output.iter().map(|p| p.frame_index).collect();
        assert_eq!(frames, vec![0, 1, 2]);
        assert!(output.iter().all(|p| (p.x - 2.0).abs() < 1e-9));
    }

    #[test]
    fn constant_trajectory_has_no_high_pass_residue() {
        let mut scheduler =
            StreamingConvolutionScheduler::new(&config(5, FilterResponse::HighPass), false)
                .unwrap();
        let output = run(&mut scheduler, &ramp(30, |_| 42.0));
        assert_eq!(output.len(), 30);
        for pose in output {
            assert!(pose.x.abs() < 1e-9);
            assert!(pose.y.abs() < 1e-9);
            assert!(pose.rotation_deg.abs() < 1e-9);
        }
    }

    #[test]
    fn step_response_settles_after_half_width() {
        let half_width = 6;
        let step_at = 20;
        let count = 60;
        let step = |f: u64| if f < step_at { 0.0 } else { 5.0 };

        let mut low_pass =
            StreamingConvolutionScheduler::new(&config(half_width, FilterResponse::LowPass), false)
                .unwrap();
        let smoothed = run(&mut low_pass, &ramp(count, step));
        assert_eq!(smoothed.len(), count as usize);

        let mut high_pass = StreamingConvolutionScheduler::new(
            &config(half_width, FilterResponse::HighPass),
            false,
        )
        .unwrap();
        let residue = run(&mut high_pass, &ramp(count, step));
        assert_eq!(residue.len(), count as usize);

        for (i, (lp, hp)) in smoothed.iter().zip(&residue).enumerate() {
            assert_eq!(lp.frame_index, i as u64);
            let distance = (i as i64 - step_at as i64).abs() as usize;
            if distance > half_width {
                let expected = step(i as u64);
                assert!((lp.x - expected).abs() < 1e-9, "frame {} -> {}", i, lp.x);
                assert!(hp.x.abs() < 1e-9, "frame {} -> {}", i, hp.x);
            }
        }
    }

    #[test]
    fn outputs_are_centred_on_their_frame() {
        // an impulse at frame 10 must peak at output frame 10
        let mut scheduler =
            StreamingConvolutionScheduler::new(&config(4, FilterResponse::HighPass), false)
                .unwrap();
        let output = run(&mut scheduler, &ramp(25, |f| if f == 10 { 1.0 } else { 0.0 }));
        let peak = output
            .iter()
            .max_by(|a, b| a.x.total_cmp(&b.x))
            .map(|p| p.frame_index);
        assert_eq!(peak, Some(10));
    }

    #[test]
    fn scene_reset_flushes_pending_frames_against_previous_scene() {
        let mut scheduler =
            StreamingConvolutionScheduler::new(&config(3, FilterResponse::HighPass), true)
                .unwrap();
        let mut poses = ramp(8, |_| 7.0);
        let mut cut = Pose::new(8, 0.0, 0.0, 0.0);
        cut.is_new_scene = true;
        poses.push(cut);
        poses.extend((9..14).map(|f| Pose::new(f, 0.0, 0.0, 0.0)));

        let mut output = VecDeque::new();
        for pose in &poses[..8] {
            scheduler.execute(*pose, &mut output);
        }
        assert_eq!(output.len(), 5);
        scheduler.execute(poses[8], &mut output);
        assert_eq!(output.len(), 8);
        assert_eq!(scheduler.state(), SchedulerState::Filling);
        assert_eq!(scheduler.prefetch(), 1);
        for pose in &poses[9..] {
            scheduler.execute(*pose, &mut output);
        }
        scheduler.finish(&mut output);

        let frames: Vec<u64> = output.iter().map(|p| p.frame_index).collect();
        assert_eq!(frames, (0..14).collect::<Vec<_>>());
        // both scenes are constant, so neither leaks into the other
        assert!(output.iter().all(|p| p.x.abs() < 1e-9));
        assert!(output[8].is_new_scene);
        assert_eq!(output.iter().filter(|p| p.is_new_scene).count(), 1);
    }

    #[test]
    fn new_scene_is_ignored_without_reset() {
        let mut scheduler =
            StreamingConvolutionScheduler::new(&config(3, FilterResponse::HighPass), false)
                .unwrap();
        let mut poses = ramp(12, |_| 1.0);
        poses[6].is_new_scene = true;
        let mut output = VecDeque::new();
        for pose in &poses[..7] {
            scheduler.execute(*pose, &mut output);
        }
        assert_eq!(scheduler.state(), SchedulerState::Steady);
        assert_eq!(output.len(), 4);
    }

    #[test]
    fn cleanup_returns_to_idle() {
        let mut scheduler =
            StreamingConvolutionScheduler::new(&config(2, FilterResponse::HighPass), false)
                .unwrap();
        let mut output = VecDeque::new();
        scheduler.execute(Pose::new(0, 1.0, 1.0, 1.0), &mut output);
        scheduler.cleanup();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.prefetch(), 0);
    }

    #[test]
    fn invalid_config_fails_before_any_data() {
        let bad = SincConfig {
            cutoff_frequency_hz: 20.0,
            ..Default::default()
        };
        assert!(matches!(
            StreamingConvolutionScheduler::new(&bad, false),
            Err(ConfigError::CutoffOutOfRange(_))
        ));
    }
}
