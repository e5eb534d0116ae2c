use serde::Serialize;

/// Counters collected while a log is pushed through the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub lines_read: usize,
    pub records_integrated: usize,
    pub records_skipped: usize,
    pub priming_rows_suppressed: usize,
    pub scene_cuts: usize,
    pub poses_emitted: usize,
}

#[derive(Debug, Default)]
pub struct MetricsRecorder {
    inner: MetricsSnapshot,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_integrated(&mut self) {
        self.inner.records_integrated += 1;
    }

    pub fn record_skipped(&mut self) {
        self.inner.records_skipped += 1;
    }

    pub fn record_suppressed(&mut self) {
        self.inner.priming_rows_suppressed += 1;
    }

    pub fn record_scene_cut(&mut self) {
        self.inner.scene_cuts += 1;
    }

    pub fn record_lines_read(&mut self, lines: usize) {
        self.inner.lines_read = lines;
    }

    pub fn record_emitted(&mut self) {
        self.inner.poses_emitted += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
    }
}
