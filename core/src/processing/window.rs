use std::collections::VecDeque;

/// Bounded FIFO of the most recent samples fed to a kernel.
///
/// The window always holds exactly `capacity` samples; pushing evicts the
/// oldest one. A fresh window is zero-filled.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl SlidingWindow {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: std::iter::repeat(0.0).take(capacity).collect(),
            capacity,
        }
    }

    /// Replaces every sample with `value`.
    pub fn fill(&mut self, value: f64) {
        self.samples.iter_mut().for_each(|sample| *sample = value);
    }

    /// Appends `value` and evicts the oldest sample.
    pub fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Dot product of the window (oldest first) with `taps`.
    pub fn dot(&self, taps: &[f64]) -> f64 {
        self.samples
            .iter()
            .zip(taps)
            .map(|(sample, tap)| sample * tap)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn reset(&mut self) {
        self.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_evicts_oldest() {
        let mut window = SlidingWindow::with_capacity(3);
        for value in [1.0, 2.0, 3.0, 4.0] {
            window.push(value);
        }
        assert_eq!(window.iter().copied().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn fill_keeps_length() {
        let mut window = SlidingWindow::with_capacity(4);
        window.fill(2.5);
        assert_eq!(window.len(), 4);
        assert!(window.iter().all(|&v| v == 2.5));
        window.reset();
        assert!(window.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn dot_uses_oldest_first_order() {
        let mut window = SlidingWindow::with_capacity(3);
        window.push(1.0);
        window.push(2.0);
        window.push(3.0);
        assert_eq!(window.dot(&[1.0, 0.0, 0.0]), 1.0);
        assert_eq!(window.dot(&[0.0, 0.0, 1.0]), 3.0);
    }
}
