use crate::processing::kernel::SincKernel;
use crate::processing::window::SlidingWindow;
use std::rc::Rc;

/// One axis of the windowed-sinc filter: shared coefficients, private window.
#[derive(Debug, Clone)]
pub struct WindowedSincFilter {
    kernel: Rc<SincKernel>,
    window: SlidingWindow,
}

impl WindowedSincFilter {
    pub fn new(kernel: Rc<SincKernel>) -> Self {
        let window = SlidingWindow::with_capacity(kernel.len());
        Self { kernel, window }
    }

    pub fn kernel(&self) -> &SincKernel {
        &self.kernel
    }

    /// Handle to the coefficients shared with the other axes.
    pub fn shared_kernel(&self) -> Rc<SincKernel> {
        Rc::clone(&self.kernel)
    }

    /// Fills the whole window with `value`, as if it had been constant forever.
    pub fn preload(&mut self, value: f64) {
        self.window.fill(value);
    }

    /// Pushes `value` without evaluating the kernel.
    pub fn preload_more(&mut self, value: f64) {
        self.window.push(value);
    }

    /// Pushes `value` and returns the output centred `half_width` samples back.
    pub fn evaluate(&mut self, value: f64) -> f64 {
        self.window.push(value);
        self.window.dot(self.kernel.taps())
    }

    pub fn reset(&mut self) {
        self.window.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterResponse;

    fn kernel(half_width: usize, response: FilterResponse) -> Rc<SincKernel> {
        Rc::new(SincKernel::new(half_width, 0.1, response).unwrap())
    }

    #[test]
    fn constant_input_is_removed_by_high_pass() {
        let mut filter = WindowedSincFilter::new(kernel(4, FilterResponse::HighPass));
        filter.preload(12.0);
        for _ in 0..20 {
            assert!(filter.evaluate(12.0).abs() < 1e-9);
        }
    }

    #[test]
    fn constant_input_is_kept_by_low_pass() {
        let mut filter = WindowedSincFilter::new(kernel(4, FilterResponse::LowPass));
        filter.preload(-3.0);
        assert!((filter.evaluate(-3.0) + 3.0).abs() < 1e-9);
    }

    #[test]
    fn impulse_reappears_after_half_width_pushes() {
        let shared = kernel(3, FilterResponse::HighPass);
        let mut filter = WindowedSincFilter::new(shared.clone());
        filter.preload(0.0);
        let mut outputs = vec![filter.evaluate(1.0)];
        for _ in 0..6 {
            outputs.push(filter.evaluate(0.0));
        }
        // the impulse response is the kernel itself, reversed
        for (i, output) in outputs.iter().enumerate() {
            assert!((output - shared.taps()[6 - i]).abs() < 1e-12);
        }
        let peak = outputs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(peak, Some(3));
    }

    #[test]
    fn axes_sharing_a_kernel_keep_separate_windows() {
        let shared = kernel(2, FilterResponse::LowPass);
        let mut x = WindowedSincFilter::new(shared.clone());
        let mut y = WindowedSincFilter::new(shared);
        x.preload(1.0);
        y.preload(5.0);
        assert!((x.evaluate(1.0) - 1.0).abs() < 1e-9);
        assert!((y.evaluate(5.0) - 5.0).abs() < 1e-9);
    }
}
