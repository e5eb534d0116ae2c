use crate::config::FilterResponse;
use crate::math::fft::FftHelper;
use crate::prelude::ConfigError;
use std::f64::consts::PI;

/// Blackman-windowed sinc FIR kernel of `order + 1` taps.
///
/// The low-pass prototype is normalized to unit DC gain; the high-pass
/// response is obtained by spectral inversion of that prototype.
#[derive(Debug, Clone, PartialEq)]
pub struct SincKernel {
    taps: Vec<f64>,
    cutoff: f64,
    response: FilterResponse,
}

impl SincKernel {
    /// Builds a kernel of `2 * half_width + 1` taps for a cutoff expressed
    /// as a fraction of the sampling rate.
    pub fn new(
        half_width: usize,
        cutoff: f64,
        response: FilterResponse,
    ) -> Result<Self, ConfigError> {
        if half_width == 0 {
            return Err(ConfigError::InvalidHalfWidth(half_width));
        }
        Self::from_order(half_width * 2, cutoff, response)
    }

    /// Builds a kernel from its even order `M` (`M + 1` taps).
    pub fn from_order(
        order: usize,
        cutoff: f64,
        response: FilterResponse,
    ) -> Result<Self, ConfigError> {
        if order == 0 || order % 2 != 0 {
            return Err(ConfigError::OddKernelOrder(order));
        }
        if !(cutoff > 0.0 && cutoff < 0.5) {
            return Err(ConfigError::CutoffOutOfRange(cutoff));
        }

        let mut taps = Self::low_pass_taps(order, cutoff)?;
        if response == FilterResponse::HighPass {
            for tap in taps.iter_mut() {
                *tap = -*tap;
            }
            taps[order / 2] += 1.0;
        }

        Ok(Self {
            taps,
            cutoff,
            response,
        })
    }

    /// Normalized low-pass prototype taps for order `M` and cutoff `Fc`.
    pub fn low_pass_taps(order: usize, cutoff: f64) -> Result<Vec<f64>, ConfigError> {
        let m = order as f64;
        let center = order / 2;
        let mut taps: Vec<f64> = (0..=order)
            .map(|i| {
                let offset = i as f64 - m / 2.0;
                let sinc = if i == center {
                    2.0 * PI * cutoff
                } else {
                    (2.0 * PI * cutoff * offset).sin() / offset
                };
                let phase = i as f64 / m;
                let blackman =
                    0.42 - 0.5 * (2.0 * PI * phase).cos() + 0.08 * (4.0 * PI * phase).cos();
                sinc * blackman
            })
            .collect();

        let sum: f64 = taps.iter().sum();
        if !sum.is_normal() {
            return Err(ConfigError::DegenerateKernel(sum));
        }
        for tap in taps.iter_mut() {
            *tap /= sum;
        }
        Ok(taps)
    }

    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn order(&self) -> usize {
        self.taps.len() - 1
    }

    pub fn half_width(&self) -> usize {
        self.order() / 2
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn response(&self) -> FilterResponse {
        self.response
    }

    /// Sum of all taps, i.e. the gain at zero frequency.
    pub fn dc_gain(&self) -> f64 {
        self.taps.iter().sum()
    }

    /// Magnitude response from DC to Nyquist using an FFT of `fft_size` bins.
    pub fn frequency_response(&self, fft_size: usize) -> Vec<f64> {
        FftHelper::new(fft_size.max(self.len())).magnitude_response(&self.taps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn low_pass_prototype_has_unit_gain() {
        for (order, cutoff) in [(2, 0.25), (16, 0.05), (64, 1.0 / 30.0), (100, 0.45)] {
            let taps = SincKernel::low_pass_taps(order, cutoff).unwrap();
            assert_eq!(taps.len(), order + 1);
            let sum: f64 = taps.iter().sum();
            assert!((sum - 1.0).abs() < TOLERANCE, "order {} sum {}", order, sum);
        }
    }

    #[test]
    fn high_pass_kernel_has_zero_dc_gain() {
        for half_width in [1, 4, 16, 32] {
            let kernel =
                SincKernel::new(half_width, 1.0 / 30.0, FilterResponse::HighPass).unwrap();
            assert_eq!(kernel.len(), 2 * half_width + 1);
            assert_eq!(kernel.half_width(), half_width);
            assert!(kernel.dc_gain().abs() < TOLERANCE);
        }
    }

    #[test]
    fn kernel_is_symmetric_with_dominant_center() {
        let kernel = SincKernel::new(8, 0.1, FilterResponse::HighPass).unwrap();
        let taps = kernel.taps();
        for i in 0..taps.len() {
            assert!((taps[i] - taps[taps.len() - 1 - i]).abs() < TOLERANCE);
        }
        assert!(taps[8] > 0.5);
        assert!(taps[0].abs() < 1e-12);
    }

    #[test]
    fn high_pass_passes_fast_motion_and_blocks_drift() {
        let kernel = SincKernel::new(32, 1.0 / 30.0, FilterResponse::HighPass).unwrap();
        let response = kernel.frequency_response(256);
        assert_eq!(response.len(), 129);
        assert!(response[0] < 1e-6);
        assert!((response[128] - 1.0).abs() < 1e-3);

        let low = SincKernel::new(32, 1.0 / 30.0, FilterResponse::LowPass).unwrap();
        let response = low.frequency_response(256);
        assert!((response[0] - 1.0).abs() < 1e-9);
        assert!(response[128] < 1e-3);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert_eq!(
            SincKernel::from_order(7, 0.1, FilterResponse::HighPass),
            Err(ConfigError::OddKernelOrder(7))
        );
        assert_eq!(
            SincKernel::new(0, 0.1, FilterResponse::HighPass),
            Err(ConfigError::InvalidHalfWidth(0))
        );
        assert_eq!(
            SincKernel::new(4, 0.5, FilterResponse::HighPass),
            Err(ConfigError::CutoffOutOfRange(0.5))
        );
        assert_eq!(
            SincKernel::new(4, 0.0, FilterResponse::LowPass),
            Err(ConfigError::CutoffOutOfRange(0.0))
        );
    }

    #[test]
    fn vanishing_cutoff_still_normalizes() {
        let cutoff = 1e-17;
        let low = SincKernel::new(32, cutoff, FilterResponse::LowPass).unwrap();
        assert!((low.dc_gain() - 1.0).abs() < TOLERANCE);
        let high = SincKernel::new(32, cutoff, FilterResponse::HighPass).unwrap();
        assert!(high.dc_gain().abs() < TOLERANCE);
    }

    #[test]
    fn subnormal_tap_sum_is_degenerate() {
        assert!(matches!(
            SincKernel::new(4, 1e-310, FilterResponse::LowPass),
            Err(ConfigError::DegenerateKernel(_))
        ));
    }
}
