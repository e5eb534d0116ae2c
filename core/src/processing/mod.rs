pub mod damping;
pub mod integrator;
pub mod kernel;
pub mod pipeline;
pub mod scheduler;
pub mod sinc_filter;
pub mod window;

pub use damping::DampingSmoother;
pub use integrator::{Trajectory, TrajectoryIntegrator};
pub use kernel::SincKernel;
pub use pipeline::{ensure_non_empty, PoseStream};
pub use scheduler::{SchedulerState, StreamingConvolutionScheduler};
pub use sinc_filter::WindowedSincFilter;
pub use window::SlidingWindow;
