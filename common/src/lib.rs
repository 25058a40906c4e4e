//! Shared building blocks for the workspace: 2D sample buffers, parallel
//! helpers, float comparisons and logging setup.

pub mod buffer2;
pub mod float_ext;
pub mod log_setup;
pub mod parallel;

pub use buffer2::{Buffer2, Buffer2View};
pub use float_ext::FloatExt;

/// Default absolute tolerance for [`FloatExt::approximately_eq`].
pub const EPSILON: f64 = 1e-6;
