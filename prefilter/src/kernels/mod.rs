//! Per-pixel prefilter kernels.
//!
//! Each kernel is a pure function of its inputs that writes exactly one
//! element per output array. The region passes in [`crate::pipeline`] run
//! them over whole rectangles in parallel.

pub mod combine;
pub mod feature;
pub mod shadow;

pub use combine::{MAX_COMBINE_RADIUS, combine_halves};
pub use feature::{FeatureEstimate, get_feature};
pub use shadow::{ShadowBuffers, ShadowEstimate, divide_shadow};
