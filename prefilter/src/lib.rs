//! Prefilter - statistical preparation of Monte-Carlo render buffers for
//! non-local-means denoising.
//!
//! The renderer accumulates every pixel's samples into two half buffers (odd
//! and even samples). This crate turns those raw accumulations into
//! normalized means and the variance estimates the denoiser weights against:
//! - Tile location across the 3×3 neighbourhood of render tiles
//! - Shadow feature division into per-half ratios and three variances
//! - Feature loading (normal, albedo, depth, color)
//! - Half combination with an optional robust windowed variance
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use prefilter::prelude::*;
//!
//! let layout = TileLayout::single(bounds, Tile::new(&render_buffer, offset, stride))?;
//! let prefilter = Prefilter::new(&layout, bounds, 64, PrefilterConfig::default())?;
//!
//! let mut depth = prefilter.alloc_buffer();
//! let mut depth_variance = prefilter.alloc_buffer();
//! prefilter.load_feature(Feature::Depth, &mut depth, &mut depth_variance)?;
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod kernels;
pub(crate) mod parallel;
pub mod pipeline;
pub mod rect;
pub mod tiles;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(feature = "bench")]
pub mod bench;

pub mod prelude;

// ============================================================================
// Geometry and tiles
// ============================================================================

pub use rect::{ROW_ALIGNMENT, Rect, align_up};
pub use tiles::{Axis, CENTER_TILE, TILE_COUNT, Tile, TileLayout, TileLocation};

// ============================================================================
// Configuration and errors
// ============================================================================

pub use config::PrefilterConfig;
pub use error::{Error, Result};
pub use features::{DENOISING_RECORD_LEN, Feature};

// ============================================================================
// Passes
// ============================================================================

pub use kernels::{
    // Per-pixel kernels
    FeatureEstimate,
    MAX_COMBINE_RADIUS,
    ShadowBuffers,
    ShadowEstimate,
    combine_halves,
    divide_shadow,
    get_feature,
};
pub use pipeline::{MIN_SAMPLES, MIN_SHADOW_SAMPLES, Prefilter};
