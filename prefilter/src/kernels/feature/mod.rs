//! Loading of regular (non-shadow) features into prefilter buffers.


use crate::config::PrefilterConfig;
use crate::rect::Rect;
use crate::tiles::TileLayout;

/// Normalized mean and variance of one feature at one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureEstimate {
    pub mean: f32,
    pub variance: f32,
}

/// Normalizes an accumulated (mean, variance) pair by the sample count.
///
/// With `use_split_variance` the variance accumulator is a sum of squares and
/// the unbiased estimate `(Σx² - n·mean²) / (n·(n-1))` is returned, clamped at
/// zero. Otherwise the accumulator already holds a variance sum and is only
/// scaled.
#[inline]
pub fn feature_estimate(
    mean_sum: f32,
    variance_sum: f32,
    sample: u32,
    use_split_variance: bool,
) -> FeatureEstimate {
    let n = sample as f32;
    let mean = mean_sum / n;
    let normalization = n * (n - 1.0);
    let variance = if use_split_variance {
        ((variance_sum - mean * mean * n) / normalization).max(0.0)
    } else {
        variance_sum / normalization
    };
    FeatureEstimate { mean, variance }
}

/// Loads one feature of pixel `(x, y)` into `mean` and `variance`.
///
/// `m_offset` and `v_offset` are relative to the denoising offset and select
/// which accumulator pair of the record to read.
#[allow(clippy::too_many_arguments)]
pub fn get_feature(
    sample: u32,
    tiles: &TileLayout<'_>,
    m_offset: usize,
    v_offset: usize,
    x: i32,
    y: i32,
    mean: &mut [f32],
    variance: &mut [f32],
    rect: &Rect,
    config: &PrefilterConfig,
) {
    assert!(sample >= 2, "feature loading needs at least 2 samples, got {}", sample);

    let location = tiles.locate(x, y, config.pass_stride);
    let record = location.record(config.denoising_offset, m_offset.max(v_offset) + 1);
    let estimate = feature_estimate(
        record[m_offset],
        record[v_offset],
        sample,
        config.use_split_variance,
    );

    let idx = rect.index(x, y);
    mean[idx] = estimate.mean;
    variance[idx] = estimate.variance;
}
