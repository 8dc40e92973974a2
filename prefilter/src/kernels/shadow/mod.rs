//! Shadow feature division.
//!
//! The shadow feature is accumulated as two half buffers (odd and even
//! samples), each holding a weight sum, a ratio numerator and a second
//! moment. Dividing numerator by weight gives the per-half visibility ratio;
//! the halves then yield three variance estimates:
//!
//! - sample variance: from the per-sample accumulation. Biased, since the
//!   variance of a ratio can only be approximated.
//! - variance of the sample variance: essentially the buffer variance of the
//!   two half variances, quite noisy.
//! - buffer variance: from the disagreement of the two halves. Unbiased but
//!   noisy.


use crate::config::PrefilterConfig;
use crate::features::{SHADOW_A_OFFSET, SHADOW_RECORD_LEN};
use crate::rect::Rect;
use crate::tiles::TileLayout;

/// Floor for the weight sums before dividing, keeps empty halves finite.
pub const RATIO_EPSILON: f32 = 1e-7;

/// Shadow estimates of one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShadowEstimate {
    pub unfiltered_a: f32,
    pub unfiltered_b: f32,
    pub sample_variance: f32,
    pub sample_variance_v: f32,
    pub buffer_variance: f32,
}

/// Output arrays of the shadow division, all in prefilter-rect space.
#[derive(Debug)]
pub struct ShadowBuffers<'a> {
    pub unfiltered_a: &'a mut [f32],
    pub unfiltered_b: &'a mut [f32],
    pub sample_variance: &'a mut [f32],
    pub sample_variance_v: &'a mut [f32],
    pub buffer_variance: &'a mut [f32],
}

impl ShadowBuffers<'_> {
    #[inline]
    pub fn store(&mut self, idx: usize, estimate: &ShadowEstimate) {
        self.unfiltered_a[idx] = estimate.unfiltered_a;
        self.unfiltered_b[idx] = estimate.unfiltered_b;
        self.sample_variance[idx] = estimate.sample_variance;
        self.sample_variance_v[idx] = estimate.sample_variance_v;
        self.buffer_variance[idx] = estimate.buffer_variance;
    }

    /// Name and length of every array, in declaration order.
    pub fn lengths(&self) -> [(&'static str, usize); 5] {
        [
            ("unfiltered_a", self.unfiltered_a.len()),
            ("unfiltered_b", self.unfiltered_b.len()),
            ("sample_variance", self.sample_variance.len()),
            ("sample_variance_v", self.sample_variance_v.len()),
            ("buffer_variance", self.buffer_variance.len()),
        ]
    }
}

/// Sample counts of the odd and even half buffers.
#[inline]
pub fn half_sample_counts(sample: u32) -> (u32, u32) {
    (sample.div_ceil(2), sample / 2)
}

/// Computes the shadow estimates from a 6-float shadow sub-record
/// `[weight_a, numerator_a, moment_a, weight_b, numerator_b, moment_b]`.
///
/// With `use_split_variance` the moments are sums of squares and the squared
/// mean is subtracted (clamped at zero against cancellation); otherwise they
/// are used as accumulated variances directly. Half counts of one divide by
/// zero and produce infinities.
#[inline]
pub fn shadow_estimate(record: &[f32], sample: u32, use_split_variance: bool) -> ShadowEstimate {
    debug_assert!(record.len() >= SHADOW_RECORD_LEN);

    let unfiltered_a = record[1] / record[0].max(RATIO_EPSILON);
    let unfiltered_b = record[4] / record[3].max(RATIO_EPSILON);

    let (odd_sample, even_sample) = half_sample_counts(sample);
    let mut var_a = record[2];
    let mut var_b = record[5];
    if use_split_variance {
        var_a = (var_a - unfiltered_a * unfiltered_a * odd_sample as f32).max(0.0);
        var_b = (var_b - unfiltered_b * unfiltered_b * even_sample as f32).max(0.0);
    }
    var_a /= odd_sample as f32 - 1.0;
    var_b /= even_sample as f32 - 1.0;

    let n = sample as f32;
    let delta_var = var_a - var_b;
    let delta = unfiltered_a - unfiltered_b;
    ShadowEstimate {
        unfiltered_a,
        unfiltered_b,
        sample_variance: 0.5 * (var_a + var_b) / n,
        sample_variance_v: 0.5 * delta_var * delta_var / (n * n),
        buffer_variance: 0.5 * delta * delta,
    }
}

/// Shadow division of pixel `(x, y)`, reading its record from the owning
/// tile and writing all five outputs at the pixel's rect index.
pub fn divide_shadow(
    sample: u32,
    tiles: &TileLayout<'_>,
    x: i32,
    y: i32,
    out: &mut ShadowBuffers<'_>,
    rect: &Rect,
    config: &PrefilterConfig,
) {
    assert!(sample >= 2, "shadow division needs at least 2 samples, got {}", sample);

    let record = tiles
        .locate(x, y, config.pass_stride)
        .record(config.denoising_offset + SHADOW_A_OFFSET, SHADOW_RECORD_LEN);
    let estimate = shadow_estimate(record, sample, config.use_split_variance);
    out.store(rect.index(x, y), &estimate);
}
