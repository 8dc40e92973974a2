//! Combination of the A/B half buffers.
//!
//! The combined mean is the average of both halves. The buffer variance is
//! either taken pointwise from the halves' disagreement or, with a window
//! radius, as a robust maximum over the neighbourhood: the value at rank
//! `7n/8` of the sorted window. Taking that rank instead of the maximum keeps
//! a single firefly from inflating the variance of its neighbours.


use arrayvec::ArrayVec;

use crate::rect::Rect;

/// Largest supported window radius.
pub const MAX_COMBINE_RADIUS: u32 = 2;

/// Samples in the largest window, `(2 * MAX_COMBINE_RADIUS + 1)²`.
pub const WINDOW_CAPACITY: usize =
    (2 * MAX_COMBINE_RADIUS as usize + 1) * (2 * MAX_COMBINE_RADIUS as usize + 1);

#[inline]
pub fn combined_mean(a: f32, b: f32) -> f32 {
    0.5 * (a + b)
}

/// Buffer variance estimate from one pair of half values.
#[inline]
pub fn half_variance(a: f32, b: f32) -> f32 {
    let delta = a - b;
    0.25 * delta * delta
}

/// Rank selected from a sorted window of `count` values.
#[inline]
pub fn robust_rank(count: usize) -> usize {
    (7 * count) / 8
}

/// Sorts `values` ascending and returns the element at [`robust_rank`].
#[inline]
pub fn robust_max(values: &mut [f32]) -> f32 {
    debug_assert!(!values.is_empty());
    values.sort_by(f32::total_cmp);
    values[robust_rank(values.len())]
}

/// Robust maximum of the half variances in the `radius` window around
/// `(x, y)`, clipped to `rect`.
pub fn windowed_variance(x: i32, y: i32, a: &[f32], b: &[f32], rect: &Rect, radius: u32) -> f32 {
    assert!(
        radius <= MAX_COMBINE_RADIUS,
        "combine radius {} exceeds {}",
        radius,
        MAX_COMBINE_RADIUS
    );

    let r = radius as i32;
    let mut values = ArrayVec::<f32, WINDOW_CAPACITY>::new();
    for py in (y - r).max(rect.min.y)..(y + r + 1).min(rect.max.y) {
        for px in (x - r).max(rect.min.x)..(x + r + 1).min(rect.max.x) {
            let p = rect.index(px, py);
            values.push(half_variance(a[p], b[p]));
        }
    }

    robust_max(&mut values)
}

/// Buffer variance at `(x, y)`: pointwise for radius 0, windowed otherwise.
#[inline]
pub fn buffer_variance(x: i32, y: i32, a: &[f32], b: &[f32], rect: &Rect, radius: u32) -> f32 {
    if radius == 0 {
        let idx = rect.index(x, y);
        half_variance(a[idx], b[idx])
    } else {
        windowed_variance(x, y, a, b, rect, radius)
    }
}

/// Combines the half buffers `a` and `b` at pixel `(x, y)`.
///
/// Either output may be omitted. The window of the variance reads
/// neighbouring pixels of `a` and `b`, so both halves must be complete
/// before the first call.
#[allow(clippy::too_many_arguments)]
pub fn combine_halves(
    x: i32,
    y: i32,
    mean: Option<&mut [f32]>,
    variance: Option<&mut [f32]>,
    a: &[f32],
    b: &[f32],
    rect: &Rect,
    radius: u32,
) {
    let idx = rect.index(x, y);

    if let Some(mean) = mean {
        mean[idx] = combined_mean(a[idx], b[idx]);
    }
    if let Some(variance) = variance {
        variance[idx] = buffer_variance(x, y, a, b, rect, radius);
    }
}
