//! Region passes: the per-pixel kernels swept over a whole prefilter rect.
//!
//! A [`Prefilter`] validates the tile layout, rectangle, sample count and
//! configuration once, after which every pass only has to check the lengths
//! of the arrays it is handed. Passes write whole output rows from rayon
//! workers; padding columns of each row are left untouched.
//!
//! Passes run in sequence: shadow division and feature loading first, half
//! combination once both halves are complete.


use rayon::prelude::*;

use crate::config::PrefilterConfig;
use crate::error::{Error, Result};
use crate::features::{DENOISING_RECORD_LEN, Feature, SHADOW_A_OFFSET, SHADOW_RECORD_LEN};
use crate::kernels::combine::{self, MAX_COMBINE_RADIUS};
use crate::kernels::feature::feature_estimate;
use crate::kernels::shadow::{ShadowBuffers, shadow_estimate};
use crate::parallel::rows_per_chunk;
use crate::rect::Rect;
use crate::tiles::TileLayout;

/// Fewest samples any pass accepts.
pub const MIN_SAMPLES: u32 = 2;

/// Fewest samples for the shadow division: two per half buffer.
pub const MIN_SHADOW_SAMPLES: u32 = 4;

/// Prefilter state for one rectangle of one render.
#[derive(Debug, Clone)]
pub struct Prefilter<'t, 'a> {
    tiles: &'t TileLayout<'a>,
    rect: Rect,
    sample: u32,
    config: PrefilterConfig,
}

impl<'t, 'a> Prefilter<'t, 'a> {
    pub fn new(
        tiles: &'t TileLayout<'a>,
        rect: Rect,
        sample: u32,
        config: PrefilterConfig,
    ) -> Result<Self> {
        config.validate()?;
        if rect.is_empty() {
            return Err(Error::EmptyRect { rect });
        }
        if sample < MIN_SAMPLES {
            return Err(Error::TooFewSamples {
                sample,
                required: MIN_SAMPLES,
            });
        }
        tiles.validate_region(&rect, config.pass_stride, config.record_end())?;

        tracing::debug!(
            "Prefilter over {} ({}x{}, row width {}) at {} samples",
            rect,
            rect.width(),
            rect.height(),
            rect.row_width(),
            sample
        );

        Ok(Self {
            tiles,
            rect,
            sample,
            config,
        })
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn sample(&self) -> u32 {
        self.sample
    }

    pub fn config(&self) -> &PrefilterConfig {
        &self.config
    }

    /// Required length of every output and input array.
    pub fn buffer_len(&self) -> usize {
        self.rect.buffer_len()
    }

    /// Zeroed array sized for this rect.
    pub fn alloc_buffer(&self) -> Vec<f32> {
        vec![0.0; self.buffer_len()]
    }

    fn check_len(&self, name: &'static str, actual: usize) -> Result<()> {
        let required = self.buffer_len();
        if actual < required {
            return Err(Error::BufferTooSmall {
                name,
                required,
                actual,
            });
        }
        Ok(())
    }

    /// Shadow division over the whole rect.
    pub fn divide_shadow(&self, out: ShadowBuffers<'_>) -> Result<()> {
        if self.sample < MIN_SHADOW_SAMPLES {
            return Err(Error::TooFewSamples {
                sample: self.sample,
                required: MIN_SHADOW_SAMPLES,
            });
        }
        for (name, len) in out.lengths() {
            self.check_len(name, len)?;
        }

        tracing::debug!("Dividing shadow feature over {}", self.rect);

        let len = self.buffer_len();
        let row_width = self.rect.row_width();
        let record_start = self.config.denoising_offset + SHADOW_A_OFFSET;
        let ShadowBuffers {
            unfiltered_a,
            unfiltered_b,
            sample_variance,
            sample_variance_v,
            buffer_variance,
        } = out;

        (
            unfiltered_a[..len].par_chunks_mut(row_width),
            unfiltered_b[..len].par_chunks_mut(row_width),
            sample_variance[..len].par_chunks_mut(row_width),
            sample_variance_v[..len].par_chunks_mut(row_width),
            buffer_variance[..len].par_chunks_mut(row_width),
        )
            .into_par_iter()
            .with_min_len(rows_per_chunk(self.rect.height()))
            .enumerate()
            .for_each(|(row, (ua, ub, sv, svv, bv))| {
                let y = self.rect.min.y + row as i32;
                for i in 0..self.rect.width() {
                    let x = self.rect.min.x + i as i32;
                    let record = self
                        .tiles
                        .locate(x, y, self.config.pass_stride)
                        .record(record_start, SHADOW_RECORD_LEN);
                    let est = shadow_estimate(record, self.sample, self.config.use_split_variance);
                    ua[i] = est.unfiltered_a;
                    ub[i] = est.unfiltered_b;
                    sv[i] = est.sample_variance;
                    svv[i] = est.sample_variance_v;
                    bv[i] = est.buffer_variance;
                }
            });

        Ok(())
    }

    /// Loads a named feature over the whole rect.
    pub fn load_feature(
        &self,
        feature: Feature,
        mean: &mut [f32],
        variance: &mut [f32],
    ) -> Result<()> {
        tracing::debug!("Loading feature {} over {}", feature, self.rect);
        self.load_feature_offsets(
            feature.mean_offset(),
            feature.variance_offset(),
            mean,
            variance,
        )
    }

    /// Loads the accumulator pair at `m_offset`/`v_offset` (relative to the
    /// denoising offset) over the whole rect.
    pub fn load_feature_offsets(
        &self,
        m_offset: usize,
        v_offset: usize,
        mean: &mut [f32],
        variance: &mut [f32],
    ) -> Result<()> {
        if m_offset >= DENOISING_RECORD_LEN || v_offset >= DENOISING_RECORD_LEN {
            return Err(Error::FeatureOffsetOutOfRange {
                mean_offset: m_offset,
                variance_offset: v_offset,
                record_len: DENOISING_RECORD_LEN,
            });
        }
        self.check_len("mean", mean.len())?;
        self.check_len("variance", variance.len())?;

        let len = self.buffer_len();
        let row_width = self.rect.row_width();
        let record_start = self.config.denoising_offset;

        (
            mean[..len].par_chunks_mut(row_width),
            variance[..len].par_chunks_mut(row_width),
        )
            .into_par_iter()
            .with_min_len(rows_per_chunk(self.rect.height()))
            .enumerate()
            .for_each(|(row, (mean_row, variance_row))| {
                let y = self.rect.min.y + row as i32;
                for i in 0..self.rect.width() {
                    let x = self.rect.min.x + i as i32;
                    let record = self
                        .tiles
                        .locate(x, y, self.config.pass_stride)
                        .record(record_start, DENOISING_RECORD_LEN);
                    let est = feature_estimate(
                        record[m_offset],
                        record[v_offset],
                        self.sample,
                        self.config.use_split_variance,
                    );
                    mean_row[i] = est.mean;
                    variance_row[i] = est.variance;
                }
            });

        Ok(())
    }

    /// Combines two complete half buffers using the configured radius.
    pub fn combine_halves(
        &self,
        mean: Option<&mut [f32]>,
        variance: Option<&mut [f32]>,
        a: &[f32],
        b: &[f32],
    ) -> Result<()> {
        self.combine_halves_with_radius(mean, variance, a, b, self.config.combine_radius)
    }

    /// Combines two complete half buffers with an explicit window radius.
    pub fn combine_halves_with_radius(
        &self,
        mean: Option<&mut [f32]>,
        variance: Option<&mut [f32]>,
        a: &[f32],
        b: &[f32],
        radius: u32,
    ) -> Result<()> {
        if radius > MAX_COMBINE_RADIUS {
            return Err(Error::RadiusTooLarge {
                radius,
                max: MAX_COMBINE_RADIUS,
            });
        }
        self.check_len("a", a.len())?;
        self.check_len("b", b.len())?;
        if let Some(mean) = mean.as_deref() {
            self.check_len("mean", mean.len())?;
        }
        if let Some(variance) = variance.as_deref() {
            self.check_len("variance", variance.len())?;
        }

        let len = self.buffer_len();
        let row_width = self.rect.row_width();
        let min_rows = rows_per_chunk(self.rect.height());

        if let Some(mean) = mean {
            tracing::debug!("Combining half means over {}", self.rect);

            mean[..len]
                .par_chunks_mut(row_width)
                .with_min_len(min_rows)
                .enumerate()
                .for_each(|(row, out)| {
                    let start = row * row_width;
                    for (i, value) in out[..self.rect.width()].iter_mut().enumerate() {
                        *value = combine::combined_mean(a[start + i], b[start + i]);
                    }
                });
        }

        if let Some(variance) = variance {
            tracing::debug!(
                "Combining half variances over {} with radius {}",
                self.rect,
                radius
            );

            let rect = self.rect;
            variance[..len]
                .par_chunks_mut(row_width)
                .with_min_len(min_rows)
                .enumerate()
                .for_each(|(row, out)| {
                    let y = rect.min.y + row as i32;
                    for (i, value) in out[..rect.width()].iter_mut().enumerate() {
                        let x = rect.min.x + i as i32;
                        *value = combine::buffer_variance(x, y, a, b, &rect, radius);
                    }
                });
        }

        Ok(())
    }
}
