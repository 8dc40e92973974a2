//! Prefilter configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::features::DENOISING_RECORD_LEN;
use crate::kernels::combine::MAX_COMBINE_RADIUS;

/// Render-buffer layout and estimator settings shared by all passes.
///
/// # Examples
///
/// ```ignore
/// let config = PrefilterConfig::from_yaml("pass_stride: 32\ndenoising_offset: 6\n")?;
/// assert!(config.use_split_variance);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefilterConfig {
    /// Floats per pixel in the render buffers.
    pub pass_stride: usize,
    /// Start of the denoising record inside a pixel.
    pub denoising_offset: usize,
    /// Derive variance from sums of squares (unbiased) instead of reading an
    /// accumulated variance directly.
    pub use_split_variance: bool,
    /// Window radius of the half combiner's buffer variance; 0 is pointwise.
    pub combine_radius: u32,
}

impl Default for PrefilterConfig {
    fn default() -> Self {
        Self {
            pass_stride: DENOISING_RECORD_LEN,
            denoising_offset: 0,
            use_split_variance: true,
            combine_radius: 0,
        }
    }
}

impl PrefilterConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> String {
        serde_yml::to_string(self).expect("PrefilterConfig is always serializable")
    }

    /// End of the denoising record relative to the pixel start.
    #[inline]
    pub fn record_end(&self) -> usize {
        self.denoising_offset + DENOISING_RECORD_LEN
    }

    pub fn validate(&self) -> Result<()> {
        if self.record_end() > self.pass_stride {
            return Err(Error::RecordTooShort {
                pass_stride: self.pass_stride,
                denoising_offset: self.denoising_offset,
                record_len: DENOISING_RECORD_LEN,
            });
        }
        if self.combine_radius > MAX_COMBINE_RADIUS {
            return Err(Error::RadiusTooLarge {
                radius: self.combine_radius,
                max: MAX_COMBINE_RADIUS,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PrefilterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pass_stride, 26);
        assert_eq!(config.record_end(), 26);
    }

    #[test]
    fn test_from_yaml_fills_missing_fields() {
        let config = PrefilterConfig::from_yaml("pass_stride: 40\ndenoising_offset: 8\n").unwrap();
        assert_eq!(config.pass_stride, 40);
        assert_eq!(config.denoising_offset, 8);
        assert!(config.use_split_variance);
        assert_eq!(config.combine_radius, 0);
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = PrefilterConfig {
            pass_stride: 32,
            denoising_offset: 4,
            use_split_variance: false,
            combine_radius: 2,
        };
        let parsed = PrefilterConfig::from_yaml(&config.to_yaml()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_record_must_fit_in_pass_stride() {
        let config = PrefilterConfig {
            pass_stride: 30,
            denoising_offset: 5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::RecordTooShort {
                pass_stride: 30,
                denoising_offset: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_radius_limit() {
        let config = PrefilterConfig {
            combine_radius: 3,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::RadiusTooLarge { radius: 3, max: 2 })
        ));
    }

    #[test]
    fn test_from_yaml_rejects_invalid_config() {
        assert!(matches!(
            PrefilterConfig::from_yaml("pass_stride: 10\n"),
            Err(Error::RecordTooShort { .. })
        ));
        assert!(matches!(
            PrefilterConfig::from_yaml("pass_stride: [1, 2]\n"),
            Err(Error::ConfigParse(_))
        ));
    }
}
