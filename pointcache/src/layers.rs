//! Custom-data layer types and their payloads.

use std::ops::BitOr;

use glam::Vec2;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Kind of a custom-data layer. Discriminants are the stable type numbers
/// the layer mask bits are derived from; display names are the stable type
/// names used in property paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[repr(u8)]
pub enum LayerType {
    #[strum(serialize = "CDMVert")]
    MVert = 0,
    #[strum(serialize = "CDMDeformVert")]
    MDeformVert = 2,
    #[strum(serialize = "CDMEdge")]
    MEdge = 3,
    #[strum(serialize = "CDMFace")]
    MFace = 4,
    #[strum(serialize = "CDMCol")]
    MCol = 6,
    #[strum(serialize = "CDOrigIndex")]
    OrigIndex = 7,
    #[strum(serialize = "CDNormal")]
    Normal = 8,
    #[strum(serialize = "CDOrigSpace")]
    OrigSpace = 13,
}

impl LayerType {
    #[inline]
    pub const fn bit(self) -> u64 {
        1 << self as u8
    }

    /// Whether layers of this type can be written and read back.
    pub const fn is_supported(self) -> bool {
        matches!(
            self,
            LayerType::MDeformVert | LayerType::MCol | LayerType::OrigIndex | LayerType::OrigSpace
        )
    }
}

/// Set of layer types selected for writing or reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LayerMask(u64);

impl LayerMask {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        LayerType::iter().collect()
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn with(self, layer_type: LayerType) -> Self {
        Self(self.0 | layer_type.bit())
    }

    pub const fn contains(self, layer_type: LayerType) -> bool {
        self.0 & layer_type.bit() != 0
    }

    /// Selected types in ascending type order.
    pub fn iter(self) -> impl Iterator<Item = LayerType> {
        LayerType::iter().filter(move |&t| self.contains(t))
    }
}

impl From<LayerType> for LayerMask {
    fn from(layer_type: LayerType) -> Self {
        Self(layer_type.bit())
    }
}

impl BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<LayerType> for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: LayerType) -> Self {
        self.with(rhs)
    }
}

impl FromIterator<LayerType> for LayerMask {
    fn from_iter<I: IntoIterator<Item = LayerType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeformWeight {
    /// Index of the deform group.
    pub def_nr: i32,
    pub weight: f32,
}

/// Group weights of one vertex.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeformVert {
    pub flag: i32,
    pub weights: Vec<DeformWeight>,
}

/// Byte vertex color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Original-space UVs of the four corners of a face.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrigSpaceFace {
    pub uv: [Vec2; 4],
}

/// Payload of one layer, one element per data item.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerData {
    DeformVert(Vec<DeformVert>),
    Color(Vec<Color>),
    OrigIndex(Vec<i32>),
    OrigSpace(Vec<OrigSpaceFace>),
    /// Layer of a type without a codec; only its element count is known.
    Opaque { layer_type: LayerType, len: usize },
}

impl LayerData {
    pub fn layer_type(&self) -> LayerType {
        match self {
            LayerData::DeformVert(_) => LayerType::MDeformVert,
            LayerData::Color(_) => LayerType::MCol,
            LayerData::OrigIndex(_) => LayerType::OrigIndex,
            LayerData::OrigSpace(_) => LayerType::OrigSpace,
            LayerData::Opaque { layer_type, .. } => *layer_type,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            LayerData::DeformVert(v) => v.len(),
            LayerData::Color(v) => v.len(),
            LayerData::OrigIndex(v) => v.len(),
            LayerData::OrigSpace(v) => v.len(),
            LayerData::Opaque { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_are_stable() {
        assert_eq!(LayerType::MDeformVert.to_string(), "CDMDeformVert");
        assert_eq!(LayerType::OrigSpace.to_string(), "CDOrigSpace");
        assert_eq!("CDMCol".parse::<LayerType>(), Ok(LayerType::MCol));
    }

    #[test]
    fn test_mask_bits_follow_type_numbers() {
        assert_eq!(LayerType::MVert.bit(), 1);
        assert_eq!(LayerType::MCol.bit(), 1 << 6);
        assert_eq!(LayerType::OrigSpace.bit(), 1 << 13);

        let mask = LayerMask::from(LayerType::MCol) | LayerType::OrigIndex;
        assert_eq!(mask.bits(), (1 << 6) | (1 << 7));
        assert!(mask.contains(LayerType::MCol));
        assert!(!mask.contains(LayerType::MDeformVert));
    }

    #[test]
    fn test_mask_iterates_in_type_order() {
        let mask: LayerMask = [LayerType::OrigSpace, LayerType::MVert, LayerType::MCol]
            .into_iter()
            .collect();
        assert_eq!(
            mask.iter().collect::<Vec<_>>(),
            vec![LayerType::MVert, LayerType::MCol, LayerType::OrigSpace]
        );
        assert_eq!(LayerMask::all().iter().count(), LayerType::iter().count());
        assert_eq!(LayerMask::empty().iter().count(), 0);
    }

    #[test]
    fn test_payload_reports_type_and_length() {
        let data = LayerData::Color(vec![Color::new(1, 2, 3, 4); 3]);
        assert_eq!(data.layer_type(), LayerType::MCol);
        assert_eq!(data.len(), 3);

        let opaque = LayerData::Opaque {
            layer_type: LayerType::Normal,
            len: 0,
        };
        assert_eq!(opaque.layer_type(), LayerType::Normal);
        assert!(opaque.is_empty());
        assert!(!LayerType::Normal.is_supported());
    }
}
