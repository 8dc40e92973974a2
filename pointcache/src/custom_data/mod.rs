//! Writing and reading custom-data layers through a [`PropertyStore`].
//!
//! A writer named `<cd>` stores one sample as:
//!
//! ```text
//! <cd>                          compound
//!   <cd>:<type>                 compound per masked type that has layers
//!     <cd>:<type>:S<name>       one property (or compound) per named layer
//!     <cd>:<type>:N<index>      ... or per unnamed layer
//! ```
//!
//! The type name keeps layers of different types from colliding.

mod codec;

use crate::error::{ReadError, StoreError};
use crate::layers::{LayerData, LayerMask, LayerType};
use crate::store::{CompoundId, PropertyStore, SampleSelector};

/// One layer: optional name plus payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: Option<String>,
    pub data: LayerData,
}

impl Layer {
    pub fn named(name: impl Into<String>, data: LayerData) -> Self {
        Self {
            name: Some(name.into()),
            data,
        }
    }

    pub fn unnamed(data: LayerData) -> Self {
        Self { name: None, data }
    }

    pub fn layer_type(&self) -> LayerType {
        self.data.layer_type()
    }
}

/// Layers attached to `len` data items (vertices, faces, ...).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomData {
    pub len: usize,
    pub layers: Vec<Layer>,
}

impl CustomData {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            layers: Vec::new(),
        }
    }

    /// Appends a layer.
    ///
    /// # Panics
    /// When the payload does not hold exactly `len` elements.
    pub fn push(&mut self, layer: Layer) {
        assert_eq!(
            layer.data.len(),
            self.len,
            "{} layer holds {} elements, custom data has {}",
            layer.layer_type(),
            layer.data.len(),
            self.len
        );
        self.layers.push(layer);
    }

    /// Layers of `layer_type` in insertion order; the position is the layer's
    /// index within its type.
    pub fn layers_of(&self, layer_type: LayerType) -> impl Iterator<Item = &Layer> {
        self.layers
            .iter()
            .filter(move |layer| layer.layer_type() == layer_type)
    }

    pub fn layer_named(&self, layer_type: LayerType, name: &str) -> Option<&Layer> {
        self.layers_of(layer_type)
            .find(|layer| layer.name.as_deref() == Some(name))
    }
}

/// Layer identity recovered from a property name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerName {
    Named(String),
    Index(usize),
    /// Malformed name; the layer is read back unnamed.
    Unknown,
}

impl LayerName {
    pub fn into_name(self) -> Option<String> {
        match self {
            LayerName::Named(name) => Some(name),
            LayerName::Index(_) | LayerName::Unknown => None,
        }
    }
}

/// `<prefix>:<type>`, the compound holding all layers of one type.
pub fn type_compound_name(prefix: &str, layer_type: LayerType) -> String {
    format!("{}:{}", prefix, layer_type)
}

/// Unique property name of the `index`-th layer of `layer_type`: by layer
/// name when it has a non-empty one, by index otherwise.
pub fn layer_property_name(
    prefix: &str,
    layer_type: LayerType,
    name: Option<&str>,
    index: usize,
) -> String {
    match name {
        Some(name) if !name.is_empty() => format!("{}:{}:S{}", prefix, layer_type, name),
        _ => format!("{}:{}:N{}", prefix, layer_type, index),
    }
}

/// Inverse of [`layer_property_name`]. Every property in a type compound is
/// assumed to carry the `<prefix>:<type>:` prefix; only the tag after it is
/// inspected.
pub fn parse_layer_property_name(prefix: &str, layer_type: LayerType, property: &str) -> LayerName {
    let start = prefix.len() + 1 + layer_type.to_string().len() + 1;
    let Some(tag) = property.get(start..).filter(|tag| !tag.is_empty()) else {
        tracing::error!("Invalid custom data layer property name '{}'", property);
        return LayerName::Unknown;
    };

    if let Some(name) = tag.strip_prefix('S') {
        LayerName::Named(name.to_owned())
    } else if let Some(index) = tag.strip_prefix('N') {
        match index.parse() {
            Ok(index) => LayerName::Index(index),
            Err(_) => {
                tracing::error!("Invalid layer index in property name '{}'", property);
                LayerName::Unknown
            }
        }
    } else {
        LayerName::Unknown
    }
}

/// Writes the masked layers of a [`CustomData`] under a compound `name`.
#[derive(Debug, Clone)]
pub struct CustomDataWriter {
    name: String,
    mask: LayerMask,
}

impl CustomDataWriter {
    pub fn new(name: impl Into<String>, mask: LayerMask) -> Self {
        Self {
            name: name.into(),
            mask,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mask(&self) -> LayerMask {
        self.mask
    }

    /// Appends one sample of every masked layer of `data` under `parent`.
    /// Layers of types without a codec are logged and skipped.
    pub fn write_sample<S: PropertyStore + ?Sized>(
        &self,
        store: &mut S,
        data: &CustomData,
        parent: CompoundId,
    ) -> Result<(), StoreError> {
        let root = store.compound(parent, &self.name)?;

        for layer_type in self.mask.iter() {
            let mut type_compound = None;
            for (index, layer) in data.layers_of(layer_type).enumerate() {
                let compound = match type_compound {
                    Some(compound) => compound,
                    None => {
                        let compound =
                            store.compound(root, &type_compound_name(&self.name, layer_type))?;
                        type_compound = Some(compound);
                        compound
                    }
                };

                let property =
                    layer_property_name(&self.name, layer_type, layer.name.as_deref(), index);
                codec::write_layer(store, compound, &property, &layer.data)?;
            }
        }

        Ok(())
    }
}

/// Reads the masked layers stored under a compound `name`.
#[derive(Debug, Clone)]
pub struct CustomDataReader {
    name: String,
    mask: LayerMask,
}

impl CustomDataReader {
    pub fn new(name: impl Into<String>, mask: LayerMask) -> Self {
        Self {
            name: name.into(),
            mask,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mask(&self) -> LayerMask {
        self.mask
    }

    /// Reads the sample at `selector` of every stored, masked layer. Each
    /// layer must hold exactly `len` elements.
    pub fn read_sample<S: PropertyStore + ?Sized>(
        &self,
        store: &S,
        selector: SampleSelector,
        len: usize,
        parent: CompoundId,
    ) -> Result<CustomData, ReadError> {
        let root = store
            .find_compound(parent, &self.name)
            .ok_or_else(|| StoreError::UnknownProperty {
                name: self.name.clone(),
            })?;

        let mut data = CustomData::new(len);
        for layer_type in self.mask.iter() {
            let Some(compound) = store.find_compound(root, &type_compound_name(&self.name, layer_type))
            else {
                continue;
            };

            for property in store.property_names(compound)? {
                let name = parse_layer_property_name(&self.name, layer_type, &property);
                let payload = codec::read_layer(store, compound, &property, layer_type, selector, len)?;
                data.layers.push(Layer {
                    name: name.into_name(),
                    data: payload,
                });
            }
        }

        Ok(data)
    }
}
