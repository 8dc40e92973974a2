//! Hierarchical named property store.
//!
//! A store is a tree of compounds (groups) whose leaves are typed array
//! properties. Each array property keeps a list of samples, one per write,
//! addressed by a [`SampleSelector`] on read.

use std::fmt;

use glam::{Vec2, Vec4};
use hashbrown::HashMap;
use strum_macros::Display;

use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompoundId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId(usize);

impl fmt::Display for CompoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "compound#{}", self.0)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "property#{}", self.0)
    }
}

/// Element type of an array property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ArrayKind {
    Int32,
    Float,
    Float2,
    Float4,
}

/// One complete array value of a property.
#[derive(Debug, Clone, PartialEq)]
pub enum ArraySample {
    Int32(Vec<i32>),
    Float(Vec<f32>),
    Float2(Vec<Vec2>),
    Float4(Vec<Vec4>),
}

impl ArraySample {
    pub fn kind(&self) -> ArrayKind {
        match self {
            ArraySample::Int32(_) => ArrayKind::Int32,
            ArraySample::Float(_) => ArrayKind::Float,
            ArraySample::Float2(_) => ArrayKind::Float2,
            ArraySample::Float4(_) => ArrayKind::Float4,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ArraySample::Int32(v) => v.len(),
            ArraySample::Float(v) => v.len(),
            ArraySample::Float2(v) => v.len(),
            ArraySample::Float4(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which stored sample of a property to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSelector {
    Index(usize),
    Last,
}

impl fmt::Display for SampleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleSelector::Index(index) => write!(f, "#{}", index),
            SampleSelector::Last => write!(f, "last"),
        }
    }
}

/// Abstract hierarchical key-value store of typed arrays.
pub trait PropertyStore {
    /// Top-level compound every tree hangs off.
    fn root(&self) -> CompoundId;

    /// Opens the compound `name` under `parent`, creating it when absent.
    fn compound(&mut self, parent: CompoundId, name: &str) -> Result<CompoundId, StoreError>;

    fn find_compound(&self, parent: CompoundId, name: &str) -> Option<CompoundId>;

    /// Opens the array property `name` under `parent`, creating it when
    /// absent. An existing property must hold arrays of `kind`.
    fn array_property(
        &mut self,
        parent: CompoundId,
        name: &str,
        kind: ArrayKind,
    ) -> Result<PropertyId, StoreError>;

    /// Looks up an existing array property of `kind`.
    fn find_array(
        &self,
        parent: CompoundId,
        name: &str,
        kind: ArrayKind,
    ) -> Result<PropertyId, StoreError>;

    /// Names of all children of `compound`, in creation order.
    fn property_names(&self, compound: CompoundId) -> Result<Vec<String>, StoreError>;

    /// Appends a sample to `property`.
    fn write_sample(&mut self, property: PropertyId, sample: ArraySample) -> Result<(), StoreError>;

    fn read_sample(
        &self,
        property: PropertyId,
        selector: SampleSelector,
    ) -> Result<&ArraySample, StoreError>;
}

#[derive(Debug)]
enum Node {
    Compound {
        name: String,
        children: Vec<usize>,
        by_name: HashMap<String, usize>,
    },
    Array {
        name: String,
        kind: ArrayKind,
        samples: Vec<ArraySample>,
    },
}

impl Node {
    fn name(&self) -> &str {
        match self {
            Node::Compound { name, .. } | Node::Array { name, .. } => name,
        }
    }
}

/// In-memory [`PropertyStore`]: an arena of nodes, children indexed by name.
#[derive(Debug)]
pub struct MemoryStore {
    nodes: Vec<Node>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::Compound {
                name: String::new(),
                children: Vec::new(),
                by_name: HashMap::new(),
            }],
        }
    }

    /// Total number of compounds and array properties, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn child(&self, parent: CompoundId, name: &str) -> Result<Option<usize>, StoreError> {
        match self.nodes.get(parent.0) {
            Some(Node::Compound { by_name, .. }) => Ok(by_name.get(name).copied()),
            _ => Err(StoreError::UnknownProperty {
                name: parent.to_string(),
            }),
        }
    }

    fn insert(&mut self, parent: CompoundId, node: Node) -> usize {
        let index = self.nodes.len();
        let name = node.name().to_owned();
        self.nodes.push(node);
        if let Some(Node::Compound {
            children, by_name, ..
        }) = self.nodes.get_mut(parent.0)
        {
            children.push(index);
            by_name.insert(name, index);
        }
        index
    }

    fn array(&self, property: PropertyId) -> Result<(&str, &[ArraySample]), StoreError> {
        match self.nodes.get(property.0) {
            Some(Node::Array { name, samples, .. }) => Ok((name.as_str(), samples.as_slice())),
            _ => Err(StoreError::UnknownProperty {
                name: property.to_string(),
            }),
        }
    }
}

impl PropertyStore for MemoryStore {
    fn root(&self) -> CompoundId {
        CompoundId(0)
    }

    fn compound(&mut self, parent: CompoundId, name: &str) -> Result<CompoundId, StoreError> {
        match self.child(parent, name)? {
            Some(index) => match self.nodes[index] {
                Node::Compound { .. } => Ok(CompoundId(index)),
                Node::Array { .. } => Err(StoreError::NameCollision {
                    name: name.to_owned(),
                }),
            },
            None => Ok(CompoundId(self.insert(
                parent,
                Node::Compound {
                    name: name.to_owned(),
                    children: Vec::new(),
                    by_name: HashMap::new(),
                },
            ))),
        }
    }

    fn find_compound(&self, parent: CompoundId, name: &str) -> Option<CompoundId> {
        let index = self.child(parent, name).ok().flatten()?;
        matches!(self.nodes[index], Node::Compound { .. }).then_some(CompoundId(index))
    }

    fn array_property(
        &mut self,
        parent: CompoundId,
        name: &str,
        kind: ArrayKind,
    ) -> Result<PropertyId, StoreError> {
        match self.child(parent, name)? {
            Some(_) => self.find_array(parent, name, kind),
            None => Ok(PropertyId(self.insert(
                parent,
                Node::Array {
                    name: name.to_owned(),
                    kind,
                    samples: Vec::new(),
                },
            ))),
        }
    }

    fn find_array(
        &self,
        parent: CompoundId,
        name: &str,
        kind: ArrayKind,
    ) -> Result<PropertyId, StoreError> {
        let index = self
            .child(parent, name)?
            .ok_or_else(|| StoreError::UnknownProperty {
                name: name.to_owned(),
            })?;
        match &self.nodes[index] {
            Node::Array { kind: actual, .. } if *actual == kind => Ok(PropertyId(index)),
            Node::Array { kind: actual, .. } => Err(StoreError::KindMismatch {
                name: name.to_owned(),
                expected: kind,
                actual: *actual,
            }),
            Node::Compound { .. } => Err(StoreError::NameCollision {
                name: name.to_owned(),
            }),
        }
    }

    fn property_names(&self, compound: CompoundId) -> Result<Vec<String>, StoreError> {
        match self.nodes.get(compound.0) {
            Some(Node::Compound { children, .. }) => Ok(children
                .iter()
                .map(|&index| self.nodes[index].name().to_owned())
                .collect()),
            _ => Err(StoreError::UnknownProperty {
                name: compound.to_string(),
            }),
        }
    }

    fn write_sample(&mut self, property: PropertyId, sample: ArraySample) -> Result<(), StoreError> {
        match self.nodes.get_mut(property.0) {
            Some(Node::Array {
                name,
                kind,
                samples,
            }) => {
                if sample.kind() != *kind {
                    return Err(StoreError::KindMismatch {
                        name: name.clone(),
                        expected: *kind,
                        actual: sample.kind(),
                    });
                }
                samples.push(sample);
                Ok(())
            }
            _ => Err(StoreError::UnknownProperty {
                name: property.to_string(),
            }),
        }
    }

    fn read_sample(
        &self,
        property: PropertyId,
        selector: SampleSelector,
    ) -> Result<&ArraySample, StoreError> {
        let (name, samples) = self.array(property)?;
        let sample = match selector {
            SampleSelector::Index(index) => samples.get(index),
            SampleSelector::Last => samples.last(),
        };
        sample.ok_or_else(|| StoreError::SampleMissing {
            name: name.to_owned(),
            selector,
            available: samples.len(),
        })
    }
}
