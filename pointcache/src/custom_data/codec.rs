//! Per-type layer encoding, dispatched on the layer type.

use glam::Vec4;

use crate::error::{ReadError, StoreError};
use crate::layers::{Color, DeformVert, DeformWeight, LayerData, LayerType, OrigSpaceFace};
use crate::store::{ArrayKind, ArraySample, CompoundId, PropertyStore, SampleSelector};

const UV_CORNERS: usize = 4;

pub(super) fn write_layer<S: PropertyStore + ?Sized>(
    store: &mut S,
    parent: CompoundId,
    name: &str,
    data: &LayerData,
) -> Result<(), StoreError> {
    match data {
        LayerData::DeformVert(verts) => write_deform_verts(store, parent, name, verts),
        LayerData::Color(colors) => {
            let prop = store.array_property(parent, name, ArrayKind::Float4)?;
            let sample = colors
                .iter()
                .map(|c| Vec4::new(c.r as f32, c.g as f32, c.b as f32, c.a as f32))
                .collect();
            store.write_sample(prop, ArraySample::Float4(sample))
        }
        LayerData::OrigIndex(indices) => {
            let prop = store.array_property(parent, name, ArrayKind::Int32)?;
            store.write_sample(prop, ArraySample::Int32(indices.clone()))
        }
        LayerData::OrigSpace(faces) => {
            let prop = store.compound(parent, name)?;
            for corner in 0..UV_CORNERS {
                let uv = store.array_property(prop, &format!("{}:uv{}", name, corner), ArrayKind::Float2)?;
                let sample = faces.iter().map(|face| face.uv[corner]).collect();
                store.write_sample(uv, ArraySample::Float2(sample))?;
            }
            Ok(())
        }
        LayerData::Opaque { layer_type, .. } => {
            tracing::error!(
                "Custom data type {} has no write implementation, skipping layer '{}'",
                layer_type,
                name
            );
            Ok(())
        }
    }
}

/// Per-vertex counts and flags, then all weights flattened in vertex order.
fn write_deform_verts<S: PropertyStore + ?Sized>(
    store: &mut S,
    parent: CompoundId,
    name: &str,
    verts: &[DeformVert],
) -> Result<(), StoreError> {
    let prop = store.compound(parent, name)?;
    let totweight_prop = store.array_property(prop, &format!("{}:totweight", name), ArrayKind::Int32)?;
    let flag_prop = store.array_property(prop, &format!("{}:flag", name), ArrayKind::Int32)?;
    let def_nr_prop = store.array_property(prop, &format!("{}:def_nr", name), ArrayKind::Int32)?;
    let weight_prop = store.array_property(prop, &format!("{}:weight", name), ArrayKind::Float)?;

    let weight_count: usize = verts.iter().map(|v| v.weights.len()).sum();
    let mut totweight = Vec::with_capacity(verts.len());
    let mut flag = Vec::with_capacity(verts.len());
    let mut def_nr = Vec::with_capacity(weight_count);
    let mut weight = Vec::with_capacity(weight_count);

    for vert in verts {
        totweight.push(vert.weights.len() as i32);
        flag.push(vert.flag);
        for w in &vert.weights {
            def_nr.push(w.def_nr);
            weight.push(w.weight);
        }
    }

    store.write_sample(totweight_prop, ArraySample::Int32(totweight))?;
    store.write_sample(flag_prop, ArraySample::Int32(flag))?;
    store.write_sample(def_nr_prop, ArraySample::Int32(def_nr))?;
    store.write_sample(weight_prop, ArraySample::Float(weight))
}

pub(super) fn read_layer<S: PropertyStore + ?Sized>(
    store: &S,
    parent: CompoundId,
    name: &str,
    layer_type: LayerType,
    selector: SampleSelector,
    len: usize,
) -> Result<LayerData, ReadError> {
    match layer_type {
        LayerType::MDeformVert => read_deform_verts(store, parent, name, selector, len),
        LayerType::MCol => {
            let colors = read_float4(store, parent, name, selector, len)?
                .iter()
                .map(|v| Color::new(v.x as u8, v.y as u8, v.z as u8, v.w as u8))
                .collect();
            Ok(LayerData::Color(colors))
        }
        LayerType::OrigIndex => Ok(LayerData::OrigIndex(
            read_int32(store, parent, name, selector, Some(len))?.to_vec(),
        )),
        LayerType::OrigSpace => {
            let prop = store
                .find_compound(parent, name)
                .ok_or_else(|| StoreError::UnknownProperty {
                    name: name.to_owned(),
                })?;
            let mut faces = vec![OrigSpaceFace::default(); len];
            for corner in 0..UV_CORNERS {
                let uv_name = format!("{}:uv{}", name, corner);
                let id = store.find_array(prop, &uv_name, ArrayKind::Float2)?;
                let sample = store.read_sample(id, selector)?;
                let ArraySample::Float2(uvs) = sample else {
                    return Err(kind_mismatch(&uv_name, ArrayKind::Float2, sample).into());
                };
                check_len(&uv_name, len, uvs.len())?;
                for (face, uv) in faces.iter_mut().zip(uvs) {
                    face.uv[corner] = *uv;
                }
            }
            Ok(LayerData::OrigSpace(faces))
        }
        LayerType::MVert | LayerType::MEdge | LayerType::MFace | LayerType::Normal => {
            tracing::error!(
                "Custom data type {} has no read implementation, layer '{}'",
                layer_type,
                name
            );
            Err(ReadError::Unsupported { layer_type })
        }
    }
}

fn read_deform_verts<S: PropertyStore + ?Sized>(
    store: &S,
    parent: CompoundId,
    name: &str,
    selector: SampleSelector,
    len: usize,
) -> Result<LayerData, ReadError> {
    let prop = store
        .find_compound(parent, name)
        .ok_or_else(|| StoreError::UnknownProperty {
            name: name.to_owned(),
        })?;

    let totweight = read_int32(store, prop, &format!("{}:totweight", name), selector, Some(len))?;
    let flag = read_int32(store, prop, &format!("{}:flag", name), selector, Some(len))?;
    let def_nr_name = format!("{}:def_nr", name);
    let def_nr = read_int32(store, prop, &def_nr_name, selector, None)?;
    let weight_name = format!("{}:weight", name);
    let weight_id = store.find_array(prop, &weight_name, ArrayKind::Float)?;
    let sample = store.read_sample(weight_id, selector)?;
    let ArraySample::Float(weight) = sample else {
        return Err(kind_mismatch(&weight_name, ArrayKind::Float, sample).into());
    };

    let mut counts = Vec::with_capacity(len);
    for &count in totweight {
        let count = usize::try_from(count).map_err(|_| ReadError::SizeMismatch {
            property: format!("{}:totweight", name),
            expected: 0,
            actual: count.unsigned_abs() as usize,
        })?;
        counts.push(count);
    }
    let weight_count: usize = counts.iter().sum();
    check_len(&def_nr_name, weight_count, def_nr.len())?;
    check_len(&weight_name, weight_count, weight.len())?;

    let mut pairs = def_nr.iter().zip(weight);
    let verts = counts
        .iter()
        .zip(flag)
        .map(|(&count, &flag)| DeformVert {
            flag,
            weights: pairs
                .by_ref()
                .take(count)
                .map(|(&def_nr, &weight)| DeformWeight { def_nr, weight })
                .collect(),
        })
        .collect();

    Ok(LayerData::DeformVert(verts))
}

fn read_int32<'s, S: PropertyStore + ?Sized>(
    store: &'s S,
    parent: CompoundId,
    name: &str,
    selector: SampleSelector,
    expected_len: Option<usize>,
) -> Result<&'s [i32], ReadError> {
    let id = store.find_array(parent, name, ArrayKind::Int32)?;
    let sample = store.read_sample(id, selector)?;
    let ArraySample::Int32(values) = sample else {
        return Err(kind_mismatch(name, ArrayKind::Int32, sample).into());
    };
    if let Some(expected) = expected_len {
        check_len(name, expected, values.len())?;
    }
    Ok(values.as_slice())
}

fn read_float4<'s, S: PropertyStore + ?Sized>(
    store: &'s S,
    parent: CompoundId,
    name: &str,
    selector: SampleSelector,
    len: usize,
) -> Result<&'s [Vec4], ReadError> {
    let id = store.find_array(parent, name, ArrayKind::Float4)?;
    let sample = store.read_sample(id, selector)?;
    let ArraySample::Float4(values) = sample else {
        return Err(kind_mismatch(name, ArrayKind::Float4, sample).into());
    };
    check_len(name, len, values.len())?;
    Ok(values.as_slice())
}

/// Error for a store handing back a sample of another kind than requested.
fn kind_mismatch(name: &str, expected: ArrayKind, sample: &ArraySample) -> StoreError {
    StoreError::KindMismatch {
        name: name.to_owned(),
        expected,
        actual: sample.kind(),
    }
}

fn check_len(property: &str, expected: usize, actual: usize) -> Result<(), ReadError> {
    if expected != actual {
        return Err(ReadError::SizeMismatch {
            property: property.to_owned(),
            expected,
            actual,
        });
    }
    Ok(())
}
