//! In-memory fixtures shared by the unit tests

use crate::extraction::tags::*;
use dicom_core::value::DataSetSequence;
use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
use dicom_object::InMemDicomObject;

/// Reserves block 0x30 of group 200D for the echo series creator
fn put_creator(obj: &mut InMemDicomObject) {
    obj.put(DataElement::new(
        Tag(0x200D, 0x0030),
        VR::LO,
        PrimitiveValue::from(PHILIPS_US_IMAGING_DD_033),
    ));
}

fn put_sequence(obj: &mut InMemDicomObject, tag: Tag, items: Vec<InMemDicomObject>) {
    obj.put(DataElement::new(tag, VR::SQ, DataSetSequence::from(items)));
}

/// Creates a data set with the volume data type, dimensions and spacing
pub fn volume_dicom(data_type: &str, dims: &str, spacing: &str) -> InMemDicomObject {
    let mut obj = InMemDicomObject::new_empty();
    obj.put(DataElement::new(MODALITY, VR::CS, PrimitiveValue::from("US")));
    obj.put(DataElement::new(
        MANUFACTURER,
        VR::LO,
        PrimitiveValue::from("Philips Medical Systems "),
    ));
    obj.put(DataElement::new(
        VOLUME_DATA_TYPE,
        VR::CS,
        PrimitiveValue::from(data_type),
    ));
    obj.put(DataElement::new(
        VOLUME_DIMENSIONS,
        VR::LO,
        PrimitiveValue::from(dims),
    ));
    obj.put(DataElement::new(
        VOLUME_SPACING,
        VR::LO,
        PrimitiveValue::from(spacing),
    ));
    obj
}

/// Creates a single Cartesian volume container with native pixel data
pub fn single_3d_dicom(dims: &str, frames: usize, pixels: Vec<u8>) -> InMemDicomObject {
    let mut obj = volume_dicom("Native 3D Cartesian ", dims, "0.5\\0.5\\0.5");
    obj.put(DataElement::new(
        NUMBER_OF_FRAMES,
        VR::IS,
        PrimitiveValue::from(frames.to_string()),
    ));
    obj.put(DataElement::new(PIXEL_DATA, VR::OB, PrimitiveValue::from(pixels)));
    obj
}

/// Creates the innermost details item of an echo series
pub fn echo_details(frames: &str, allocation: Option<&str>, data: Option<Vec<u8>>) -> InMemDicomObject {
    let mut obj = InMemDicomObject::new_empty();
    put_creator(&mut obj);
    obj.put(DataElement::new(
        Tag(0x200D, 0x3010),
        VR::IS,
        PrimitiveValue::from(frames),
    ));
    if let Some(allocation) = allocation {
        obj.put(DataElement::new(
            Tag(0x200D, 0x3011),
            VR::IS,
            PrimitiveValue::from(allocation),
        ));
    }
    if let Some(data) = data {
        obj.put(DataElement::new(
            Tag(0x200D, 0x300E),
            VR::OB,
            PrimitiveValue::from(data),
        ));
    }
    obj
}

/// Creates one item of the outer echo series sequence
pub fn echo_item(data_type: Option<&str>, details: Option<InMemDicomObject>) -> InMemDicomObject {
    let mut obj = InMemDicomObject::new_empty();
    put_creator(&mut obj);
    if let Some(data_type) = data_type {
        obj.put(DataElement::new(
            Tag(0x200D, 0x300D),
            VR::CS,
            PrimitiveValue::from(data_type),
        ));
    }
    if let Some(details) = details {
        put_sequence(&mut obj, Tag(0x200D, 0x3020), vec![details]);
    }
    obj
}

/// Creates a multi-volume container holding the given outer items
pub fn multi_volume_dicom(dims: &str, items: Vec<InMemDicomObject>) -> InMemDicomObject {
    let mut obj = volume_dicom("3D_Multi_Volume ", dims, "0.3\\0.3\\0.3");
    put_sequence(&mut obj, ECHO_SERIES_SEQUENCE, items);
    obj
}

/// Bytes where every value identifies its own position
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Writes a data set to `dir/name` as an explicit VR little endian file
pub fn write_fixture(
    dir: &std::path::Path,
    name: &str,
    obj: InMemDicomObject,
) -> std::path::PathBuf {
    use dicom_object::meta::FileMetaTableBuilder;

    let path = dir.join(name);
    let file = obj
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax("1.2.840.10008.1.2.1")
                .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.3.1")
                .media_storage_sop_instance_uid("1.2.826.0.1.3680043.2.1125.1"),
        )
        .unwrap();
    file.write_to_file(&path).unwrap();
    path
}
