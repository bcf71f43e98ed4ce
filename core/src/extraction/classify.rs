use crate::types::VolumeType;
use dicom_object::InMemDicomObject;

use super::tags::{get_string_value, get_text_value, MANUFACTURER, MODALITY, VOLUME_DATA_TYPE};

/// Manufacturer value written by the scanners this reader supports
pub const VENDOR_MANUFACTURER: &str = "Philips Medical Systems";

/// Classifies the volume layout of a container
///
/// Reads the volume data type element and compares it, padding removed,
/// against the known layout values. An absent element or an unknown value
/// yields [`VolumeType::Unsupported`]; callers treat that as "cannot process
/// this file" rather than as an error.
pub fn classify_volume_type(dcm: &InMemDicomObject) -> VolumeType {
    match get_text_value(dcm, VOLUME_DATA_TYPE) {
        Some(value) => {
            let volume_type = VolumeType::from_str(&value);
            if !volume_type.is_supported() {
                log::debug!("Unknown volume data type '{}'", value);
            }
            volume_type
        }
        None => {
            log::debug!("Volume data type element not found");
            VolumeType::Unsupported
        }
    }
}

/// Checks whether a data set was written by a supported ultrasound scanner
///
/// Requires Modality "US" and the vendor's Manufacturer value.
pub fn is_vendor_volume(dcm: &InMemDicomObject) -> bool {
    let modality = get_string_value(dcm, MODALITY);
    let manufacturer = get_string_value(dcm, MANUFACTURER);
    modality.as_deref() == Some("US") && manufacturer.as_deref() == Some(VENDOR_MANUFACTURER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue, VR};
    use rstest::rstest;

    fn with_data_type(value: &str) -> InMemDicomObject {
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(
            VOLUME_DATA_TYPE,
            VR::CS,
            PrimitiveValue::from(value),
        ));
        obj
    }

    #[rstest]
    #[case("Native 3D Cartesian ", VolumeType::Single3D)]
    #[case("3D_Multi_Volume ", VolumeType::MultiVolume)]
    #[case("Native 2D ", VolumeType::Unsupported)]
    #[case("3D_MULTI_VOLUME ", VolumeType::Unsupported)]
    fn test_classify(#[case] value: &str, #[case] expected: VolumeType) {
        assert_eq!(classify_volume_type(&with_data_type(value)), expected);
    }

    #[test]
    fn test_classify_raw_bytes() {
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(
            VOLUME_DATA_TYPE,
            VR::UN,
            PrimitiveValue::from(b"Native 3D Cartesian ".to_vec()),
        ));
        assert_eq!(classify_volume_type(&obj), VolumeType::Single3D);
    }

    #[test]
    fn test_classify_missing_element() {
        let obj = InMemDicomObject::new_empty();
        assert_eq!(classify_volume_type(&obj), VolumeType::Unsupported);
    }

    #[test]
    fn test_is_vendor_volume() {
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(MODALITY, VR::CS, PrimitiveValue::from("US")));
        obj.put(DataElement::new(
            MANUFACTURER,
            VR::LO,
            PrimitiveValue::from("Philips Medical Systems "),
        ));
        assert!(is_vendor_volume(&obj));

        obj.put(DataElement::new(MODALITY, VR::CS, PrimitiveValue::from("MR")));
        assert!(!is_vendor_volume(&obj));
    }

    #[test]
    fn test_is_vendor_volume_other_manufacturer() {
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(MODALITY, VR::CS, PrimitiveValue::from("US")));
        obj.put(DataElement::new(
            MANUFACTURER,
            VR::LO,
            PrimitiveValue::from("GE Healthcare"),
        ));
        assert!(!is_vendor_volume(&obj));
        assert!(!is_vendor_volume(&InMemDicomObject::new_empty()));
    }
}
