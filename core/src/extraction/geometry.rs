use crate::error::{Result, VolumeError};
use crate::types::{Extent, Geometry, VoxelSpacing};
use dicom_object::InMemDicomObject;

use super::tags::{
    get_int_value, get_numbers, TagAddress, NUMBER_OF_FRAMES, VOLUME_DIMENSIONS, VOLUME_SPACING,
};

/// Reads the voxel grid shared by every layout
///
/// Both elements hold three numbers stored as text. Dimensions must be
/// whole numbers of at least one whose product fits in `usize`.
pub fn resolve_grid(dcm: &InMemDicomObject) -> Result<(Extent, VoxelSpacing)> {
    let dims = get_numbers(dcm, VOLUME_DIMENSIONS).ok_or_else(|| {
        VolumeError::MissingElement(format!(
            "volume dimensions {}",
            TagAddress::from(VOLUME_DIMENSIONS)
        ))
    })?;
    let extent = Extent::from_dimensions(parse_dimensions(&dims)?);
    if extent.voxel_count().is_none() {
        let [x, y, z] = extent.dimensions();
        return Err(VolumeError::InvalidValue(format!(
            "Volume of {}x{}x{} voxels is too large",
            x, y, z
        )));
    }

    let spacing = get_numbers(dcm, VOLUME_SPACING).ok_or_else(|| {
        VolumeError::MissingElement(format!(
            "volume spacing {}",
            TagAddress::from(VOLUME_SPACING)
        ))
    })?;
    let spacing = VoxelSpacing::from_values(&spacing).map_err(VolumeError::InvalidValue)?;

    Ok((extent, spacing))
}

fn parse_dimensions(values: &[f64]) -> Result<[usize; 3]> {
    if values.len() < 3 {
        return Err(VolumeError::InvalidValue(format!(
            "Expected 3 volume dimensions, found {}",
            values.len()
        )));
    }

    let mut dims = [0usize; 3];
    for (dim, value) in dims.iter_mut().zip(values) {
        if value.fract() != 0.0 || *value < 1.0 || *value > u32::MAX as f64 {
            return Err(VolumeError::InvalidValue(format!(
                "Invalid volume dimension {}",
                value
            )));
        }
        *dim = *value as usize;
    }
    Ok(dims)
}

/// Number of frames the image decoder reports for the pixel data
///
/// Single-frame images carry no NumberOfFrames element.
pub fn decoded_frame_count(dcm: &InMemDicomObject) -> usize {
    get_int_value(dcm, NUMBER_OF_FRAMES)
        .filter(|n| *n > 0)
        .map(|n| n as usize)
        .unwrap_or(1)
}

/// Resolves the geometry of a single Cartesian volume container
///
/// When the decoded frame count differs from the slice count, the pixel
/// data holds a B-mode volume followed by a co-registered Doppler volume of
/// the same size, exposed as two ports.
pub fn resolve_single_3d(dcm: &InMemDicomObject, decoded_frames: usize) -> Result<Geometry> {
    let (extent, spacing) = resolve_grid(dcm)?;
    let slices = extent.dimensions()[2];

    let port_count = if slices == decoded_frames {
        1
    } else {
        log::debug!(
            "{} decoded frames for {} slices, reading B-mode and Doppler volumes",
            decoded_frames,
            slices
        );
        2
    };

    Ok(Geometry::new(extent, spacing, port_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::{DataElement, PrimitiveValue, VR};

    fn create_test_dicom(dims: &str, spacing: &str) -> InMemDicomObject {
        let mut obj = InMemDicomObject::new_empty();
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

    #[test]
    fn test_bmode_only() {
        let dcm = create_test_dicom("64\\64\\32", "0.5\\0.5\\0.5");
        let geometry = resolve_single_3d(&dcm, 32).unwrap();
        assert_eq!(geometry.extent.0, [0, 63, 0, 63, 0, 31]);
        assert_eq!(geometry.spacing, VoxelSpacing::new(0.5, 0.5, 0.5));
        assert_eq!(geometry.port_count, 1);
        assert_eq!(geometry.voxel_count(), Some(131072));
    }

    #[test]
    fn test_bmode_and_doppler() {
        let dcm = create_test_dicom("64\\64\\32", "0.5\\0.5\\0.5");
        let geometry = resolve_single_3d(&dcm, 64).unwrap();
        assert_eq!(geometry.port_count, 2);
        assert_eq!(geometry.voxel_count(), Some(131072));
    }

    #[test]
    fn test_missing_dimensions() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            VOLUME_SPACING,
            VR::LO,
            PrimitiveValue::from("0.5\\0.5\\0.5"),
        ));
        let err = resolve_single_3d(&dcm, 1).unwrap_err();
        assert!(matches!(err, VolumeError::MissingElement(_)));
    }

    #[test]
    fn test_missing_spacing() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            VOLUME_DIMENSIONS,
            VR::LO,
            PrimitiveValue::from("4\\4\\4"),
        ));
        let err = resolve_grid(&dcm).unwrap_err();
        assert!(matches!(err, VolumeError::MissingElement(_)));
    }

    #[test]
    fn test_invalid_dimensions() {
        for dims in ["64\\64", "64\\0\\32", "64\\64\\2.5", "-1\\4\\4"] {
            let dcm = create_test_dicom(dims, "1\\1\\1");
            let err = resolve_grid(&dcm).unwrap_err();
            assert!(matches!(err, VolumeError::InvalidValue(_)), "{}", dims);
        }
    }

    #[test]
    fn test_oversized_dimensions() {
        let dcm = create_test_dicom("4000000\\4000000\\4000000", "1\\1\\1");
        let err = resolve_grid(&dcm).unwrap_err();
        assert!(matches!(err, VolumeError::InvalidValue(_)));
        assert!(err.is_malformed());
        assert!(resolve_single_3d(&dcm, 1).is_err());
    }

    #[test]
    fn test_decoded_frame_count() {
        let mut dcm = InMemDicomObject::new_empty();
        assert_eq!(decoded_frame_count(&dcm), 1);

        dcm.put(DataElement::new(
            NUMBER_OF_FRAMES,
            VR::IS,
            PrimitiveValue::from("64"),
        ));
        assert_eq!(decoded_frame_count(&dcm), 64);
    }
}
