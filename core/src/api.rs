use crate::container::Container;
use crate::error::{Result, VolumeError};
use crate::extraction::tags::{get_text_value, VOLUME_DATA_TYPE};
use crate::extraction::{
    classify_volume_type, decoded_frame_count, is_vendor_volume, locate_multi_volume,
    locate_single_3d, pixel_buffer, resolve_grid, resolve_multi_volume, resolve_single_3d,
    VolumeSlice,
};
use crate::types::{FrameSeriesDescriptor, Geometry, VolumeType};
use std::path::Path;

/// Reader for vendor ultrasound volume containers
///
/// Reading happens in two phases. [`VolumeReader::information`] classifies
/// the container and resolves its geometry; [`VolumeReader::read_volume`]
/// then extracts one output volume per call.
///
/// # Example
///
/// ```
/// use usvolume_core::{Container, VolumeReader, VolumeType};
/// use dicom_object::InMemDicomObject;
/// use dicom_core::{DataElement, PrimitiveValue, VR, Tag};
///
/// let mut dcm = InMemDicomObject::new_empty();
/// dcm.put(DataElement::new(
///     Tag(0x200D, 0x2005), // Volume data type
///     VR::CS,
///     PrimitiveValue::from("Native 3D Cartesian "),
/// ));
/// dcm.put(DataElement::new(
///     Tag(0x200D, 0x3301), // Volume dimensions
///     VR::LO,
///     PrimitiveValue::from("4\\4\\2"),
/// ));
/// dcm.put(DataElement::new(
///     Tag(0x200D, 0x3303), // Volume spacing
///     VR::LO,
///     PrimitiveValue::from("0.5\\0.5\\0.5"),
/// ));
/// dcm.put(DataElement::new(
///     Tag(0x0028, 0x0008), // NumberOfFrames
///     VR::IS,
///     PrimitiveValue::from("2"),
/// ));
/// dcm.put(DataElement::new(
///     Tag(0x7FE0, 0x0010), // PixelData
///     VR::OB,
///     PrimitiveValue::from(vec![7u8; 32]),
/// ));
///
/// let reader = VolumeReader::from_container(Container::from_object(dcm));
/// let info = reader.information().unwrap();
///
/// assert_eq!(info.volume_type, VolumeType::Single3D);
/// assert_eq!(info.geometry.port_count, 1);
/// assert_eq!(reader.read_volume(&info, 0).unwrap(), vec![7u8; 32]);
/// ```
#[derive(Debug, Clone)]
pub struct VolumeReader {
    container: Container,
}

impl VolumeReader {
    /// Opens a DICOM file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read as DICOM
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_container(Container::load(path)?))
    }

    pub fn from_container(container: Container) -> Self {
        Self { container }
    }

    /// Checks whether a file is a DICOM file written by a supported scanner
    ///
    /// Unreadable files yield `false`.
    pub fn can_read(path: impl AsRef<Path>) -> bool {
        match Container::load(path.as_ref()) {
            Ok(container) => is_vendor_volume(container.dicom()),
            Err(e) => {
                log::debug!("Cannot read {}: {}", path.as_ref().display(), e);
                false
            }
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Reloads the underlying file if it changed since it was read
    pub fn refresh(self) -> Result<Self> {
        Ok(Self::from_container(self.container.reload_if_stale()?))
    }

    pub fn volume_type(&self) -> VolumeType {
        classify_volume_type(self.container.dicom())
    }

    /// Classifies the container and resolves the geometry of its volumes
    ///
    /// # Errors
    ///
    /// - `UnsupportedVolumeType` if the layout is not recognized
    /// - `SchemaMismatch` if a multi-volume container holds no 3D echo series
    /// - `MissingElement` / `InvalidValue` if geometry elements are absent or corrupt
    pub fn information(&self) -> Result<VolumeInfo> {
        let dcm = self.container.dicom();

        match self.volume_type() {
            VolumeType::Single3D => {
                let geometry = resolve_single_3d(dcm, decoded_frame_count(dcm))?;
                match pixel_buffer(dcm) {
                    Ok(pixels) => {
                        let expected = geometry
                            .volume_len()
                            .and_then(|len| len.checked_mul(geometry.port_count));
                        if expected.map_or(true, |expected| pixels.len() < expected) {
                            log::warn!(
                                "Pixel data holds {} bytes, too few for {} ports of {}",
                                pixels.len(),
                                geometry.port_count,
                                geometry.extent
                            );
                        }
                    }
                    Err(e) => log::debug!("Pixel data not checked: {}", e),
                }
                Ok(VolumeInfo {
                    volume_type: VolumeType::Single3D,
                    geometry,
                    frame_series: None,
                })
            }
            VolumeType::MultiVolume => {
                let (extent, spacing) = resolve_grid(dcm)?;
                let series = resolve_multi_volume(dcm)?;
                Ok(VolumeInfo {
                    volume_type: VolumeType::MultiVolume,
                    geometry: Geometry::new(extent, spacing, series.frame_count),
                    frame_series: Some(series),
                })
            }
            VolumeType::Unsupported => Err(VolumeError::UnsupportedVolumeType(
                get_text_value(dcm, VOLUME_DATA_TYPE)
                    .map(|value| format!("'{}'", value))
                    .unwrap_or_else(|| "volume data type element not found".to_string()),
            )),
        }
    }

    /// Locates the bytes of `port` without copying them
    pub fn locate_volume(&self, info: &VolumeInfo, port: usize) -> Result<VolumeSlice<'_>> {
        let dcm = self.container.dicom();
        match info.volume_type {
            VolumeType::Single3D => locate_single_3d(dcm, &info.geometry, port),
            VolumeType::MultiVolume => locate_multi_volume(dcm, &info.geometry, port),
            VolumeType::Unsupported => Err(VolumeError::UnsupportedVolumeType(
                "no volumes to extract".to_string(),
            )),
        }
    }

    /// Extracts the volume of `port` into a caller-allocated buffer
    ///
    /// `dest` must hold exactly [`Geometry::volume_len`] bytes. On error
    /// `dest` keeps its previous contents.
    pub fn read_volume_into(&self, info: &VolumeInfo, port: usize, dest: &mut [u8]) -> Result<()> {
        self.locate_volume(info, port)?.copy_into(dest)
    }

    /// Extracts the volume of `port` into a new buffer
    ///
    /// The buffer is allocated only after the volume is known to lie inside
    /// the container.
    pub fn read_volume(&self, info: &VolumeInfo, port: usize) -> Result<Vec<u8>> {
        let slice = self.locate_volume(info, port)?;
        Ok(slice.bytes()?.to_vec())
    }
}

/// Result of the information phase
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct VolumeInfo {
    /// Container layout
    pub volume_type: VolumeType,

    /// Geometry shared by all output volumes
    pub geometry: Geometry,

    /// Echo series location, multi-volume containers only
    pub frame_series: Option<FrameSeriesDescriptor>,
}

impl VolumeInfo {
    pub fn port_count(&self) -> usize {
        self.geometry.port_count
    }

    /// Returns whether a single-volume container also carries Doppler data
    pub fn has_doppler(&self) -> bool {
        self.volume_type == VolumeType::Single3D && self.geometry.port_count == 2
    }
}
