use crate::error::{Result, VolumeError};
use crate::types::Geometry;
use dicom_core::value::Value;
use dicom_object::InMemDicomObject;
use std::borrow::Cow;

use super::sequence::resolve_frame_block;
use super::tags::{element_bytes, TagAddress, PIXEL_DATA};

/// Returns the native pixel data of the image
///
/// Encapsulated (compressed) pixel data is rejected.
pub fn pixel_buffer(dcm: &InMemDicomObject) -> Result<Cow<'_, [u8]>> {
    let elem = dcm.element(PIXEL_DATA).map_err(|_| {
        VolumeError::MissingElement(format!("pixel data {}", TagAddress::from(PIXEL_DATA)))
    })?;
    if matches!(elem.value(), Value::PixelSequence(_)) {
        return Err(VolumeError::InvalidValue(
            "encapsulated pixel data is not supported".to_string(),
        ));
    }
    element_bytes(elem)
        .ok_or_else(|| VolumeError::InvalidValue("pixel data is not a byte value".to_string()))
}

/// Borrows `length` bytes of `source` starting at `offset`
///
/// Fails with `BufferUnderrun` instead of reading past the end of `source`.
pub fn volume_bytes(source: &[u8], offset: usize, length: usize) -> Result<&[u8]> {
    let underrun = || VolumeError::BufferUnderrun {
        offset,
        length,
        available: source.len(),
    };
    let end = offset.checked_add(length).ok_or_else(underrun)?;
    source.get(offset..end).ok_or_else(underrun)
}

/// Copies `dest.len()` bytes of `source` starting at `offset`
///
/// `dest` is left untouched if `source` is too short.
pub fn copy_volume(source: &[u8], offset: usize, dest: &mut [u8]) -> Result<()> {
    let chunk = volume_bytes(source, offset, dest.len())?;
    dest.copy_from_slice(chunk);
    Ok(())
}

/// Byte offset of a port in a single Cartesian volume container
///
/// Ports partition the pixel data into contiguous volumes of equal size.
pub fn single_3d_offset(port: usize, volume_len: usize) -> Option<usize> {
    port.checked_mul(volume_len)
}

/// Location of one output volume inside the container
///
/// Nothing is copied until [`VolumeSlice::bytes`] or
/// [`VolumeSlice::copy_into`] is called.
#[derive(Debug, Clone)]
pub struct VolumeSlice<'a> {
    pub source: Cow<'a, [u8]>,
    pub offset: usize,
    pub length: usize,
}

impl VolumeSlice<'_> {
    /// Bytes of the volume, bounds checked against the source
    pub fn bytes(&self) -> Result<&[u8]> {
        volume_bytes(&self.source, self.offset, self.length)
    }

    /// Copies the volume into `dest`, which must hold exactly `length` bytes
    pub fn copy_into(&self, dest: &mut [u8]) -> Result<()> {
        if dest.len() != self.length {
            return Err(VolumeError::InvalidValue(format!(
                "destination holds {} bytes, volume needs {}",
                dest.len(),
                self.length
            )));
        }
        copy_volume(&self.source, self.offset, dest)
    }
}

fn check_port(geometry: &Geometry, port: usize) -> Result<usize> {
    if port >= geometry.port_count {
        return Err(VolumeError::PortOutOfRange {
            port,
            port_count: geometry.port_count,
        });
    }
    geometry.volume_len().ok_or_else(|| {
        VolumeError::InvalidValue(format!("volume extent {} is too large", geometry.extent))
    })
}

fn overflow(port: usize) -> VolumeError {
    VolumeError::InvalidValue(format!("offset of port {} overflows", port))
}

/// Locates one volume of a single Cartesian volume container
pub fn locate_single_3d<'a>(
    dcm: &'a InMemDicomObject,
    geometry: &Geometry,
    port: usize,
) -> Result<VolumeSlice<'a>> {
    let length = check_port(geometry, port)?;
    let source = pixel_buffer(dcm)?;
    let offset = single_3d_offset(port, length).ok_or_else(|| overflow(port))?;
    log::debug!("Port {}: {} bytes at offset {}", port, length, offset);
    Ok(VolumeSlice {
        source,
        offset,
        length,
    })
}

/// Locates one frame of a multi-volume container
///
/// The echo series is resolved again on every call. Each frame starts
/// with an opaque 16-byte header that is skipped.
pub fn locate_multi_volume<'a>(
    dcm: &'a InMemDicomObject,
    geometry: &Geometry,
    port: usize,
) -> Result<VolumeSlice<'a>> {
    let length = check_port(geometry, port)?;
    let block = resolve_frame_block(dcm)?;
    if port >= block.frame_count {
        return Err(VolumeError::PortOutOfRange {
            port,
            port_count: block.frame_count,
        });
    }
    let offset = block.frame_offset(port).ok_or_else(|| overflow(port))?;
    log::debug!("Frame {}: {} bytes at offset {}", port, length, offset);
    Ok(VolumeSlice {
        source: block.data,
        offset,
        length,
    })
}

/// Extracts one volume of a single Cartesian volume container into `dest`
pub fn extract_single_3d(
    dcm: &InMemDicomObject,
    geometry: &Geometry,
    port: usize,
    dest: &mut [u8],
) -> Result<()> {
    locate_single_3d(dcm, geometry, port)?.copy_into(dest)
}

/// Extracts one frame of a multi-volume container into `dest`
pub fn extract_multi_volume(
    dcm: &InMemDicomObject,
    geometry: &Geometry,
    port: usize,
    dest: &mut [u8],
) -> Result<()> {
    locate_multi_volume(dcm, geometry, port)?.copy_into(dest)
}
