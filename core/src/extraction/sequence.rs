use crate::error::{Result, VolumeError};
use crate::types::{trim_padding, FrameBlock, FrameSeriesDescriptor};
use dicom_object::InMemDicomObject;

use super::tags::{
    element_bytes, find_element, find_items, get_int_value, get_text_value, PrivateTag,
    TagAddress, ECHO_SERIES_SEQUENCE, SERIES_DATA_TYPE, SERIES_DETAILS_SEQUENCE,
    SERIES_FRAME_ALLOCATION_SIZE, SERIES_FRAME_DATA, SERIES_NUMBER_OF_FRAMES,
};

/// Data type value identifying the 3D echo series
pub const DIN_3D_ECHO: &str = "UDM_USD_DATATYPE_DIN_3D_ECHO";

/// One level of descent into nested sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    /// Enter the first item whose `discriminator` element equals `expected`
    MatchItem {
        sequence: TagAddress,
        discriminator: TagAddress,
        expected: &'static str,
    },
    /// Enter the first item of the sequence
    FirstItem { sequence: TagAddress },
}

impl PathStep {
    fn sequence(&self) -> TagAddress {
        match self {
            PathStep::MatchItem { sequence, .. } | PathStep::FirstItem { sequence } => *sequence,
        }
    }
}

/// Outer series sequence, matching item, details sequence, first details item
pub const ECHO_SERIES_PATH: [PathStep; 2] = [
    PathStep::MatchItem {
        sequence: TagAddress::Plain(ECHO_SERIES_SEQUENCE),
        discriminator: TagAddress::Private(SERIES_DATA_TYPE),
        expected: DIN_3D_ECHO,
    },
    PathStep::FirstItem {
        sequence: TagAddress::Private(SERIES_DETAILS_SEQUENCE),
    },
];

/// Result of walking a [`PathStep`] list
#[derive(Debug, Clone)]
pub struct PathMatch<'a> {
    /// Item index entered at each step
    pub indices: Vec<usize>,
    /// Data set of the last item entered
    pub item: &'a InMemDicomObject,
}

/// Walks a path of nested sequences, one item per step
///
/// Items whose discriminator is absent are skipped. The first matching item
/// is entered; later items are never inspected.
///
/// # Errors
///
/// - `MissingElement` if a sequence on the path is absent or empty
/// - `SchemaMismatch` if no item of a `MatchItem` step matches
pub fn walk_path<'a>(dcm: &'a InMemDicomObject, path: &[PathStep]) -> Result<PathMatch<'a>> {
    let mut item = dcm;
    let mut indices = Vec::with_capacity(path.len());

    for step in path {
        let items = find_items(item, step.sequence()).ok_or_else(|| {
            VolumeError::MissingElement(format!("sequence {}", step.sequence()))
        })?;

        let (index, next) = match step {
            PathStep::MatchItem {
                discriminator,
                expected,
                ..
            } => find_matching_item(items, *discriminator, expected).ok_or_else(|| {
                VolumeError::SchemaMismatch(format!(
                    "no item of {} has {} = '{}'",
                    step.sequence(),
                    discriminator,
                    expected
                ))
            })?,
            PathStep::FirstItem { .. } => items.first().map(|first| (0, first)).ok_or_else(|| {
                VolumeError::MissingElement(format!("items of sequence {}", step.sequence()))
            })?,
        };

        indices.push(index);
        item = next;
    }

    Ok(PathMatch { indices, item })
}

fn find_matching_item<'a>(
    items: &'a [InMemDicomObject],
    discriminator: TagAddress,
    expected: &str,
) -> Option<(usize, &'a InMemDicomObject)> {
    items.iter().enumerate().find(|(index, item)| {
        match get_text_value(item, discriminator) {
            Some(value) => {
                log::debug!("Sequence item {}: data type '{}'", index, value);
                value == trim_padding(expected)
            }
            None => {
                log::warn!("Sequence item {} has no element {}", index, discriminator);
                false
            }
        }
    })
}

fn require_int(details: &InMemDicomObject, tag: PrivateTag, what: &str) -> Result<i64> {
    if find_element(details, tag).is_none() {
        return Err(VolumeError::MissingElement(format!("{} {}", what, tag)));
    }
    get_int_value(details, tag)
        .ok_or_else(|| VolumeError::InvalidValue(format!("{} {} is not an integer", what, tag)))
}

fn frame_count(details: &InMemDicomObject) -> Result<usize> {
    let frames = require_int(details, SERIES_NUMBER_OF_FRAMES, "number of frames")?;
    if frames < 1 {
        return Err(VolumeError::InvalidValue(format!(
            "number of frames {} must be at least 1",
            frames
        )));
    }
    Ok(frames as usize)
}

/// Locates the 3D echo series of a multi-volume container
///
/// The frame count becomes the container's port count. Frame allocation
/// size and data are left for [`resolve_frame_block`].
pub fn resolve_multi_volume(dcm: &InMemDicomObject) -> Result<FrameSeriesDescriptor> {
    let found = walk_path(dcm, &ECHO_SERIES_PATH)?;
    let frame_count = frame_count(found.item)?;
    let item_index = found.indices.first().copied().unwrap_or_default();
    log::debug!(
        "Echo series at item {} with {} frames",
        item_index,
        frame_count
    );

    Ok(FrameSeriesDescriptor {
        item_index,
        frame_count,
    })
}

/// Resolves the echo series down to its frame data
///
/// Walks the same path as [`resolve_multi_volume`] on every call; the
/// container is never modified.
pub fn resolve_frame_block(dcm: &InMemDicomObject) -> Result<FrameBlock<'_>> {
    let details = walk_path(dcm, &ECHO_SERIES_PATH)?.item;
    let frame_count = frame_count(details)?;

    let allocation_size =
        require_int(details, SERIES_FRAME_ALLOCATION_SIZE, "frame allocation size")?;
    if allocation_size < 0 {
        return Err(VolumeError::InvalidValue(format!(
            "frame allocation size {} is negative",
            allocation_size
        )));
    }

    let data_elem = find_element(details, SERIES_FRAME_DATA).ok_or_else(|| {
        VolumeError::MissingElement(format!("frame data {}", SERIES_FRAME_DATA))
    })?;
    let data = element_bytes(data_elem).ok_or_else(|| {
        VolumeError::InvalidValue(format!("frame data {} is not a byte value", SERIES_FRAME_DATA))
    })?;

    Ok(FrameBlock {
        frame_count,
        allocation_size: allocation_size as usize,
        data,
    })
}
