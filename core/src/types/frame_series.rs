use std::borrow::Cow;

/// Width of the opaque header preceding every frame in a multi-volume blob
pub const FRAME_HEADER_LEN: usize = 16;

/// Echo series located during the information phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct FrameSeriesDescriptor {
    /// Position of the matching item in the outer sequence (zero-based)
    pub item_index: usize,
    /// Number of frames in the series, always at least one
    pub frame_count: usize,
}

/// Frame data resolved at extraction time
///
/// Borrows the raw blob from the container whenever the element stores
/// plain bytes.
#[derive(Debug, Clone)]
pub struct FrameBlock<'a> {
    pub frame_count: usize,
    /// Bytes reserved for each frame, header included
    pub allocation_size: usize,
    pub data: Cow<'a, [u8]>,
}

impl FrameBlock<'_> {
    /// Byte offset of the first voxel of frame `index`
    ///
    /// Returns `None` on arithmetic overflow.
    pub fn frame_offset(&self, index: usize) -> Option<usize> {
        index
            .checked_mul(self.allocation_size)?
            .checked_add(FRAME_HEADER_LEN)
    }
}
