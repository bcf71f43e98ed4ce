pub mod buffer;
pub mod classify;
pub mod geometry;
pub mod sequence;
pub mod tags;

pub use buffer::{
    copy_volume, extract_multi_volume, extract_single_3d, locate_multi_volume, locate_single_3d,
    pixel_buffer, volume_bytes, VolumeSlice,
};
pub use classify::{classify_volume_type, is_vendor_volume};
pub use geometry::{decoded_frame_count, resolve_grid, resolve_single_3d};
pub use sequence::{resolve_frame_block, resolve_multi_volume, walk_path, PathStep, ECHO_SERIES_PATH};
pub use tags::*;
