//! Core type definitions for ultrasound volume containers
//!
//! This module provides the fundamental types used throughout the library:
//! - [`VolumeType`]: Container layout (single Cartesian volume or multi-volume series)
//! - [`Extent`], [`VoxelSpacing`], [`Geometry`]: Output volume geometry
//! - [`FrameSeriesDescriptor`], [`FrameBlock`]: Multi-volume echo series

mod enums;
mod frame_series;
mod geometry;
mod spacing;

pub use enums::{trim_padding, ScalarType, VolumeType};
pub use frame_series::{FrameBlock, FrameSeriesDescriptor, FRAME_HEADER_LEN};
pub use geometry::{Extent, Geometry};
pub use spacing::{scan_numbers, VoxelSpacing};
