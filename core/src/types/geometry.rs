use super::enums::ScalarType;
use super::spacing::VoxelSpacing;
use std::fmt;

/// Voxel index extent as `[x_min, x_max, y_min, y_max, z_min, z_max]`
///
/// Bounds are inclusive, so `max - min + 1` is the voxel count along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Extent(pub [i64; 6]);

impl Extent {
    /// Builds a zero-based extent from voxel counts per axis
    ///
    /// Every count must be at least one.
    pub fn from_dimensions(dims: [usize; 3]) -> Self {
        Extent([
            0,
            dims[0] as i64 - 1,
            0,
            dims[1] as i64 - 1,
            0,
            dims[2] as i64 - 1,
        ])
    }

    /// Voxel count along each axis
    pub fn dimensions(&self) -> [usize; 3] {
        let e = &self.0;
        [
            (e[1] - e[0] + 1).max(0) as usize,
            (e[3] - e[2] + 1).max(0) as usize,
            (e[5] - e[4] + 1).max(0) as usize,
        ]
    }

    /// Total number of voxels covered by the extent
    ///
    /// Returns `None` if the count does not fit in `usize`.
    pub fn voxel_count(&self) -> Option<usize> {
        self.dimensions()
            .iter()
            .try_fold(1usize, |count, dim| count.checked_mul(*dim))
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &self.0;
        write!(
            f,
            "[{}, {}, {}, {}, {}, {}]",
            e[0], e[1], e[2], e[3], e[4], e[5]
        )
    }
}

/// Geometry shared by every output volume of one container
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Geometry {
    pub extent: Extent,
    pub spacing: VoxelSpacing,
    /// Always at the coordinate origin
    pub origin: [f64; 3],
    pub scalar_type: ScalarType,
    /// Number of distinct volumes selectable from the container
    pub port_count: usize,
}

impl Geometry {
    pub fn new(extent: Extent, spacing: VoxelSpacing, port_count: usize) -> Self {
        Self {
            extent,
            spacing,
            origin: [0.0; 3],
            scalar_type: ScalarType::U8,
            port_count,
        }
    }

    pub fn dimensions(&self) -> [usize; 3] {
        self.extent.dimensions()
    }

    pub fn voxel_count(&self) -> Option<usize> {
        self.extent.voxel_count()
    }

    /// Size of one output volume in bytes, `None` on overflow
    pub fn volume_len(&self) -> Option<usize> {
        self.voxel_count()?.checked_mul(self.scalar_type.size())
    }
}
