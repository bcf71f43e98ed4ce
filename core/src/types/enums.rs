use std::fmt;

/// Layout of the vendor volume container
///
/// Derived once from the volume data type element. `Unsupported` is
/// terminal: no geometry or voxel data is read for such files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum VolumeType {
    /// One Cartesian volume, optionally followed by a co-registered Doppler volume
    Single3D,
    /// Time series of volumes stored in a private sequence
    MultiVolume,
    Unsupported,
}

impl VolumeType {
    /// Known element values and the layout each one selects
    ///
    /// Values are stored with their trailing pad byte, exactly as written by
    /// the scanner.
    pub const KNOWN_VALUES: [(&'static str, VolumeType); 2] = [
        ("Native 3D Cartesian ", VolumeType::Single3D),
        ("3D_Multi_Volume ", VolumeType::MultiVolume),
    ];

    /// Returns whether this layout can be read
    pub fn is_supported(&self) -> bool {
        !matches!(self, VolumeType::Unsupported)
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            VolumeType::Single3D => "3d",
            VolumeType::MultiVolume => "4d",
            VolumeType::Unsupported => "unsupported",
        }
    }

    /// Parses a volume data type value
    ///
    /// Trailing space and NUL padding is ignored on both sides.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        let value = trim_padding(s);
        Self::KNOWN_VALUES
            .iter()
            .find(|(known, _)| trim_padding(known) == value)
            .map(|(_, volume_type)| *volume_type)
            .unwrap_or(VolumeType::Unsupported)
    }
}

impl fmt::Display for VolumeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Strips the trailing pad bytes DICOM uses to reach even value lengths
pub fn trim_padding(s: &str) -> &str {
    s.trim_end_matches([' ', '\0'])
}

/// Voxel scalar type
///
/// Every volume produced by this reader holds unsigned 8-bit samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum ScalarType {
    #[default]
    U8,
}

impl ScalarType {
    /// Size of one sample in bytes
    pub fn size(&self) -> usize {
        match self {
            ScalarType::U8 => 1,
        }
    }

    /// MetaImage element type name
    pub fn meta_image_name(&self) -> &'static str {
        match self {
            ScalarType::U8 => "MET_UCHAR",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::U8 => write!(f, "uint8"),
        }
    }
}
