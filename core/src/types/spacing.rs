use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Scans all decimal numbers out of a text value
///
/// Accepts backslash separated multi-values ("0.5\\0.5\\0.5") as well as
/// space or comma separated forms and exponential notation.
pub fn scan_numbers(s: &str) -> Vec<f64> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"[-+]?\d*\.?\d+(?:[eE][-+]?\d+)?").expect("Failed to compile regex")
    });

    re.find_iter(s)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// Voxel spacing in millimeters (x, y, z)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct VoxelSpacing {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl VoxelSpacing {
    /// Creates a new VoxelSpacing
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Builds spacing from the first three values of a multi-valued element
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than three values are given
    pub fn from_values(values: &[f64]) -> Result<Self, String> {
        match values {
            [x, y, z, ..] => Ok(Self::new(*x, *y, *z)),
            _ => Err(format!(
                "Expected 3 spacing values, found {}",
                values.len()
            )),
        }
    }
}

impl fmt::Display for VoxelSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} x {} mm", self.x, self.y, self.z)
    }
}
