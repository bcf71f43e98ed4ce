use crate::types::Geometry;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// MetaImage header describing one raw output volume
pub struct MetaImageHeader<'a> {
    geometry: &'a Geometry,
    data_file: String,
}

impl<'a> MetaImageHeader<'a> {
    /// Creates a header pointing at `data_file`, relative to the header
    pub fn new(geometry: &'a Geometry, data_file: impl Into<String>) -> Self {
        Self {
            geometry,
            data_file: data_file.into(),
        }
    }
}

impl<'a> fmt::Display for MetaImageHeader<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.geometry.dimensions();
        let spacing = self.geometry.spacing;
        let origin = self.geometry.origin;

        writeln!(f, "ObjectType = Image")?;
        writeln!(f, "NDims = 3")?;
        writeln!(f, "BinaryData = True")?;
        writeln!(f, "BinaryDataByteOrderMSB = False")?;
        writeln!(f, "CompressedData = False")?;
        writeln!(f, "Offset = {} {} {}", origin[0], origin[1], origin[2])?;
        writeln!(f, "ElementSpacing = {} {} {}", spacing.x, spacing.y, spacing.z)?;
        writeln!(f, "DimSize = {} {} {}", x, y, z)?;
        writeln!(f, "ElementNumberOfChannels = 1")?;
        writeln!(
            f,
            "ElementType = {}",
            self.geometry.scalar_type.meta_image_name()
        )?;
        writeln!(f, "ElementDataFile = {}", self.data_file)?;
        Ok(())
    }
}

/// Writes `<stem>-<port>.raw` and its `<stem>-<port>.mhd` header into `dir`
///
/// Returns the header path.
pub fn write_volume(
    dir: &Path,
    stem: &str,
    port: usize,
    geometry: &Geometry,
    voxels: &[u8],
) -> io::Result<PathBuf> {
    let raw_name = format!("{}-{}.raw", stem, port);
    let header_path = dir.join(format!("{}-{}.mhd", stem, port));

    fs::write(dir.join(&raw_name), voxels)?;
    fs::write(
        &header_path,
        MetaImageHeader::new(geometry, raw_name).to_string(),
    )?;
    Ok(header_path)
}
