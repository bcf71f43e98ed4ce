use crate::api::VolumeInfo;
use std::fmt;
use std::path::Path;

/// Text report formatter for volume information
pub struct TextReport<'a> {
    file: &'a Path,
    info: &'a VolumeInfo,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(file: &'a Path, info: &'a VolumeInfo) -> Self {
        Self { file, info }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let geometry = &self.info.geometry;
        let [x, y, z] = geometry.dimensions();

        writeln!(f, "Ultrasound Volume")?;
        writeln!(f, "=================")?;
        writeln!(f)?;
        writeln!(f, "File:           {}", self.file.display())?;
        writeln!(f, "Volume Type:    {}", self.info.volume_type.simple_name())?;
        writeln!(f, "Dimensions:     {} x {} x {}", x, y, z)?;
        writeln!(f, "Extent:         {}", geometry.extent)?;
        writeln!(f, "Spacing:        {}", geometry.spacing)?;
        writeln!(
            f,
            "Origin:         {} {} {}",
            geometry.origin[0], geometry.origin[1], geometry.origin[2]
        )?;
        writeln!(f, "Scalar Type:    {}", geometry.scalar_type)?;
        writeln!(f, "Ports:          {}", geometry.port_count)?;
        match geometry.volume_len() {
            Some(len) => writeln!(f, "Volume Size:    {} bytes", len)?,
            None => writeln!(f, "Volume Size:    too large")?,
        }
        if let Some(series) = &self.info.frame_series {
            writeln!(f, "Echo Item:      {}", series.item_index)?;
        }
        writeln!(f)?;

        writeln!(f, "Derived Properties")?;
        writeln!(f, "------------------")?;
        writeln!(f, "Has Doppler:    {}", self.info.has_doppler())?;

        Ok(())
    }
}
