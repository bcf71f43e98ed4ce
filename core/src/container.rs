use crate::error::Result;
use dicom_object::{open_file, InMemDicomObject};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Decoded DICOM file held immutable for all geometry and voxel queries
///
/// The file's modification time is recorded when it is read, so callers can
/// cheaply check whether the source changed and reload explicitly.
#[derive(Debug, Clone)]
pub struct Container {
    path: Option<PathBuf>,
    dcm: InMemDicomObject,
    read_time: Option<SystemTime>,
}

impl Container {
    /// Reads a DICOM file from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        // Stamped before reading: a write during the read leaves the container stale
        let read_time = modified_time(&path)?;
        let dcm = open_file(&path)?.into_inner();
        log::debug!("Loaded {}", path.display());

        Ok(Self {
            path: Some(path),
            dcm,
            read_time: Some(read_time),
        })
    }

    /// Wraps an already decoded data set; such a container is never stale
    pub fn from_object(dcm: InMemDicomObject) -> Self {
        Self {
            path: None,
            dcm,
            read_time: None,
        }
    }

    pub fn dicom(&self) -> &InMemDicomObject {
        &self.dcm
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Checks whether the source file was modified after it was read
    pub fn is_stale(&self) -> Result<bool> {
        match (&self.path, self.read_time) {
            (Some(path), Some(read_time)) => Ok(modified_time(path)? > read_time),
            _ => Ok(false),
        }
    }

    /// Returns this container, or a freshly read one if the file changed
    pub fn reload_if_stale(self) -> Result<Self> {
        match self.path.clone() {
            Some(path) if self.is_stale()? => {
                log::info!("{} changed on disk, reloading", path.display());
                Self::load(&path)
            }
            _ => Ok(self),
        }
    }
}

fn modified_time(path: &Path) -> Result<SystemTime> {
    Ok(fs::metadata(path)?.modified()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::tags::{get_text_value, VOLUME_DATA_TYPE};
    use crate::testing::{volume_dicom, write_fixture};
    use std::fs::OpenOptions;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_fixture(
            temp_dir.path(),
            "volume.dcm",
            volume_dicom("3D_Multi_Volume ", "4\\4\\4", "1\\1\\1"),
        );

        let container = Container::load(&path).unwrap();
        assert_eq!(container.path(), Some(path.as_path()));
        assert_eq!(
            get_text_value(container.dicom(), VOLUME_DATA_TYPE).as_deref(),
            Some("3D_Multi_Volume")
        );
        assert!(!container.is_stale().unwrap());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Container::load(temp_dir.path().join("missing.dcm")).is_err());
    }

    #[test]
    fn test_stale_after_modification() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_fixture(
            temp_dir.path(),
            "volume.dcm",
            volume_dicom("3D_Multi_Volume ", "4\\4\\4", "1\\1\\1"),
        );
        let container = Container::load(&path).unwrap();

        write_fixture(
            temp_dir.path(),
            "volume.dcm",
            volume_dicom("Native 3D Cartesian ", "4\\4\\4", "1\\1\\1"),
        );
        let later = SystemTime::now() + Duration::from_secs(60);
        OpenOptions::new()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(later)
            .unwrap();

        assert!(container.is_stale().unwrap());
        let reloaded = container.reload_if_stale().unwrap();
        assert!(!reloaded.is_stale().unwrap());
        assert_eq!(
            get_text_value(reloaded.dicom(), VOLUME_DATA_TYPE).as_deref(),
            Some("Native 3D Cartesian")
        );
    }

    #[test]
    fn test_in_memory_never_stale() {
        let container = Container::from_object(InMemDicomObject::new_empty());
        assert!(container.path().is_none());
        assert!(!container.is_stale().unwrap());
        assert!(container.reload_if_stale().is_ok());
    }
}
