use thiserror::Error;

/// Result type for volume reading operations
pub type Result<T> = std::result::Result<T, VolumeError>;

/// Error types for volume reading operations
///
/// Errors fall into two groups. [`VolumeError::is_unsupported`] marks files
/// that are simply not a supported vendor volume (expected during format
/// auto-detection), while [`VolumeError::is_malformed`] marks files that look
/// like a supported volume but cannot be decoded.
#[derive(Error, Debug)]
pub enum VolumeError {
    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// Required element not found
    #[error("Element not found: {0}")]
    MissingElement(String),

    /// Element present but its value cannot be used
    #[error("Invalid element value: {0}")]
    InvalidValue(String),

    /// Volume type element absent or not one of the known layouts
    #[error("Unsupported volume type: {0}")]
    UnsupportedVolumeType(String),

    /// Multi-volume container without a supported echo series
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Requested output port does not exist
    #[error("Port {port} out of range (port count {port_count})")]
    PortOutOfRange { port: usize, port_count: usize },

    /// Requested byte range exceeds the source buffer
    #[error("Buffer underrun: {length} bytes at offset {offset} requested, {available} available")]
    BufferUnderrun {
        offset: usize,
        length: usize,
        available: usize,
    },

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl VolumeError {
    /// Returns whether the file is not a supported volume layout at all
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            VolumeError::UnsupportedVolumeType(_) | VolumeError::SchemaMismatch(_)
        )
    }

    /// Returns whether the file claims a supported layout but is corrupt
    pub fn is_malformed(&self) -> bool {
        !self.is_unsupported()
    }
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for VolumeError {
    fn from(e: dicom_object::ReadError) -> Self {
        VolumeError::DicomError(format!("{}", e))
    }
}

impl From<dicom_core::value::ConvertValueError> for VolumeError {
    fn from(e: dicom_core::value::ConvertValueError) -> Self {
        VolumeError::InvalidValue(format!("{}", e))
    }
}
