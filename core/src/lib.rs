pub mod api;
pub mod cli;
pub mod container;
pub mod error;
pub mod extraction;
pub mod types;

#[cfg(test)]
mod testing;

pub use api::{VolumeInfo, VolumeReader};
pub use cli::meta_image::MetaImageHeader;
pub use cli::report::TextReport;
pub use container::Container;
pub use error::{Result, VolumeError};
pub use types::*;
