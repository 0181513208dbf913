//! Shared core for the Drive media functions: query a Google Drive folder for
//! image or video files, validate the response, and normalize the records into
//! the JSON contract the static site consumes. The functions and the batch
//! updater are thin wrappers around this crate.

pub mod config;
pub mod drive;
pub mod error;
pub mod media;
pub mod respond;

pub use config::Config;
pub use drive::{FolderQuery, MediaFetcher};
pub use error::FetchError;
pub use media::{MediaCollection, MediaItem, MediaKind};
