//! Public corpus download
//!
//! Scrapes the corpus index for archive links, downloads the selected
//! archives and unpacks them into the working directory.

pub mod archive;
pub mod fetcher;
pub mod types;

pub use archive::{archive_stem, decompress, detect_compression, unpack_tar};
pub use fetcher::{extract_links, list_entries, select_links, CorpusFetcher};
pub use types::*;
