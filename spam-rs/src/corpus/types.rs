//! Corpus types and data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Gzip magic bytes (RFC 1952)
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Bzip2 magic bytes 'B' 'Z' 'h', followed by a block size digit '1'..='9'
const BZIP2_MAGIC: [u8; 3] = [0x42, 0x5a, 0x68];

/// Outer single-file compression of a downloaded archive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compression {
    /// Plain tar
    #[default]
    None,
    Gzip,
    Bzip2,
}

impl Compression {
    /// Detect compression from the first bytes of a file
    pub fn from_magic_bytes(bytes: &[u8]) -> Self {
        if bytes.starts_with(&GZIP_MAGIC) {
            Self::Gzip
        } else if bytes.len() >= 4
            && bytes.starts_with(&BZIP2_MAGIC)
            && (b'1'..=b'9').contains(&bytes[3])
        {
            Self::Bzip2
        } else {
            Self::None
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
        };
        write!(f, "{s}")
    }
}

/// A downloaded corpus archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusArchive {
    /// Where the archive was downloaded from
    pub url: String,
    /// Downloaded compressed file
    pub path: PathBuf,
    /// Decompressed tar file
    pub tar_path: PathBuf,
    /// Directory the tar was unpacked into
    pub folder: PathBuf,
}
