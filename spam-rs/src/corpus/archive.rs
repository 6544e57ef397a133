//! Two-layer archive extraction
//!
//! Corpus archives are a tar wrapped in a single-file compression layer.
//! The compression layer is decoded to a `.tar` file first, then the tar is
//! unpacked into its own directory.

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;
use tar::Archive;
use tracing::debug;

use super::types::Compression;
use crate::error::{Result, SpamError};

/// Suffixes stripped from archive names, longest first
const ARCHIVE_SUFFIXES: [&str; 8] = [
    ".tar.bz2", ".tar.gz", ".tbz2", ".tbz", ".tgz", ".tar", ".bz2", ".gz",
];

/// Archive file name without its archive suffix
pub fn archive_stem(file_name: &str) -> &str {
    ARCHIVE_SUFFIXES
        .iter()
        .find_map(|suffix| file_name.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty())
        .unwrap_or(file_name)
}

/// Compression layer of a file, from its magic bytes
pub fn detect_compression(path: &Path) -> Result<Compression> {
    let mut magic = [0u8; 4];
    let read = File::open(path)?.read(&mut magic)?;
    Ok(Compression::from_magic_bytes(&magic[..read]))
}

/// Decode the compression layer of `src` into `dest`.
///
/// The format is detected from magic bytes; an uncompressed file is copied.
/// `dest` must differ from `src`.
pub fn decompress(src: &Path, dest: &Path) -> Result<Compression> {
    if src == dest {
        return Err(SpamError::Archive(format!(
            "refusing to decompress {} onto itself",
            src.display()
        )));
    }
    let compression = detect_compression(src)?;

    let reader = BufReader::new(File::open(src)?);
    let mut decoder: Box<dyn Read> = match compression {
        Compression::None => Box::new(reader),
        Compression::Gzip => Box::new(GzDecoder::new(reader)),
        Compression::Bzip2 => Box::new(BzDecoder::new(reader)),
    };

    let mut out = BufWriter::new(File::create(dest)?);
    let bytes = std::io::copy(&mut decoder, &mut out).map_err(|e| {
        SpamError::Archive(format!(
            "failed to decompress {} ({}): {}",
            src.display(),
            compression,
            e
        ))
    })?;

    debug!(
        "Decompressed {} ({}) to {} bytes",
        src.display(),
        compression,
        bytes
    );
    Ok(compression)
}

/// Unpack a tar file into `dest`, creating it if needed
pub fn unpack_tar(tar_path: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;
    let mut archive = Archive::new(BufReader::new(File::open(tar_path)?));
    archive.unpack(dest).map_err(|e| {
        SpamError::Archive(format!("failed to unpack {}: {}", tar_path.display(), e))
    })?;
    debug!("Unpacked {} into {}", tar_path.display(), dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bzip2::write::BzEncoder;
    use std::io::Write;

    fn write_tar_bz2(path: &Path, files: &[(&str, &str)]) {
        let encoder = BzEncoder::new(File::create(path).unwrap(), bzip2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_archive_stem() {
        assert_eq!(archive_stem("20021010_easy_ham.tar.bz2"), "20021010_easy_ham");
        assert_eq!(archive_stem("corpus.tgz"), "corpus");
        assert_eq!(archive_stem("README"), "README");
        assert_eq!(archive_stem(".tar"), ".tar");
    }

    #[test]
    fn test_decompress_and_unpack() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("20021010_spam.tar.bz2");
        write_tar_bz2(
            &archive,
            &[("spam/0001.abc", "Subject: win\n\nmoney"), ("spam/cmds", "mv x y")],
        );

        let tar_path = dir.path().join("20021010_spam.tar");
        assert_eq!(decompress(&archive, &tar_path).unwrap(), Compression::Bzip2);

        let dest = dir.path().join("20021010_spam");
        unpack_tar(&tar_path, &dest).unwrap();
        let email = std::fs::read_to_string(dest.join("spam/0001.abc")).unwrap();
        assert_eq!(email, "Subject: win\n\nmoney");
        assert!(dest.join("spam/cmds").is_file());
    }

    #[test]
    fn test_decompress_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("x.gz");
        let mut encoder = flate2::write::GzEncoder::new(
            File::create(&src).unwrap(),
            flate2::Compression::default(),
        );
        encoder.write_all(b"plain payload").unwrap();
        encoder.finish().unwrap();

        let dest = dir.path().join("x");
        assert_eq!(decompress(&src, &dest).unwrap(), Compression::Gzip);
        assert_eq!(std::fs::read(&dest).unwrap(), b"plain payload");
    }

    #[test]
    fn test_decompress_onto_itself_fails() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("corpus.tar");
        std::fs::write(&src, b"payload").unwrap();

        let err = decompress(&src, &src).unwrap_err();
        assert!(matches!(err, SpamError::Archive(_)));
        assert_eq!(std::fs::read(&src).unwrap(), b"payload");
    }

    #[test]
    fn test_corrupt_archive_fails() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("broken.tar.bz2");
        std::fs::write(&src, b"BZh9 definitely not bzip2 data").unwrap();

        let err = decompress(&src, &dir.path().join("broken.tar")).unwrap_err();
        assert!(matches!(err, SpamError::Archive(_)));
    }
}
