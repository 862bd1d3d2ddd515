//! Atomic file publishing.
//!
//! Every file this pipeline writes — encoded variants, gallery manifests,
//! the site configuration document — is published with a temp-then-rename
//! so an interrupted run never leaves a half-written file behind. The temp
//! file is created in the destination directory, so the final rename stays
//! on one filesystem.

use std::io::{self, Write};
use std::path::Path;

/// Write `bytes` to `path` atomically: write a temp file in the same
/// directory, flush it, then rename over the destination.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("no parent directory for {}", path.display()),
        )
    })?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn writes_new_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.webp");

        write_atomic(&path, b"pixels").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"pixels");
    }

    #[test]
    fn replaces_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("manifest.json");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn leaves_no_temp_files_behind() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.bin");

        write_atomic(&path, b"data").unwrap();

        let entries: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("out.bin")]);
    }

    #[test]
    fn missing_directory_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope").join("out.bin");

        assert!(write_atomic(&path, b"data").is_err());
    }
}
