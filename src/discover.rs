//! Gallery and source-image discovery.
//!
//! The filesystem is the data source: every immediate subdirectory of the
//! source root is one gallery, and every accepted image file directly inside
//! a gallery directory is one source image. Nothing is nested further —
//! galleries are flat by contract with the viewer.
//!
//! ```text
//! gallery/                 # Source root
//! ├── bw/                  # Gallery "bw"
//! │   ├── pier.jpg         # Source image, id "pier"
//! │   └── dunes.png        # Source image, id "dunes"
//! ├── color/               # Gallery "color"
//! └── .staging/            # Hidden - ignored
//! ```
//!
//! The file stem is the image id: it names the output variant files and is
//! the join key between sources, outputs, and manifest records. Two source
//! files sharing a stem (`pier.jpg` + `pier.png`) would fight over the same
//! outputs, so duplicates are rejected up front.

use crate::settings::is_source_image;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Duplicate image id '{id}' in {dir}")]
    DuplicateId { id: String, dir: PathBuf },
}

/// One source image inside a gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Image id: the file stem, shared by all output variants.
    pub id: String,
    /// Path to the source file.
    pub path: PathBuf,
}

/// One discovered gallery with its enumerated sources.
#[derive(Debug)]
pub struct Gallery {
    /// Gallery id: the directory name.
    pub id: String,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Sources sorted by id.
    pub sources: Vec<SourceImage>,
}

/// List gallery ids: immediate subdirectories of `source_root`, hidden
/// names excluded, sorted. An empty root yields an empty list.
pub fn discover_galleries(source_root: &Path) -> Result<Vec<String>, DiscoverError> {
    let mut galleries = Vec::new();
    for entry in fs::read_dir(source_root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        galleries.push(name);
    }
    galleries.sort();
    Ok(galleries)
}

/// Enumerate the source images of one gallery directory, sorted by id.
///
/// Only regular files with an accepted extension count; subdirectories and
/// hidden files are ignored. Duplicate ids are an error.
pub fn collect_sources(gallery_dir: &Path) -> Result<Vec<SourceImage>, DiscoverError> {
    let mut sources = Vec::new();
    for entry in fs::read_dir(gallery_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !is_source_image(&path) {
            continue;
        }
        let id = match path.file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => continue,
        };
        sources.push(SourceImage { id, path });
    }

    sources.sort_by(|a, b| a.id.cmp(&b.id));

    for pair in sources.windows(2) {
        if pair[0].id == pair[1].id {
            return Err(DiscoverError::DuplicateId {
                id: pair[0].id.clone(),
                dir: gallery_dir.to_path_buf(),
            });
        }
    }

    Ok(sources)
}

/// Discover one gallery: resolve its directories and enumerate sources.
pub fn discover_gallery(
    id: &str,
    source_root: &Path,
    output_root: &Path,
) -> Result<Gallery, DiscoverError> {
    let source_dir = source_root.join(id);
    let sources = collect_sources(&source_dir)?;
    Ok(Gallery {
        id: id.to_string(),
        source_dir,
        output_dir: output_root.join(id),
        sources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    // =========================================================================
    // discover_galleries
    // =========================================================================

    #[test]
    fn galleries_are_sorted_subdirectories() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("zebra")).unwrap();
        fs::create_dir(tmp.path().join("alpha")).unwrap();
        fs::create_dir(tmp.path().join("mid")).unwrap();

        let ids = discover_galleries(tmp.path()).unwrap();
        assert_eq!(ids, vec!["alpha", "mid", "zebra"]);
    }

    #[test]
    fn hidden_directories_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("bw")).unwrap();
        fs::create_dir(tmp.path().join(".staging")).unwrap();

        let ids = discover_galleries(tmp.path()).unwrap();
        assert_eq!(ids, vec!["bw"]);
    }

    #[test]
    fn plain_files_are_not_galleries() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("bw")).unwrap();
        touch(&tmp.path().join("readme.txt"));

        let ids = discover_galleries(tmp.path()).unwrap();
        assert_eq!(ids, vec!["bw"]);
    }

    #[test]
    fn empty_root_yields_empty_list() {
        let tmp = TempDir::new().unwrap();
        assert!(discover_galleries(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_root_errors() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            discover_galleries(&missing),
            Err(DiscoverError::Io(_))
        ));
    }

    // =========================================================================
    // collect_sources
    // =========================================================================

    #[test]
    fn sources_sorted_by_id() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("zebra.jpg"));
        touch(&tmp.path().join("alpha.png"));
        touch(&tmp.path().join("mid.webp"));

        let sources = collect_sources(tmp.path()).unwrap();
        let ids: Vec<&str> = sources.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "mid", "zebra"]);
    }

    #[test]
    fn non_image_files_are_ignored() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("pier.jpg"));
        touch(&tmp.path().join("notes.txt"));
        touch(&tmp.path().join("manifest.json"));

        let sources = collect_sources(tmp.path()).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].id, "pier");
    }

    #[test]
    fn hidden_files_and_subdirectories_are_ignored() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("pier.jpg"));
        touch(&tmp.path().join(".preview.jpg"));
        fs::create_dir(tmp.path().join("nested.jpg")).unwrap();

        let sources = collect_sources(tmp.path()).unwrap();
        assert_eq!(sources.len(), 1);
    }

    #[test]
    fn uppercase_extensions_are_accepted() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("scan.JPG"));

        let sources = collect_sources(tmp.path()).unwrap();
        assert_eq!(sources[0].id, "scan");
    }

    #[test]
    fn duplicate_stems_are_rejected() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("pier.jpg"));
        touch(&tmp.path().join("pier.png"));

        match collect_sources(tmp.path()) {
            Err(DiscoverError::DuplicateId { id, .. }) => assert_eq!(id, "pier"),
            other => panic!("expected DuplicateId, got {other:?}"),
        }
    }

    #[test]
    fn empty_gallery_yields_empty_sources() {
        let tmp = TempDir::new().unwrap();
        assert!(collect_sources(tmp.path()).unwrap().is_empty());
    }

    // =========================================================================
    // discover_gallery
    // =========================================================================

    #[test]
    fn gallery_paths_are_derived_from_roots() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("src/bw/pier.jpg"));

        let gallery =
            discover_gallery("bw", &tmp.path().join("src"), &tmp.path().join("out")).unwrap();
        assert_eq!(gallery.id, "bw");
        assert_eq!(gallery.source_dir, tmp.path().join("src/bw"));
        assert_eq!(gallery.output_dir, tmp.path().join("out/bw"));
        assert_eq!(gallery.sources.len(), 1);
    }
}
