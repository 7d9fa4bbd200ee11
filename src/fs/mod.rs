//! File system helpers
//!
//! Directory listing and removal go through `walkdir`; archives through
//! `zip`. Operations whose contract is a plain success flag log the reason
//! for a failure and return `false`.

use crate::error::{HelperError, Result};
use base64::{engine::general_purpose, Engine as _};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Options for [`get_files_in_directory`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingOptions {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Accepted extensions, matched case-insensitively; empty accepts all
    pub extensions: Vec<String>,
}

impl ListingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Accept files ending in `.ext`; a leading dot is optional
    #[must_use]
    pub fn extension(mut self, ext: impl AsRef<str>) -> Self {
        self.extensions
            .push(ext.as_ref().trim_start_matches('.').to_lowercase());
        self
    }

    #[must_use]
    pub fn extensions<I, S>(self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        exts.into_iter().fold(self, Self::extension)
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        self.extensions
            .iter()
            .any(|ext| name.ends_with(&format!(".{ext}")))
    }
}

/// List regular files under `dir`
///
/// Entries are visited in file-name order, depth first. Returned paths are
/// absolute with symlinks resolved. Entries below `dir` that cannot be read,
/// such as dangling symlinks or symlink loops, are logged and skipped.
///
/// # Errors
///
/// Returns [`HelperError::Walk`] if `dir` itself cannot be read.
///
/// # Example
///
/// ```rust,no_run
/// use helperbox::fs::{get_files_in_directory, ListingOptions};
///
/// let options = ListingOptions::new().recursive(true).extensions(["jpg", "png"]);
/// let images = get_files_in_directory("/var/www/uploads", &options)?;
/// # Ok::<(), helperbox::HelperError>(())
/// ```
pub fn get_files_in_directory(
    dir: impl AsRef<Path>,
    options: &ListingOptions,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let max_depth = if options.recursive { usize::MAX } else { 1 };
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(true)
        .sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !options.accepts(entry.path()) {
            continue;
        }
        match entry.path().canonicalize() {
            Ok(path) => files.push(path),
            Err(e) => warn!("Skipping {}: {}", entry.path().display(), e),
        }
    }

    debug!("Found {} files in {}", files.len(), dir.display());
    Ok(files)
}

/// Delete `dir` with everything below it
///
/// Symlinks are removed, never followed. Returns `Ok(false)` without touching
/// anything when `dir` does not exist.
///
/// # Errors
///
/// [`HelperError::SelfRemoval`] when the tree contains the running
/// executable (nothing past that point is removed), [`HelperError::Walk`] or
/// [`HelperError::Io`] when an entry cannot be read or deleted.
pub fn remove_directory_recursively(dir: impl AsRef<Path>) -> Result<bool> {
    let running = std::env::current_exe()
        .and_then(|exe| exe.canonicalize())
        .ok();
    remove_tree(dir.as_ref(), running.as_deref())
}

fn remove_tree(dir: &Path, protected: Option<&Path>) -> Result<bool> {
    if !dir.exists() {
        debug!("Nothing to remove at {}", dir.display());
        return Ok(false);
    }

    for entry in WalkDir::new(dir).contents_first(true) {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::remove_dir(path)?;
            continue;
        }
        if file_type.is_file() {
            if let Some(protected) = protected {
                if path.canonicalize().is_ok_and(|p| p == protected) {
                    return Err(HelperError::SelfRemoval(path.to_path_buf()));
                }
            }
        }
        fs::remove_file(path)?;
    }

    debug!("Removed directory {}", dir.display());
    Ok(true)
}

/// Read a file into a `data:` URI
///
/// The MIME type is guessed from the file extension, falling back to
/// `application/octet-stream`.
///
/// # Errors
///
/// [`HelperError::Io`] if the file cannot be read.
pub fn get_base64_image(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok(format!(
        "data:{};base64,{}",
        mime.essence_str(),
        general_purpose::STANDARD.encode(bytes)
    ))
}

/// Extract a zip archive into `destination`
///
/// The destination is created if needed. Returns `false` for an empty
/// destination, an archive that cannot be opened, or a failed extraction.
pub fn unzip(archive: impl AsRef<Path>, destination: impl AsRef<Path>) -> bool {
    let (archive, destination) = (archive.as_ref(), destination.as_ref());
    if destination.as_os_str().is_empty() {
        warn!("Refusing to extract {} without a destination", archive.display());
        return false;
    }

    match extract(archive, destination) {
        Ok(count) => {
            debug!(
                "Extracted {} entries from {} to {}",
                count,
                archive.display(),
                destination.display()
            );
            true
        }
        Err(e) => {
            warn!("Failed to extract {}: {}", archive.display(), e);
            false
        }
    }
}

fn extract(archive: &Path, destination: &Path) -> Result<usize> {
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(BufReader::new(file))?;
    fs::create_dir_all(destination)?;
    zip.extract(destination)?;
    Ok(zip.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    fn fixture() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        for name in ["b.PNG", "a.txt", "notes", "sub/c.txt", "sub/deeper/d.md"] {
            touch(&root.join(name));
        }
        (dir, root)
    }

    #[test]
    fn test_listing_options_builder() {
        let options = ListingOptions::new()
            .recursive(true)
            .extensions([".TXT", "md"])
            .extension("png");
        assert!(options.recursive);
        assert_eq!(options.extensions, vec!["txt", "md", "png"]);
        assert!(options.accepts(Path::new("/x/A.Txt")));
        assert!(options.accepts(Path::new("/x/.md")));
        assert!(!options.accepts(Path::new("/x/txt")));
        assert!(ListingOptions::default().accepts(Path::new("anything")));
    }

    #[test]
    fn test_get_files_in_directory() {
        let (_dir, root) = fixture();

        let files = get_files_in_directory(&root, &ListingOptions::new()).unwrap();
        assert_eq!(
            files,
            vec![root.join("a.txt"), root.join("b.PNG"), root.join("notes")]
        );

        let files =
            get_files_in_directory(&root, &ListingOptions::new().recursive(true)).unwrap();
        assert_eq!(
            files,
            vec![
                root.join("a.txt"),
                root.join("b.PNG"),
                root.join("notes"),
                root.join("sub/c.txt"),
                root.join("sub/deeper/d.md"),
            ]
        );
    }

    #[test]
    fn test_get_files_in_directory_filters_extensions() {
        let (_dir, root) = fixture();

        let options = ListingOptions::new().recursive(true).extensions(["txt", "png"]);
        let files = get_files_in_directory(&root, &options).unwrap();
        assert_eq!(
            files,
            vec![root.join("a.txt"), root.join("b.PNG"), root.join("sub/c.txt")]
        );
    }

    #[test]
    fn test_get_files_in_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = get_files_in_directory(dir.path().join("missing"), &ListingOptions::new());
        assert!(matches!(result, Err(HelperError::Walk(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_get_files_in_directory_skips_broken_links() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        touch(&root.join("real.txt"));
        touch(&root.join("sub/inner.txt"));
        std::os::unix::fs::symlink(root.join("gone"), root.join("dangling")).unwrap();
        std::os::unix::fs::symlink(&root, root.join("sub/loop")).unwrap();

        let flat = get_files_in_directory(&root, &ListingOptions::new()).unwrap();
        assert_eq!(flat, vec![root.join("real.txt")]);

        let deep = get_files_in_directory(&root, &ListingOptions::new().recursive(true)).unwrap();
        assert_eq!(deep, vec![root.join("real.txt"), root.join("sub/inner.txt")]);
    }

    #[test]
    fn test_remove_directory_recursively() {
        let dir = TempDir::new().unwrap();
        let tmp = dir.path().join("tmp");
        let names = [
            "...", ".tmp.txt", "..tmp.txt", "...tmp.txt", "tmp.txt", "tmp..txt", "tmp...txt",
            "tmp.txt.", "tmp.txt..", "tmp.txt...",
        ];
        for name in names {
            touch(&tmp.join(name));
            touch(&tmp.join("nested-dir").join(name));
        }

        let target = dir.path().join("tmp-dir-to-which-link-is-given");
        touch(&target.join("keep.txt"));
        #[cfg(unix)]
        std::os::unix::fs::symlink(&target, tmp.join("link")).unwrap();

        assert!(remove_directory_recursively(&tmp).unwrap());
        assert!(!tmp.exists());
        assert!(target.join("keep.txt").exists());

        assert!(remove_directory_recursively(&target).unwrap());
        assert!(!target.exists());
        assert!(!remove_directory_recursively(&target).unwrap());
    }

    #[test]
    fn test_remove_directory_guards_protected_file() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap().join("app");
        touch(&root.join("bin/helper"));

        let protected = root.join("bin/helper");
        let result = remove_tree(&root, Some(protected.as_path()));
        assert!(matches!(result, Err(HelperError::SelfRemoval(ref p)) if *p == protected));
        assert!(protected.exists());
    }

    #[test]
    fn test_get_base64_image() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("pixel.png");
        let bytes = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        fs::write(&png, bytes).unwrap();

        assert_eq!(
            get_base64_image(&png).unwrap(),
            "data:image/png;base64,iVBORw0KGgo="
        );

        let jpg = dir.path().join("photo.JPG");
        fs::write(&jpg, b"abc").unwrap();
        assert_eq!(get_base64_image(&jpg).unwrap(), "data:image/jpeg;base64,YWJj");

        let blob = dir.path().join("blob");
        fs::write(&blob, b"").unwrap();
        assert_eq!(
            get_base64_image(&blob).unwrap(),
            "data:application/octet-stream;base64,"
        );

        assert!(get_base64_image(dir.path().join("missing.png")).unwrap_err().is_io_error());
    }

    fn write_archive(path: &Path) {
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        writer.start_file("test.txt", options).unwrap();
        writer.write_all(b"hello").unwrap();
        writer.add_directory("nested/", options).unwrap();
        writer.start_file("nested/inner.txt", options).unwrap();
        writer.write_all(b"inner").unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn test_unzip() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("test.zip");
        write_archive(&archive);
        let extract_to = dir.path().join("output").join("test");

        assert!(!unzip(&archive, ""));
        assert!(unzip(&archive, &extract_to));
        assert_eq!(fs::read_to_string(extract_to.join("test.txt")).unwrap(), "hello");
        assert_eq!(
            fs::read_to_string(extract_to.join("nested/inner.txt")).unwrap(),
            "inner"
        );
        assert!(remove_directory_recursively(&extract_to).unwrap());
    }

    #[test]
    fn test_unzip_failures() {
        let dir = TempDir::new().unwrap();
        assert!(!unzip(dir.path().join("missing.zip"), dir.path().join("out")));

        let bogus = dir.path().join("bogus.zip");
        fs::write(&bogus, b"not a zip archive").unwrap();
        assert!(!unzip(&bogus, dir.path().join("out")));
        assert!(!dir.path().join("out").exists());
    }
}
