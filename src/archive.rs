//! Archive creation.
//!
//! Packs a staged directory into a single zip-format file. Entries are
//! stored uncompressed, directory entries are included, and the
//! `META-INF/` entries come first so stream readers find the manifest
//! before anything else.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{BootError, Result};
use crate::logger::Logger;
use crate::staging::META_INF_DIR;

/// Packs a staging directory into an archive file.
pub trait Archiver {
    /// Create (or replace) `archive` from everything under `staging`.
    ///
    /// Returns the absolute path of the written archive.
    fn create(&self, staging: &Path, archive: &Path, logger: &Logger) -> Result<PathBuf>;
}

/// Store-only zip archiver.
#[derive(Debug, Default, Clone, Copy)]
pub struct StoredZip;

impl Archiver for StoredZip {
    fn create(&self, staging: &Path, archive: &Path, logger: &Logger) -> Result<PathBuf> {
        let fail = |message: String| BootError::Archive {
            archive: archive.to_path_buf(),
            message,
        };

        let entries = collect_entries(staging).map_err(|e| fail(e.to_string()))?;
        if let Err(e) = write_zip(&entries, archive, logger) {
            let _ = fs::remove_file(archive);
            return Err(fail(e.to_string()));
        }

        fs::canonicalize(archive).map_err(|e| fail(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    /// Archive name, `/`-separated, with a trailing `/` for directories.
    name: String,
    path: PathBuf,
    is_dir: bool,
}

fn collect_entries(staging: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(staging).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(staging)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let mut parts = Vec::new();
        for component in relative.components() {
            let Some(part) = component.as_os_str().to_str() else {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("file name is not valid UTF-8: {}", entry.path().display()),
                ));
            };
            parts.push(part);
        }
        let mut name = parts.join("/");
        let is_dir = entry.file_type().is_dir();
        if is_dir {
            name.push('/');
        }
        entries.push(Entry {
            name,
            path: entry.into_path(),
            is_dir,
        });
    }

    let meta_inf = format!("{META_INF_DIR}/");
    entries.sort_by_key(|e| !e.name.starts_with(&meta_inf));
    Ok(entries)
}

fn write_zip(entries: &[Entry], archive: &Path, logger: &Logger) -> io::Result<()> {
    let file = File::create(archive)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for entry in entries {
        logger.trace(format!("adding: {}", entry.name));
        if entry.is_dir {
            zip.add_directory(entry.name.as_str(), options)?;
            continue;
        }

        let size = fs::metadata(&entry.path)?.len();
        zip.start_file(
            entry.name.as_str(),
            options.large_file(size >= u64::from(u32::MAX)),
        )?;
        let mut input = File::open(&entry.path)?;
        io::copy(&mut input, &mut zip)?;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::archive_entries;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn staged(temp: &TempDir) -> PathBuf {
        let root = temp.path().join("staging");
        fs::create_dir_all(root.join("BOOT-INF/classes/com/example")).unwrap();
        fs::create_dir_all(root.join("META-INF")).unwrap();
        fs::create_dir_all(root.join("org/springframework")).unwrap();
        fs::write(root.join("BOOT-INF/classes/com/example/Foo.class"), "foo").unwrap();
        fs::write(root.join("META-INF/MANIFEST.MF"), "Manifest-Version: 1.0\n").unwrap();
        fs::write(root.join("org/springframework/Launcher.class"), "launcher").unwrap();
        root
    }

    #[test]
    fn test_stored_zip_layout() {
        let temp = TempDir::new().unwrap();
        let root = staged(&temp);
        let archive = temp.path().join("app.jar");

        let written = StoredZip
            .create(&root, &archive, &Logger::default().silent(true))
            .unwrap();

        assert!(written.is_absolute());
        assert_eq!(
            archive_entries(&archive),
            vec![
                "META-INF/",
                "META-INF/MANIFEST.MF",
                "BOOT-INF/",
                "BOOT-INF/classes/",
                "BOOT-INF/classes/com/",
                "BOOT-INF/classes/com/example/",
                "BOOT-INF/classes/com/example/Foo.class",
                "org/",
                "org/springframework/",
                "org/springframework/Launcher.class",
            ]
        );
    }

    #[test]
    fn test_entries_are_stored() {
        let temp = TempDir::new().unwrap();
        let root = staged(&temp);
        let archive = temp.path().join("app.jar");

        StoredZip
            .create(&root, &archive, &Logger::default().silent(true))
            .unwrap();

        let mut zip = ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        for i in 0..zip.len() {
            assert_eq!(
                zip.by_index(i).unwrap().compression(),
                CompressionMethod::Stored
            );
        }
        let mut content = String::new();
        zip.by_name("BOOT-INF/classes/com/example/Foo.class")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "foo");
    }

    #[test]
    fn test_recreates_existing_archive() {
        let temp = TempDir::new().unwrap();
        let root = staged(&temp);
        let archive = temp.path().join("app.jar");
        fs::write(&archive, "stale").unwrap();

        StoredZip
            .create(&root, &archive, &Logger::default().silent(true))
            .unwrap();

        assert_eq!(archive_entries(&archive).len(), 10);
    }

    #[test]
    fn test_unwritable_destination_is_archive_error() {
        let temp = TempDir::new().unwrap();
        let root = staged(&temp);
        let archive = temp.path().join("no-such-dir/app.jar");

        let err = StoredZip
            .create(&root, &archive, &Logger::default().silent(true))
            .unwrap_err();

        assert!(matches!(err, BootError::Archive { .. }));
        assert!(err.to_string().contains("app.jar"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_file_name_is_archive_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        let root = staged(&temp);
        let classes = root.join("BOOT-INF/classes");
        fs::write(classes.join(OsStr::from_bytes(b"Bad\xFF.class")), "bad").unwrap();
        let archive = temp.path().join("app.jar");

        let err = StoredZip
            .create(&root, &archive, &Logger::default().silent(true))
            .unwrap_err();

        assert!(matches!(err, BootError::Archive { .. }));
        assert!(err.to_string().contains("not valid UTF-8"));
        assert!(!archive.exists());
    }
}
