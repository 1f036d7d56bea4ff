//! Fixtures shared by the unit tests.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const LOADER_ENTRIES: &[&str] = &[
    "org/",
    "org/springframework/",
    "org/springframework/boot/",
    "org/springframework/boot/loader/",
    "org/springframework/boot/loader/jar/",
    "org/springframework/boot/loader/jar/NestedJarFile.class",
    "org/springframework/boot/loader/launch/",
    "org/springframework/boot/loader/launch/JarLauncher.class",
    "org/springframework/boot/loader/launch/WarLauncher.class",
];

/// Write a small loader jar that carries its own `META-INF`.
pub fn write_loader_jar(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.add_directory("META-INF/", options).unwrap();
    zip.start_file("META-INF/MANIFEST.MF", options).unwrap();
    zip.write_all(b"Manifest-Version: 1.0\nCreated-By: loader\n")
        .unwrap();
    zip.add_directory("META-INF/maven/", options).unwrap();

    for entry in LOADER_ENTRIES {
        if entry.ends_with('/') {
            zip.add_directory(*entry, options).unwrap();
        } else {
            zip.start_file(*entry, options).unwrap();
            zip.write_all(b"\xCA\xFE\xBA\xBE").unwrap();
        }
    }

    zip.finish().unwrap();
    path
}

/// Write a file, creating parent directories.
pub fn touch(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Entry names of an archive, in archive order.
pub fn archive_entries(archive: &Path) -> Vec<String> {
    let mut zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
    (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect()
}
