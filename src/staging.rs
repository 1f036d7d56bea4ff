//! Staging engine.
//!
//! Populates a staging directory that mirrors the final archive layout:
//!
//! ```text
//! <staging>/
//!     META-INF/MANIFEST.MF
//!     <INF>/classes/**        (source trees, merged)
//!     <INF>/lib/*.jar         (dependency libraries)
//!     <INF>/lib-provided/*.jar (WAR only)
//!     org/springframework/boot/loader/**  (extracted loader)
//! ```
//!
//! Required inputs are strict, optional ones are best-effort: a missing
//! source directory or library is logged as a warning and skipped, while a
//! library that would overwrite an already staged file aborts staging.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::ZipArchive;

use crate::config::BootConfig;
use crate::error::{BootError, IoContext, Result};
use crate::logger::Logger;
use crate::util::{absolute, mkdirs};

pub const META_INF_DIR: &str = "META-INF";
pub const MANIFEST_FILE: &str = "MANIFEST.MF";
pub const CLASSES_DIR: &str = "classes";
pub const LIB_DIR: &str = "lib";
pub const PROVIDED_LIB_DIR: &str = "lib-provided";

/// Staging steps over one configuration.
pub struct Stager<'a> {
    config: &'a BootConfig,
    logger: &'a Logger,
}

impl<'a> Stager<'a> {
    pub fn new(config: &'a BootConfig, logger: &'a Logger) -> Self {
        Self { config, logger }
    }

    pub fn config(&self) -> &'a BootConfig {
        self.config
    }

    /// Ensure `parent/name` exists and return it.
    pub fn create_dir(&self, parent: &Path, name: &str) -> Result<PathBuf> {
        let dir = parent.join(name);
        mkdirs(&dir)?;
        Ok(dir)
    }

    /// `<INF>/classes`
    pub fn create_classes_dir(&self, inf_dir: &Path) -> Result<PathBuf> {
        self.create_dir(inf_dir, CLASSES_DIR)
    }

    /// `<INF>/lib` or `<INF>/lib-provided`
    pub fn create_lib_dir(&self, inf_dir: &Path, name: &str) -> Result<PathBuf> {
        self.create_dir(inf_dir, name)
    }

    /// Merge every configured source directory into `classes_dir`.
    ///
    /// When two source directories hold the same relative path, the later
    /// directory wins, even if one holds a file and the other a directory.
    pub fn copy_source_trees(&self, classes_dir: &Path) -> Result<()> {
        for dir in self.config.source_directories() {
            if dir.is_dir() {
                self.copy_tree(dir, classes_dir)?;
            } else {
                self.logger
                    .warn(format!("Directory not found: {}", absolute(dir).display()));
            }
        }
        Ok(())
    }

    fn copy_tree(&self, src: &Path, dst: &Path) -> Result<()> {
        self.logger.debug(format!(
            "Copying {} -> {}",
            src.display(),
            dst.display()
        ));

        for entry in WalkDir::new(src)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry
                .map_err(io::Error::from)
                .io_context(|| format!("walking {}", src.display()))?;
            let Ok(relative) = entry.path().strip_prefix(src) else {
                continue;
            };
            let target = dst.join(relative);

            if entry.file_type().is_dir() {
                if target.exists() && !target.is_dir() {
                    self.log_overwrite(&target, entry.path());
                    fs::remove_file(&target)
                        .io_context(|| format!("removing {}", target.display()))?;
                }
                mkdirs(&target)?;
                continue;
            }

            if target.is_dir() {
                self.log_overwrite(&target, entry.path());
                fs::remove_dir_all(&target)
                    .io_context(|| format!("removing {}", target.display()))?;
            } else if target.exists() {
                self.log_overwrite(&target, entry.path());
            }
            fs::copy(entry.path(), &target).io_context(|| {
                format!(
                    "copying {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
        }

        Ok(())
    }

    fn log_overwrite(&self, target: &Path, source: &Path) {
        self.logger.debug(format!(
            "Overwriting {} with {}",
            target.display(),
            source.display()
        ));
    }

    /// Copy each library into `lib_dir` under its base file name.
    ///
    /// Returns the number of libraries copied.
    pub fn copy_libraries(&self, libs: &[PathBuf], lib_dir: &Path) -> Result<usize> {
        let mut copied = 0;

        for jar in libs {
            if !jar.exists() {
                self.logger
                    .warn(format!("File not found: {}", absolute(jar).display()));
                continue;
            }
            if !jar.is_file() {
                self.logger
                    .warn(format!("Not a file: {}", absolute(jar).display()));
                continue;
            }
            let Some(file_name) = jar.file_name() else {
                self.logger
                    .warn(format!("No file name: {}", jar.display()));
                continue;
            };

            let destination = lib_dir.join(file_name);
            copy_new(jar, &destination)?;
            self.logger.trace(format!("Staged {}", destination.display()));
            copied += 1;
        }

        Ok(copied)
    }

    /// Unpack every loader library into `staging_root`, dropping the
    /// loader's own `META-INF` so the generated manifest is the only one.
    pub fn extract_loader(&self, staging_root: &Path) -> Result<()> {
        let launcher_libs = self.config.launcher_libs();
        if launcher_libs.is_empty() {
            return Err(BootError::config("Spring Boot loader launcher required."));
        }

        let meta_inf_dir = staging_root.join(META_INF_DIR);
        for jar in launcher_libs {
            if !jar.exists() {
                self.logger
                    .warn(format!("File not found: {}", absolute(jar).display()));
                continue;
            }

            unzip(jar, staging_root)?;
            self.logger.debug(format!(
                "Extracted {} into {}",
                jar.display(),
                staging_root.display()
            ));

            if meta_inf_dir.exists() {
                fs::remove_dir_all(&meta_inf_dir)
                    .io_context(|| format!("removing {}", meta_inf_dir.display()))?;
            }
        }

        Ok(())
    }

    /// Write `META-INF/MANIFEST.MF` into `staging_root`.
    pub fn write_manifest(&self, staging_root: &Path) -> Result<PathBuf> {
        let manifest = self.config.manifest()?;
        let meta_inf_dir = self.create_dir(staging_root, META_INF_DIR)?;
        let path = meta_inf_dir.join(MANIFEST_FILE);

        fs::write(&path, manifest.to_text())
            .io_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

/// Copy `src` to `dst`, refusing to replace an existing file.
fn copy_new(src: &Path, dst: &Path) -> Result<()> {
    let mut output = match OpenOptions::new().write(true).create_new(true).open(dst) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(BootError::Collision {
                source_path: src.to_path_buf(),
                destination: dst.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(BootError::Io {
                context: format!("creating {}", dst.display()),
                source: e,
            })
        }
    };

    let mut input = File::open(src).io_context(|| format!("opening {}", src.display()))?;
    io::copy(&mut input, &mut output)
        .io_context(|| format!("copying {} to {}", src.display(), dst.display()))?;
    Ok(())
}

fn unzip(jar: &Path, destination: &Path) -> Result<()> {
    let file = File::open(jar).io_context(|| format!("opening {}", jar.display()))?;
    let mut archive = ZipArchive::new(file)
        .map_err(io::Error::other)
        .io_context(|| format!("reading {}", jar.display()))?;
    archive
        .extract(destination)
        .map_err(io::Error::other)
        .io_context(|| format!("extracting {} into {}", jar.display(), destination.display()))
}
