//! Lifecycle shared by JAR and WAR assembly.
//!
//! ```text
//! Configured ──validate──▶ Staging ──▶ Archiving ──▶ Done
//!      │                      │            │
//!      └──────────────────────┴────────────┴──────▶ Failed
//! ```
//!
//! The staging directory is a [`tempfile::TempDir`] with a unique name, so
//! it is removed on every exit path, including early returns through `?`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::archive::Archiver;
use crate::config::BootConfig;
use crate::error::{BootError, IoContext, Result};
use crate::logger::Logger;
use crate::staging::Stager;
use crate::util::{format_size, mkdirs};

/// Archive flavour: decides the INF directory and naming conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Jar,
    War,
}

impl ArchiveKind {
    /// `BOOT-INF` or `WEB-INF`.
    pub fn inf_dir(self) -> &'static str {
        match self {
            Self::Jar => "BOOT-INF",
            Self::War => "WEB-INF",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jar => "jar",
            Self::War => "war",
        }
    }

    /// Short launcher class name used when resolving from loader libraries.
    pub fn launcher_name(self) -> &'static str {
        match self {
            Self::Jar => "JarLauncher",
            Self::War => "WarLauncher",
        }
    }

    fn staging_prefix(self) -> &'static str {
        match self {
            Self::Jar => "bootjar",
            Self::War => "bootwar",
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jar => f.write_str("JAR"),
            Self::War => f.write_str("WAR"),
        }
    }
}

/// A successfully written archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    pub path: PathBuf,
    pub size: u64,
}

impl Assembled {
    pub fn human_size(&self) -> String {
        format_size(self.size)
    }
}

/// Validate, stage with `stage`, archive, and clean up.
pub(crate) fn run<F>(
    config: &BootConfig,
    logger: &Logger,
    archiver: &dyn Archiver,
    kind: ArchiveKind,
    stage: F,
) -> Result<Assembled>
where
    F: FnOnce(&Stager<'_>, &Path) -> Result<()>,
{
    config.validate()?;
    let (Some(destination_directory), Some(archive)) =
        (config.destination_directory(), config.archive_path())
    else {
        return Err(BootError::config("Destination required."));
    };

    let staging = create_staging_dir(config, kind)?;
    logger.debug(format!("Staging {kind} in {}", staging.path().display()));

    let result = stage_and_archive(
        config,
        logger,
        archiver,
        staging.path(),
        destination_directory,
        &archive,
        stage,
    );

    let staging_path = staging.path().to_path_buf();
    let cleanup = staging
        .close()
        .io_context(|| format!("removing staging directory {}", staging_path.display()));
    let path = result?;
    cleanup?;

    let size = fs::metadata(&path)
        .io_context(|| format!("reading size of {}", path.display()))?
        .len();
    let assembled = Assembled { path, size };

    logger.info(format!(
        "The executable {kind} ({}) was created in: {} [{}]",
        config.destination_file_name().unwrap_or_default(),
        destination_directory.display(),
        assembled.human_size()
    ));
    Ok(assembled)
}

fn create_staging_dir(config: &BootConfig, kind: ArchiveKind) -> Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(kind.staging_prefix());

    match config.staging_parent() {
        Some(parent) => {
            mkdirs(parent)?;
            builder
                .tempdir_in(parent)
                .io_context(|| format!("creating staging directory in {}", parent.display()))
        }
        None => builder
            .tempdir()
            .io_context(|| "creating staging directory".to_string()),
    }
}

fn stage_and_archive<F>(
    config: &BootConfig,
    logger: &Logger,
    archiver: &dyn Archiver,
    staging: &Path,
    destination_directory: &Path,
    archive: &Path,
    stage: F,
) -> Result<PathBuf>
where
    F: FnOnce(&Stager<'_>, &Path) -> Result<()>,
{
    let stager = Stager::new(config, logger);
    stage(&stager, staging)?;
    stager.write_manifest(staging)?;

    mkdirs(destination_directory)?;
    logger.debug(format!(
        "\tStaging     -> {} [exists={}]\n\tDestination -> {} [exists={}]\n\tArchive     -> {}\n\tLauncher    -> {}",
        staging.display(),
        staging.exists(),
        destination_directory.display(),
        destination_directory.exists(),
        config.destination_file_name().unwrap_or_default(),
        config.launcher_class().unwrap_or_default(),
    ));

    archiver.create(staging, archive, logger)
}
