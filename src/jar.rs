//! Executable JAR assembly.
//!
//! Layout: `BOOT-INF/classes`, `BOOT-INF/lib`, the loader classes at the
//! archive root, and `META-INF/MANIFEST.MF`.

use std::path::Path;

use crate::archive::{Archiver, StoredZip};
use crate::config::BootConfig;
use crate::error::Result;
use crate::logger::Logger;
use crate::pipeline::{self, ArchiveKind, Assembled};
use crate::project::Project;
use crate::staging::{Stager, LIB_DIR};

/// Builds a Spring Boot executable JAR.
pub struct BootJar {
    config: BootConfig,
    logger: Logger,
    archiver: Box<dyn Archiver>,
}

impl BootJar {
    pub fn new(config: BootConfig) -> Self {
        Self {
            config,
            logger: Logger::default(),
            archiver: Box::new(StoredZip),
        }
    }

    /// Configure entirely from a project's conventions.
    pub fn from_project(project: &Project) -> Result<Self> {
        Ok(Self::new(project.jar_config()?.build()))
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_archiver(mut self, archiver: impl Archiver + 'static) -> Self {
        self.archiver = Box::new(archiver);
        self
    }

    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    /// Assemble the JAR.
    pub fn execute(&self) -> Result<Assembled> {
        if !self.config.provided_libs().is_empty() {
            self.logger.warn(format!(
                "Ignoring {} provided libraries: they are only packaged into WAR archives",
                self.config.provided_libs().len()
            ));
        }

        pipeline::run(
            &self.config,
            &self.logger,
            self.archiver.as_ref(),
            ArchiveKind::Jar,
            stage,
        )
    }
}

fn stage(stager: &Stager<'_>, staging: &Path) -> Result<()> {
    let boot_inf = stager.create_dir(staging, ArchiveKind::Jar.inf_dir())?;

    let classes = stager.create_classes_dir(&boot_inf)?;
    stager.copy_source_trees(&classes)?;

    let lib = stager.create_lib_dir(&boot_inf, LIB_DIR)?;
    stager.copy_libraries(stager.config().inf_libs(), &lib)?;

    stager.extract_loader(staging)
}
