//! Assembly configuration.
//!
//! [`BootConfigBuilder`] collects the inputs of one archive build and
//! produces an immutable [`BootConfig`]. Launcher libraries are checked for
//! existence as they are added; everything else is checked by
//! [`BootConfig::validate`] right before staging starts.

use std::path::{Path, PathBuf};

use crate::error::{BootError, Result};
use crate::manifest::{Manifest, MAIN_CLASS, MANIFEST_VERSION, START_CLASS};

pub const DEFAULT_MANIFEST_VERSION: &str = "1.0";

/// Inputs of a single JAR or WAR build.
#[derive(Debug, Clone, Default)]
pub struct BootConfig {
    main_class: Option<String>,
    launcher_class: Option<String>,
    launcher_libs: Vec<PathBuf>,
    inf_libs: Vec<PathBuf>,
    provided_libs: Vec<PathBuf>,
    source_directories: Vec<PathBuf>,
    manifest_attributes: Manifest,
    destination_directory: Option<PathBuf>,
    destination_file_name: Option<String>,
    staging_parent: Option<PathBuf>,
}

impl BootConfig {
    pub fn builder() -> BootConfigBuilder {
        BootConfigBuilder::default()
    }

    pub fn main_class(&self) -> Option<&str> {
        self.main_class.as_deref()
    }

    pub fn launcher_class(&self) -> Option<&str> {
        self.launcher_class.as_deref()
    }

    pub fn launcher_libs(&self) -> &[PathBuf] {
        &self.launcher_libs
    }

    /// Libraries staged into `BOOT-INF/lib` or `WEB-INF/lib`.
    pub fn inf_libs(&self) -> &[PathBuf] {
        &self.inf_libs
    }

    /// Libraries staged into `WEB-INF/lib-provided`. Only WAR assembly reads these.
    pub fn provided_libs(&self) -> &[PathBuf] {
        &self.provided_libs
    }

    pub fn source_directories(&self) -> &[PathBuf] {
        &self.source_directories
    }

    /// Extra attributes supplied by the caller.
    pub fn manifest_attributes(&self) -> &Manifest {
        &self.manifest_attributes
    }

    pub fn destination_directory(&self) -> Option<&Path> {
        self.destination_directory.as_deref()
    }

    pub fn destination_file_name(&self) -> Option<&str> {
        self.destination_file_name.as_deref()
    }

    /// Directory under which the temporary staging directory is created.
    /// `None` means the system temp directory.
    pub fn staging_parent(&self) -> Option<&Path> {
        self.staging_parent.as_deref()
    }

    /// Check that every element required to build the archive is present.
    pub fn validate(&self) -> Result<()> {
        if !has_text(self.main_class.as_deref()) {
            return Err(BootError::config("Project mainClass required."));
        }
        if !has_text(self.launcher_class.as_deref()) {
            return Err(BootError::config(
                "Spring Boot loader launcher class required.",
            ));
        }
        if self.launcher_libs.is_empty() {
            return Err(BootError::config(
                "Spring Boot loader launcher libraries required.",
            ));
        }
        if self.destination_directory.is_none() {
            return Err(BootError::config("Destination directory required."));
        }
        if !has_text(self.destination_file_name.as_deref()) {
            return Err(BootError::config("Destination file name required."));
        }
        self.manifest().map(|_| ())
    }

    /// Manifest written into the archive.
    ///
    /// `Manifest-Version`, `Main-Class` (the launcher) and `Start-Class`
    /// (the application) come first; caller attributes are applied on top.
    pub fn manifest(&self) -> Result<Manifest> {
        let mut manifest = Manifest::new();
        manifest.insert(MANIFEST_VERSION, DEFAULT_MANIFEST_VERSION)?;
        if let Some(launcher) = &self.launcher_class {
            manifest.insert(MAIN_CLASS, launcher.as_str())?;
        }
        if let Some(main) = &self.main_class {
            manifest.insert(START_CLASS, main.as_str())?;
        }
        for (name, value) in self.manifest_attributes.iter() {
            manifest.insert(name, value)?;
        }
        Ok(manifest)
    }

    /// Final archive location, `destination_directory/destination_file_name`.
    pub fn archive_path(&self) -> Option<PathBuf> {
        match (&self.destination_directory, &self.destination_file_name) {
            (Some(dir), Some(name)) => Some(dir.join(name)),
            _ => None,
        }
    }
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Builder for [`BootConfig`].
#[derive(Debug, Clone, Default)]
pub struct BootConfigBuilder {
    config: BootConfig,
}

impl BootConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully-qualified application entry point, written as `Start-Class`.
    pub fn main_class(mut self, class_name: impl Into<String>) -> Self {
        self.config.main_class = Some(class_name.into());
        self
    }

    /// Fully-qualified loader launcher, written as `Main-Class`.
    ///
    /// For example `org.springframework.boot.loader.launch.JarLauncher` or
    /// `org.springframework.boot.loader.WarLauncher`.
    pub fn launcher_class(mut self, class_name: impl Into<String>) -> Self {
        self.config.launcher_class = Some(class_name.into());
        self
    }

    /// Add loader libraries whose contents are extracted into the archive root.
    ///
    /// Fails on the first path that does not exist.
    pub fn launcher_libs<I, P>(mut self, jars: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for jar in jars {
            let jar = jar.into();
            if !jar.exists() {
                return Err(BootError::LauncherNotFound(jar));
            }
            self.config.launcher_libs.push(jar);
        }
        Ok(self)
    }

    pub fn inf_libs<I, P>(mut self, jars: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config.inf_libs.extend(jars.into_iter().map(Into::into));
        self
    }

    pub fn inf_lib(self, jar: impl Into<PathBuf>) -> Self {
        self.inf_libs([jar])
    }

    pub fn provided_libs<I, P>(mut self, jars: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config
            .provided_libs
            .extend(jars.into_iter().map(Into::into));
        self
    }

    pub fn source_directories<I, P>(mut self, directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config
            .source_directories
            .extend(directories.into_iter().map(Into::into));
        self
    }

    pub fn source_directory(self, directory: impl Into<PathBuf>) -> Self {
        self.source_directories([directory])
    }

    /// Add or replace an extra manifest attribute.
    pub fn manifest_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        self.config.manifest_attributes.insert(name, value)?;
        Ok(self)
    }

    pub fn manifest_attributes<I, K, V>(mut self, attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in attributes {
            self.config.manifest_attributes.insert(name, value)?;
        }
        Ok(self)
    }

    /// Directory the archive is written to. Created at archive time if missing.
    pub fn destination_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config.destination_directory = Some(directory.into());
        self
    }

    pub fn destination_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.destination_file_name = Some(name.into());
        self
    }

    pub fn staging_parent(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config.staging_parent = Some(directory.into());
        self
    }

    pub fn build(self) -> BootConfig {
        self.config
    }
}
