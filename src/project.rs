//! Project model and `bootpack.toml` descriptor.
//!
//! A [`Project`] stands in for the host build tool: it knows the project
//! name, version and main class, where compiled classes and resources live,
//! and which jars sit on each classpath scope. Conventions:
//!
//! ```text
//! <work>/bootpack.toml
//! <work>/build/main            compiled classes
//! <work>/src/main/resources    resources
//! <work>/build/dist            archive destination
//! <work>/lib/<scope>/*.jar     compile, runtime, standalone, provided
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::BootConfigBuilder;
use crate::error::{BootError, IoContext, Result};
use crate::pipeline::ArchiveKind;
use crate::util::launcher_class;

pub const DESCRIPTOR_FILE: &str = "bootpack.toml";

/// Dependency scope; each maps to `lib/<scope>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Compile,
    Runtime,
    /// Loader libraries extracted into the archive root.
    Standalone,
    Provided,
}

impl Scope {
    pub const ALL: [Scope; 4] = [
        Scope::Compile,
        Scope::Runtime,
        Scope::Standalone,
        Scope::Provided,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Runtime => "runtime",
            Scope::Standalone => "standalone",
            Scope::Provided => "provided",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DescriptorToml {
    name: String,
    version: String,
    main_class: Option<String>,
    archive_base_name: Option<String>,
    launcher_class: Option<String>,
    #[serde(default)]
    manifest: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub work_directory: PathBuf,
    pub name: String,
    pub version: String,
    pub main_class: Option<String>,
    /// Defaults to `name`.
    pub archive_base_name: Option<String>,
    /// Overrides launcher resolution from the standalone jars.
    pub launcher_class: Option<String>,
    /// Extra manifest attributes.
    pub manifest: BTreeMap<String, String>,
    pub compile_jars: Vec<PathBuf>,
    pub runtime_jars: Vec<PathBuf>,
    pub standalone_jars: Vec<PathBuf>,
    pub provided_jars: Vec<PathBuf>,
}

impl Project {
    pub fn new(
        work_directory: impl Into<PathBuf>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            work_directory: work_directory.into(),
            name: name.into(),
            version: version.into(),
            main_class: None,
            archive_base_name: None,
            launcher_class: None,
            manifest: BTreeMap::new(),
            compile_jars: Vec::new(),
            runtime_jars: Vec::new(),
            standalone_jars: Vec::new(),
            provided_jars: Vec::new(),
        }
    }

    /// Read `<work>/bootpack.toml` and discover jars under `<work>/lib`.
    pub fn load(work_directory: &Path) -> Result<Self> {
        let path = work_directory.join(DESCRIPTOR_FILE);
        let text = fs::read_to_string(&path)
            .io_context(|| format!("reading project descriptor {}", path.display()))?;
        let parsed: DescriptorToml = toml::from_str(&text).map_err(|e| {
            BootError::config(format!("parsing project descriptor {}: {e}", path.display()))
        })?;

        let mut project = Self::new(work_directory, parsed.name, parsed.version);
        project.main_class = parsed.main_class;
        project.archive_base_name = parsed.archive_base_name;
        project.launcher_class = parsed.launcher_class;
        project.manifest = parsed.manifest;
        project.discover_jars()?;
        Ok(project)
    }

    /// Replace the classpath lists with the jars found in `lib/<scope>`.
    pub fn discover_jars(&mut self) -> Result<()> {
        for scope in Scope::ALL {
            let jars = jars_in(&self.lib_directory(scope))?;
            *self.jars_mut(scope) = jars;
        }
        Ok(())
    }

    pub fn jars(&self, scope: Scope) -> &[PathBuf] {
        match scope {
            Scope::Compile => &self.compile_jars,
            Scope::Runtime => &self.runtime_jars,
            Scope::Standalone => &self.standalone_jars,
            Scope::Provided => &self.provided_jars,
        }
    }

    fn jars_mut(&mut self, scope: Scope) -> &mut Vec<PathBuf> {
        match scope {
            Scope::Compile => &mut self.compile_jars,
            Scope::Runtime => &mut self.runtime_jars,
            Scope::Standalone => &mut self.standalone_jars,
            Scope::Provided => &mut self.provided_jars,
        }
    }

    pub fn lib_directory(&self, scope: Scope) -> PathBuf {
        self.work_directory.join("lib").join(scope.dir_name())
    }

    pub fn build_main_directory(&self) -> PathBuf {
        self.work_directory.join("build").join("main")
    }

    pub fn src_main_resources_directory(&self) -> PathBuf {
        self.work_directory.join("src").join("main").join("resources")
    }

    pub fn build_dist_directory(&self) -> PathBuf {
        self.work_directory.join("build").join("dist")
    }

    pub fn archive_base_name(&self) -> &str {
        self.archive_base_name.as_deref().unwrap_or(&self.name)
    }

    /// The project's own (non-executable) jar, `<base>-<version>.jar`.
    pub fn jar_file_name(&self) -> String {
        format!("{}-{}.jar", self.archive_base_name(), self.version)
    }

    /// `<base>-<version>-boot.jar` or `<base>-<version>-boot.war`.
    pub fn boot_file_name(&self, kind: ArchiveKind) -> String {
        format!(
            "{}-{}-boot.{}",
            self.archive_base_name(),
            self.version,
            kind.extension()
        )
    }

    /// Resolved launcher class for `kind`, unless overridden.
    pub fn launcher_class_for(&self, kind: ArchiveKind) -> String {
        match &self.launcher_class {
            Some(class_name) => class_name.clone(),
            None => launcher_class(self.standalone_jars.as_slice(), kind.launcher_name()),
        }
    }

    /// Builder preloaded with the executable JAR conventions.
    pub fn jar_config(&self) -> Result<BootConfigBuilder> {
        self.base_config(ArchiveKind::Jar)
    }

    /// Builder preloaded with the executable WAR conventions.
    ///
    /// In addition to the JAR inputs, the project's own distribution jar
    /// goes into `WEB-INF/lib` and provided jars into `WEB-INF/lib-provided`.
    pub fn war_config(&self) -> Result<BootConfigBuilder> {
        Ok(self
            .base_config(ArchiveKind::War)?
            .inf_lib(self.build_dist_directory().join(self.jar_file_name()))
            .provided_libs(&self.provided_jars))
    }

    fn base_config(&self, kind: ArchiveKind) -> Result<BootConfigBuilder> {
        let mut builder = BootConfigBuilder::new();
        if let Some(main_class) = &self.main_class {
            builder = builder.main_class(main_class.as_str());
        }

        builder
            .launcher_class(self.launcher_class_for(kind))
            .launcher_libs(&self.standalone_jars)?
            .inf_libs(&self.compile_jars)
            .inf_libs(&self.runtime_jars)
            .source_directories([
                self.build_main_directory(),
                self.src_main_resources_directory(),
            ])
            .destination_directory(self.build_dist_directory())
            .destination_file_name(self.boot_file_name(kind))
            .manifest_attributes(&self.manifest)
    }
}

fn jars_in(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut jars = Vec::new();
    for entry in fs::read_dir(dir).io_context(|| format!("reading {}", dir.display()))? {
        let entry = entry.io_context(|| format!("reading {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "jar") {
            jars.push(path);
        }
    }
    jars.sort();
    Ok(jars)
}
