//! Executable WAR assembly.
//!
//! Same pipeline as [`crate::jar`] with `WEB-INF` in place of `BOOT-INF`
//! and an extra `WEB-INF/lib-provided` directory for container-provided
//! libraries.

use std::path::Path;

use crate::archive::{Archiver, StoredZip};
use crate::config::BootConfig;
use crate::error::Result;
use crate::logger::Logger;
use crate::pipeline::{self, ArchiveKind, Assembled};
use crate::project::Project;
use crate::staging::{Stager, LIB_DIR, PROVIDED_LIB_DIR};

/// Builds a Spring Boot executable WAR.
pub struct BootWar {
    config: BootConfig,
    logger: Logger,
    archiver: Box<dyn Archiver>,
}

impl BootWar {
    pub fn new(config: BootConfig) -> Self {
        Self {
            config,
            logger: Logger::default(),
            archiver: Box::new(StoredZip),
        }
    }

    pub fn from_project(project: &Project) -> Result<Self> {
        Ok(Self::new(project.war_config()?.build()))
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

    pub fn execute(&self) -> Result<Assembled> {
        pipeline::run(
            &self.config,
            &self.logger,
            self.archiver.as_ref(),
            ArchiveKind::War,
            stage,
        )
    }
}

fn stage(stager: &Stager<'_>, staging: &Path) -> Result<()> {
    let config = stager.config();
    let web_inf = stager.create_dir(staging, ArchiveKind::War.inf_dir())?;

    let classes = stager.create_classes_dir(&web_inf)?;
    stager.copy_source_trees(&classes)?;

    let lib = stager.create_lib_dir(&web_inf, LIB_DIR)?;
    stager.copy_libraries(config.inf_libs(), &lib)?;

    let provided = stager.create_lib_dir(&web_inf, PROVIDED_LIB_DIR)?;
    stager.copy_libraries(config.provided_libs(), &provided)?;

    stager.extract_loader(staging)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{archive_entries, touch, write_loader_jar, LOADER_ENTRIES};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_war_execute() {
        let temp = TempDir::new().unwrap();
        let loader = write_loader_jar(temp.path(), "spring-boot-loader-3.5.4.jar");
        let classes = temp.path().join("build/main");
        touch(&classes.join("com/example/Foo.class"), "foo");
        let lib = temp.path().join("lib/compile/spring-boot-3.5.4.jar");
        touch(&lib, "boot");
        let provided = temp.path().join("lib/provided/LatencyUtils-2.0.3.jar");
        touch(&provided, "latency");

        let config = BootConfig::builder()
            .main_class("com.example.Foo")
            .launcher_class("org.springframework.boot.loader.launch.WarLauncher")
            .launcher_libs([loader])
            .unwrap()
            .source_directory(classes)
            .inf_lib(lib)
            .provided_libs([provided])
            .destination_directory(temp.path().join("dist"))
            .destination_file_name("foo-0.0.1-boot.war")
            .staging_parent(temp.path().join("tmp"))
            .build();

        let assembled = BootWar::new(config)
            .with_logger(Logger::default().silent(true))
            .execute()
            .unwrap();

        let mut expected: Vec<String> = [
            "META-INF/",
            "META-INF/MANIFEST.MF",
            "WEB-INF/",
            "WEB-INF/classes/",
            "WEB-INF/classes/com/",
            "WEB-INF/classes/com/example/",
            "WEB-INF/classes/com/example/Foo.class",
            "WEB-INF/lib/",
            "WEB-INF/lib/spring-boot-3.5.4.jar",
            "WEB-INF/lib-provided/",
            "WEB-INF/lib-provided/LatencyUtils-2.0.3.jar",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        expected.extend(LOADER_ENTRIES.iter().map(|s| s.to_string()));

        assert_eq!(archive_entries(&assembled.path), expected);
        assert!(assembled.path.ends_with("dist/foo-0.0.1-boot.war"));
        assert_eq!(
            fs::read_dir(temp.path().join("tmp")).unwrap().count(),
            0,
            "staging directory removed"
        );
    }

    #[test]
    fn test_missing_provided_lib_is_skipped() {
        let temp = TempDir::new().unwrap();
        let loader = write_loader_jar(temp.path(), "spring-boot-loader-2.7.18.jar");

        let config = BootConfig::builder()
            .main_class("com.example.Foo")
            .launcher_class("org.springframework.boot.loader.WarLauncher")
            .launcher_libs([loader])
            .unwrap()
            .provided_libs([temp.path().join("lib/provided/missing.jar")])
            .destination_directory(temp.path().join("dist"))
            .destination_file_name("foo.war")
            .build();

        let assembled = BootWar::new(config)
            .with_logger(Logger::default().silent(true))
            .execute()
            .unwrap();

        let entries = archive_entries(&assembled.path);
        assert!(entries.contains(&"WEB-INF/lib-provided/".to_string()));
        assert!(!entries.iter().any(|e| e.ends_with("missing.jar")));
    }
}
