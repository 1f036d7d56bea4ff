//! Spring Boot executable archive assembly.
//!
//! Builds "fat" JAR and WAR archives that the Spring Boot loader can launch:
//! application classes and resources, dependency jars, the loader classes
//! and a manifest naming the launcher and the application entry point.
//!
//! # Architecture
//!
//! ```text
//! Project (bootpack.toml, lib/<scope>/*.jar)
//!     │
//!     └── jar_config() / war_config() ──▶ BootConfigBuilder ──▶ BootConfig
//!                                                                   │
//! BootJar / BootWar ──▶ pipeline::run ──validate──▶ Stager ──▶ Archiver
//!                                                   (temp dir)   (StoredZip)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use bootpack::{BootJar, Project};
//!
//! let project = Project::load(std::path::Path::new("."))?;
//! let assembled = BootJar::from_project(&project)?.execute()?;
//! println!("{} [{}]", assembled.path.display(), assembled.human_size());
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod jar;
pub mod logger;
pub mod manifest;
pub mod pipeline;
pub mod project;
pub mod staging;
pub mod util;
pub mod war;

#[cfg(test)]
mod test_support;

pub use archive::{Archiver, StoredZip};
pub use config::{BootConfig, BootConfigBuilder};
pub use error::{BootError, Result};
pub use jar::BootJar;
pub use logger::{LogSink, Logger, MemorySink, TracingSink};
pub use manifest::Manifest;
pub use pipeline::{ArchiveKind, Assembled};
pub use project::{Project, Scope};
pub use war::BootWar;
