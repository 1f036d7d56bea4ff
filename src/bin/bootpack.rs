//! bootpack CLI
//!
//! Assembles an executable Spring Boot archive from a project directory.
//!
//! # Usage
//!
//! ```bash
//! # JAR from the project in the current directory
//! bootpack jar
//!
//! # WAR with an extra container-provided library, written elsewhere
//! bootpack war --project app --dest out --provided-lib tomcat-embed-core.jar
//!
//! # Extra manifest attributes, with the per-entry listing
//! bootpack jar --manifest Implementation-Title=app -vv
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use bootpack::util::launcher_class;
use bootpack::{ArchiveKind, Assembled, BootConfigBuilder, BootJar, BootWar, Logger, Project};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bootpack")]
#[command(author, version, about = "Spring Boot executable archive builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// More output (-v debug, -vv per-entry trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only warnings
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// No output at all
    #[arg(long, global = true)]
    silent: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an executable JAR
    Jar(ArchiveArgs),

    /// Build an executable WAR
    War {
        #[command(flatten)]
        archive: ArchiveArgs,

        /// Library packaged into WEB-INF/lib-provided (repeatable)
        #[arg(long = "provided-lib", value_name = "JAR")]
        provided_libs: Vec<PathBuf>,
    },
}

#[derive(Args)]
struct ArchiveArgs {
    /// Project directory containing bootpack.toml
    #[arg(long, default_value = ".")]
    project: PathBuf,

    /// Destination directory (default: <project>/build/dist)
    #[arg(long, value_name = "DIR")]
    dest: Option<PathBuf>,

    /// Archive file name (default: <name>-<version>-boot.<ext>)
    #[arg(long, value_name = "FILE")]
    name: Option<String>,

    /// Application main class, overriding bootpack.toml
    #[arg(long)]
    main_class: Option<String>,

    /// Spring Boot loader jar, in addition to lib/standalone (repeatable)
    #[arg(long = "launcher-lib", value_name = "JAR")]
    launcher_libs: Vec<PathBuf>,

    /// Extra manifest attribute (repeatable)
    #[arg(long = "manifest", value_name = "KEY=VALUE", value_parser = parse_attribute)]
    manifest: Vec<(String, String)>,
}

fn main() {
    let cli = Cli::parse();
    let level = verbosity(cli.verbose, cli.quiet);
    init_tracing(level);
    let logger = Logger::tracing().with_level(level).silent(cli.silent);

    let result = match cli.command {
        Commands::Jar(args) => cmd_jar(args, logger),
        Commands::War {
            archive,
            provided_libs,
        } => cmd_war(archive, provided_libs, logger),
    };

    match result {
        Ok(assembled) => {
            if !cli.silent {
                println!(
                    "{} [{}]",
                    assembled.path.display(),
                    assembled.human_size()
                );
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn verbosity(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::WARN,
        (false, 0) => LevelFilter::INFO,
        (false, 1) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

fn init_tracing(level: LevelFilter) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

fn cmd_jar(args: ArchiveArgs, logger: Logger) -> Result<Assembled> {
    let project = load_project(&args)?;
    let builder = project.jar_config()?;
    let config = apply_overrides(builder, &project, args, ArchiveKind::Jar)?.build();

    BootJar::new(config)
        .with_logger(logger)
        .execute()
        .with_context(|| format!("building executable JAR for '{}'", project.name))
}

fn cmd_war(args: ArchiveArgs, provided_libs: Vec<PathBuf>, logger: Logger) -> Result<Assembled> {
    let project = load_project(&args)?;
    let builder = project.war_config()?.provided_libs(provided_libs);
    let config = apply_overrides(builder, &project, args, ArchiveKind::War)?.build();

    BootWar::new(config)
        .with_logger(logger)
        .execute()
        .with_context(|| format!("building executable WAR for '{}'", project.name))
}

fn load_project(args: &ArchiveArgs) -> Result<Project> {
    Project::load(&args.project)
        .with_context(|| format!("loading project from '{}'", args.project.display()))
}

fn apply_overrides(
    mut builder: BootConfigBuilder,
    project: &Project,
    args: ArchiveArgs,
    kind: ArchiveKind,
) -> Result<BootConfigBuilder> {
    if let Some(main_class) = args.main_class {
        builder = builder.main_class(main_class);
    }
    if let Some(dest) = args.dest {
        builder = builder.destination_directory(dest);
    }
    if let Some(name) = args.name {
        builder = builder.destination_file_name(name);
    }

    if !args.launcher_libs.is_empty() {
        // Resolve again so an extra loader can switch the launcher package.
        if project.launcher_class.is_none() {
            let mut loaders = project.standalone_jars.clone();
            loaders.extend(args.launcher_libs.iter().cloned());
            let resolved = launcher_class(loaders.as_slice(), kind.launcher_name());
            builder = builder.launcher_class(resolved);
        }
        builder = builder
            .launcher_libs(args.launcher_libs)
            .context("adding launcher libraries")?;
    }

    builder
        .manifest_attributes(args.manifest)
        .context("adding manifest attributes")
}
