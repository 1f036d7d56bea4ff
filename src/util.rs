//! Path and size helpers shared by the assembly operations.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IoContext, Result};

const FILE_SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// File name prefix of the Spring Boot loader library.
pub const LOADER_JAR_PREFIX: &str = "spring-boot-loader-";

/// Launcher package used by loaders before 3.2.
pub const LEGACY_LAUNCHER_PACKAGE: &str = "org.springframework.boot.loader";

/// Launcher package used by loaders 3.2 and later.
pub const LAUNCH_LAUNCHER_PACKAGE: &str = "org.springframework.boot.loader.launch";

/// Create a directory and any missing parents.
///
/// A directory that already exists is left alone. Anything else in the way
/// (a regular file, a permission problem) is an I/O error.
pub fn mkdirs(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).io_context(|| format!("Unable to create: {}", absolute(path).display()))
}

/// Best-effort absolute form of `path` for messages.
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Format a byte count in 1024-based units with at most one decimal.
///
/// `0` → `0 B`, `1500` → `1.5 KB`, `5 * 1024 * 1024` → `5 MB`.
pub fn format_size(size: u64) -> String {
    if size == 0 {
        return "0 B".to_string();
    }

    let mut group = 0;
    while group + 1 < FILE_SIZE_UNITS.len() && size >= 1024u64.pow(group as u32 + 1) {
        group += 1;
    }

    let scaled = size as f64 / 1024f64.powi(group as i32);
    let tenths = (scaled * 10.0).round() as u64;
    let whole = group_thousands(tenths / 10);
    match tenths % 10 {
        0 => format!("{} {}", whole, FILE_SIZE_UNITS[group]),
        fraction => format!("{}.{} {}", whole, fraction, FILE_SIZE_UNITS[group]),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Resolve the fully-qualified launcher class for a short name such as
/// `JarLauncher`.
///
/// The first loader library named `spring-boot-loader-X.Y.Z.jar` decides the
/// package: 3.2 and later moved the launchers into `...loader.launch`. With
/// no matching library the legacy package is used.
pub fn launcher_class<P: AsRef<Path>>(launcher_libs: &[P], name: &str) -> String {
    for jar in launcher_libs {
        let Some(file_name) = jar.as_ref().file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some((major, minor, _)) = loader_version(file_name) {
            if (major == 3 && minor >= 2) || major > 3 {
                return format!("{LAUNCH_LAUNCHER_PACKAGE}.{name}");
            }
        }
    }

    format!("{LEGACY_LAUNCHER_PACKAGE}.{name}")
}

/// Version embedded in a `spring-boot-loader-X.Y.Z.jar` file name.
pub fn loader_version(file_name: &str) -> Option<(u32, u32, u32)> {
    let start = file_name.find(LOADER_JAR_PREFIX)? + LOADER_JAR_PREFIX.len();
    let rest = file_name[start..].strip_suffix(".jar")?;

    let mut parts = rest.splitn(3, '.');
    let major = parse_number(parts.next()?)?;
    let minor = parse_number(parts.next()?)?;
    let patch = parse_number(parts.next()?)?;
    Some((major, minor, patch))
}

fn parse_number(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
