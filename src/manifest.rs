//! Archive manifest (`META-INF/MANIFEST.MF`).
//!
//! Attribute names are unique and case-sensitive. Setting an existing name
//! replaces its value in place, so the first-inserted attribute
//! (`Manifest-Version`) stays on the first line.

use std::fmt;

use crate::error::{BootError, Result};

pub const MANIFEST_VERSION: &str = "Manifest-Version";
pub const MAIN_CLASS: &str = "Main-Class";
pub const START_CLASS: &str = "Start-Class";

#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    attributes: Vec<(String, String)>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any previous value.
    ///
    /// Names must be non-empty. Neither names nor values may contain `:`,
    /// line breaks or NUL, since the serialized form has no escaping.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        let value = value.into();
        validate(&name, &value)?;

        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Serialized manifest text, one `Name: Value` line per attribute.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.attributes {
            write!(f, "{name}: {value}{LINE_SEPARATOR}")?;
        }
        Ok(())
    }
}

fn validate(name: &str, value: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(BootError::config("Manifest attribute name required."));
    }
    if let Some(ch) = name.chars().find(|c| is_reserved(*c)) {
        return Err(BootError::config(format!(
            "Invalid manifest attribute name {name:?}: contains {ch:?}"
        )));
    }
    if let Some(ch) = value.chars().find(|c| is_reserved(*c)) {
        return Err(BootError::config(format!(
            "Invalid value for manifest attribute {name}: contains {ch:?}"
        )));
    }
    Ok(())
}

fn is_reserved(ch: char) -> bool {
    matches!(ch, ':' | '\n' | '\r' | '\0')
}
