use crate::error::{BumpError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Dotted numeric version (e.g. "1.76.81")
///
/// Any number of components is accepted. Ordering is positional and numeric,
/// so "1.9" < "1.10". Equality is exact: "1.0" and "1.0.0" differ, and a
/// strict prefix sorts first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    components: Vec<u64>,
}

impl Version {
    /// Create a version from its numeric components
    pub fn new(components: Vec<u64>) -> Result<Self> {
        if components.is_empty() {
            return Err(BumpError::version("Version must have at least one component"));
        }
        Ok(Version { components })
    }

    /// Parse a dotted version, tolerating a leading 'v' or 'V'
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let clean = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        if clean.is_empty() {
            return Err(BumpError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                text
            )));
        }

        let components = clean
            .split('.')
            .map(|part| {
                part.parse::<u64>().map_err(|_| {
                    BumpError::version(format!(
                        "Invalid version component '{}' in '{}'",
                        part, text
                    ))
                })
            })
            .collect::<Result<Vec<u64>>>()?;

        Ok(Version { components })
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// True when `self` ranks strictly above `other`
    pub fn is_newer_than(&self, other: &Version) -> bool {
        self > other
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // Vec ordering is lexicographic over u64, which is exactly positional numeric order
        self.components.cmp(&other.components)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Version {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for component in &self.components {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", component)?;
            first = false;
        }
        Ok(())
    }
}

/// Compare two version strings numerically
pub fn compare_versions(left: &str, right: &str) -> Result<Ordering> {
    Ok(Version::parse(left)?.cmp(&Version::parse(right)?))
}
