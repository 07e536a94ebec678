use crate::domain::Version;
use crate::error::{BumpError, Result};

/// Tag naming pattern (e.g., "v{version}-{release}")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pub pattern: String,
}

impl TagPattern {
    /// Create a new tag pattern, rejecting one without a `{version}` placeholder
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if !pattern.contains("{version}") {
            return Err(BumpError::tag(
                "Pattern must contain {version} placeholder",
            ));
        }
        Ok(TagPattern { pattern })
    }

    /// Format a version and release counter according to pattern
    /// Example: pattern="v{version}-{release}", version=1.76.81, release=6 -> "v1.76.81-6"
    pub fn format(&self, version: &Version, release: u64) -> String {
        self.pattern
            .replace("{version}", &version.to_string())
            .replace("{release}", &release.to_string())
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        TagPattern {
            pattern: "v{version}-{release}".to_string(),
        }
    }
}
