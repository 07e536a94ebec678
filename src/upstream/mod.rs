//! Upstream release detection
//!
//! The upstream project announces releases in a markdown changelog whose
//! headings look like:
//!
//! ```text
//! ## [1.76.81](https://github.com/brave/brave-browser/releases/tag/v1.76.81)
//! ```
//!
//! [ChangelogSource] abstracts how that text is obtained:
//!
//! - [http::HttpChangelogSource]: fetches it over HTTP with `reqwest`
//! - [mock::StaticChangelogSource]: serves canned text for tests
//!
//! [VersionExtractor] pulls the newest version out of it.

pub mod http;
pub mod mock;

pub use http::HttpChangelogSource;
pub use mock::StaticChangelogSource;

use regex::Regex;

use crate::domain::Version;
use crate::error::{BumpError, Result};

/// Anything that can produce the upstream changelog text
pub trait ChangelogSource {
    /// Fetch the full changelog text.
    ///
    /// A non-success response or transport failure is an error; callers treat
    /// it as "no update".
    fn fetch(&self) -> Result<String>;

    /// Human-readable origin, used in log lines
    fn describe(&self) -> String;
}

/// Finds release headings in upstream changelog text
#[derive(Debug, Clone)]
pub struct VersionExtractor {
    pattern: Regex,
}

impl VersionExtractor {
    /// Build an extractor for headings linking to `release_url_prefix` + `v<version>`
    pub fn new(release_url_prefix: &str) -> Result<Self> {
        let number = r"(\d+(?:\.\d+)*)";
        let source = format!(
            r"(?m)^##\s+\[{number}\]\({prefix}v{number}\)",
            number = number,
            prefix = regex::escape(release_url_prefix),
        );

        let pattern = Regex::new(&source)
            .map_err(|e| BumpError::config(format!("Invalid release heading pattern: {}", e)))?;

        Ok(VersionExtractor { pattern })
    }

    /// Newest (topmost) release version, or `None` if no heading matches.
    ///
    /// A heading only counts when the bracketed version and the tag in the
    /// link agree.
    pub fn extract(&self, text: &str) -> Option<Version> {
        self.pattern
            .captures_iter(text)
            .filter(|caps| caps.get(1).map(|m| m.as_str()) == caps.get(2).map(|m| m.as_str()))
            .find_map(|caps| Version::parse(caps.get(1)?.as_str()).ok())
    }
}
