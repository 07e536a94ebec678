use std::fmt;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::Version;
use crate::error::{BumpError, Result};

/// One downstream release entry
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogEntry {
    pub version: Version,
    pub release: u64,
    pub date: NaiveDate,
    pub product: String,
}

impl ChangelogEntry {
    /// Markdown block for this entry, including its trailing blank line
    pub fn render(&self) -> String {
        format!(
            "## {version}-{release} ({date})\n\n* {product} {version}\n\n",
            version = self.version,
            release = self.release,
            date = self.date.format("%Y/%m/%d"),
            product = self.product,
        )
    }
}

/// In-memory changelog: a title header line followed by entries, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Changelog {
    header: String,
    text: String,
}

impl Changelog {
    pub fn parse(text: &str, header: &str) -> Self {
        Changelog {
            header: header.to_string(),
            text: text.to_string(),
        }
    }

    pub fn load(path: &Path, header: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            BumpError::changelog(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Ok(Self::parse(&text, header))
    }

    /// Byte offset just past the header line (and its terminator)
    fn header_end(&self) -> Option<usize> {
        let mut offset = 0;
        for line in self.text.split_inclusive('\n') {
            if line.trim_end() == self.header {
                return Some(offset + line.len());
            }
            offset += line.len();
        }
        None
    }

    pub fn has_header(&self) -> bool {
        self.header_end().is_some()
    }

    /// Insert `entry` directly after the header, above every existing entry.
    pub fn insert_entry(&mut self, entry: &ChangelogEntry) -> Result<()> {
        let header_end = self.header_end().ok_or_else(|| {
            BumpError::changelog(format!("Header '{}' not found", self.header))
        })?;

        let mut prefix = self.text[..header_end].to_string();
        if !prefix.ends_with('\n') {
            prefix.push('\n');
        }

        // The blank line after the header is re-emitted before the new entry
        let rest = &self.text[header_end..];
        let rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest);

        let mut updated = String::with_capacity(self.text.len() + 64);
        updated.push_str(&prefix);
        updated.push('\n');
        updated.push_str(&entry.render());
        updated.push_str(rest);

        self.text = updated;
        Ok(())
    }
}

impl fmt::Display for Changelog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
