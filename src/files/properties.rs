use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use regex::Regex;

use crate::domain::Version;
use crate::error::{BumpError, Result};

/// A `key = value` line, with the byte span of the value inside the line text
#[derive(Debug, Clone, PartialEq)]
struct Entry {
    key: String,
    value_start: usize,
    value_end: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    /// Line text without its terminator
    text: String,
    /// "\n", "\r\n" or "" for a final unterminated line
    terminator: String,
    entry: Option<Entry>,
}

/// In-memory properties document.
///
/// Keeps every line exactly as read; updates only splice the value span of a
/// single entry, so comments, spacing and unrelated keys survive untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertiesFile {
    lines: Vec<Line>,
}

impl PropertiesFile {
    /// Parse properties text. Duplicate keys are rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let entry_re = Regex::new(r"^\s*([^#!=\s][^=]*?)\s*=\s*(.*?)\s*$")
            .map_err(|e| BumpError::properties(format!("Invalid entry pattern: {}", e)))?;

        let mut lines = Vec::new();
        let mut seen = HashSet::new();

        for (index, raw) in text.split_inclusive('\n').enumerate() {
            let (body, terminator) = if let Some(body) = raw.strip_suffix("\r\n") {
                (body, "\r\n")
            } else if let Some(body) = raw.strip_suffix('\n') {
                (body, "\n")
            } else {
                (raw, "")
            };

            let entry = entry_re.captures(body).and_then(|caps| {
                let key = caps.get(1)?;
                let value = caps.get(2)?;
                Some(Entry {
                    key: key.as_str().to_string(),
                    value_start: value.start(),
                    value_end: value.end(),
                })
            });

            if let Some(entry) = &entry {
                if !seen.insert(entry.key.clone()) {
                    return Err(BumpError::properties(format!(
                        "Duplicate key '{}' on line {}",
                        entry.key,
                        index + 1
                    )));
                }
            }

            lines.push(Line {
                text: body.to_string(),
                terminator: terminator.to_string(),
                entry,
            });
        }

        Ok(PropertiesFile { lines })
    }

    /// Read and parse a properties file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            BumpError::properties(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    /// Value of `key`, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| {
            let entry = line.entry.as_ref()?;
            if entry.key == key {
                Some(&line.text[entry.value_start..entry.value_end])
            } else {
                None
            }
        })
    }

    /// Replace the value of `key` in place. Returns false when the key is absent.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        for line in &mut self.lines {
            let Some(entry) = line.entry.as_mut() else {
                continue;
            };
            if entry.key != key {
                continue;
            }

            line.text
                .replace_range(entry.value_start..entry.value_end, value);
            entry.value_end = entry.value_start + value.len();
            return true;
        }
        false
    }

    /// Parse the value of `key` as a dotted version
    pub fn version(&self, key: &str) -> Option<Version> {
        self.get(key).and_then(|value| Version::parse(value).ok())
    }

    /// Increment the integer counter stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent; a non-integer value is malformed.
    pub fn increment_counter(&mut self, key: &str) -> Result<Option<u64>> {
        let Some(current) = self.get(key) else {
            return Ok(None);
        };

        let current = current.parse::<u64>().map_err(|_| {
            BumpError::properties(format!(
                "Value of '{}' is not a non-negative integer: '{}'",
                key, current
            ))
        })?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| BumpError::properties(format!("Counter '{}' overflowed", key)))?;

        self.set(key, &next.to_string());
        Ok(Some(next))
    }

    /// Keys in file order
    pub fn keys(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|line| line.entry.as_ref().map(|e| e.key.as_str()))
            .collect()
    }
}

impl fmt::Display for PropertiesFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            f.write_str(&line.text)?;
            f.write_str(&line.terminator)?;
        }
        Ok(())
    }
}
