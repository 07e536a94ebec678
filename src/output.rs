//! CI output reporting
//!
//! Results are appended as `key=value` lines to the file named by the CI
//! system (`GITHUB_OUTPUT` by default).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{BumpError, Result};
use crate::outcome::Outcome;

/// Destination for result fields
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSink {
    path: Option<PathBuf>,
}

impl OutputSink {
    /// Sink appending to `path`; `None` prints to stdout instead
    pub fn new(path: Option<PathBuf>) -> Self {
        OutputSink {
            path: path.filter(|p| !p.as_os_str().is_empty()),
        }
    }

    /// Sink resolved from an environment variable
    pub fn from_env(var: &str) -> Self {
        Self::new(std::env::var_os(var).map(PathBuf::from))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append `fields` as `key=value` lines
    pub fn write_fields(&self, fields: &[(&str, String)]) -> Result<()> {
        let mut text = String::new();
        for (key, value) in fields {
            if value.contains('\n') {
                return Err(BumpError::config(format!(
                    "Output value for '{}' contains a newline",
                    key
                )));
            }
            text.push_str(&format!("{}={}\n", key, value));
        }

        match &self.path {
            Some(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(text.as_bytes())?;
                debug!(path = %path.display(), fields = fields.len(), "wrote CI outputs");
            }
            None => {
                warn!("no CI output file configured; printing outputs to stdout");
                print!("{}", text);
            }
        }
        Ok(())
    }

    /// Report the outcome of a run
    pub fn report(&self, outcome: &Outcome) -> Result<()> {
        self.write_fields(&outcome.output_fields())
    }
}
