//! Local version-tracking files
//!
//! The properties file records the tracked upstream version and the
//! downstream release counter; the changelog records one entry per release.
//! Updates run as load → transform in memory → atomic write, and nothing is
//! written unless both documents transformed cleanly.

pub mod changelog;
pub mod properties;

pub use changelog::{Changelog, ChangelogEntry};
pub use properties::PropertiesFile;

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use crate::config::FilesConfig;
use crate::domain::Version;
use crate::error::{BumpError, Result};

/// Write `contents` to `path` by renaming a sibling temp file over it.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| BumpError::Io(e.error))?;
    Ok(())
}

/// Both tracking files, loaded and ready to transform
#[derive(Debug, Clone)]
pub struct VersionFiles {
    properties_path: PathBuf,
    changelog_path: PathBuf,
    version_key: String,
    release_key: String,
    properties: PropertiesFile,
    changelog: Changelog,
}

impl VersionFiles {
    /// Load both files from `workdir`. Unreadable or malformed files are errors.
    pub fn load(workdir: &Path, config: &FilesConfig) -> Result<Self> {
        let properties_path = workdir.join(&config.properties);
        let changelog_path = workdir.join(&config.changelog);

        let properties = PropertiesFile::load(&properties_path)?;
        let changelog = Changelog::load(&changelog_path, &config.changelog_header)?;
        if !changelog.has_header() {
            return Err(BumpError::changelog(format!(
                "Header '{}' not found in '{}'",
                config.changelog_header,
                changelog_path.display()
            )));
        }

        Ok(VersionFiles {
            properties_path,
            changelog_path,
            version_key: config.version_key.clone(),
            release_key: config.release_key.clone(),
            properties,
            changelog,
        })
    }

    /// Version currently recorded, or `None` if the key is missing or unparsable
    pub fn current_version(&self) -> Option<Version> {
        self.properties.version(&self.version_key)
    }

    pub fn properties(&self) -> &PropertiesFile {
        &self.properties
    }

    pub fn changelog(&self) -> &Changelog {
        &self.changelog
    }

    /// Paths of the two tracked files, in staging order
    pub fn paths(&self) -> [&Path; 2] {
        [self.properties_path.as_path(), self.changelog_path.as_path()]
    }

    /// Apply the version bump to in-memory copies.
    ///
    /// Returns `Ok(None)` if the release counter key is absent; nothing is
    /// produced in that case.
    pub fn prepare_update(
        &self,
        version: &Version,
        product: &str,
        date: NaiveDate,
    ) -> Result<Option<PreparedUpdate>> {
        let mut properties = self.properties.clone();

        if !properties.set(&self.version_key, &version.to_string()) {
            return Err(BumpError::properties(format!(
                "Key '{}' not found in '{}'",
                self.version_key,
                self.properties_path.display()
            )));
        }

        let Some(release) = properties.increment_counter(&self.release_key)? else {
            return Ok(None);
        };

        let mut changelog = self.changelog.clone();
        changelog.insert_entry(&ChangelogEntry {
            version: version.clone(),
            release,
            date,
            product: product.to_string(),
        })?;

        Ok(Some(PreparedUpdate {
            release,
            properties_path: self.properties_path.clone(),
            changelog_path: self.changelog_path.clone(),
            properties,
            changelog,
        }))
    }
}

/// Transformed documents waiting to be written
#[derive(Debug, Clone)]
pub struct PreparedUpdate {
    release: u64,
    properties_path: PathBuf,
    changelog_path: PathBuf,
    properties: PropertiesFile,
    changelog: Changelog,
}

impl PreparedUpdate {
    /// New release counter value
    pub fn release(&self) -> u64 {
        self.release
    }

    pub fn properties(&self) -> &PropertiesFile {
        &self.properties
    }

    pub fn changelog(&self) -> &Changelog {
        &self.changelog
    }

    pub fn paths(&self) -> [&Path; 2] {
        [self.properties_path.as_path(), self.changelog_path.as_path()]
    }

    /// Replace both files on disk
    pub fn write(&self) -> Result<()> {
        write_atomic(&self.properties_path, &self.properties.to_string())?;
        write_atomic(&self.changelog_path, &self.changelog.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup(properties: &str, changelog: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("build.properties"), properties).unwrap();
        fs::write(dir.path().join("CHANGELOG.md"), changelog).unwrap();
        dir
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
    }

    #[test]
    fn test_write_atomic_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");

        // No temp files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_prepare_and_write() {
        let dir = setup(
            "app.version = 1.75.175\napp.release = 5\nother = x\n",
            "# Changelog\n\n",
        );
        let files = VersionFiles::load(dir.path(), &FilesConfig::default()).unwrap();
        assert_eq!(files.current_version().unwrap().to_string(), "1.75.175");

        let version = Version::parse("1.76.81").unwrap();
        let update = files.prepare_update(&version, "Brave", date()).unwrap().unwrap();
        assert_eq!(update.release(), 6);

        // Nothing on disk changes until write()
        assert_eq!(
            fs::read_to_string(dir.path().join("build.properties")).unwrap(),
            "app.version = 1.75.175\napp.release = 5\nother = x\n"
        );

        update.write().unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("build.properties")).unwrap(),
            "app.version = 1.76.81\napp.release = 6\nother = x\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap(),
            "# Changelog\n\n## 1.76.81-6 (2025/03/04)\n\n* Brave 1.76.81\n\n"
        );
    }

    #[test]
    fn test_missing_release_key_produces_nothing() {
        let dir = setup("app.version = 1.0.0\n", "# Changelog\n\n");
        let files = VersionFiles::load(dir.path(), &FilesConfig::default()).unwrap();
        let version = Version::parse("1.1.0").unwrap();
        assert!(files.prepare_update(&version, "Brave", date()).unwrap().is_none());
    }

    #[test]
    fn test_missing_changelog_header_is_error() {
        let dir = setup("app.version = 1.0.0\napp.release = 1\n", "no header here\n");
        let err = VersionFiles::load(dir.path(), &FilesConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Header '# Changelog' not found"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = VersionFiles::load(dir.path(), &FilesConfig::default()).unwrap_err();
        assert!(err.to_string().contains("build.properties"));
    }
}
