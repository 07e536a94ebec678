use std::fmt;

use crate::domain::Version;

/// Why a run ended without publishing an update.
/// None of these are errors; each maps to `updated=false`.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The upstream changelog could not be retrieved
    FetchFailed { source: String, reason: String },
    /// No release heading was found in the upstream changelog
    RemoteVersionNotFound { source: String },
    /// The properties file has no parsable version under the key
    LocalVersionNotFound { key: String },
    /// Upstream and local versions are identical
    UpToDate { version: Version },
    /// Upstream reports a version that is not newer than ours
    NotNewer { remote: Version, local: Version },
    /// The properties file has no release counter to increment
    ReleaseCounterMissing { key: String },
    /// Committing or pushing failed; local files may already be modified
    PublishFailed { reason: String },
    /// The version commit is live but the tag could not be created
    TagFailed { tag: String, reason: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FetchFailed { source, reason } => {
                write!(f, "Failed to fetch upstream changelog from {}: {}", source, reason)
            }
            SkipReason::RemoteVersionNotFound { source } => {
                write!(f, "No release version found in upstream changelog {}", source)
            }
            SkipReason::LocalVersionNotFound { key } => {
                write!(f, "No version found under '{}' in the properties file", key)
            }
            SkipReason::UpToDate { version } => {
                write!(f, "Already at the latest version {}", version)
            }
            SkipReason::NotNewer { remote, local } => write!(
                f,
                "Upstream version {} is not newer than current version {}",
                remote, local
            ),
            SkipReason::ReleaseCounterMissing { key } => {
                write!(f, "Release counter '{}' not found; files left untouched", key)
            }
            SkipReason::PublishFailed { reason } => write!(
                f,
                "Failed to publish version commit (local files were updated): {}",
                reason
            ),
            SkipReason::TagFailed { tag, reason } => write!(
                f,
                "Version commit was pushed but tag '{}' could not be created: {}",
                tag, reason
            ),
        }
    }
}

/// Terminal state of a run
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Files updated, commit pushed, tag created
    Updated {
        version: Version,
        release: u64,
        tag: String,
    },
    /// Dry run found an update it would have published
    WouldUpdate {
        version: Version,
        release: u64,
        tag: String,
    },
    NoUpdate(SkipReason),
}

impl Outcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, Outcome::Updated { .. })
    }

    /// `key=value` fields for the CI output sink
    pub fn output_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Outcome::Updated { version, tag, .. } => vec![
                ("updated", "true".to_string()),
                ("version", version.to_string()),
                ("tag", tag.clone()),
            ],
            Outcome::WouldUpdate { .. } | Outcome::NoUpdate(_) => {
                vec![("updated", "false".to_string())]
            }
        }
    }
}

impl From<SkipReason> for Outcome {
    fn from(reason: SkipReason) -> Self {
        Outcome::NoUpdate(reason)
    }
}
