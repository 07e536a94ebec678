//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations
//! the publisher needs, allowing for a real repository backed by `git2` and
//! a recording mock for tests.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation that records calls
//!
//! Code that publishes should depend on the [Repository] trait rather than a
//! concrete implementation.
//!
//! ```rust
//! # use upstream_bump::git::{CommitAuthor, Repository};
//! # use std::path::Path;
//! # fn example<R: Repository>(repo: &R) -> upstream_bump::Result<()> {
//! let author = CommitAuthor::new("Release Bot", "bot@example.com");
//! repo.commit_paths(&[Path::new("build.properties")], "Update Brave to 1.76.81", &author)?;
//! repo.push_head("origin")?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::path::Path;

use crate::error::Result;

/// Identity used for automated commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

impl CommitAuthor {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        CommitAuthor {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Common git operation trait for abstraction
///
/// All methods return [crate::error::Result<T>]; implementations map
/// `git2::Error` and transport failures to the matching
/// [crate::error::BumpError] variants.
pub trait Repository {
    /// Get the configured URL of a remote
    ///
    /// # Arguments
    /// * `remote` - Name of the remote (e.g., "origin")
    ///
    /// # Returns
    /// * `Ok(String)` - The fetch URL of the remote
    /// * `Err` - If the remote doesn't exist or has no URL
    fn remote_url(&self, remote: &str) -> Result<String>;

    /// Get the full hex id of the commit HEAD points at
    fn head_commit_id(&self) -> Result<String>;

    /// Stage `paths` and commit them on top of HEAD
    ///
    /// # Arguments
    /// * `paths` - Files to stage; absolute or relative to the working directory
    /// * `message` - Commit message
    /// * `author` - Author and committer identity
    ///
    /// # Returns
    /// * `Ok(String)` - Hex id of the new commit
    /// * `Err` - If a path lies outside the working tree or the commit fails
    fn commit_paths(&self, paths: &[&Path], message: &str, author: &CommitAuthor)
        -> Result<String>;

    /// Push the current branch to a remote
    ///
    /// # Returns
    /// * `Ok(())` - The remote accepted the branch update
    /// * `Err` - If HEAD is detached, the remote is missing, the transport
    ///   fails, or the remote rejects the update
    fn push_head(&self, remote: &str) -> Result<()>;

    /// Create a lightweight tag on HEAD
    ///
    /// Fails if a tag of that name already exists.
    fn create_tag(&self, name: &str) -> Result<()>;

    /// Push a single tag to a remote
    fn push_tag(&self, remote: &str, name: &str) -> Result<()>;
}
