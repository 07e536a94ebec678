use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::error::{BumpError, Result};
use crate::git::{CommitAuthor, Repository};

/// A commit recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommit {
    pub id: String,
    pub message: String,
    pub paths: Vec<PathBuf>,
    pub author: CommitAuthor,
}

/// Mock repository for testing without actual git operations
///
/// Records commits, tags and pushes; pushes can be made to fail.
pub struct MockRepository {
    remote_url: String,
    initial_head: String,
    fail_push: bool,
    fail_tag_push: bool,
    commits: RefCell<Vec<RecordedCommit>>,
    tags: RefCell<Vec<String>>,
    pushed: RefCell<Vec<String>>,
}

impl MockRepository {
    /// Create a mock whose remote points at `remote_url`
    pub fn new(remote_url: impl Into<String>) -> Self {
        MockRepository {
            remote_url: remote_url.into(),
            initial_head: "0".repeat(40),
            fail_push: false,
            fail_tag_push: false,
            commits: RefCell::new(Vec::new()),
            tags: RefCell::new(Vec::new()),
            pushed: RefCell::new(Vec::new()),
        }
    }

    /// Make every branch push fail
    pub fn with_push_failure(mut self) -> Self {
        self.fail_push = true;
        self
    }

    /// Make every tag push fail
    pub fn with_tag_push_failure(mut self) -> Self {
        self.fail_tag_push = true;
        self
    }

    pub fn commits(&self) -> Vec<RecordedCommit> {
        self.commits.borrow().clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags.borrow().clone()
    }

    /// Refs pushed so far, e.g. "branch" or "refs/tags/v1.2.3-4"
    pub fn pushed(&self) -> Vec<String> {
        self.pushed.borrow().clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new("https://github.com/example/downstream.git")
    }
}

impl Repository for MockRepository {
    fn remote_url(&self, _remote: &str) -> Result<String> {
        Ok(self.remote_url.clone())
    }

    fn head_commit_id(&self) -> Result<String> {
        Ok(self
            .commits
            .borrow()
            .last()
            .map(|c| c.id.clone())
            .unwrap_or_else(|| self.initial_head.clone()))
    }

    fn commit_paths(
        &self,
        paths: &[&Path],
        message: &str,
        author: &CommitAuthor,
    ) -> Result<String> {
        let mut commits = self.commits.borrow_mut();
        let id = format!("{:040x}", commits.len() + 1);
        commits.push(RecordedCommit {
            id: id.clone(),
            message: message.to_string(),
            paths: paths.iter().map(|p| p.to_path_buf()).collect(),
            author: author.clone(),
        });
        Ok(id)
    }

    fn push_head(&self, remote: &str) -> Result<()> {
        if self.fail_push {
            return Err(BumpError::remote(format!("push to '{}' rejected", remote)));
        }
        self.pushed.borrow_mut().push("branch".to_string());
        Ok(())
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let mut tags = self.tags.borrow_mut();
        if tags.iter().any(|t| t == name) {
            return Err(BumpError::tag(format!("Tag '{}' already exists", name)));
        }
        tags.push(name.to_string());
        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        if self.fail_tag_push {
            return Err(BumpError::remote(format!(
                "push of tag '{}' to '{}' rejected",
                name, remote
            )));
        }
        self.pushed.borrow_mut().push(format!("refs/tags/{}", name));
        Ok(())
    }
}
