//! Commit, push and tag a version update
//!
//! The branch push must succeed before any tag is created, so a tag never
//! points at a commit the remote does not have. A failed tag does not undo
//! the pushed commit.

use std::path::Path;

use tracing::{info, warn};

use crate::config::GitConfig;
use crate::error::Result;
use crate::forge::{ForgeClient, RepoSlug};
use crate::git::{CommitAuthor, Repository};
use crate::outcome::SkipReason;

/// How the tag reached the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagMethod {
    /// Created through the forge API with the elevated token
    ForgeApi,
    /// Created locally and pushed with the default credential
    GitPush,
}

/// Successful publication
#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub commit: String,
    pub tag: String,
    pub method: TagMethod,
}

pub struct Publisher<'a, R: Repository + ?Sized> {
    repo: &'a R,
    git: &'a GitConfig,
    forge: Option<&'a ForgeClient>,
}

impl<'a, R: Repository + ?Sized> Publisher<'a, R> {
    pub fn new(repo: &'a R, git: &'a GitConfig, forge: Option<&'a ForgeClient>) -> Self {
        Publisher { repo, git, forge }
    }

    /// Commit `paths`, push the branch, then create `tag`.
    ///
    /// Every failure comes back as the [SkipReason] the run should report.
    pub fn publish(
        &self,
        paths: &[&Path],
        message: &str,
        tag: &str,
    ) -> std::result::Result<Published, SkipReason> {
        let author = CommitAuthor::new(&self.git.author_name, &self.git.author_email);

        let commit = self
            .repo
            .commit_paths(paths, message, &author)
            .map_err(|e| SkipReason::PublishFailed {
                reason: e.to_string(),
            })?;
        info!(%commit, "committed version update");

        self.repo
            .push_head(&self.git.remote)
            .map_err(|e| SkipReason::PublishFailed {
                reason: e.to_string(),
            })?;
        info!(remote = %self.git.remote, "pushed version commit");

        let method = self.create_tag(tag).map_err(|e| {
            warn!(tag, error = %e, "tag creation failed after commit was pushed");
            SkipReason::TagFailed {
                tag: tag.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Published {
            commit,
            tag: tag.to_string(),
            method,
        })
    }

    fn create_tag(&self, tag: &str) -> Result<TagMethod> {
        match self.forge {
            Some(forge) => {
                let url = self.repo.remote_url(&self.git.remote)?;
                let slug = RepoSlug::from_remote_url(&url)?;
                let sha = self.repo.head_commit_id()?;
                info!(%slug, tag, %sha, "creating tag through forge API");
                forge.create_tag_ref(&slug, tag, &sha)?;
                Ok(TagMethod::ForgeApi)
            }
            None => {
                info!(tag, "no elevated token; pushing tag with default credential");
                self.repo.create_tag(tag)?;
                self.repo.push_tag(&self.git.remote, tag)?;
                Ok(TagMethod::GitPush)
            }
        }
    }
}
