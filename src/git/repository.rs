use std::cell::RefCell;
use std::path::{Path, PathBuf};

use git2::{
    CredentialType, Cred, ErrorCode, PushOptions, RemoteCallbacks, Repository as Git2Repo,
    Signature,
};
use tracing::{debug, warn};

use crate::error::{BumpError, Result};
use crate::git::CommitAuthor;

/// How many times libgit2 may ask for credentials before we give up
const MAX_CREDENTIAL_ATTEMPTS: u32 = 3;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    /// Default push credential for HTTPS remotes
    token: Option<String>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo, token: None })
    }

    /// Use `token` when an HTTPS remote asks for a username/password
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| BumpError::remote("Repository has no working directory"))
    }

    /// Path of `path` relative to the working directory, as the index wants it
    fn relative_to_workdir(&self, path: &Path) -> Result<PathBuf> {
        let workdir = self.workdir()?.canonicalize()?;
        // Relative paths are taken from the process directory, like a shell would
        let path = if path.is_relative() {
            std::env::current_dir()?.join(path)
        } else {
            path.to_path_buf()
        };
        let path = path.canonicalize()?;
        path.strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                BumpError::remote(format!(
                    "'{}' is outside the working directory '{}'",
                    path.display(),
                    workdir.display()
                ))
            })
    }

    /// Credentials and ref-update callbacks shared by branch and tag pushes.
    ///
    /// Rejected ref updates are collected into `rejected`.
    fn remote_callbacks<'a>(&'a self, rejected: &'a RefCell<Vec<String>>) -> RemoteCallbacks<'a> {
        let mut callbacks = RemoteCallbacks::new();
        let mut attempts = 0;

        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            attempts += 1;
            if attempts > MAX_CREDENTIAL_ATTEMPTS {
                return Err(git2::Error::from_str("authentication failed"));
            }

            if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
                if let Some(token) = &self.token {
                    return Cred::userpass_plaintext("x-access-token", token);
                }
            }

            if allowed_types.contains(CredentialType::SSH_KEY) {
                let username = username_from_url.unwrap_or("git");
                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }

                if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }
            }

            Cred::default()
        });

        callbacks.push_update_reference(move |refname, status| {
            if let Some(status) = status {
                warn!(refname, status, "remote rejected reference update");
                rejected
                    .borrow_mut()
                    .push(format!("{}: {}", refname, status));
            }
            Ok(())
        });

        callbacks
    }

    fn push_refspec(&self, remote_name: &str, refspec: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|e| BumpError::remote(format!("Cannot find remote '{}': {}", remote_name, e)))?;

        let rejected = RefCell::new(Vec::new());
        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(self.remote_callbacks(&rejected));

        debug!(remote = remote_name, refspec, "pushing");
        remote.push(&[refspec], Some(&mut push_options)).map_err(|e| {
            if e.class() == git2::ErrorClass::Net {
                BumpError::remote(format!("Network error during push: {}", e))
            } else {
                BumpError::remote(format!("Push of '{}' failed: {}", refspec, e))
            }
        })?;

        // The callbacks borrow `rejected` until the options go away
        drop(push_options);
        let rejected = rejected.into_inner();
        if !rejected.is_empty() {
            return Err(BumpError::remote(format!(
                "Remote rejected {}",
                rejected.join(", ")
            )));
        }

        Ok(())
    }
}

impl super::Repository for Git2Repository {
    fn remote_url(&self, remote: &str) -> Result<String> {
        let remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| BumpError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        remote
            .url()
            .map(str::to_string)
            .ok_or_else(|| BumpError::remote("Remote URL is not valid UTF-8"))
    }

    fn head_commit_id(&self) -> Result<String> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    fn commit_paths(
        &self,
        paths: &[&Path],
        message: &str,
        author: &CommitAuthor,
    ) -> Result<String> {
        let mut index = self.repo.index()?;
        for path in paths {
            let relative = self.relative_to_workdir(path)?;
            index.add_path(&relative)?;
        }
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = Signature::now(&author.name, &author.email)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                None
            }
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        debug!(commit = %oid, "created commit");
        Ok(oid.to_string())
    }

    fn push_head(&self, remote: &str) -> Result<()> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(BumpError::remote("HEAD is detached; no branch to push"));
        }
        let branch_ref = head
            .name()
            .ok_or_else(|| BumpError::remote("Branch name is not valid UTF-8"))?
            .to_string();

        self.push_refspec(remote, &format!("{}:{}", branch_ref, branch_ref))
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo
            .tag_lightweight(name, head.as_object(), false)
            .map_err(|e| BumpError::tag(format!("Cannot create tag '{}': {}", name, e)))?;
        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        let tag_ref = format!("refs/tags/{}", name);
        self.push_refspec(remote, &format!("{}:{}", tag_ref, tag_ref))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use serial_test::serial;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, Git2Repository) {
        let dir = TempDir::new().unwrap();
        Git2Repo::init(dir.path()).unwrap();
        let repo = Git2Repository::open(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_open_discovers_from_subdirectory() {
        let (dir, _repo) = init_repo();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();

        let repo = Git2Repository::open(&nested).unwrap();
        assert_eq!(
            repo.workdir().unwrap().canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_commit_on_unborn_branch() {
        let (dir, repo) = init_repo();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();

        let author = CommitAuthor::new("Bot", "bot@example.com");
        let id = repo
            .commit_paths(&[&dir.path().join("a.txt")], "first", &author)
            .unwrap();
        assert_eq!(repo.head_commit_id().unwrap(), id);
    }

    #[test]
    #[serial]
    fn test_dot_relative_paths_resolve_from_current_dir() {
        let (dir, repo) = init_repo();
        std::fs::write(dir.path().join("build.properties"), "app.version = 1\n").unwrap();

        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let author = CommitAuthor::new("Bot", "bot@example.com");
        let result = repo.commit_paths(
            &[&Path::new(".").join("build.properties")],
            "first",
            &author,
        );
        std::env::set_current_dir(previous).unwrap();

        result.unwrap();
        let head = repo.repo.head().unwrap().peel_to_tree().unwrap();
        assert!(head.get_path(Path::new("build.properties")).is_ok());
    }

    #[test]
    fn test_path_outside_workdir_rejected() {
        let (_dir, repo) = init_repo();
        let other = TempDir::new().unwrap();
        std::fs::write(other.path().join("x.txt"), "x").unwrap();

        let author = CommitAuthor::new("Bot", "bot@example.com");
        let err = repo
            .commit_paths(&[&other.path().join("x.txt")], "first", &author)
            .unwrap_err();
        assert!(err.to_string().contains("outside the working directory"));
    }

    #[test]
    fn test_create_tag_twice_fails() {
        let (dir, repo) = init_repo();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        let author = CommitAuthor::new("Bot", "bot@example.com");
        repo.commit_paths(&[&dir.path().join("a.txt")], "first", &author)
            .unwrap();

        repo.create_tag("v1.0-1").unwrap();
        let err = repo.create_tag("v1.0-1").unwrap_err();
        assert!(err.to_string().contains("v1.0-1"));
    }

    #[test]
    fn test_missing_remote() {
        let (_dir, repo) = init_repo();
        assert!(repo.remote_url("origin").is_err());
    }

    #[test]
    fn test_token_empty_is_none() {
        let (_dir, repo) = init_repo();
        let repo = repo.with_token(Some(String::new()));
        assert!(repo.token.is_none());
    }
}
