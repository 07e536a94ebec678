//! Main workflow orchestration logic
//!
//! Runs the update check end to end:
//!
//! `fetch → extract → read local → compare → update files → commit → push → tag`
//!
//! Every step that can fail "softly" ends the run with
//! [Outcome::NoUpdate]; only unreadable or malformed local files surface as
//! errors.

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::files::VersionFiles;
use crate::forge::ForgeClient;
use crate::git::Repository;
use crate::outcome::{Outcome, SkipReason};
use crate::publish::Publisher;
use crate::ui;
use crate::upstream::{ChangelogSource, VersionExtractor};

/// Arguments for the update workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic,
/// so the workflow can be driven without clap.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowArgs {
    /// Directory the tracked file paths are relative to
    pub workdir: PathBuf,

    /// Preview mode - don't write files, commit, push or tag
    pub dry_run: bool,

    /// Date stamped on the changelog entry
    pub today: NaiveDate,
}

impl WorkflowArgs {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        WorkflowArgs {
            workdir: workdir.into(),
            dry_run: false,
            today: chrono::Local::now().date_naive(),
        }
    }
}

/// External collaborators of a run
pub struct Workflow<'a, S: ChangelogSource + ?Sized, R: Repository + ?Sized> {
    pub config: &'a Config,
    pub source: &'a S,
    pub repo: &'a R,
    /// Present when an elevated token is available
    pub forge: Option<&'a ForgeClient>,
}

impl<'a, S: ChangelogSource + ?Sized, R: Repository + ?Sized> Workflow<'a, S, R> {
    /// Run the update check and, when a newer version exists, publish it.
    pub fn run(&self, args: &WorkflowArgs) -> Result<Outcome> {
        let config = self.config;
        let extractor = VersionExtractor::new(&config.upstream.release_url_prefix)?;

        ui::display_status(&format!(
            "Fetching upstream changelog from {}",
            self.source.describe()
        ));
        let remote_version = match self.source.fetch() {
            Ok(text) => Ok(extractor.extract(&text)),
            Err(e) => Err(SkipReason::FetchFailed {
                source: self.source.describe(),
                reason: e.to_string(),
            }),
        };

        // Local files are read even when the fetch failed: a malformed file is fatal
        let files = VersionFiles::load(&args.workdir, &config.files)?;

        let remote = match remote_version {
            Ok(Some(version)) => version,
            Ok(None) => {
                return Ok(SkipReason::RemoteVersionNotFound {
                    source: self.source.describe(),
                }
                .into())
            }
            Err(reason) => return Ok(reason.into()),
        };

        let Some(local) = files.current_version() else {
            return Ok(SkipReason::LocalVersionNotFound {
                key: config.files.version_key.clone(),
            }
            .into());
        };

        ui::display_version_comparison(&local, &remote);

        if remote == local {
            return Ok(SkipReason::UpToDate { version: local }.into());
        }
        if !remote.is_newer_than(&local) {
            return Ok(SkipReason::NotNewer { remote, local }.into());
        }

        info!(%local, %remote, "newer upstream version found");

        let product = &config.upstream.product_name;
        let Some(update) = files.prepare_update(&remote, product, args.today)? else {
            return Ok(SkipReason::ReleaseCounterMissing {
                key: config.files.release_key.clone(),
            }
            .into());
        };

        let release = update.release();
        let tag = config.tag_pattern()?.format(&remote, release);
        let message = config
            .git
            .render_commit_message(product, &remote.to_string());

        if args.dry_run {
            debug!(properties = %update.properties(), "dry run properties");
            return Ok(Outcome::WouldUpdate {
                version: remote,
                release,
                tag,
            });
        }

        update.write()?;
        ui::display_success(&format!(
            "Updated local files to {} (release {})",
            remote, release
        ));

        let publisher = Publisher::new(self.repo, &config.git, self.forge);
        match publisher.publish(&update.paths(), &message, &tag) {
            Ok(published) => {
                info!(commit = %published.commit, method = ?published.method, "published");
                Ok(Outcome::Updated {
                    version: remote,
                    release,
                    tag: published.tag,
                })
            }
            Err(reason) => {
                warn!(%reason, "publish did not complete");
                Ok(reason.into())
            }
        }
    }
}
