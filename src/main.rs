use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use upstream_bump::cli::{Workflow, WorkflowArgs};
use upstream_bump::config::{self, Config};
use upstream_bump::forge::{mask_token, ForgeClient};
use upstream_bump::git::Git2Repository;
use upstream_bump::output::OutputSink;
use upstream_bump::outcome::Outcome;
use upstream_bump::ui;
use upstream_bump::upstream::HttpChangelogSource;

#[derive(clap::Parser)]
#[command(
    name = "upstream-bump",
    version,
    about = "Track upstream browser releases and publish matching downstream versions"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short = 'C', long, default_value = ".", help = "Repository working directory")]
    workdir: PathBuf,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "File receiving key=value results (defaults to $GITHUB_OUTPUT)")]
    output: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,upstream_bump={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read a token from `var`, treating empty values as absent
fn token_from_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|t| !t.trim().is_empty())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(_) => {}
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<Outcome> {
    let config: Config =
        config::load_config(args.config.as_deref(), &args.workdir).context("Error loading config")?;
    debug!(?config, "configuration loaded");

    let sink = match &args.output {
        Some(path) => OutputSink::new(Some(path.clone())),
        None => OutputSink::from_env(&config.output.env_var),
    };

    let timeout = Duration::from_secs(config.upstream.timeout_secs);
    let source = HttpChangelogSource::new(config.upstream.changelog_url.clone(), timeout)?;

    let repo = Git2Repository::open(&args.workdir)
        .with_context(|| format!("Git repository error in '{}'", args.workdir.display()))?
        .with_token(token_from_env(&config.git.token_env));

    let forge = match token_from_env(&config.forge.token_env) {
        Some(token) => {
            debug!(token = %mask_token(&token), "elevated token available");
            Some(ForgeClient::new(
                config.forge.resolved_api_url(),
                token,
                timeout,
            )?)
        }
        None => {
            warn!(
                var = %config.forge.token_env,
                "elevated token not set; tags will be pushed with the default credential"
            );
            None
        }
    };

    let workflow = Workflow {
        config: &config,
        source: &source,
        repo: &repo,
        forge: forge.as_ref(),
    };

    let mut workflow_args = WorkflowArgs::new(&args.workdir);
    workflow_args.dry_run = args.dry_run;

    let outcome = match workflow.run(&workflow_args) {
        Ok(outcome) => outcome,
        Err(e) => {
            // Tell the CI workflow nothing was published before failing hard
            if !args.dry_run {
                if let Err(report_err) = sink.write_fields(&[("updated", "false".to_string())]) {
                    warn!(error = %report_err, "could not write CI outputs");
                }
            }
            return Err(e.into());
        }
    };

    ui::display_outcome(&outcome);

    if !args.dry_run {
        sink.report(&outcome).context("Failed to write CI outputs")?;
    }

    Ok(outcome)
}
