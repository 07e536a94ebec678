//! Console output for people reading the CI log.
//!
//! Diagnostic detail goes through `tracing`; this module only prints the
//! handful of lines that summarise a run.

use console::style;

use crate::domain::Version;
use crate::outcome::{Outcome, SkipReason};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn display_skip_reason(reason: &SkipReason) {
    println!("{} {}", style("⚠").yellow(), reason);
}

/// Show the two versions being compared
pub fn display_version_comparison(local: &Version, remote: &Version) {
    println!("\n{}", style("Version check").bold());
    println!("  Current: {}", style(local).cyan());
    println!("  Latest:  {}", style(remote).cyan());
}

/// Summarise the terminal state of a run
pub fn display_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Updated {
            version,
            release,
            tag,
        } => {
            println!(
                "\n{} Published {} (release {}) as tag {}\n",
                style("✓").green(),
                style(version).bold(),
                release,
                style(tag).green()
            );
        }
        Outcome::WouldUpdate {
            version,
            release,
            tag,
        } => {
            println!("\n{}", style("Dry run:").bold());
            display_success(&format!(
                "  Step 1: would update version to {} and release to {}",
                version, release
            ));
            display_success("  Step 2: would commit and push the updated files");
            display_success(&format!("  Step 3: would create tag {}", tag));
        }
        Outcome::NoUpdate(reason) => display_skip_reason(reason),
    }
}
