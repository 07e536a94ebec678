use upstream_bump::domain::Version;
use upstream_bump::outcome::{Outcome, SkipReason};
use upstream_bump::ui;

fn v(text: &str) -> Version {
    Version::parse(text).unwrap()
}

// ============================================================================
// SkipReason Display Tests
// ============================================================================

#[test]
fn test_fetch_failed_display() {
    let reason = SkipReason::FetchFailed {
        source: "https://example.org/CHANGELOG.md".to_string(),
        reason: "GET returned 503".to_string(),
    };

    let msg = reason.to_string();
    assert!(
        msg.contains("Failed to fetch"),
        "Message should mention the fetch, got: {}",
        msg
    );
    assert!(msg.contains("https://example.org/CHANGELOG.md"));
    assert!(msg.contains("503"));
}

#[test]
fn test_up_to_date_display() {
    let msg = SkipReason::UpToDate { version: v("1.76.81") }.to_string();
    assert!(msg.contains("Already at the latest version 1.76.81"), "got: {}", msg);
}

#[test]
fn test_not_newer_display() {
    let msg = SkipReason::NotNewer {
        remote: v("1.9.0"),
        local: v("1.10.0"),
    }
    .to_string();
    assert!(msg.contains("1.9.0"), "got: {}", msg);
    assert!(msg.contains("1.10.0"), "got: {}", msg);
    assert!(msg.contains("not newer"), "got: {}", msg);
}

#[test]
fn test_publish_failed_mentions_local_files() {
    let msg = SkipReason::PublishFailed {
        reason: "rejected".to_string(),
    }
    .to_string();
    assert!(msg.contains("local files were updated"), "got: {}", msg);
    assert!(msg.contains("rejected"));
}

#[test]
fn test_tag_failed_display() {
    let msg = SkipReason::TagFailed {
        tag: "v1.76.81-6".to_string(),
        reason: "403 Forbidden".to_string(),
    }
    .to_string();
    assert!(msg.contains("v1.76.81-6"));
    assert!(msg.contains("403 Forbidden"));
}

#[test]
fn test_all_reasons_non_empty() {
    let reasons = vec![
        SkipReason::RemoteVersionNotFound {
            source: "static".to_string(),
        },
        SkipReason::LocalVersionNotFound {
            key: "app.version".to_string(),
        },
        SkipReason::ReleaseCounterMissing {
            key: "app.release".to_string(),
        },
    ];

    for reason in reasons {
        assert!(!reason.to_string().is_empty());
    }
}

// ============================================================================
// Console output smoke tests
// ============================================================================

#[test]
fn test_display_outcome_all_variants() {
    // Output goes to stdout; these only have to not panic
    ui::display_outcome(&Outcome::Updated {
        version: v("1.76.81"),
        release: 6,
        tag: "v1.76.81-6".to_string(),
    });
    ui::display_outcome(&Outcome::WouldUpdate {
        version: v("1.76.81"),
        release: 6,
        tag: "v1.76.81-6".to_string(),
    });
    ui::display_outcome(&Outcome::NoUpdate(SkipReason::UpToDate {
        version: v("1.76.81"),
    }));
    ui::display_version_comparison(&v("1.75.175"), &v("1.76.81"));
}
