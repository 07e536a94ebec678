use crate::error::{BumpError, Result};
use crate::upstream::ChangelogSource;

/// Changelog source serving canned text, or a canned failure
pub struct StaticChangelogSource {
    body: Option<String>,
}

impl StaticChangelogSource {
    /// Source that always returns `body`
    pub fn new(body: impl Into<String>) -> Self {
        StaticChangelogSource {
            body: Some(body.into()),
        }
    }

    /// Source whose fetch always fails, like a non-success HTTP status
    pub fn failing() -> Self {
        StaticChangelogSource { body: None }
    }
}

impl ChangelogSource for StaticChangelogSource {
    fn fetch(&self) -> Result<String> {
        self.body
            .clone()
            .ok_or_else(|| BumpError::remote("static source configured to fail"))
    }

    fn describe(&self) -> String {
        "static changelog".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source() {
        let source = StaticChangelogSource::new("# Changelog\n");
        assert_eq!(source.fetch().unwrap(), "# Changelog\n");
    }

    #[test]
    fn test_failing_source() {
        let err = StaticChangelogSource::failing().fetch().unwrap_err();
        assert!(err.to_string().starts_with("Remote operation failed"));
    }
}
