use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{BumpError, Result};
use crate::upstream::ChangelogSource;

/// User-Agent sent with every request
pub const USER_AGENT: &str = concat!("upstream-bump/", env!("CARGO_PKG_VERSION"));

/// Build a blocking HTTP client with the given request timeout
pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Fetches the upstream changelog over HTTP
pub struct HttpChangelogSource {
    client: Client,
    url: String,
}

impl HttpChangelogSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(HttpChangelogSource {
            client: build_client(timeout)?,
            url: url.into(),
        })
    }
}

impl ChangelogSource for HttpChangelogSource {
    fn fetch(&self) -> Result<String> {
        debug!(url = %self.url, "fetching upstream changelog");
        let response = self.client.get(&self.url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(BumpError::remote(format!(
                "GET {} returned {}",
                self.url, status
            )));
        }

        let body = response.text()?;
        debug!(bytes = body.len(), "upstream changelog received");
        Ok(body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_crate() {
        assert!(USER_AGENT.starts_with("upstream-bump/"));
    }

    #[test]
    fn test_describe_is_url() {
        let source =
            HttpChangelogSource::new("https://example.org/CHANGELOG.md", Duration::from_secs(5))
                .unwrap();
        assert_eq!(source.describe(), "https://example.org/CHANGELOG.md");
    }
}
