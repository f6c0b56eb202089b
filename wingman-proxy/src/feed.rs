use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use log::debug;
use wingman_calendar::Feed;

/// Where the event feed is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl FromStr for Source {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            bail!("feed source must not be empty");
        }

        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Source::Url(s.to_string()))
        } else {
            Ok(Source::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
        }
    }
}

pub async fn load(source: &Source) -> Result<Feed> {
    debug!("Loading feed from {source}");

    let feed: Feed = match source {
        Source::File(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        Source::Url(url) => reqwest::get(url)
            .await
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("Failed to fetch {url}"))?
            .json()
            .await
            .with_context(|| format!("Failed to parse feed from {url}"))?,
    };

    debug!(
        "Loaded {} events and {} venues from {source}",
        feed.events.len(),
        feed.venues.len()
    );

    Ok(feed)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn temp_feed(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn classifies_sources() {
        assert_eq!(
            "http://localhost:3000/feed".parse::<Source>().unwrap(),
            Source::Url("http://localhost:3000/feed".to_string())
        );
        assert_eq!(
            "./mock/feed.json".parse::<Source>().unwrap(),
            Source::File(PathBuf::from("./mock/feed.json"))
        );
        assert!("  ".parse::<Source>().is_err());
    }

    #[tokio::test]
    async fn loads_feed_from_file() {
        let file = temp_feed(
            r#"{ "name": "Mock", "events": [{ "id": 1, "title": "Launch", "date": "2025-03-01" }] }"#,
        );

        let feed = load(&Source::File(file.path().to_path_buf())).await.unwrap();

        assert_eq!(feed.name, "Mock");
        assert_eq!(feed.events.len(), 1);
        assert!(feed.venues.is_empty());
    }

    #[tokio::test]
    async fn loads_bundled_mock_feed() {
        let path = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../mock/feed.json"));
        let feed = load(&Source::File(path)).await.unwrap();

        assert_eq!(feed.events.len(), 4);
        assert_eq!(feed.venues.len(), 2);
        assert!(feed.events.iter().all(|event| event.date.is_some()));
    }

    #[tokio::test]
    async fn reports_unreadable_and_malformed_feeds() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Source::File(dir.path().join("feed.json"));
        let err = load(&missing).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));

        let file = temp_feed("[1, 2, 3]");
        let err = load(&Source::File(file.path().to_path_buf())).await.unwrap_err();

        assert!(err.to_string().starts_with("Failed to parse"));
    }
}
