use crate::employee::Roster;
use crate::loader::{LoadError, roster_from_csv};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while fetching a roster snapshot.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Where the roster CSV comes from.
///
/// The spreadsheet publishes the whole roster on every request, so each
/// fetch is a full replacement snapshot.
#[derive(Debug, Clone)]
pub enum RosterSource {
    Http { client: reqwest::Client, url: String },
    File { path: PathBuf },
}

impl RosterSource {
    /// `http://` and `https://` locations are fetched over the network,
    /// anything else is read as a local path.
    pub fn parse(location: &str, timeout: Duration) -> Result<Self, SourceError> {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(SourceError::Client)?;
            Ok(RosterSource::Http {
                client,
                url: location.to_string(),
            })
        } else {
            Ok(RosterSource::File {
                path: PathBuf::from(location),
            })
        }
    }

    pub fn describe(&self) -> String {
        match self {
            RosterSource::Http { url, .. } => url.clone(),
            RosterSource::File { path } => path.display().to_string(),
        }
    }

    /// Fetch the raw CSV text.
    pub async fn fetch(&self) -> Result<String, SourceError> {
        match self {
            RosterSource::Http { client, url } => {
                let http_err = |source| SourceError::Http {
                    url: url.clone(),
                    source,
                };
                let resp = client.get(url).send().await.map_err(http_err)?;

                if !resp.status().is_success() {
                    return Err(SourceError::Status {
                        url: url.clone(),
                        status: resp.status().as_u16(),
                    });
                }

                resp.text().await.map_err(http_err)
            }
            RosterSource::File { path } => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| SourceError::Io {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }

    /// Fetch and parse one roster snapshot.
    pub async fn load(&self) -> Result<Roster, SourceError> {
        let text = self.fetch().await?;
        let roster = roster_from_csv(&text)?;
        log::debug!(
            "fetched {} employees from {}",
            roster.len(),
            self.describe()
        );
        Ok(roster)
    }
}
