//! Sources of owned blueprint copies.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use super::get_json;
use crate::domain::BlueprintCopy;
use crate::error::RemoteLookupError;

#[derive(Debug, Error)]
pub enum OwnershipError {
    #[error(transparent)]
    Remote(#[from] RemoteLookupError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait OwnershipSource: Send + Sync {
    async fn blueprints(&self) -> Result<Vec<BlueprintCopy>, OwnershipError>;
}

/// Accepts either a bare array or an object wrapping it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BlueprintListing {
    Bare(Vec<BlueprintCopy>),
    Wrapped { blueprints: Vec<BlueprintCopy> },
}

impl BlueprintListing {
    fn into_copies(self) -> Vec<BlueprintCopy> {
        match self {
            BlueprintListing::Bare(copies) => copies,
            BlueprintListing::Wrapped { blueprints } => blueprints,
        }
    }
}

pub struct HttpOwnershipSource {
    http: Client,
    url: Url,
    token: Option<String>,
}

impl HttpOwnershipSource {
    pub fn new(http: Client, url: &str, token: Option<String>) -> Result<Self, RemoteLookupError> {
        Ok(Self {
            http,
            url: Url::parse(url)?,
            token,
        })
    }
}

#[async_trait]
impl OwnershipSource for HttpOwnershipSource {
    async fn blueprints(&self) -> Result<Vec<BlueprintCopy>, OwnershipError> {
        let mut request = self.http.get(self.url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let listing: BlueprintListing = get_json(request, &self.url).await?;
        let copies = listing.into_copies();
        info!(count = copies.len(), url = %self.url, "loaded blueprint copies");
        Ok(copies)
    }
}

pub struct FileOwnershipSource {
    path: PathBuf,
}

impl FileOwnershipSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl OwnershipSource for FileOwnershipSource {
    async fn blueprints(&self) -> Result<Vec<BlueprintCopy>, OwnershipError> {
        let content = tokio::fs::read(&self.path)
            .await
            .map_err(|source| OwnershipError::Read {
                path: self.path.clone(),
                source,
            })?;
        let listing: BlueprintListing =
            serde_json::from_slice(&content).map_err(|source| OwnershipError::Parse {
                path: self.path.clone(),
                source,
            })?;
        let copies = listing.into_copies();
        info!(count = copies.len(), path = %self.path.display(), "loaded blueprint copies");
        Ok(copies)
    }
}

/// Picks the source from the location's scheme: URLs are fetched, anything
/// else is read as a local file.
pub fn ownership_source(
    location: &str,
    token: Option<String>,
    http: Client,
) -> Result<Box<dyn OwnershipSource>, RemoteLookupError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpOwnershipSource::new(http, location, token)?))
    } else {
        Ok(Box::new(FileOwnershipSource::new(location)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn reads_bare_and_wrapped_listings() {
        let mut bare = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            bare,
            r#"[{{"typeID": 100, "materialEfficiency": 10}}, {{"typeID": 200, "materialEfficiency": 0}}]"#
        )
        .expect("write listing");

        let mut wrapped = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            wrapped,
            r#"{{"blueprints": [{{"type_id": 300, "material_efficiency": 4, "runs": 5}}]}}"#
        )
        .expect("write listing");

        let copies = FileOwnershipSource::new(bare.path())
            .blueprints()
            .await
            .expect("bare listing loads");
        assert_eq!(copies.len(), 2);
        assert_eq!(copies[1].type_id, 200);

        let copies = FileOwnershipSource::new(wrapped.path())
            .blueprints()
            .await
            .expect("wrapped listing loads");
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].material_efficiency, 4);
        assert_eq!(copies[0].attributes.get("runs"), Some(&serde_json::json!(5)));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let result = FileOwnershipSource::new("/nonexistent/blueprints.json")
            .blueprints()
            .await;

        assert!(matches!(result, Err(OwnershipError::Read { .. })));
    }
}
