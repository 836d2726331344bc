//! Remote and on-disk collaborators of the pipeline.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::RemoteLookupError;
use crate::util::version::user_agent;

pub mod cache;
pub mod facilities;
pub mod market;
pub mod output;
pub mod ownership;
pub mod refapi;

/// Default per-request timeout for every remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the HTTP client shared by all remote lookups of a run.
pub fn http_client(timeout: Duration) -> Result<Client, RemoteLookupError> {
    Ok(Client::builder()
        .user_agent(user_agent())
        .timeout(timeout)
        .build()?)
}

/// Parses a base URL, making sure relative paths join below it.
pub fn base_url(raw: &str) -> Result<Url, RemoteLookupError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn get_json<T>(request: reqwest::RequestBuilder, url: &Url) -> Result<T, RemoteLookupError>
where
    T: DeserializeOwned,
{
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(RemoteLookupError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|err| RemoteLookupError::malformed(url, err))
}
