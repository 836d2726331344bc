//! Market price lookups used by the default calculator.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Url};
use tokio::sync::Mutex;
use tracing::debug;

use super::cache::{LruCache, DEFAULT_CAPACITY};
use super::{base_url, get_json, http_client, DEFAULT_TIMEOUT};
use crate::domain::{PriceQuote, PriceSource, TypeId};
use crate::error::RemoteLookupError;

#[derive(Clone)]
pub struct MarketClient {
    http: Client,
    base_url: Url,
    cache: Arc<Mutex<LruCache<TypeId, PriceQuote>>>,
}

impl MarketClient {
    pub fn new(base: &str) -> Result<Self, RemoteLookupError> {
        Self::with_timeout(base, DEFAULT_TIMEOUT, DEFAULT_CAPACITY)
    }

    pub fn with_timeout(
        base: &str,
        timeout: Duration,
        capacity: usize,
    ) -> Result<Self, RemoteLookupError> {
        Self::with_client(http_client(timeout)?, base, capacity)
    }

    pub fn with_client(
        http: Client,
        base: &str,
        capacity: usize,
    ) -> Result<Self, RemoteLookupError> {
        Ok(Self {
            http,
            base_url: base_url(base)?,
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        })
    }
}

#[async_trait]
impl PriceSource for MarketClient {
    async fn quote(&self, type_id: TypeId) -> Result<PriceQuote, RemoteLookupError> {
        if let Some(quote) = self.cache.lock().await.get(&type_id) {
            return Ok(quote);
        }

        let url = self.base_url.join(&type_id.to_string())?;
        debug!(%url, "requesting price quote");
        let quote: PriceQuote = get_json(self.http.get(url.clone()), &url).await?;
        self.cache.lock().await.insert(type_id, quote);
        Ok(quote)
    }
}
