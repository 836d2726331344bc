//! Client for the reference API's manufacturing recipes.
//!
//! Every recipe is fetched at most once per run while it stays in the
//! bounded cache. Failed lookups are never cached.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Url};
use tokio::sync::Mutex;
use tracing::debug;

use super::cache::{CacheStats, LruCache, DEFAULT_CAPACITY};
use super::{base_url, get_json, http_client, DEFAULT_TIMEOUT};
use crate::domain::{Recipe, RecipeSource, TypeId};
use crate::error::RemoteLookupError;

const RECIPE_PATH: &str = "recipes/manufacturing/";

#[derive(Clone)]
pub struct RefApiClient {
    http: Client,
    base_url: Url,
    cache: Arc<Mutex<LruCache<TypeId, Recipe>>>,
}

impl RefApiClient {
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

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.lock().await.stats()
    }

    async fn request_recipe(&self, type_id: TypeId) -> Result<Recipe, RemoteLookupError> {
        let url = self.base_url.join(&format!("{RECIPE_PATH}{type_id}"))?;
        debug!(%url, "requesting recipe");
        get_json(self.http.get(url.clone()), &url).await
    }
}

#[async_trait]
impl RecipeSource for RefApiClient {
    async fn fetch_recipe(&self, type_id: TypeId) -> Result<Recipe, RemoteLookupError> {
        if let Some(recipe) = self.cache.lock().await.get(&type_id) {
            debug!(type_id, "serving cached recipe");
            return Ok(recipe);
        }

        let recipe = self.request_recipe(type_id).await?;
        self.cache.lock().await.insert(type_id, recipe.clone());
        Ok(recipe)
    }
}
