use reqwest::{RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use super::{ClientError, ClientResult, QueryCache, QueryKey};
use crate::HandledResponseModel;

mod host;
mod remote;
mod tag;

pub(crate) const HOSTS: &str = "hosts";
pub(crate) const REMOTES: &str = "remotes";
pub(crate) const TAGS: &str = "tags";

/// Typed client for the fedhub REST API.
///
/// Reads go through a [`QueryCache`]; every successful mutation invalidates
/// the cache keys it can affect so the next read goes back to the server.
pub struct FedhubClient {
    http: reqwest::Client,
    base_url: Url,
    cache: QueryCache,
}

impl FedhubClient {
    pub fn new(endpoint: &str) -> ClientResult<Self> {
        let mut base_url = Url::parse(endpoint)?;

        // keep any path prefix when joining relative API paths
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            cache: QueryCache::default(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.base_url
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<HandledResponseModel>(&body) {
            Ok(handled) => handled.message,
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
            Err(_) => body,
        };

        tracing::debug!("api error ({status}): {message}");

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let body = response.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }

    async fn query<T>(&self, key: QueryKey, path: &str) -> ClientResult<T>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!("cache hit for {key}");
            return Ok(cached);
        }

        let generation = self.cache.generation();
        let url = self.url(path)?;
        let response = self.send(self.http.get(url)).await?;
        let value: T = Self::decode(response).await?;

        self.cache.insert_if_current(key, &value, generation);

        Ok(value)
    }

    async fn mutate(
        &self,
        request: RequestBuilder,
        invalidates: &[&str],
    ) -> ClientResult<Response> {
        let response = self.send(request).await?;

        for resource in invalidates {
            self.cache.invalidate(&QueryKey::resource(resource));
        }

        Ok(response)
    }
}
