//! HTTP accessor for resource collections.
//!
//! Calls go straight to the server every time: no caching, no retries. Any
//! non-2xx response comes back as [`ClientError::Status`] carrying the status
//! and the parsed body so callers can inspect the machine code themselves.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use thiserror::Error;
use url::Url;

use crate::database::models::{OrganizationRole, OrganizationScope, Resource};
use crate::middleware::TOTAL_NUMBER_HEADER;
use crate::types::{CreateInput, ListQuery, UpdateInput};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed with status {status}: {body}")]
    Status { status: StatusCode, body: Value },

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status(),
            ClientError::InvalidUrl(_) => None,
        }
    }

    /// Machine-readable `code` from the error body, if any
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Status { body, .. } => body.get("code").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// Typed CRUD accessor for one resource kind
pub struct ResourceClient<E> {
    http: reqwest::Client,
    collection: Url,
    _kind: PhantomData<E>,
}

impl<E> Clone for ResourceClient<E> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            collection: self.collection.clone(),
            _kind: PhantomData,
        }
    }
}

pub type ScopeClient = ResourceClient<OrganizationScope>;
pub type RoleClient = ResourceClient<OrganizationRole>;

impl<E: Resource> ResourceClient<E> {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        // join() replaces the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let collection = base.join(E::PATH)?;
        Ok(Self {
            http,
            collection,
            _kind: PhantomData,
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    fn item_url(&self, id: &str) -> Result<Url, ClientError> {
        let mut url = self.collection.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id);
        Ok(url)
    }

    pub async fn create(&self, input: &CreateInput) -> Result<E, ClientError> {
        let response = self.http.post(self.collection.clone()).json(input).send().await?;
        Self::json(response).await
    }

    pub async fn get(&self, id: &str) -> Result<E, ClientError> {
        let response = self.http.get(self.item_url(id)?).send().await?;
        Self::json(response).await
    }

    pub async fn update(&self, id: &str, input: &UpdateInput) -> Result<E, ClientError> {
        let response = self.http.patch(self.item_url(id)?).json(input).send().await?;
        Self::json(response).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let response = self.http.delete(self.item_url(id)?).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<E>, ClientError> {
        Ok(self.list_with_total(query).await?.0)
    }

    /// One page plus the `Total-Number` header when the server sends it
    pub async fn list_with_total(
        &self,
        query: &ListQuery,
    ) -> Result<(Vec<E>, Option<u64>), ClientError> {
        let response = self
            .http
            .get(self.collection.clone())
            .query(query)
            .send()
            .await?;
        let response = Self::check(response).await?;
        let total = response
            .headers()
            .get(TOTAL_NUMBER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let items = response.json::<Vec<E>>().await?;
        Ok((items, total))
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        Ok(Self::check(response).await?.json::<T>().await?)
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Err(ClientError::Status { status, body })
    }
}
