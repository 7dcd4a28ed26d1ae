//! REST document store
//!
//! | Operation | Request |
//! |-----------|---------|
//! | get       | `GET {base}/{doc}` (404 reads as absent) |
//! | set       | `PUT {base}/{doc}` with `{fields}` |
//! | update    | `PATCH {base}/{doc}` with `{fields}` (merge, creates) |
//! | delete    | `DELETE {base}/{doc}` (404 is success) |
//! | add       | `POST {base}/{collection}` with `{fields}`, returns `{id}` |
//! | list      | `GET {base}/{collection}?orderBy=..&direction=..`, returns `{documents}` |
//!
//! Requests carry the signed-in user's bearer token when there is one.

use std::sync::Arc;

use async_trait::async_trait;
use eventide_core::DocumentStore;
use eventide_domain::{
    Document, DocumentPath, EventideError, Fields, OrderBy, Result, SortDirection,
};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use super::codec::WireDocument;
use crate::auth::token::optional_token;
use crate::auth::AccessTokenProvider;
use crate::errors::ApiError;
use crate::http::{ensure_success, HttpClient};

#[derive(Deserialize)]
struct CreatedResponse {
    id: String,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    documents: Vec<WireDocument>,
}

/// [`DocumentStore`] over the document database's REST API.
pub struct RestDocumentStore {
    http: HttpClient,
    base_url: Url,
    auth: Arc<dyn AccessTokenProvider>,
}

impl RestDocumentStore {
    pub fn new(http: HttpClient, base_url: &str, auth: Arc<dyn AccessTokenProvider>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| EventideError::Config(format!("invalid documents URL {base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(EventideError::Config(format!("documents URL cannot be a base: {base_url}")));
        }
        Ok(Self { http, base_url, auth })
    }

    fn url_for(&self, path: &DocumentPath) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path.segments());
        }
        url
    }

    async fn request(&self, method: Method, path: &DocumentPath) -> Result<RequestBuilder> {
        let mut request = self.http.request(method, self.url_for(path));
        if let Some(token) = optional_token(self.auth.as_ref()).await? {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn write(&self, method: Method, path: &DocumentPath, fields: &Fields) -> Result<()> {
        path.ensure_document()?;
        let request =
            self.request(method, path).await?.json(&WireDocument::from_fields(fields));
        ensure_success(self.http.send(request).await?).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    #[instrument(skip(self), fields(path = %path))]
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        path.ensure_document()?;
        let response = self.http.send(self.request(Method::GET, path).await?).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let wire: WireDocument = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|err| ApiError::Decode(format!("invalid document: {err}")))?;
        Ok(Some(wire.into_document(path.leaf())))
    }

    async fn set(&self, path: &DocumentPath, fields: Fields) -> Result<()> {
        self.write(Method::PUT, path, &fields).await
    }

    async fn update(&self, path: &DocumentPath, fields: Fields) -> Result<()> {
        self.write(Method::PATCH, path, &fields).await
    }

    #[instrument(skip(self), fields(path = %path))]
    async fn delete(&self, path: &DocumentPath) -> Result<()> {
        path.ensure_document()?;
        let response = self.http.send(self.request(Method::DELETE, path).await?).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("Delete of absent document");
            return Ok(());
        }
        ensure_success(response).await?;
        Ok(())
    }

    async fn add(&self, collection: &DocumentPath, fields: Fields) -> Result<String> {
        collection.ensure_collection()?;
        let request = self
            .request(Method::POST, collection)
            .await?
            .json(&WireDocument::from_fields(&fields));
        let created: CreatedResponse = self.http.send_json(request).await?;
        Ok(created.id)
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn list(
        &self,
        collection: &DocumentPath,
        order: Option<OrderBy>,
    ) -> Result<Vec<Document>> {
        collection.ensure_collection()?;
        let mut request = self.request(Method::GET, collection).await?;
        if let Some(order) = &order {
            let direction = match order.direction {
                SortDirection::Asc => "asc",
                SortDirection::Desc => "desc",
            };
            request = request
                .query(&[("orderBy", order.field.as_str()), ("direction", direction)]);
        }

        let listing: ListResponse = self.http.send_json(request).await?;
        debug!(count = listing.documents.len(), "Listed documents");
        Ok(listing.documents.into_iter().map(|wire| wire.into_document("")).collect())
    }
}
