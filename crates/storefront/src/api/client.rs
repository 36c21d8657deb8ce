//! HTTP client for the products resource.

use std::sync::Arc;

use reqwest::RequestBuilder;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, info, instrument};
use url::Url;
use vitrine_core::{CreateProductInput, Product, ProductId, ProductQuery, UpdateProductInput};

use crate::config::{ApiConfig, Transport};

use super::error::ApiError;
use super::payload::{CATEGORY_FIELD, JsonProductBody, MultipartProductBody};

const PRODUCTS_PATH: &str = "products";

/// Products API client.
///
/// Cheap to clone; clones share one connection pool and the same immutable
/// configuration. Every operation is a single request with no retries.
#[derive(Clone)]
pub struct ProductsClient {
    inner: Arc<ProductsClientInner>,
}

struct ProductsClientInner {
    client: reqwest::Client,
    base_url: Url,
    transport: Transport,
}

impl ProductsClient {
    /// Create a new products API client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidBaseUrl` if the base URL cannot carry a path,
    /// or `ApiError::Http` if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        // Multipart requests set their own boundary content type per request.
        if config.transport == Transport::Json {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ProductsClientInner {
                client,
                base_url: config.base_url.clone(),
                transport: config.transport,
            }),
        })
    }

    #[must_use]
    pub fn transport(&self) -> Transport {
        self.inner.transport
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// List products in backend order.
    ///
    /// `idCateg` is only added to the query string when the filter is set.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` on transport failure, error status, or an
    /// undecodable body.
    #[instrument(skip_all, fields(category = ?query.category_id, transport = %self.inner.transport))]
    pub async fn list(&self, query: ProductQuery) -> Result<Vec<Product>, ApiError> {
        let mut url = self.products_url(None);
        if let Some(category_id) = query.category_id {
            url.query_pairs_mut()
                .append_pair(CATEGORY_FIELD, &category_id.to_string());
        }

        debug!(%url, "GET products");
        let response = self.inner.client.get(url).send().await?;
        let products: Vec<Product> = response.error_for_status()?.json().await?;
        debug!(count = products.len(), "products listed");
        Ok(products)
    }

    /// Get one product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http`; a missing product shows up as
    /// [`ApiError::is_not_found`].
    #[instrument(skip_all, fields(id = %id, transport = %self.inner.transport))]
    pub async fn get(&self, id: &ProductId) -> Result<Product, ApiError> {
        let url = self.products_url(Some(id));

        debug!(%url, "GET product");
        let response = self.inner.client.get(url).send().await?;
        Ok(response.error_for_status()?.json().await?)
    }

    /// Create a product. Returns the product with its backend-assigned id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::UnsupportedPayload` if an image upload is sent over
    /// the JSON transport, otherwise `ApiError::Http`.
    #[instrument(skip_all, fields(name = %input.name, transport = %self.inner.transport))]
    pub async fn create(&self, input: CreateProductInput) -> Result<Product, ApiError> {
        let request = match self.inner.transport {
            Transport::Json => self
                .inner
                .client
                .post(self.products_url(None))
                .json(&JsonProductBody::for_create(input)?),
            Transport::Multipart => self
                .inner
                .client
                .post(self.products_url(None))
                .multipart(MultipartProductBody::for_create(input).into_form()?),
        };

        let product = Self::send_for_product(request).await?;
        info!(id = %product.id, "product created");
        Ok(product)
    }

    /// Partially update a product. Only fields present in `input` are sent.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::UnsupportedPayload` if an image upload is sent over
    /// the JSON transport, otherwise `ApiError::Http`.
    #[instrument(skip_all, fields(id = %id, transport = %self.inner.transport))]
    pub async fn update(
        &self,
        id: &ProductId,
        input: UpdateProductInput,
    ) -> Result<Product, ApiError> {
        let url = self.products_url(Some(id));
        let request = match self.inner.transport {
            Transport::Json => self
                .inner
                .client
                .put(url)
                .json(&JsonProductBody::for_update(input)?),
            Transport::Multipart => {
                let body = MultipartProductBody::for_update(input);
                debug!(fields = ?body.field_names(), "multipart update");
                self.inner.client.put(url).multipart(body.into_form()?)
            }
        };

        let product = Self::send_for_product(request).await?;
        info!("product updated");
        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` on transport failure or error status.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn delete(&self, id: &ProductId) -> Result<(), ApiError> {
        let url = self.products_url(Some(id));

        debug!(%url, "DELETE product");
        self.inner
            .client
            .delete(url)
            .send()
            .await?
            .error_for_status()?;
        info!("product deleted");
        Ok(())
    }

    async fn send_for_product(request: RequestBuilder) -> Result<Product, ApiError> {
        let response = request.send().await?;
        Ok(response.error_for_status()?.json().await?)
    }

    /// `{base}/products` or `{base}/products/{id}`, with `id` percent-encoded
    /// as a single path segment.
    fn products_url(&self, id: Option<&ProductId>) -> Url {
        let mut url = self.inner.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(PRODUCTS_PATH);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }
}

impl std::fmt::Debug for ProductsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductsClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("transport", &self.inner.transport)
            .finish_non_exhaustive()
    }
}
