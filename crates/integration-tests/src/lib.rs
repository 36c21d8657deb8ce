//! Integration tests for Vitrine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrine-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `products_api` - Products client against an in-process mock backend
//! - `routing` - Route table together with the category registry
//!
//! The mock backend is a small axum app bound to `127.0.0.1:0`. It serves the
//! products resource under `/api`, keeps products in memory, and records every
//! request it receives (method, path, query, content type, decoded body) so
//! tests can assert on what actually went over the wire.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use vitrine_core::{CategoryId, Product, ProductId};

/// Path prefix the mock serves the API under.
pub const API_PREFIX: &str = "/api";

/// Any request for this product id gets a `500`.
pub const FAILING_PRODUCT_ID: &str = "boom";

/// First id handed out by the mock on create.
pub const FIRST_CREATED_ID: i64 = 100;

// =============================================================================
// Recorded Requests
// =============================================================================

/// One multipart field as received by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl RecordedField {
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    #[must_use]
    pub const fn is_file(&self) -> bool {
        self.file_name.is_some()
    }
}

/// Decoded request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<RecordedField>),
    Raw(Vec<u8>),
}

impl RecordedBody {
    /// Multipart fields in received order; empty for other bodies.
    #[must_use]
    pub fn fields(&self) -> &[RecordedField] {
        match self {
            Self::Multipart(fields) => fields,
            _ => &[],
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&RecordedField> {
        self.fields().iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields().iter().map(|f| f.name.as_str()).collect()
    }

    #[must_use]
    pub const fn json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: RecordedBody,
}

// =============================================================================
// Mock Backend
// =============================================================================

#[derive(Clone)]
struct MockState {
    products: Arc<Mutex<Vec<Product>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    next_id: Arc<Mutex<i64>>,
}

impl MockState {
    fn products(&self) -> MutexGuard<'_, Vec<Product>> {
        self.products.lock().expect("products lock poisoned")
    }

    fn requests(&self) -> MutexGuard<'_, Vec<RecordedRequest>> {
        self.requests.lock().expect("requests lock poisoned")
    }

    fn allocate_id(&self) -> ProductId {
        let mut next = self.next_id.lock().expect("id lock poisoned");
        let id = *next;
        *next += 1;
        ProductId::from(id)
    }
}

/// In-process products backend.
///
/// The server task is aborted when the backend is dropped.
pub struct MockBackend {
    addr: SocketAddr,
    state: MockState,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Start a backend seeded with `products`, served in the given order.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(products: Vec<Product>) -> Self {
        let state = MockState {
            products: Arc::new(Mutex::new(products)),
            requests: Arc::default(),
            next_id: Arc::new(Mutex::new(FIRST_CREATED_ID)),
        };

        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend crashed");
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL to configure the client with, e.g. `http://127.0.0.1:PORT/api`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}{API_PREFIX}", self.addr)
    }

    /// All requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests().clone()
    }

    /// # Panics
    ///
    /// Panics if no request has been received.
    #[must_use]
    pub fn last_request(&self) -> RecordedRequest {
        self.state
            .requests()
            .last()
            .cloned()
            .expect("backend received no requests")
    }

    /// Current server-side products.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.state.products().clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Build a product.
#[must_use]
pub fn product(id: i64, name: &str, category: i32) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_string(),
        image: format!("/uploads/{id}.jpg"),
        category_id: CategoryId::new(category),
    }
}

/// Seed data, deliberately not sorted by id.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    vec![
        product(3, "Dom Casmurro", 3),
        product(1, "Notebook", 1),
        product(2, "Camiseta", 2),
        product(5, "O Cortiço", 3),
    ]
}

// =============================================================================
// Handlers
// =============================================================================

async fn handle(State(state): State<MockState>, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let query = request.uri().query().map(str::to_owned);
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let body = match read_body(request, content_type.as_deref()).await {
        Ok(body) => body,
        Err(status) => return status.into_response(),
    };

    state.requests().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: query.clone(),
        content_type,
        body: body.clone(),
    });

    let Some(rest) = path
        .strip_prefix(API_PREFIX)
        .and_then(|p| p.strip_prefix("/products"))
    else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let id = rest.strip_prefix('/').filter(|id| !id.is_empty());

    match (&method, id) {
        (_, Some(FAILING_PRODUCT_ID)) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        (&Method::GET, None) if rest.is_empty() => list(&state, query.as_deref()),
        (&Method::POST, None) if rest.is_empty() => create(&state, &body),
        (&Method::GET, Some(id)) => get(&state, id),
        (&Method::PUT, Some(id)) => update(&state, id, &body),
        (&Method::DELETE, Some(id)) => delete(&state, id),
        (_, None) if !rest.is_empty() => StatusCode::NOT_FOUND.into_response(),
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

async fn read_body(
    request: Request,
    content_type: Option<&str>,
) -> Result<RecordedBody, StatusCode> {
    if content_type.is_some_and(|ct| ct.starts_with("multipart/form-data")) {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?;

        let mut fields = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?
        {
            let name = field.name().unwrap_or_default().to_owned();
            let file_name = field.file_name().map(str::to_owned);
            let content_type = field.content_type().map(str::to_owned);
            let data = field
                .bytes()
                .await
                .map_err(|_| StatusCode::BAD_REQUEST)?
                .to_vec();
            fields.push(RecordedField {
                name,
                file_name,
                content_type,
                data,
            });
        }
        return Ok(RecordedBody::Multipart(fields));
    }

    let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    if bytes.is_empty() {
        return Ok(RecordedBody::Empty);
    }
    Ok(serde_json::from_slice(&bytes)
        .map_or_else(|_| RecordedBody::Raw(bytes.to_vec()), RecordedBody::Json))
}

/// Product fields present in a write, whichever encoding carried them.
#[derive(Default)]
struct Submitted {
    name: Option<String>,
    image: Option<String>,
    category_id: Option<CategoryId>,
}

impl Submitted {
    fn from_body(body: &RecordedBody) -> Self {
        match body {
            RecordedBody::Json(value) => Self {
                name: value.get("name").and_then(|v| v.as_str()).map(str::to_owned),
                image: value.get("image").and_then(|v| v.as_str()).map(str::to_owned),
                category_id: value
                    .get("idCateg")
                    .and_then(serde_json::Value::as_i64)
                    .and_then(|v| i32::try_from(v).ok())
                    .map(CategoryId::new),
            },
            RecordedBody::Multipart(_) => Self {
                name: body.field("name").map(RecordedField::text),
                image: body.field("image").map(|f| {
                    f.file_name
                        .as_ref()
                        .map_or_else(|| f.text(), |file| format!("/uploads/{file}"))
                }),
                category_id: body
                    .field("idCateg")
                    .and_then(|f| f.text().parse::<CategoryId>().ok()),
            },
            RecordedBody::Empty | RecordedBody::Raw(_) => Self::default(),
        }
    }
}

fn list(state: &MockState, query: Option<&str>) -> Response {
    let category = query
        .into_iter()
        .flat_map(|q| q.split('&'))
        .find_map(|pair| pair.strip_prefix("idCateg="))
        .and_then(|v| v.parse::<CategoryId>().ok());

    let products: Vec<Product> = state
        .products()
        .iter()
        .filter(|p| category.is_none_or(|c| p.category_id == c))
        .cloned()
        .collect();
    Json(products).into_response()
}

fn get(state: &MockState, id: &str) -> Response {
    state
        .products()
        .iter()
        .find(|p| p.id.as_str() == id)
        .cloned()
        .map_or_else(
            || StatusCode::NOT_FOUND.into_response(),
            |p| Json(p).into_response(),
        )
}

fn create(state: &MockState, body: &RecordedBody) -> Response {
    let submitted = Submitted::from_body(body);
    let (Some(name), Some(image), Some(category_id)) =
        (submitted.name, submitted.image, submitted.category_id)
    else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };

    let product = Product {
        id: state.allocate_id(),
        name,
        image,
        category_id,
    };
    state.products().push(product.clone());
    (StatusCode::CREATED, Json(product)).into_response()
}

fn update(state: &MockState, id: &str, body: &RecordedBody) -> Response {
    let submitted = Submitted::from_body(body);
    let mut products = state.products();
    let Some(product) = products.iter_mut().find(|p| p.id.as_str() == id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if let Some(name) = submitted.name {
        product.name = name;
    }
    if let Some(image) = submitted.image {
        product.image = image;
    }
    if let Some(category_id) = submitted.category_id {
        product.category_id = category_id;
    }
    Json(product.clone()).into_response()
}

fn delete(state: &MockState, id: &str) -> Response {
    let mut products = state.products();
    let before = products.len();
    products.retain(|p| p.id.as_str() != id);
    if products.len() == before {
        StatusCode::NOT_FOUND.into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}
