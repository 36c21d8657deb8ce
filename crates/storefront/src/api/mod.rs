//! Products API client.
//!
//! # Endpoints
//!
//! ```text
//! GET    /products[?idCateg=]   - List products, optionally in one category
//! GET    /products/{id}         - Get one product
//! POST   /products              - Create (JSON or multipart)
//! PUT    /products/{id}         - Partial update (JSON or multipart)
//! DELETE /products/{id}         - Delete
//! ```
//!
//! Paths are appended to the configured base URL. The write encoding is
//! picked once per client from [`Transport`](crate::config::Transport).
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrine_storefront::api::ProductsClient;
//!
//! let client = ProductsClient::new(&config.api)?;
//!
//! let books = client.list(ProductQuery::in_category(CategoryId::new(3))).await?;
//! let updated = client
//!     .update(&books[0].id, UpdateProductInput::default().name("Dom Casmurro"))
//!     .await?;
//! ```

mod client;
mod error;
pub mod payload;

pub use client::ProductsClient;
pub use error::ApiError;
