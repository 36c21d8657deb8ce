//! Vitrine Storefront library.
//!
//! The front-end core of the catalog: the route table that maps URLs to page
//! views, and the client for the products API. Category data lives in
//! `vitrine-core`.
//!
//! # Example
//!
//! ```rust,no_run
//! use vitrine_core::{CategoryId, ProductQuery};
//! use vitrine_storefront::api::ProductsClient;
//! use vitrine_storefront::config::{ApiConfig, Transport};
//! use vitrine_storefront::router::RouteTable;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ApiConfig::parse("http://localhost:8080/api", Transport::Json)?;
//! let client = ProductsClient::new(&config)?;
//!
//! let routes = RouteTable::new("/")?;
//! let resolved = routes.resolve("/products/category/3");
//! if let Some(id) = resolved.param("id") {
//!     let products = client.list(ProductQuery::in_category(id.parse::<CategoryId>()?)).await?;
//!     # drop(products);
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod router;
