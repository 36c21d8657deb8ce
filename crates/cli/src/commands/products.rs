//! Products API commands.
//!
//! # Environment Variables
//!
//! - `VITRINE_API_BASE_URL` - Base URL of the products API
//! - `VITRINE_API_TRANSPORT` - `json` (default) or `multipart`

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use vitrine_core::{
    CategoryId, CategoryRegistry, CreateProductInput, ImageUpload, Product, ProductId,
    ProductImage, ProductQuery, UpdateProductInput,
};
use vitrine_storefront::api::{ApiError, ProductsClient};
use vitrine_storefront::config::{ApiConfig, ConfigError, Transport};

use super::print_json;

/// Errors that can occur during product commands.
#[derive(Debug, Error)]
pub enum ProductsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Failed to read image {0}: {1}")]
    ReadImage(PathBuf, std::io::Error),

    #[error("Create requires --image-file or --image-ref")]
    MissingImage,
}

/// A product as shown to the user, with its category label resolved.
#[derive(Serialize)]
struct ProductView<'a> {
    #[serde(flatten)]
    product: &'a Product,
    #[serde(rename = "categoryName")]
    category_name: &'a str,
}

fn client() -> Result<ProductsClient, ProductsError> {
    let config = ApiConfig::from_env()?;
    tracing::debug!(
        base_url = %config.base_url,
        transport = %config.transport,
        "Using products API"
    );
    Ok(ProductsClient::new(&config)?)
}

fn print_products(products: &[Product]) -> Result<(), ProductsError> {
    let registry = CategoryRegistry::builtin();
    let views: Vec<ProductView<'_>> = products
        .iter()
        .map(|product| ProductView {
            product,
            category_name: registry.lookup_name(product.category_id),
        })
        .collect();
    print_json(&views)?;
    Ok(())
}

fn print_product(product: &Product) -> Result<(), ProductsError> {
    let registry = CategoryRegistry::builtin();
    print_json(&ProductView {
        product,
        category_name: registry.lookup_name(product.category_id),
    })?;
    Ok(())
}

/// List products, optionally filtered by category.
pub async fn list(category: Option<i32>) -> Result<(), ProductsError> {
    let query = ProductQuery {
        category_id: category.map(CategoryId::new),
    };
    let products = client()?.list(query).await?;
    tracing::info!(count = products.len(), "Fetched products");
    print_products(&products)
}

/// Fetch one product.
pub async fn get(id: &str) -> Result<(), ProductsError> {
    let product = client()?.get(&ProductId::from(id)).await?;
    print_product(&product)
}

/// Create a product.
pub async fn create(name: String, image: ProductImage, category: i32) -> Result<(), ProductsError> {
    let input = CreateProductInput {
        name,
        image,
        category_id: CategoryId::new(category),
    };
    let product = client()?.create(input).await?;
    print_product(&product)
}

/// Update the given fields of a product.
pub async fn update(
    id: &str,
    name: Option<String>,
    image: Option<ProductImage>,
    category: Option<i32>,
) -> Result<(), ProductsError> {
    let input = UpdateProductInput {
        name,
        image,
        category_id: category.map(CategoryId::new),
    };
    if input.is_empty() {
        tracing::warn!("No fields given; sending an empty update");
    }
    let client = client()?;
    if drops_reference_image(client.transport(), &input) {
        tracing::warn!("Multipart updates only send uploaded files; --image-ref is ignored");
    }
    let product = client.update(&ProductId::from(id), input).await?;
    print_product(&product)
}

/// Delete a product.
pub async fn delete(id: &str) -> Result<(), ProductsError> {
    client()?.delete(&ProductId::from(id)).await?;
    tracing::info!(id = %id, "Product deleted");
    Ok(())
}

/// Multipart updates carry the image only as a file part.
fn drops_reference_image(transport: Transport, input: &UpdateProductInput) -> bool {
    transport == Transport::Multipart && input.image.as_ref().is_some_and(|i| !i.is_upload())
}

/// Turn the image flags into an image field. At most one flag is set.
pub async fn load_image(
    file: Option<PathBuf>,
    reference: Option<String>,
) -> Result<Option<ProductImage>, ProductsError> {
    if let Some(path) = file {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| ProductsError::ReadImage(path.clone(), e))?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
        tracing::debug!(file = %path.display(), bytes = bytes.len(), "Loaded image");
        return Ok(Some(ProductImage::Upload(ImageUpload::new(
            file_name,
            content_type_for(&path),
            bytes,
        ))));
    }
    Ok(reference.map(ProductImage::Reference))
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}
