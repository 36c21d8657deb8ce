//! Product resource and the payloads used to create and update it.
//!
//! Products are owned by the backend. These types are transient,
//! request-scoped copies.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};

/// A catalog product as returned by the products API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Image path or URL assigned by the backend.
    pub image: String,
    #[serde(rename = "idCateg")]
    pub category_id: CategoryId,
}

/// Binary image file attached to a multipart request.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    /// MIME type sent on the file part (e.g. `image/jpeg`).
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

// Image bytes are not useful in logs.
impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The image field of a product write.
///
/// Only an [`ImageUpload`] is a genuine file. Transports that require a file
/// for a given field decide what to do with a [`ProductImage::Reference`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductImage {
    /// Path or URL of an image the backend already knows about.
    Reference(String),
    /// A file to upload.
    Upload(ImageUpload),
}

impl ProductImage {
    #[must_use]
    pub const fn is_upload(&self) -> bool {
        matches!(self, Self::Upload(_))
    }
}

impl From<ImageUpload> for ProductImage {
    fn from(upload: ImageUpload) -> Self {
        Self::Upload(upload)
    }
}

/// Fields required to create a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProductInput {
    pub name: String,
    pub image: ProductImage,
    pub category_id: CategoryId,
}

/// Partial update. `None` fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub image: Option<ProductImage>,
    pub category_id: Option<CategoryId>,
}

impl UpdateProductInput {
    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.image.is_none() && self.category_id.is_none()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn image(mut self, image: ProductImage) -> Self {
        self.image = Some(image);
        self
    }

    #[must_use]
    pub const fn category_id(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Filter for listing products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub category_id: Option<CategoryId>,
}

impl ProductQuery {
    /// All products, unfiltered.
    #[must_use]
    pub const fn all() -> Self {
        Self { category_id: None }
    }

    /// Products in one category.
    #[must_use]
    pub const fn in_category(category_id: CategoryId) -> Self {
        Self {
            category_id: Some(category_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_wire_shape() {
        let json = r#"{"id": 12, "name": "Lamp", "image": "/uploads/lamp.jpg", "idCateg": 4}"#;
        let product: Product = serde_json::from_str(json).expect("deserialize");
        assert_eq!(product.id.as_str(), "12");
        assert_eq!(product.category_id, CategoryId::new(4));

        let value = serde_json::to_value(&product).expect("serialize");
        assert_eq!(value["idCateg"], 4);
        assert_eq!(value["image"], "/uploads/lamp.jpg");
        assert!(value.get("category_id").is_none());
    }

    #[test]
    fn test_update_input_builder() {
        let input = UpdateProductInput::default();
        assert!(input.is_empty());

        let input = input.name("Lamp2").category_id(CategoryId::new(2));
        assert!(!input.is_empty());
        assert_eq!(input.name.as_deref(), Some("Lamp2"));
        assert!(input.image.is_none());
    }

    #[test]
    fn test_only_uploads_are_files() {
        let upload = ProductImage::from(ImageUpload::new("a.png", "image/png", vec![1, 2]));
        assert!(upload.is_upload());

        let reference = ProductImage::Reference("/a.png".to_string());
        assert!(!reference.is_upload());
    }

    #[test]
    fn test_image_upload_debug_hides_bytes() {
        let upload = ImageUpload::new("a.png", "image/png", vec![0xAB; 64]);
        let debug = format!("{upload:?}");
        assert!(debug.contains("a.png"));
        assert!(debug.contains("len: 64"));
        assert!(!debug.contains("171"));
    }
}
