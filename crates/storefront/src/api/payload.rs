//! Request body encoding for product writes.
//!
//! Each transport gets its own body type built from the core inputs. The
//! multipart body is kept as a plain list of fields until it is turned into a
//! `reqwest` form, so the field selection rules can be checked directly.

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use vitrine_core::{CategoryId, CreateProductInput, ImageUpload, ProductImage, UpdateProductInput};

use super::error::ApiError;

pub const NAME_FIELD: &str = "name";
pub const IMAGE_FIELD: &str = "image";
pub const CATEGORY_FIELD: &str = "idCateg";

const JSON_UPLOAD_UNSUPPORTED: &str = "image uploads require the multipart transport";

// =============================================================================
// JSON
// =============================================================================

/// JSON body for `POST /products` and `PUT /products/{id}`.
///
/// Absent fields are left out of the document entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JsonProductBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "idCateg", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

impl JsonProductBody {
    /// # Errors
    ///
    /// Returns `ApiError::UnsupportedPayload` if the image is a file upload.
    pub fn for_create(input: CreateProductInput) -> Result<Self, ApiError> {
        Ok(Self {
            name: Some(input.name),
            image: Some(image_reference(input.image)?),
            category_id: Some(input.category_id),
        })
    }

    /// # Errors
    ///
    /// Returns `ApiError::UnsupportedPayload` if the image is a file upload.
    pub fn for_update(input: UpdateProductInput) -> Result<Self, ApiError> {
        Ok(Self {
            name: input.name,
            image: input.image.map(image_reference).transpose()?,
            category_id: input.category_id,
        })
    }
}

fn image_reference(image: ProductImage) -> Result<String, ApiError> {
    match image {
        ProductImage::Reference(reference) => Ok(reference),
        ProductImage::Upload(_) => Err(ApiError::UnsupportedPayload(JSON_UPLOAD_UNSUPPORTED)),
    }
}

// =============================================================================
// Multipart
// =============================================================================

/// Value of a single multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(ImageUpload),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub value: FieldValue,
}

/// Ordered multipart fields for a product write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartProductBody {
    fields: Vec<FormField>,
}

impl MultipartProductBody {
    /// All three fields, always. A referenced image is sent as a text field.
    #[must_use]
    pub fn for_create(input: CreateProductInput) -> Self {
        let image = match input.image {
            ProductImage::Upload(upload) => FieldValue::File(upload),
            ProductImage::Reference(reference) => FieldValue::Text(reference),
        };

        let mut body = Self::default();
        body.push(NAME_FIELD, FieldValue::Text(input.name));
        body.push(IMAGE_FIELD, image);
        body.push(CATEGORY_FIELD, FieldValue::Text(input.category_id.to_string()));
        body
    }

    /// Only the fields present in `input`. The image is included only when it
    /// is a file upload; a reference is dropped without error.
    #[must_use]
    pub fn for_update(input: UpdateProductInput) -> Self {
        let mut body = Self::default();
        if let Some(name) = input.name {
            body.push(NAME_FIELD, FieldValue::Text(name));
        }
        if let Some(ProductImage::Upload(upload)) = input.image {
            body.push(IMAGE_FIELD, FieldValue::File(upload));
        }
        if let Some(category_id) = input.category_id {
            body.push(CATEGORY_FIELD, FieldValue::Text(category_id.to_string()));
        }
        body
    }

    fn push(&mut self, name: &'static str, value: FieldValue) {
        self.fields.push(FormField { name, value });
    }

    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Field names in send order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Convert into a `reqwest` form.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if an upload carries an unparsable MIME type.
    pub fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for field in self.fields {
            form = match field.value {
                FieldValue::Text(text) => form.text(field.name, text),
                FieldValue::File(upload) => {
                    let part = Part::bytes(upload.bytes)
                        .file_name(upload.file_name)
                        .mime_str(&upload.content_type)?;
                    form.part(field.name, part)
                }
            };
        }
        Ok(form)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lamp_upload() -> ImageUpload {
        ImageUpload::new("lamp.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF])
    }

    fn create_input(image: ProductImage) -> CreateProductInput {
        CreateProductInput {
            name: "Lamp".to_string(),
            image,
            category_id: CategoryId::new(2),
        }
    }

    #[test]
    fn test_multipart_create_has_exactly_three_fields() {
        let body = MultipartProductBody::for_create(create_input(lamp_upload().into()));

        assert_eq!(body.field_names(), vec!["name", "image", "idCateg"]);
        assert_eq!(body.get("name"), Some(&FieldValue::Text("Lamp".to_string())));
        assert_eq!(body.get("image"), Some(&FieldValue::File(lamp_upload())));
        assert_eq!(body.get("idCateg"), Some(&FieldValue::Text("2".to_string())));
    }

    #[test]
    fn test_multipart_create_sends_reference_as_text() {
        let image = ProductImage::Reference("/images/lamp.jpg".to_string());
        let body = MultipartProductBody::for_create(create_input(image));

        assert_eq!(body.fields().len(), 3);
        assert_eq!(
            body.get("image"),
            Some(&FieldValue::Text("/images/lamp.jpg".to_string()))
        );
    }

    #[test]
    fn test_multipart_update_name_only() {
        let body = MultipartProductBody::for_update(UpdateProductInput::default().name("Lamp2"));

        assert_eq!(body.field_names(), vec!["name"]);
        assert_eq!(body.get("name"), Some(&FieldValue::Text("Lamp2".to_string())));
    }

    #[test]
    fn test_multipart_update_drops_non_file_image() {
        let input = UpdateProductInput::default()
            .name("Lamp2")
            .image(ProductImage::Reference("/images/other.jpg".to_string()));
        let body = MultipartProductBody::for_update(input);

        assert_eq!(body.field_names(), vec!["name"]);
        assert!(body.get("image").is_none());
    }

    #[test]
    fn test_multipart_update_keeps_file_image_and_category() {
        let input = UpdateProductInput::default()
            .image(lamp_upload().into())
            .category_id(CategoryId::new(4));
        let body = MultipartProductBody::for_update(input);

        assert_eq!(body.field_names(), vec!["image", "idCateg"]);
        assert_eq!(body.get("idCateg"), Some(&FieldValue::Text("4".to_string())));
    }

    #[test]
    fn test_multipart_update_empty_input_has_no_fields() {
        let body = MultipartProductBody::for_update(UpdateProductInput::default());
        assert!(body.fields().is_empty());
    }

    #[test]
    fn test_into_form_rejects_bad_mime() {
        let upload = ImageUpload::new("lamp.jpg", "not a mime", vec![1]);
        let body = MultipartProductBody::for_create(create_input(upload.into()));
        assert!(matches!(body.into_form(), Err(ApiError::Http(_))));
    }

    #[test]
    fn test_json_create_body() {
        let image = ProductImage::Reference("/images/lamp.jpg".to_string());
        let body = JsonProductBody::for_create(create_input(image)).unwrap();
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"name": "Lamp", "image": "/images/lamp.jpg", "idCateg": 2})
        );
    }

    #[test]
    fn test_json_update_only_present_keys() {
        let body = JsonProductBody::for_update(UpdateProductInput::default().name("Lamp2")).unwrap();
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, serde_json::json!({"name": "Lamp2"}));
    }

    #[test]
    fn test_json_rejects_uploads() {
        let result = JsonProductBody::for_create(create_input(lamp_upload().into()));
        assert!(matches!(result, Err(ApiError::UnsupportedPayload(_))));

        let result = JsonProductBody::for_update(UpdateProductInput::default().image(lamp_upload().into()));
        assert!(matches!(result, Err(ApiError::UnsupportedPayload(_))));
    }
}
