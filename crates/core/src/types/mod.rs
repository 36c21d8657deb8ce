//! Core types for Vitrine.
//!
//! This module provides type-safe wrappers for catalog domain concepts.

pub mod category;
pub mod id;
pub mod product;

pub use category::{Category, CategoryError, CategoryRegistry, UNKNOWN_CATEGORY_NAME};
pub use id::*;
pub use product::{
    CreateProductInput, ImageUpload, Product, ProductImage, ProductQuery, UpdateProductInput,
};
