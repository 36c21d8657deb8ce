//! Product categories and the static category registry.
//!
//! Categories have no lifecycle: the registry is built once at startup and
//! consulted by views that need a human-readable label or a chip image.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::CategoryId;

/// Label returned by [`CategoryRegistry::lookup_name`] for ids with no entry.
pub const UNKNOWN_CATEGORY_NAME: &str = "Unknown Category";

/// Errors raised while building a registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    /// Two entries share an id.
    #[error("duplicate category id: {0}")]
    DuplicateId(CategoryId),
}

/// A static classification label applied to products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Image path or URL rendered on category chips.
    #[serde(rename = "src")]
    pub image: String,
}

impl Category {
    /// Create a new category.
    #[must_use]
    pub fn new(id: i32, name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(id),
            name: name.into(),
            image: image.into(),
        }
    }
}

/// Ordered, immutable list of categories with unique ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// Build a registry from an ordered list of categories.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::DuplicateId`] if two categories share an id.
    pub fn new(categories: Vec<Category>) -> Result<Self, CategoryError> {
        for (i, category) in categories.iter().enumerate() {
            if categories
                .iter()
                .skip(i + 1)
                .any(|other| other.id == category.id)
            {
                return Err(CategoryError::DuplicateId(category.id));
            }
        }
        Ok(Self { categories })
    }

    /// The catalog's built-in categories.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            categories: vec![
                Category::new(1, "Eletrônicos", "/images/categories/eletronicos.jpg"),
                Category::new(2, "Roupas e Acessorios", "/images/categories/roupas.jpg"),
                Category::new(3, "Livros", "/images/categories/livros.jpg"),
                Category::new(4, "Casa e Cozinha", "/images/categories/casa-cozinha.jpg"),
            ],
        }
    }

    /// Find a category by id.
    #[must_use]
    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Display name for `id`, or [`UNKNOWN_CATEGORY_NAME`] when there is no
    /// such category.
    #[must_use]
    pub fn lookup_name(&self, id: CategoryId) -> &str {
        self.get(id).map_or(UNKNOWN_CATEGORY_NAME, |c| c.name.as_str())
    }

    #[must_use]
    pub fn contains(&self, id: CategoryId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate categories in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a CategoryRegistry {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_name_known_ids() {
        let registry = CategoryRegistry::builtin();
        assert_eq!(registry.lookup_name(CategoryId::new(1)), "Eletrônicos");
        assert_eq!(registry.lookup_name(CategoryId::new(2)), "Roupas e Acessorios");
        assert_eq!(registry.lookup_name(CategoryId::new(3)), "Livros");
        assert_eq!(registry.lookup_name(CategoryId::new(4)), "Casa e Cozinha");
    }

    #[test]
    fn test_lookup_name_unknown_ids_fall_back() {
        let registry = CategoryRegistry::builtin();
        for id in [0, 5, -1, 99, i32::MAX, i32::MIN] {
            assert_eq!(registry.lookup_name(CategoryId::new(id)), UNKNOWN_CATEGORY_NAME);
        }
    }

    #[test]
    fn test_every_entry_resolves_to_its_own_name() {
        let registry = CategoryRegistry::default();
        for category in &registry {
            assert_eq!(registry.lookup_name(category.id), category.name);
        }
    }

    #[test]
    fn test_builtin_order_is_preserved() {
        let ids: Vec<i32> = CategoryRegistry::builtin()
            .iter()
            .map(|c| c.id.as_i32())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_new_rejects_duplicate_ids() {
        let result = CategoryRegistry::new(vec![
            Category::new(1, "A", "/a.jpg"),
            Category::new(2, "B", "/b.jpg"),
            Category::new(1, "C", "/c.jpg"),
        ]);
        assert_eq!(result, Err(CategoryError::DuplicateId(CategoryId::new(1))));
    }

    #[test]
    fn test_empty_registry_always_falls_back() {
        let registry = CategoryRegistry::new(Vec::new()).expect("empty is valid");
        assert!(registry.is_empty());
        assert_eq!(registry.lookup_name(CategoryId::new(1)), UNKNOWN_CATEGORY_NAME);
    }

    #[test]
    fn test_category_serializes_image_as_src() {
        let json = serde_json::to_value(Category::new(3, "Livros", "/l.jpg")).expect("serialize");
        assert_eq!(json["id"], 3);
        assert_eq!(json["src"], "/l.jpg");
    }
}
