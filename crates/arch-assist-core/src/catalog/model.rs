//! Catalog data structures

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

/// One material in the flattened catalog.
///
/// Identity is its position in [`Catalog::entries`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Category the material is listed under
    pub category: String,
    /// Material name
    pub name: String,
}

impl CatalogEntry {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.name)
    }
}

/// A category and its materials, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub name: String,
    pub items: Vec<String>,
}

/// The loaded catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from ordered `(category, items)` pairs
    pub fn from_categories<C, I, S>(categories: C) -> Self
    where
        C: IntoIterator<Item = (S, I)>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories: Vec<Category> = categories
            .into_iter()
            .map(|(name, items)| Category {
                name: name.into(),
                items: items.into_iter().map(Into::into).collect(),
            })
            .collect();

        let entries = categories
            .iter()
            .flat_map(|category| {
                category
                    .items
                    .iter()
                    .map(move |item| CatalogEntry::new(category.name.clone(), item.clone()))
            })
            .collect();

        Self {
            categories,
            entries,
        }
    }

    /// Parse a catalog document
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Flattened entries: categories in document order, items in list order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct CategoriesVisitor;

impl<'de> Visitor<'de> for CategoriesVisitor {
    type Value = Vec<(String, Vec<String>)>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping category names to lists of material names")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        // serde_json's Map would sort keys; walk the object by hand to keep document order
        let mut categories: Vec<(String, Vec<String>)> =
            Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, items)) = map.next_entry::<String, Vec<String>>()? {
            if categories.iter().any(|(existing, _)| *existing == name) {
                return Err(de::Error::custom(format!("duplicate category `{}`", name)));
            }
            categories.push((name, items));
        }
        Ok(categories)
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let categories = deserializer.deserialize_map(CategoriesVisitor)?;
        Ok(Catalog::from_categories(categories))
    }
}
