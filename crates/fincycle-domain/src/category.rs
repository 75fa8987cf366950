//! User-definable categories matched by exact, case-sensitive name.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

/// A category label. Equality is case-sensitive and whitespace is trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Category(String);

impl Category {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::new(value)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::new(value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl PartialEq<str> for Category {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Runtime-extensible set of known categories, kept in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryRegistry {
    entries: BTreeSet<Category>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a category. Returns `false` if it was already known or is blank.
    pub fn register(&mut self, category: impl Into<Category>) -> bool {
        let category = category.into();
        if category.is_empty() {
            return false;
        }
        self.entries.insert(category)
    }

    pub fn remove(&mut self, category: &Category) -> bool {
        self.entries.remove(category)
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.entries.contains(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: Into<Category>> FromIterator<C> for CategoryRegistry {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut registry = CategoryRegistry::new();
        for category in iter {
            registry.register(category);
        }
        registry
    }
}
