//! Ordered registry of expense category names.

use serde::{Deserialize, Serialize};

/// Insertion-ordered set of category names.
///
/// The registry only stores names; uniqueness and normalization are enforced by
/// `CategoryService` before anything reaches these primitives.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CategoryRegistry {
    names: Vec<String>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Exact, case-sensitive membership check.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|existing| existing == name)
    }

    pub(crate) fn push(&mut self, name: String) {
        self.names.push(name);
    }

    pub(crate) fn replace(&mut self, index: usize, name: String) -> Option<String> {
        let slot = self.names.get_mut(index)?;
        Some(std::mem::replace(slot, name))
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.names.len() {
            Some(self.names.remove(index))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
