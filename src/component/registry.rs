//! Registry of globally available components

use thiserror::Error;

use super::store::ComponentId;

/// Errors that can occur during registry operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Tag already registered
    #[error("duplicate global component: {tag}")]
    Duplicate { tag: String },
}

/// Components usable from any template without being declared as a child.
///
/// Entries keep registration order, which is also the order the walker
/// analyzes them in.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registry {
    entries: Vec<(String, ComponentId)>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under a tag name
    pub fn register(&mut self, tag: impl Into<String>, id: ComponentId) -> Result<(), RegistryError> {
        let tag = tag.into();
        if self.contains(&tag) {
            return Err(RegistryError::Duplicate { tag });
        }
        self.entries.push((tag, id));
        Ok(())
    }

    /// Get a component by tag name
    pub fn get(&self, tag: &str) -> Option<ComponentId> {
        self.entries.iter().find(|(t, _)| t == tag).map(|(_, id)| *id)
    }

    /// Check if a tag is registered
    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// Get all registered tags
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ComponentId)> {
        self.entries.iter().map(|(t, id)| (t.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
