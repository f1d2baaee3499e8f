//! TOML description of a component graph
//!
//! ```toml
//! root = "panel"
//!
//! [[component]]
//! name = "panel"
//! template = '<div><ui-button @click="save">Save</ui-button></div>'
//! children = [{ tag = "ui-button", component = "button" }]
//!
//! [[component]]
//! name = "button"
//! template = '<button class="app-button"><slot></slot></button>'
//! props = ["readonly"]
//!
//! [[global]]
//! tag = "ui-link"
//! component = "link"
//! ```
//!
//! Keys other than `name`, `template` and `children` are kept untouched as the
//! component's host definition.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::component::{Component, ComponentGraph, ComponentId, ComponentStore, Registry, RegistryError};

/// Errors that can occur when loading or writing manifests
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse manifest TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write manifest TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("component not found: {name}")]
    UnknownComponent { name: String },
    #[error("duplicate component definition: {name}")]
    Duplicate { name: String },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Host definition of a manifest component: its name and every extra key
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Definition {
    pub name: String,
    pub extra: toml::Table,
}

/// A `tag -> component name` reference
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChildRef {
    pub tag: String,
    pub component: String,
}

/// One `[[component]]` entry
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ComponentEntry {
    pub name: String,
    #[serde(default)]
    pub template: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChildRef>,
    #[serde(flatten)]
    pub extra: toml::Table,
}

/// A whole component graph with its global components
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Name of the component to transform
    pub root: String,
    #[serde(default, rename = "component")]
    pub components: Vec<ComponentEntry>,
    #[serde(default, rename = "global", skip_serializing_if = "Vec::is_empty")]
    pub globals: Vec<ChildRef>,
}

impl Manifest {
    /// Load manifest from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load manifest from TOML string
    pub fn from_str(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ManifestError> {
        Ok(toml::to_string(self)?)
    }

    pub fn component(&self, name: &str) -> Option<&ComponentEntry> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Build the component graph and the registry of global components
    pub fn to_graph(&self) -> Result<(ComponentGraph<Definition>, Registry), ManifestError> {
        let mut index = HashMap::new();
        for (i, entry) in self.components.iter().enumerate() {
            if index.insert(entry.name.as_str(), i).is_some() {
                return Err(ManifestError::Duplicate {
                    name: entry.name.clone(),
                });
            }
        }

        let lookup = |name: &str| {
            index
                .get(name)
                .map(|&i| ComponentStore::<Definition>::id_at(i))
                .ok_or_else(|| ManifestError::UnknownComponent {
                    name: name.to_string(),
                })
        };

        // ids follow entry order, so children may refer to later entries
        let mut store = ComponentStore::new();
        for entry in &self.components {
            let mut component = Component::new(
                entry.template.clone(),
                Definition {
                    name: entry.name.clone(),
                    extra: entry.extra.clone(),
                },
            );
            for child in &entry.children {
                component = component.with_child(child.tag.clone(), lookup(&child.component)?);
            }
            store.insert(component);
        }

        let mut registry = Registry::new();
        for global in &self.globals {
            registry.register(global.tag.clone(), lookup(&global.component)?)?;
        }

        let root = lookup(&self.root)?;
        Ok((ComponentGraph::new(store, root), registry))
    }

    /// Describe a graph of manifest components, for example a transformed one
    pub fn from_graph(graph: &ComponentGraph<Definition>) -> Self {
        let store = graph.store();
        Self {
            root: name_of(store, graph.root()),
            components: store.iter().map(|(_, c)| entry_for(store, c)).collect(),
            globals: Vec::new(),
        }
    }

    /// Add the global components of `registry`, which index into `source`.
    ///
    /// Globals missing from this manifest are copied from `source` together
    /// with everything they reach. Entries already present are kept as they are.
    pub fn with_globals(mut self, source: &ComponentGraph<Definition>, registry: &Registry) -> Self {
        let store = source.store();
        let mut known: HashSet<String> = self.components.iter().map(|c| c.name.clone()).collect();
        let mut pending: Vec<ComponentId> = registry.iter().map(|(_, id)| id).collect();
        pending.reverse();

        while let Some(id) = pending.pop() {
            let Some(component) = store.get(id) else {
                continue;
            };
            if !known.insert(component.base().name.clone()) {
                continue;
            }
            self.components.push(entry_for(store, component));
            let children: Vec<_> = component.children().map(|(_, child)| child).collect();
            pending.extend(children.into_iter().rev());
        }

        for (tag, id) in registry.iter() {
            if store.contains(id) && !self.globals.iter().any(|g| g.tag == tag) {
                self.globals.push(ChildRef {
                    tag: tag.to_string(),
                    component: name_of(store, id),
                });
            }
        }
        self
    }
}

fn name_of(store: &ComponentStore<Definition>, id: ComponentId) -> String {
    store
        .get(id)
        .map(|c| c.base().name.clone())
        .unwrap_or_default()
}

fn entry_for(store: &ComponentStore<Definition>, component: &Component<Definition>) -> ComponentEntry {
    ComponentEntry {
        name: component.base().name.clone(),
        template: component.template().to_string(),
        children: component
            .children()
            .map(|(tag, id)| ChildRef {
                tag: tag.to_string(),
                component: name_of(store, id),
            })
            .collect(),
        extra: component.base().extra.clone(),
    }
}
