//! Component graphs and their transformation
//!
//! Components live in a [`ComponentStore`] arena and refer to their children
//! by [`ComponentId`], so shared children and even cycles are expressible.
//! A [`Cpu`] walks a graph together with a [`Registry`] of global components
//! and produces a new graph of the same shape with rewritten templates.
//!
//! # Example
//!
//! ```rust
//! use template_cpu::component::{Component, ComponentGraph, ComponentStore, Cpu, Registry};
//! use template_cpu::instruction::replace_fn;
//!
//! let mut store = ComponentStore::new();
//! let button = store.insert(Component::new(r#"<button class="app-button"><slot></slot></button>"#, ()));
//! let panel = store.insert(
//!     Component::new(r#"<div><ui-button @click="save">Save</ui-button></div>"#, ())
//!         .with_child("ui-button", button),
//! );
//! let graph = ComponentGraph::new(store, panel);
//!
//! let mut cpu = Cpu::new(replace_fn(|part| match part.attr() {
//!     Some(attr) if attr.key.starts_with('@') => Some(String::new()),
//!     _ => None,
//! }));
//! let out = cpu.process(&graph, &Registry::new()).unwrap();
//! assert_eq!(
//!     out.root_component().unwrap().template(),
//!     "<div><ui-button>Save</ui-button></div>"
//! );
//! ```

mod config;
mod registry;
mod store;
mod walker;

pub use config::CpuConfig;
pub use registry::{Registry, RegistryError};
pub use store::{Component, ComponentGraph, ComponentId, ComponentStore};
pub use walker::Cpu;
