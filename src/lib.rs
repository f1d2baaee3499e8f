//! Template CPU - rewrite the templates of a whole component graph
//!
//! This library scans component templates for tags and attributes, lets an
//! [`Instruction`] decide what to insert, replace or delete, and rebuilds the
//! component graph with the rewritten templates. Everything the instruction
//! does not touch is copied byte for byte.
//!
//! # Example
//!
//! ```rust
//! use template_cpu::{rewrite, instruction::replace_fn, TextPart};
//!
//! let out = rewrite(
//!     r#"<ui-link href="/about" :readonly="false">About</ui-link>"#,
//!     replace_fn(|part| match part {
//!         TextPart::Tag { tag: "ui-link", .. } => Some(r#" :readonly="true""#.to_string()),
//!         TextPart::Attr { tag: "ui-link", attr, .. } if attr.key == ":readonly" => Some(String::new()),
//!         _ => None,
//!     }),
//! )
//! .unwrap();
//!
//! assert_eq!(out, r#"<ui-link :readonly="true" href="/about">About</ui-link>"#);
//! ```

pub mod component;
pub mod error;
pub mod instruction;
pub mod manifest;
pub mod rules;
pub mod template;

pub use component::{Component, ComponentGraph, ComponentId, ComponentStore, Cpu, CpuConfig, Registry};
pub use error::{CpuError, ScanError};
pub use instruction::{Event, Instruction, InstructionError};
pub use rules::RuleSet;
pub use template::{AttrMap, Attribute, TextPart};

/// Transform a component graph with default configuration
///
/// # Example
///
/// ```rust
/// use template_cpu::{transform, Component, ComponentGraph, ComponentStore, Registry, RuleSet};
///
/// let mut store = ComponentStore::new();
/// let span = store.insert(Component::new(r#"<span class="red"><slot></slot></span>"#, ()));
/// let root = store.insert(Component::new("<div><x-span>hi</x-span></div>", ()).with_child("x-span", span));
/// let graph = ComponentGraph::new(store, root);
///
/// let rules = RuleSet::from_str("[[rule]]\ntags = [\"span\"]\nensure_class = \"bold\"\n").unwrap();
/// let out = transform(&graph, &Registry::new(), rules).unwrap();
///
/// let span = out.find(&["x-span"]).unwrap();
/// assert_eq!(span.template(), r#"<span class="bold red"><slot></slot></span>"#);
/// ```
pub fn transform<D, I>(
    graph: &ComponentGraph<D>,
    registry: &Registry,
    instruction: I,
) -> Result<ComponentGraph<D>, CpuError>
where
    D: Clone,
    I: Instruction<D>,
{
    transform_with_config(graph, registry, instruction, CpuConfig::default())
}

/// Transform a component graph with custom configuration
pub fn transform_with_config<D, I>(
    graph: &ComponentGraph<D>,
    registry: &Registry,
    instruction: I,
    config: CpuConfig,
) -> Result<ComponentGraph<D>, CpuError>
where
    D: Clone,
    I: Instruction<D>,
{
    Cpu::new(instruction).with_config(config).process(graph, registry)
}

/// Rewrite a single template that has no children
pub fn rewrite<I>(template: &str, instruction: I) -> Result<String, CpuError>
where
    I: Instruction<()>,
{
    let graph = ComponentGraph::single(template, ());
    let out = transform(&graph, &Registry::new(), instruction)?;
    out.root_component()
        .map(|c| c.template().to_string())
        .ok_or(CpuError::UnknownComponent(out.root()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::replace_fn;

    #[test]
    fn test_rewrite_identity() {
        let template = "<div>\n  <p v-if=\"ok\">{{ a < b }}</p>\n</div>";
        assert_eq!(rewrite(template, replace_fn(|_| None)).unwrap(), template);
    }

    #[test]
    fn test_rewrite_scan_error() {
        let err = rewrite(r#"<p title="x>"#, replace_fn(|_| None)).unwrap_err();
        assert!(matches!(err, CpuError::Scan { .. }));
    }

    #[test]
    fn test_transform_with_rule_set() {
        let rules = RuleSet::from_str(include_str!("../demos/remove_handlers.toml")).unwrap();
        let graph = ComponentGraph::single(r#"<ui-button @click="go">Go</ui-button>"#, ());
        let out = transform(&graph, &Registry::new(), rules).unwrap();
        insta::assert_snapshot!(out.root_component().unwrap().template(), @"<ui-button>Go</ui-button>");
    }
}
