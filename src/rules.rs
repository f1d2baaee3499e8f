//! Declarative rewrite rules loaded from TOML
//!
//! A rule set covers the common recipes without writing an [`Instruction`]
//! by hand: insert text into tags, drop or rename attributes, and make sure a
//! class is present.
//!
//! ```toml
//! [metadata]
//! name = "readonly"
//!
//! [[rule]]
//! tags = ["ui-link", "ui-button"]
//! insert = ' :readonly="true"'
//! remove = ["readonly", ":readonly"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::component::Component;
use crate::instruction::{Event, Instruction, InstructionError};
use crate::template::{AttrMap, Attribute, TextPart};

/// Errors that can occur when loading or validating rule sets
#[derive(Error, Debug)]
pub enum RuleSetError {
    #[error("Failed to read rule file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse rule TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("rule {index} has no action")]
    EmptyRule { index: usize },
    #[error("rule {index}: '{class}' is not a single class name")]
    InvalidClass { index: usize, class: String },
}

/// One declarative rule. Every action is optional but at least one is required.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    /// Tags the rule applies to, every tag when empty
    #[serde(default)]
    pub tags: Vec<String>,
    /// Text inserted right after the tag name
    #[serde(default)]
    pub insert: Option<String>,
    /// Attribute keys to delete
    #[serde(default)]
    pub remove: Vec<String>,
    /// Attribute key prefixes to delete, for example `@` for handlers
    #[serde(default)]
    pub remove_prefix: Vec<String>,
    /// Attribute keys to rename, keeping their values
    #[serde(default)]
    pub rename: BTreeMap<String, String>,
    /// Class that must be present in the `class` attribute
    #[serde(default)]
    pub ensure_class: Option<String>,
}

impl Rule {
    fn has_action(&self) -> bool {
        self.insert.is_some()
            || !self.remove.is_empty()
            || !self.remove_prefix.is_empty()
            || !self.rename.is_empty()
            || self.ensure_class.is_some()
    }

    fn applies_to(&self, tag: &str) -> bool {
        self.tags.is_empty() || self.tags.iter().any(|t| t == tag)
    }

    fn on_tag(&self, attrs: &AttrMap<'_>) -> Option<String> {
        let mut text = self.insert.clone().unwrap_or_default();
        if let Some(class) = &self.ensure_class {
            if !attrs.contains_key("class") {
                text.push_str(&format!(" class=\"{}\"", class));
            }
        }
        (!text.is_empty()).then_some(text)
    }

    fn on_attr(&self, attr: &Attribute<'_>) -> Option<String> {
        let removed = self.remove.iter().any(|k| k == attr.key)
            || self.remove_prefix.iter().any(|p| attr.key.starts_with(p.as_str()));
        if removed {
            return Some(String::new());
        }

        if let Some(new_key) = self.rename.get(attr.key) {
            return Some(match attr.value {
                Some(value) => format!(" {}={}", new_key, value),
                None => format!(" {}", new_key),
            });
        }

        match &self.ensure_class {
            Some(class) if attr.key == "class" => {
                let current = attr.unquoted().unwrap_or_default();
                if current.split_whitespace().any(|c| c == class) {
                    None
                } else if current.trim().is_empty() {
                    Some(format!(" class=\"{}\"", class))
                } else {
                    Some(format!(" class=\"{} {}\"", class, current))
                }
            }
            _ => None,
        }
    }
}

/// TOML structure for deserializing rule sets
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlRuleSet {
    metadata: Option<TomlMetadata>,
    #[serde(default, rename = "rule")]
    rules: Vec<Rule>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// An ordered list of rules usable as an [`Instruction`].
///
/// For a tag, the inserts of every matching rule are concatenated in rule
/// order. For an attribute, the first matching rule that changes it wins.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    /// Optional name for the rule set
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    rules: Vec<Rule>,
    /// Replacements made by each rule during the current run
    hits: Vec<usize>,
}

impl RuleSet {
    /// Build a rule set, rejecting rules that could never do anything
    pub fn from_rules(rules: Vec<Rule>) -> Result<Self, RuleSetError> {
        for (index, rule) in rules.iter().enumerate() {
            if !rule.has_action() {
                return Err(RuleSetError::EmptyRule { index });
            }
            if let Some(class) = &rule.ensure_class {
                if class.is_empty() || class.contains(|c: char| c.is_whitespace() || c == '"') {
                    return Err(RuleSetError::InvalidClass {
                        index,
                        class: class.clone(),
                    });
                }
            }
        }
        Ok(Self {
            name: None,
            description: None,
            hits: vec![0; rules.len()],
            rules,
        })
    }

    /// Load rule set from TOML file
    pub fn from_file(path: &Path) -> Result<Self, RuleSetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load rule set from TOML string
    pub fn from_str(content: &str) -> Result<Self, RuleSetError> {
        let parsed: TomlRuleSet = toml::from_str(content)?;
        let mut set = Self::from_rules(parsed.rules)?;
        set.name = parsed.metadata.as_ref().and_then(|m| m.name.clone());
        set.description = parsed.metadata.and_then(|m| m.description);
        Ok(set)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Indices of rules that changed nothing during the last run
    pub fn unused_rules(&self) -> impl Iterator<Item = usize> + '_ {
        self.hits
            .iter()
            .enumerate()
            .filter(|(_, hits)| **hits == 0)
            .map(|(i, _)| i)
    }

    fn apply(&mut self, part: &TextPart<'_, '_>) -> Option<String> {
        let tag = part.tag();
        match part {
            TextPart::Tag { attrs, .. } => {
                let mut text = String::new();
                for (rule, hits) in self.rules.iter().zip(self.hits.iter_mut()) {
                    if let Some(insert) = rule.applies_to(tag).then(|| rule.on_tag(attrs)).flatten() {
                        *hits += 1;
                        text.push_str(&insert);
                    }
                }
                (!text.is_empty()).then_some(text)
            }
            TextPart::Attr { attr, .. } => {
                for (rule, hits) in self.rules.iter().zip(self.hits.iter_mut()) {
                    if let Some(text) = rule.applies_to(tag).then(|| rule.on_attr(attr)).flatten() {
                        *hits += 1;
                        return Some(text);
                    }
                }
                None
            }
        }
    }
}

impl<D> Instruction<D> for RuleSet {
    fn replace(
        &mut self,
        part: &TextPart<'_, '_>,
        _component: &Component<D>,
    ) -> Result<Option<String>, InstructionError> {
        Ok(self.apply(part))
    }

    fn event(&mut self, event: Event) -> Result<(), InstructionError> {
        if event == Event::Start {
            self.hits.iter_mut().for_each(|h| *h = 0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentGraph, Cpu, Registry};

    fn run(rules: &str, template: &str) -> String {
        let graph = ComponentGraph::single(template, ());
        let out = Cpu::new(RuleSet::from_str(rules).unwrap())
            .process(&graph, &Registry::new())
            .unwrap();
        out.root_component().unwrap().template().to_string()
    }

    #[test]
    fn test_parse_metadata_and_rules() {
        let set = RuleSet::from_str(include_str!("../demos/readonly.toml")).unwrap();
        assert_eq!(set.name.as_deref(), Some("readonly"));
        assert_eq!(set.rules().len(), 1);
        assert_eq!(set.rules()[0].tags, vec!["ui-link", "ui-button"]);
    }

    #[test]
    fn test_empty_rule_rejected() {
        let err = RuleSet::from_str("[[rule]]\ntags = [\"div\"]\n").unwrap_err();
        assert!(matches!(err, RuleSetError::EmptyRule { index: 0 }));
    }

    #[test]
    fn test_invalid_class_rejected() {
        let err = RuleSet::from_str("[[rule]]\nensure_class = \"a b\"\n").unwrap_err();
        assert!(matches!(err, RuleSetError::InvalidClass { index: 0, .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            RuleSet::from_str("[[rule]]\ndelete = [\"x\"]\n"),
            Err(RuleSetError::ParseError(_))
        ));
    }

    #[test]
    fn test_rename_keeps_value() {
        let rules = "[[rule]]\ntags = [\"input\"]\nrename = { \"v-model\" = \":value\" }\n";
        assert_eq!(
            run(rules, r#"<input class="td_2" v-model="user.name">"#),
            r#"<input class="td_2" :value="user.name">"#
        );
    }

    #[test]
    fn test_remove_prefix_on_every_tag() {
        let rules = "[[rule]]\nremove_prefix = [\"@\"]\n";
        assert_eq!(
            run(rules, r#"<div @mouseover="x"><b @click="y" id="b">hi</b></div>"#),
            r#"<div><b id="b">hi</b></div>"#
        );
    }

    #[test]
    fn test_ensure_class() {
        let rules = "[[rule]]\ntags = [\"span\"]\nensure_class = \"bold\"\n";
        assert_eq!(run(rules, r#"<span class="red">"#), r#"<span class="bold red">"#);
        assert_eq!(run(rules, "<span>"), r#"<span class="bold">"#);
        assert_eq!(run(rules, r#"<span class="">"#), r#"<span class="bold">"#);
        assert_eq!(run(rules, r#"<span class="red bold">"#), r#"<span class="red bold">"#);
    }

    #[test]
    fn test_inserts_concatenate_in_rule_order() {
        let rules = "[[rule]]\ninsert = \" a\"\n[[rule]]\ntags = [\"p\"]\ninsert = \" b\"\n";
        assert_eq!(run(rules, "<p><i>"), "<p a b><i a>");
    }

    #[test]
    fn test_first_matching_rule_wins_for_attributes() {
        let rules = "[[rule]]\nremove = [\"x\"]\n[[rule]]\nrename = { x = \"y\" }\n";
        assert_eq!(run(rules, r#"<p x="1" z>"#), "<p z>");
    }

    #[test]
    fn test_unused_rules_reported() {
        let mut set = RuleSet::from_str(
            "[[rule]]\ntags = [\"input\"]\ninsert = \" readonly\"\n[[rule]]\ntags = [\"button\"]\ninsert = \" disabled\"\n",
        )
        .unwrap();
        let graph = ComponentGraph::single("<input>", ());
        Cpu::new(&mut set).process(&graph, &Registry::new()).unwrap();
        assert_eq!(set.unused_rules().collect::<Vec<_>>(), vec![1]);
    }
}
