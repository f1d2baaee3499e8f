//! Scanner behaviour observed through the full transformation pipeline

use template_cpu::{
    transform, Component, ComponentGraph, CpuError, Event, Instruction, InstructionError, Registry,
    ScanError, TextPart,
};

#[derive(Debug, Clone, PartialEq)]
struct TagStruct {
    tag: String,
    attrs: Vec<(String, Option<String>)>,
}

impl TagStruct {
    fn value(&self, key: &str) -> Option<Option<&str>> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }
}

/// Collects every tag occurrence, starting fresh on each run
#[derive(Default)]
struct CalcInstruction {
    tags: Vec<TagStruct>,
}

impl Instruction<()> for CalcInstruction {
    fn event(&mut self, event: Event) -> Result<(), InstructionError> {
        if event == Event::Start {
            self.tags.clear();
        }
        Ok(())
    }

    fn replace(
        &mut self,
        part: &TextPart<'_, '_>,
        _component: &Component<()>,
    ) -> Result<Option<String>, InstructionError> {
        if let TextPart::Tag { tag, attrs } = part {
            self.tags.push(TagStruct {
                tag: tag.to_string(),
                attrs: attrs
                    .iter()
                    .map(|a| (a.key.to_string(), a.value.map(str::to_string)))
                    .collect(),
            });
        }
        Ok(None)
    }
}

fn calc(instruction: &mut CalcInstruction, template: &str) -> Vec<TagStruct> {
    let graph = ComponentGraph::single(template, ());
    let out = transform(&graph, &Registry::new(), &mut *instruction).expect("Should transform");
    assert_eq!(out.root_component().unwrap().template(), template);
    instruction.tags.clone()
}

fn tag_names(tags: &[TagStruct]) -> Vec<&str> {
    tags.iter().map(|t| t.tag.as_str()).collect()
}

#[test]
fn test_parse_empty() {
    let mut instruction = CalcInstruction::default();
    assert!(calc(&mut instruction, "").is_empty());
}

#[test]
fn test_parse_single_node() {
    let mut instruction = CalcInstruction::default();
    let tags = calc(&mut instruction, "<div/>");
    assert_eq!(tag_names(&tags), vec!["div"]);
    assert!(tags[0].attrs.is_empty());

    // the same instruction resets between runs
    let tags = calc(&mut instruction, "<div></div>");
    assert_eq!(tag_names(&tags), vec!["div"]);
}

#[test]
fn test_parse_single_node_with_expression_text() {
    let mut instruction = CalcInstruction::default();
    let tags = calc(&mut instruction, "<span>Чистый лист: {{ok ? 'YES' : 'NO' }}</span>");
    assert_eq!(tag_names(&tags), vec!["span"]);
}

#[test]
fn test_parse_nested_nodes() {
    let mut instruction = CalcInstruction::default();
    assert_eq!(
        tag_names(&calc(&mut instruction, "<div><child></child></div>")),
        vec!["div", "child"]
    );
    assert_eq!(
        tag_names(&calc(&mut instruction, "<div><child></div>")),
        vec!["div", "child"]
    );
}

#[test]
fn test_parse_nested_node_inside_text() {
    let mut instruction = CalcInstruction::default();
    let tags = calc(
        &mut instruction,
        r#"<p>Директива v-html: <span v-html="rawHtml"></span></p>"#,
    );
    assert_eq!(tag_names(&tags), vec!["p", "span"]);
    assert_eq!(tags[1].value("v-html"), Some(Some(r#""rawHtml""#)));
}

#[test]
fn test_parse_100_levels_of_nested_nodes() {
    let max = 100;
    let mut template = String::new();
    for index in 0..max {
        template.push_str(&format!("<some_node{}>", index));
    }
    for index in (0..max).rev() {
        template.push_str(&format!("</some_node{}>", index));
    }

    let mut instruction = CalcInstruction::default();
    let tags = calc(&mut instruction, &template);
    assert_eq!(tags.len(), max);
    for (index, tag) in tags.iter().enumerate() {
        assert_eq!(tag.tag, format!("some_node{}", index));
    }
}

#[test]
fn test_unmatched_closing_tag_does_not_halt() {
    let mut instruction = CalcInstruction::default();
    let tags = calc(&mut instruction, "</section><div></p></div><i>");
    assert_eq!(tag_names(&tags), vec!["div", "i"]);
}

#[test]
fn test_parse_single_attribute() {
    let mut instruction = CalcInstruction::default();
    let tags = calc(&mut instruction, r#"<div id="1"/>"#);
    assert_eq!(tag_names(&tags), vec!["div"]);
    assert_eq!(tags[0].value("id"), Some(Some(r#""1""#)));
}

#[test]
fn test_parse_two_attributes() {
    let mut instruction = CalcInstruction::default();
    let tags = calc(&mut instruction, r#"<div id="2" @onclick="submit()"/>"#);
    assert_eq!(tags[0].value("id"), Some(Some(r#""2""#)));
    assert_eq!(tags[0].value("@onclick"), Some(Some(r#""submit()""#)));
}

#[test]
fn test_parse_different_attribute_styles() {
    let template = r#"
            <div id="3"
                    @onclick="click()"
                    @click.stop
                    v-focus
                    v-directive:foo
                    v-directive.foo.bar
                    v-directive.one.two="one or two"
                    v-demo:foo.a.b="message"
                    :key="someKey"
            />"#;
    let mut instruction = CalcInstruction::default();
    let tags = calc(&mut instruction, template);
    assert_eq!(tags.len(), 1);

    let tag = &tags[0];
    assert_eq!(tag.tag, "div");
    assert_eq!(tag.value("id"), Some(Some(r#""3""#)));
    assert_eq!(tag.value("@onclick"), Some(Some(r#""click()""#)));
    assert_eq!(tag.value("@click.stop"), Some(None));
    assert_eq!(tag.value("v-focus"), Some(None));
    assert_eq!(tag.value("v-directive:foo"), Some(None));
    assert_eq!(tag.value("v-directive.foo.bar"), Some(None));
    assert_eq!(tag.value("v-directive.one.two"), Some(Some(r#""one or two""#)));
    assert_eq!(tag.value("v-demo:foo.a.b"), Some(Some(r#""message""#)));
    assert_eq!(tag.value(":key"), Some(Some(r#""someKey""#)));
    assert_eq!(tag.attrs.len(), 9);
}

#[test]
fn test_malformed_attribute_aborts_whole_run() {
    let mut instruction = CalcInstruction::default();
    let graph = ComponentGraph::single(r#"<div><span title="unterminated></div>"#, ());
    let err = transform(&graph, &Registry::new(), &mut instruction).unwrap_err();

    match err {
        CpuError::Scan {
            source: ScanError::MalformedAttribute { offset, .. },
            ..
        } => assert_eq!(offset, 17),
        other => panic!("unexpected error: {other:?}"),
    }
    // no occurrence reached the instruction
    assert!(instruction.tags.is_empty());
}
