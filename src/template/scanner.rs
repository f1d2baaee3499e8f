//! Single-pass scanner finding opening tags and their attributes
//!
//! The scanner does not build a tree. Closing tags are skipped, unmatched or
//! unclosed tags are fine, and every result carries exact byte offsets so the
//! rewrite engine can splice into the original text.

use logos::{Lexer, Logos};

use super::lexer::{AttrToken, MarkupToken};
use super::part::{Attribute, AttributeSpan, ScannedTag};
use crate::error::ScanError;

/// Scan a template into its opening tags, in document order.
///
/// Fails on the first malformed attribute or unterminated tag; nothing is
/// returned for the part of the template that scanned fine.
pub fn scan(template: &str) -> Result<Vec<ScannedTag<'_>>, ScanError> {
    let mut tags = Vec::new();
    let mut lex = MarkupToken::lexer(template);

    while let Some(token) = lex.next() {
        // `[^<]+` is skipped and both token rules start with `<`, so the
        // markup lexer cannot fail
        let Ok(MarkupToken::TagOpen) = token else {
            continue;
        };

        let open = lex.span();
        let name = &template[open.start + 1..open.end];

        match lex.remainder().chars().next() {
            None => {
                return Err(ScanError::UnterminatedTag {
                    offset: open.start,
                    tag: name.to_string(),
                })
            }
            Some('/' | '>') => tags.push(ScannedTag {
                name,
                insert_at: open.end,
                attributes: Vec::new(),
            }),
            // `<a<b`: not a tag, resume at the second `<`
            Some('<') => {}
            Some(_) => {
                let mut attr_lex = lex.morph::<AttrToken>();
                let attributes = scan_attributes(template, &mut attr_lex, name, open.clone())?;
                tags.push(ScannedTag {
                    name,
                    insert_at: open.end,
                    attributes,
                });
                lex = attr_lex.morph();
            }
        }
    }

    Ok(tags)
}

/// Read attributes until `/` or `>` closes the list
fn scan_attributes<'a>(
    template: &'a str,
    lex: &mut Lexer<'a, AttrToken>,
    tag: &str,
    open: std::ops::Range<usize>,
) -> Result<Vec<AttributeSpan<'a>>, ScanError> {
    let mut attributes = Vec::new();
    let mut prev_end = open.end;

    loop {
        let token = match lex.next() {
            Some(token) => token,
            None => {
                return Err(ScanError::UnterminatedTag {
                    offset: open.start,
                    tag: tag.to_string(),
                })
            }
        };

        match token {
            Ok(AttrToken::Slash | AttrToken::Close) => return Ok(attributes),
            Ok(AttrToken::Key) => {
                let key = lex.slice();
                let mut end = lex.span().end;
                let mut value = None;

                if lex.remainder().trim_start().starts_with('=') {
                    // whitespace before `=` is skipped, so this is the `=` itself
                    let equals = lex.next();
                    debug_assert!(matches!(equals, Some(Ok(AttrToken::Equals))));
                    let quoted = read_value(template, lex)?;
                    value = Some(&template[quoted.clone()]);
                    end = quoted.end;
                }

                attributes.push(AttributeSpan {
                    attr: Attribute::new(key, value),
                    span: prev_end..end,
                });
                prev_end = end;
            }
            Ok(AttrToken::Equals) => {
                return Err(ScanError::malformed(
                    template,
                    lex.span().start,
                    "expected attribute name before '='",
                ))
            }
            Ok(AttrToken::Quoted) => {
                return Err(ScanError::malformed(
                    template,
                    lex.span().start,
                    "quoted value without attribute name",
                ))
            }
            Err(()) => {
                return Err(ScanError::malformed(
                    template,
                    lex.span().start,
                    "unexpected '\"' in attribute list",
                ))
            }
        }
    }
}

/// Read the `"..."` part after `=`, returning its range
fn read_value(
    template: &str,
    lex: &mut Lexer<'_, AttrToken>,
) -> Result<std::ops::Range<usize>, ScanError> {
    match lex.next() {
        Some(Ok(AttrToken::Quoted)) => Ok(lex.span()),
        Some(_) => {
            let offset = lex.span().start;
            let message = if template[offset..].starts_with('"') {
                "unterminated attribute value"
            } else {
                "expected '\"' to open attribute value"
            };
            Err(ScanError::malformed(template, offset, message))
        }
        None => Err(ScanError::malformed(
            template,
            template.len(),
            "expected '\"' to open attribute value",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(tags: &[ScannedTag<'a>]) -> Vec<&'a str> {
        tags.iter().map(|t| t.name).collect()
    }

    #[test]
    fn test_empty_template() {
        assert!(scan("").unwrap().is_empty());
    }

    #[test]
    fn test_single_node() {
        let tags = scan("<div/>").unwrap();
        assert_eq!(names(&tags), vec!["div"]);
        assert_eq!(tags[0].insert_at, 4);
        assert!(tags[0].attributes.is_empty());

        assert_eq!(names(&scan("<div></div>").unwrap()), vec!["div"]);
    }

    #[test]
    fn test_tag_name_styles() {
        for name in ["divlist", "div-list", "DivList", "div_list"] {
            let template = format!("<{name}></{name}>");
            assert_eq!(names(&scan(&template).unwrap()), vec![name]);
        }
    }

    #[test]
    fn test_expression_text_is_not_a_tag() {
        let tags = scan("<span>Чистый лист: {{ok ? 'YES' : 'NO' }} {{ a < b }}</span>").unwrap();
        assert_eq!(names(&tags), vec!["span"]);
    }

    #[test]
    fn test_unclosed_and_unmatched_tags() {
        assert_eq!(
            names(&scan("<div><child></div>").unwrap()),
            vec!["div", "child"]
        );
        assert_eq!(
            names(&scan("</stray><p>text").unwrap()),
            vec!["p"]
        );
    }

    #[test]
    fn test_broken_tag_name_is_skipped() {
        assert_eq!(names(&scan("<a<b>").unwrap()), vec!["b"]);
    }

    #[test]
    fn test_attribute_spans_include_leading_whitespace() {
        let template = r#"<div id="1"  v-focus>"#;
        let tags = scan(template).unwrap();
        let spans: Vec<_> = tags[0]
            .attributes
            .iter()
            .map(|a| &template[a.span.clone()])
            .collect();
        assert_eq!(spans, vec![r#" id="1""#, "  v-focus"]);
    }

    #[test]
    fn test_whitespace_around_equals() {
        let tags = scan(r#"<input v-model = "name">"#).unwrap();
        let attr = tags[0].attributes[0].attr;
        assert_eq!(attr.key, "v-model");
        assert_eq!(attr.value, Some("\"name\""));
    }

    #[test]
    fn test_equals_on_its_own_line() {
        let tags = scan("<input\n  v-model\n  =\n  \"name\" readonly>").unwrap();
        let attrs: Vec<_> = tags[0].attributes.iter().map(|a| a.attr).collect();
        assert_eq!(
            attrs,
            vec![
                Attribute::new("v-model", Some("\"name\"")),
                Attribute::new("readonly", None),
            ]
        );
        assert_eq!(tags[0].attributes[0].span, 6..29);
    }

    #[test]
    fn test_value_with_markup_characters() {
        let tags = scan(r#"<ui-button @click="console.log('<')">Button1</ui-button>"#).unwrap();
        assert_eq!(names(&tags), vec!["ui-button"]);
        assert_eq!(
            tags[0].attributes[0].attr.value,
            Some(r#""console.log('<')""#)
        );
    }

    #[test]
    fn test_spans_are_ordered_and_disjoint() {
        let template = r#"<div a="1" b c="3"><span d="4"/></div>"#;
        let tags = scan(template).unwrap();
        let mut last = 0;
        for tag in &tags {
            assert!(tag.insert_at >= last);
            last = tag.insert_at;
            for attr in &tag.attributes {
                assert!(attr.span.start >= last);
                last = attr.span.end;
            }
        }
    }

    #[test]
    fn test_missing_quote_is_an_error() {
        let err = scan("<div id=1>").unwrap_err();
        assert!(matches!(err, ScanError::MalformedAttribute { offset: 8, .. }));
    }

    #[test]
    fn test_unterminated_value_is_an_error() {
        let err = scan("<div id=\"1>\n<span>").unwrap_err();
        match err {
            ScanError::MalformedAttribute {
                offset, message, ..
            } => {
                assert_eq!(offset, 8);
                assert_eq!(message, "unterminated attribute value");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_quote_inside_value_is_an_error() {
        assert!(scan(r#"<div title="say "hi"">"#).is_err());
    }

    #[test]
    fn test_unterminated_tag() {
        assert!(matches!(
            scan("<div"),
            Err(ScanError::UnterminatedTag { offset: 0, .. })
        ));
        assert!(matches!(
            scan("text <div id=\"1\" "),
            Err(ScanError::UnterminatedTag { offset: 5, .. })
        ));
    }
}
