//! Token sets for template scanning using logos
//!
//! Scanning runs in two states. Outside of tags only the start of an opening
//! tag matters, so everything else is skipped. Inside an opening tag the lexer
//! is morphed into [`AttrToken`] until the attribute list ends.

use logos::Logos;

/// Tokens outside of an opening tag
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[^<]+")]
pub enum MarkupToken {
    /// `<name`, the start of an opening tag
    #[regex(r"<[^\s/<>]+")]
    TagOpen,

    /// A `<` that does not start an opening tag: `</`, `< ` or `<<`
    #[token("<")]
    Lt,
}

/// Tokens of an attribute list
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"\s+")]
pub enum AttrToken {
    /// Attribute name, for example `:key`, `@click.stop` or `v-demo:foo.a.b`
    #[regex(r#"[^\s/>="]+"#)]
    Key,

    #[token("=")]
    Equals,

    /// Double-quoted value. No escapes, the first `"` closes it.
    #[regex(r#""[^"]*""#)]
    Quoted,

    #[token("/")]
    Slash,

    #[token(">")]
    Close,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markup(input: &str) -> Vec<(MarkupToken, &str)> {
        let mut lex = MarkupToken::lexer(input);
        let mut out = Vec::new();
        while let Some(tok) = lex.next() {
            if let Ok(tok) = tok {
                out.push((tok, lex.slice()));
            }
        }
        out
    }

    fn attrs(input: &str) -> Vec<AttrToken> {
        AttrToken::lexer(input).filter_map(|t| t.ok()).collect()
    }

    #[test]
    fn test_tag_open_and_closing_tags() {
        let tokens = markup("<div>text</div>");
        assert_eq!(
            tokens,
            vec![(MarkupToken::TagOpen, "<div"), (MarkupToken::Lt, "<")]
        );
    }

    #[test]
    fn test_text_is_skipped() {
        assert!(markup("plain text with {{ expr }}").is_empty());
    }

    #[test]
    fn test_less_than_in_text() {
        let tokens = markup("a < b");
        assert_eq!(tokens, vec![(MarkupToken::Lt, "<")]);
    }

    #[test]
    fn test_unicode_tag_name() {
        let tokens = markup("<ячейка/>");
        assert_eq!(tokens, vec![(MarkupToken::TagOpen, "<ячейка")]);
    }

    #[test]
    fn test_attribute_tokens() {
        assert_eq!(
            attrs(r#" id="1" v-focus :key = "k" />"#),
            vec![
                AttrToken::Key,
                AttrToken::Equals,
                AttrToken::Quoted,
                AttrToken::Key,
                AttrToken::Key,
                AttrToken::Equals,
                AttrToken::Quoted,
                AttrToken::Slash,
                AttrToken::Close,
            ]
        );
    }

    #[test]
    fn test_quoted_value_spans_markup() {
        assert_eq!(
            attrs(r#"@click="console.log('<')">"#),
            vec![
                AttrToken::Key,
                AttrToken::Equals,
                AttrToken::Quoted,
                AttrToken::Close
            ]
        );
    }

    #[test]
    fn test_unterminated_quote_is_an_error() {
        let results: Vec<_> = AttrToken::lexer(r#"a="abc"#).collect();
        assert!(results.iter().any(|r| r.is_err()));
    }
}
