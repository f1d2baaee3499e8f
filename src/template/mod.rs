//! Template scanning and rewriting
//!
//! Templates are never parsed into a tree. The scanner finds opening tags and
//! their attributes with exact byte offsets, and the modifier splices an
//! instruction's replacements into the original text, copying everything else
//! verbatim.
//!
//! # Example
//!
//! ```rust
//! use template_cpu::template::scan;
//!
//! let tags = scan(r#"<div id="1"><span v-if="ok">hi</span></div>"#).unwrap();
//! assert_eq!(tags.len(), 2);
//! assert_eq!(tags[1].name, "span");
//! assert_eq!(tags[1].attributes[0].attr.key, "v-if");
//! ```

pub mod lexer;
mod modifier;
mod part;
mod scanner;

pub use modifier::modify_template;
pub use part::{AttrMap, Attribute, AttributeSpan, ScannedTag, Span, TextPart};
pub use scanner::scan;
