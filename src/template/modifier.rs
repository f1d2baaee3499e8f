//! Offset-preserving template rewriting

use tracing::trace;

use super::part::TextPart;
use super::scanner::scan;
use crate::component::Component;
use crate::error::ModifyError;
use crate::instruction::Instruction;

/// Rewrite `template` by asking `instruction` about every tag and attribute.
///
/// Everything the instruction leaves alone is copied byte for byte. The whole
/// template is scanned before the instruction sees the first part.
pub fn modify_template<D, I>(
    template: &str,
    component: &Component<D>,
    instruction: &mut I,
) -> Result<String, ModifyError>
where
    I: Instruction<D> + ?Sized,
{
    let tags = scan(template)?;
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for tag in &tags {
        let attrs = tag.attr_map();

        let part = TextPart::Tag {
            tag: tag.name,
            attrs: &attrs,
        };
        if let Some(text) = instruction
            .replace(&part, component)
            .map_err(ModifyError::Instruction)?
        {
            trace!(tag = tag.name, insert = %text, "insert after tag name");
            out.push_str(&template[last..tag.insert_at]);
            out.push_str(&text);
            last = tag.insert_at;
        }

        for span in &tag.attributes {
            let part = TextPart::Attr {
                tag: tag.name,
                attr: span.attr,
                attrs: &attrs,
            };
            if let Some(text) = instruction
                .replace(&part, component)
                .map_err(ModifyError::Instruction)?
            {
                trace!(tag = tag.name, attr = span.attr.key, replace = %text, "replace attribute");
                out.push_str(&template[last..span.span.start]);
                out.push_str(&text);
                last = span.span.end;
            }
        }
    }

    out.push_str(&template[last..]);
    Ok(out)
}
