//! Occurrence types handed to instructions while a template is rewritten

/// Byte range in template text
pub type Span = std::ops::Range<usize>;

/// A single attribute of an opening tag, for example `class="bold"` or `v-focus`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Attribute name, for example `class`, `:class` or `@click.stop`
    pub key: &'a str,
    /// Quoted value including the quotes, `None` for a valueless attribute
    pub value: Option<&'a str>,
}

impl<'a> Attribute<'a> {
    pub fn new(key: &'a str, value: Option<&'a str>) -> Self {
        Self { key, value }
    }

    /// The value with its surrounding quotes stripped
    pub fn unquoted(&self) -> Option<&'a str> {
        self.value.map(|v| {
            v.strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(v)
        })
    }

    /// Whether the attribute is a `@event` handler or its `v-on:` long form
    pub fn is_handler(&self) -> bool {
        self.key.starts_with('@') || self.key.starts_with("v-on:")
    }
}

/// An attribute together with the source range it occupies.
///
/// The range starts right after the previous token, so it owns the whitespace
/// that separates it from the tag name or the preceding attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSpan<'a> {
    pub attr: Attribute<'a>,
    pub span: Span,
}

/// Attributes of one tag keyed by name, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrMap<'a> {
    entries: Vec<Attribute<'a>>,
}

impl<'a> AttrMap<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute. A repeated key keeps its original position and takes the new value.
    pub fn insert(&mut self, attr: Attribute<'a>) {
        match self.entries.iter_mut().find(|a| a.key == attr.key) {
            Some(existing) => existing.value = attr.value,
            None => self.entries.push(attr),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Attribute<'a>> {
        self.entries.iter().find(|a| a.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Unquoted value of `key`, if present and valued
    pub fn value_of(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(|a| a.unquoted())
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|a| a.key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute<'a>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<Attribute<'a>> for AttrMap<'a> {
    fn from_iter<T: IntoIterator<Item = Attribute<'a>>>(iter: T) -> Self {
        let mut map = AttrMap::new();
        for attr in iter {
            map.insert(attr);
        }
        map
    }
}

/// An opening tag found by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedTag<'a> {
    /// Tag name as written, for example `ui-button`
    pub name: &'a str,
    /// Offset right after the tag name, where tag-level insertions go
    pub insert_at: usize,
    /// Attributes in source order
    pub attributes: Vec<AttributeSpan<'a>>,
}

impl<'a> ScannedTag<'a> {
    /// Snapshot of all attributes of this tag
    pub fn attr_map(&self) -> AttrMap<'a> {
        self.attributes.iter().map(|a| a.attr).collect()
    }
}

/// The piece of a template an instruction is asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPart<'p, 'a> {
    /// The opening point of a tag, before any of its attributes
    Tag {
        tag: &'a str,
        attrs: &'p AttrMap<'a>,
    },
    /// One attribute of a tag
    Attr {
        tag: &'a str,
        attr: Attribute<'a>,
        attrs: &'p AttrMap<'a>,
    },
}

impl<'p, 'a> TextPart<'p, 'a> {
    /// Name of the tag this part belongs to
    pub fn tag(&self) -> &'a str {
        match self {
            TextPart::Tag { tag, .. } | TextPart::Attr { tag, .. } => tag,
        }
    }

    /// Unmodified attributes of the owning tag
    pub fn attrs(&self) -> &'p AttrMap<'a> {
        match self {
            TextPart::Tag { attrs, .. } | TextPart::Attr { attrs, .. } => attrs,
        }
    }

    /// The attribute, for `Attr` parts
    pub fn attr(&self) -> Option<&Attribute<'a>> {
        match self {
            TextPart::Attr { attr, .. } => Some(attr),
            TextPart::Tag { .. } => None,
        }
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, TextPart::Tag { .. })
    }
}
