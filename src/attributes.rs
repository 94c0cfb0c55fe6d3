//! The attribute bag carried by runs and by the global style of a text.

use crate::colour::Colour;
use crate::hyperlink::Hyperlink;
use crate::list::{ListItem, ListPath};

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weight {
    /// Normal weight
    Regular,
    /// Bold
    Bold,
}

/// Font posture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Posture {
    /// Upright
    Regular,
    /// Italic/oblique
    Oblique,
}

/// Vertical script position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    /// Superscript (`<sup>`)
    Super,
    /// Subscript (`<sub>`)
    Sub,
}

/// Identifies one attribute of an [`AttributeSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    /// Font family name
    Family,
    /// Font weight
    Weight,
    /// Font posture
    Posture,
    /// Underline on/off
    Underline,
    /// Strike-through on/off
    Strikethrough,
    /// Font size in points
    Size,
    /// PDF font name
    PdfFontName,
    /// PDF encoding
    PdfEncoding,
    /// Whether the PDF font is embedded
    PdfEmbedded,
    /// Text colour
    Foreground,
    /// Background colour
    Background,
    /// Superscript/subscript
    Script,
    /// Hyperlink descriptor
    Hyperlink,
    /// Path of enclosing lists
    List,
    /// List item descriptor
    ListItem,
}

/// A set of text attributes.
///
/// Every field is optional; an unset field means "inherit". Sets are layered
/// with [`AttributeSet::overlay`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeSet {
    /// Font family name
    pub family: Option<String>,
    /// Font weight
    pub weight: Option<Weight>,
    /// Font posture
    pub posture: Option<Posture>,
    /// Underline; `Some(false)` switches off an inherited underline.
    pub underline: Option<bool>,
    /// Strike-through; `Some(false)` switches off an inherited one.
    pub strikethrough: Option<bool>,
    /// Font size in points
    pub size: Option<f32>,
    /// PDF font name
    pub pdf_font_name: Option<String>,
    /// PDF encoding
    pub pdf_encoding: Option<String>,
    /// Whether the PDF font is embedded
    pub pdf_embedded: Option<bool>,
    /// Text colour
    pub foreground: Option<Colour>,
    /// Background colour
    pub background: Option<Colour>,
    /// Superscript/subscript
    pub script: Option<Script>,
    /// Hyperlink descriptor
    pub hyperlink: Option<Hyperlink>,
    /// Path of enclosing lists, outermost first
    pub list: Option<ListPath>,
    /// List item descriptor
    pub list_item: Option<ListItem>,
}

impl AttributeSet {
    /// Create an empty set.
    pub fn new() -> AttributeSet {
        Default::default()
    }

    /// Return true if no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.keys().next().is_none()
    }

    /// Return true if `key` has a value in this set.
    pub fn contains(&self, key: AttributeKey) -> bool {
        use AttributeKey::*;
        match key {
            Family => self.family.is_some(),
            Weight => self.weight.is_some(),
            Posture => self.posture.is_some(),
            Underline => self.underline.is_some(),
            Strikethrough => self.strikethrough.is_some(),
            Size => self.size.is_some(),
            PdfFontName => self.pdf_font_name.is_some(),
            PdfEncoding => self.pdf_encoding.is_some(),
            PdfEmbedded => self.pdf_embedded.is_some(),
            Foreground => self.foreground.is_some(),
            Background => self.background.is_some(),
            Script => self.script.is_some(),
            Hyperlink => self.hyperlink.is_some(),
            List => self.list.is_some(),
            ListItem => self.list_item.is_some(),
        }
    }

    /// Iterate over the keys which have a value in this set.
    pub fn keys(&self) -> impl Iterator<Item = AttributeKey> + '_ {
        use AttributeKey::*;
        [
            Family,
            Weight,
            Posture,
            Underline,
            Strikethrough,
            Size,
            PdfFontName,
            PdfEncoding,
            PdfEmbedded,
            Foreground,
            Background,
            Script,
            Hyperlink,
            List,
            ListItem,
        ]
        .into_iter()
        .filter(move |key| self.contains(*key))
    }

    /// Copy every attribute set in `other` over this set's value.
    pub fn overlay(&mut self, other: &AttributeSet) {
        fn take<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
            if let Some(v) = src {
                *dst = Some(v.clone());
            }
        }
        take(&mut self.family, &other.family);
        take(&mut self.weight, &other.weight);
        take(&mut self.posture, &other.posture);
        take(&mut self.underline, &other.underline);
        take(&mut self.strikethrough, &other.strikethrough);
        take(&mut self.size, &other.size);
        take(&mut self.pdf_font_name, &other.pdf_font_name);
        take(&mut self.pdf_encoding, &other.pdf_encoding);
        take(&mut self.pdf_embedded, &other.pdf_embedded);
        take(&mut self.foreground, &other.foreground);
        take(&mut self.background, &other.background);
        take(&mut self.script, &other.script);
        take(&mut self.hyperlink, &other.hyperlink);
        take(&mut self.list, &other.list);
        take(&mut self.list_item, &other.list_item);
    }

    /// Whether the text is underlined (unset counts as off).
    pub fn is_underline(&self) -> bool {
        self.underline.unwrap_or(false)
    }

    /// Whether the text is struck through (unset counts as off).
    pub fn is_strikethrough(&self) -> bool {
        self.strikethrough.unwrap_or(false)
    }

    /// Builder-style setter for the weight.
    pub fn with_weight(mut self, weight: Weight) -> AttributeSet {
        self.weight = Some(weight);
        self
    }

    /// Builder-style setter for the posture.
    pub fn with_posture(mut self, posture: Posture) -> AttributeSet {
        self.posture = Some(posture);
        self
    }

    /// Builder-style setter for the family.
    pub fn with_family(mut self, family: impl Into<String>) -> AttributeSet {
        self.family = Some(family.into());
        self
    }

    /// Builder-style setter for the size.
    pub fn with_size(mut self, size: f32) -> AttributeSet {
        self.size = Some(size);
        self
    }
}
