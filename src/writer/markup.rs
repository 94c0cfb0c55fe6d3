//! Write a [`StyledText`] as styled-text markup.

use std::fmt::Write as _;

use super::{ListWriter, WriteContext};
use crate::attributes::{AttributeSet, Posture, Script, Weight};
use crate::hyperlink::Hyperlink;
use crate::styled_text::StyledText;
use crate::Result;

/// Escape `text` for use as element content.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `text` for use inside a double-quoted attribute value.
///
/// Whitespace other than a plain space is written as a character reference
/// so that it survives attribute value normalisation.
pub fn escape_attribute(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds markup; also the [`ListWriter`] for it.
#[derive(Debug, Default)]
pub struct MarkupWriter {
    out: String,
}

impl ListWriter for MarkupWriter {
    fn start_ul(&mut self) {
        self.out.push_str("<ul>");
    }

    fn end_ul(&mut self) {
        self.out.push_str("</ul>");
    }

    fn start_ol(&mut self, numbering: Option<&str>, first: i64) {
        self.out.push_str("<ol");
        if let Some(numbering) = numbering {
            self.attribute("type", numbering);
        }
        if first != 1 {
            self.attribute("start", &first.to_string());
        }
        self.out.push('>');
    }

    fn end_ol(&mut self) {
        self.out.push_str("</ol>");
    }

    fn start_li(&mut self, no_bullet: bool) {
        self.out.push_str(if no_bullet { "<li noBullet=\"true\">" } else { "<li>" });
    }

    fn end_li(&mut self) {
        self.out.push_str("</li>");
    }
}

/// Write ` name="value"`.
fn push_attribute(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {}=\"{}\"", name, escape_attribute(value));
}

/// The attributes of the `<style>` element needed to change `parent` into
/// `attrs`, or an empty string if none are.
fn style_attributes(parent: &AttributeSet, attrs: &AttributeSet) -> String {
    fn changed<T: PartialEq>(value: &Option<T>, old: &Option<T>) -> bool {
        value.is_some() && value != old
    }

    let mut out = String::new();
    if changed(&attrs.family, &parent.family) {
        push_attribute(&mut out, "fontName", attrs.family.as_deref().unwrap_or_default());
    }
    if let Some(weight) = attrs.weight.filter(|_| changed(&attrs.weight, &parent.weight)) {
        push_attribute(&mut out, "isBold", &(weight == Weight::Bold).to_string());
    }
    if let Some(posture) = attrs.posture.filter(|_| changed(&attrs.posture, &parent.posture)) {
        push_attribute(&mut out, "isItalic", &(posture == Posture::Oblique).to_string());
    }
    if attrs.is_underline() != parent.is_underline() {
        push_attribute(&mut out, "isUnderline", &attrs.is_underline().to_string());
    }
    if attrs.is_strikethrough() != parent.is_strikethrough() {
        push_attribute(&mut out, "isStrikeThrough", &attrs.is_strikethrough().to_string());
    }
    if let Some(size) = attrs.size.filter(|_| changed(&attrs.size, &parent.size)) {
        push_attribute(&mut out, "size", &size.to_string());
    }
    if changed(&attrs.pdf_font_name, &parent.pdf_font_name) {
        push_attribute(&mut out, "pdfFontName", attrs.pdf_font_name.as_deref().unwrap_or_default());
    }
    if changed(&attrs.pdf_encoding, &parent.pdf_encoding) {
        push_attribute(&mut out, "pdfEncoding", attrs.pdf_encoding.as_deref().unwrap_or_default());
    }
    if let Some(embedded) = attrs.pdf_embedded.filter(|_| changed(&attrs.pdf_embedded, &parent.pdf_embedded)) {
        push_attribute(&mut out, "isPdfEmbedded", &embedded.to_string());
    }
    if let Some(colour) = attrs.foreground.filter(|_| changed(&attrs.foreground, &parent.foreground)) {
        push_attribute(&mut out, "forecolor", &colour.to_string());
    }
    if let Some(colour) = attrs.background.filter(|_| changed(&attrs.background, &parent.background)) {
        push_attribute(&mut out, "backcolor", &colour.to_string());
    }
    out
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl MarkupWriter {
    /// Create an empty writer.
    pub fn new() -> MarkupWriter {
        Default::default()
    }

    /// The markup written so far.
    pub fn into_string(self) -> String {
        self.out
    }

    fn attribute(&mut self, name: &str, value: &str) {
        push_attribute(&mut self.out, name, value);
    }

    fn start_hyperlink(&mut self, link: &Hyperlink) {
        self.out.push_str("<a");
        if let Some(href) = non_blank(&link.reference) {
            self.attribute("href", href);
        }
        if let Some(link_type) = non_blank(&link.link_type) {
            self.attribute("type", link_type);
        }
        if let Some(target) = non_blank(&link.link_target) {
            self.attribute("target", target);
        }
        self.out.push('>');
        for param in &link.parameters {
            self.out.push_str("<param");
            if let Some(name) = &param.name {
                self.attribute("name", name);
            }
            self.attribute("valueClass", &param.value_class);
            self.out.push('>');
            if let Some(value) = &param.value {
                self.out.push_str(&escape_text(&value.serialize()));
            }
            self.out.push_str("</param>");
        }
    }

    /// Write one segment of text with resolved attributes `attrs`, as far
    /// as it differs from `parent`.  List structure is not written here.
    pub fn write_chunk(&mut self, parent: &AttributeSet, attrs: &AttributeSet, chunk: &str) {
        let style = style_attributes(parent, attrs);
        if !style.is_empty() {
            let _ = write!(self.out, "<style{}>", style);
        }
        let script = match attrs.script {
            Some(script) if attrs.script != parent.script => Some(match script {
                Script::Super => "sup",
                Script::Sub => "sub",
            }),
            _ => None,
        };
        if let Some(script) = script {
            let _ = write!(self.out, "<{}>", script);
        }
        if let Some(link) = &attrs.hyperlink {
            self.start_hyperlink(link);
        }

        self.out.push_str(&escape_text(chunk));

        if attrs.hyperlink.is_some() {
            self.out.push_str("</a>");
        }
        if let Some(script) = script {
            let _ = write!(self.out, "</{}>", script);
        }
        if !style.is_empty() {
            self.out.push_str("</style>");
        }
    }
}

/// Write `text` as markup, leaving out whatever matches `parent`.
pub fn write_with_parent(parent: &AttributeSet, text: &StyledText) -> String {
    let mut context = WriteContext::new();
    let mut writer = MarkupWriter::new();
    for segment in text.segments() {
        context.next(Some(&segment.attributes));
        context.write_lists(&mut writer);
        writer.write_chunk(parent, &segment.attributes, &text.text()[segment.range]);
    }
    context.next(None);
    context.write_lists(&mut writer);
    writer.into_string()
}

/// Write `text` as markup relative to its own global attributes.
pub fn write(text: &StyledText) -> String {
    write_with_parent(text.global_attributes(), text)
}

/// Write the part of `text` in the byte range `start..end`, as if the text
/// had been cut down to that range first.
pub fn write_range(text: &StyledText, start: usize, end: usize) -> Result<String> {
    Ok(write(&text.slice(start..end)?))
}
