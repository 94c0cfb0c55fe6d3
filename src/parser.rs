//! Parse styled-text markup into a [`StyledText`].
//!
//! The markup is treated as the content of an implicit root element and
//! must be well-formed XML built from a fixed set of tags:
//!
//! | Tag | Effect |
//! |---|---|
//! | `<style>` | `fontName`, `isBold`, `isItalic`, `isUnderline`, `isStrikeThrough`, `size`, `pdfFontName`, `pdfEncoding`, `isPdfEmbedded`, `forecolor`, `backcolor` |
//! | `<b>`, `<i>`, `<u>` | bold, italic, underline |
//! | `<sup>`, `<sub>` | superscript, subscript |
//! | `<font>` | `face` (first available family of a list), `size`, `color` |
//! | `<br>` | a line break |
//! | `<ul>`, `<ol>`, `<li>` | lists; `<ol type start>`, `<li noBullet>` |
//! | `<a>` | a hyperlink with `href`, `type`, `target` and `<param>` children |
//!
//! Each element becomes a [`Run`] which is added after the runs of its
//! content.

use std::sync::Arc;

use roxmltree::Node;

use crate::attributes::{AttributeSet, Posture, Script, Weight};
use crate::colour::Colour;
use crate::fonts::{font_families, FontFamilies};
use crate::hyperlink::{Hyperlink, HyperlinkParameter};
use crate::list::{ListId, ListInfo, ListStack};
use crate::styled_text::{Run, StyledText};
use crate::{tree_map_reduce, Error, Result, TreeMapResult};

/// The name of the element wrapped around the markup before parsing.
const ROOT: &str = "st";

/// The element vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Style,
    Bold,
    Italic,
    Underline,
    Sup,
    Sub,
    Font,
    Br,
    Ul,
    Ol,
    Li,
    A,
    Param,
}

impl Tag {
    /// Look up a tag; names are case-insensitive except for `style`.
    fn from_name(name: &str) -> Option<Tag> {
        if name == "style" {
            return Some(Tag::Style);
        }
        let tag = match name.to_ascii_lowercase().as_str() {
            "b" => Tag::Bold,
            "i" => Tag::Italic,
            "u" => Tag::Underline,
            "sup" => Tag::Sup,
            "sub" => Tag::Sub,
            "font" => Tag::Font,
            "br" => Tag::Br,
            "ul" => Tag::Ul,
            "ol" => Tag::Ol,
            "li" => Tag::Li,
            "a" => Tag::A,
            "param" => Tag::Param,
            _ => return None,
        };
        Some(tag)
    }
}

/// A markup parser.
///
/// A parser holds no state between calls, so one value can be reused (or
/// shared between threads) freely.
#[derive(Debug, Clone)]
pub struct Parser {
    fonts: Arc<FontFamilies>,
}

impl Default for Parser {
    fn default() -> Parser {
        Parser::new()
    }
}

impl Parser {
    /// Create a parser which resolves `<font face>` against the process-wide
    /// font families.
    pub fn new() -> Parser {
        Parser::with_font_families(font_families())
    }

    /// Create a parser which resolves `<font face>` against `fonts`.
    pub fn with_font_families(fonts: Arc<FontFamilies>) -> Parser {
        Parser { fonts }
    }

    /// Parse `markup`.  `global` becomes the global attribute set of the
    /// result.
    pub fn parse(
        &self,
        global: &AttributeSet,
        markup: &str,
        locale: Option<&str>,
    ) -> Result<StyledText> {
        let wrapped = format!("<{ROOT}>{markup}</{ROOT}>");
        let doc = roxmltree::Document::parse(&wrapped)?;
        let root = doc.root_element();

        let mut state = ParseState::new(locale, &self.fonts);
        tree_map_reduce(&mut state, root, |state, node| {
            if node == root {
                Ok(pending(node, |_| Ok(())))
            } else {
                state.process_node(node)
            }
        })?;

        let mut text = state.text;
        text.set_global_attributes(global.clone());
        Ok(text)
    }
}

/// Mutable state of one parse.
struct ParseState<'f> {
    text: StyledText,
    lists: ListStack,
    hyperlink: Option<Hyperlink>,
    fonts: &'f FontFamilies,
    /// Inside an `<li>` and not inside a list nested in it
    inside_li: bool,
    /// No text since the last `<li>` opened
    li_start: bool,
    /// A list closed with no text after it
    just_closed: Option<ListId>,
}

type ParseResult<'a, 'input, 'f> = TreeMapResult<'a, ParseState<'f>, Node<'a, 'input>, ()>;

/// Process the children of `node`, then call `f`.
fn pending<'a, 'input, 'f, F>(node: Node<'a, 'input>, f: F) -> ParseResult<'a, 'input, 'f>
where
    F: FnOnce(&mut ParseState<'f>) -> Result<()> + 'a,
{
    TreeMapResult::PendingChildren {
        children: node.children().collect(),
        cons: Box::new(move |state: &mut ParseState<'f>, _: Vec<()>| {
            f(state)?;
            Ok(Some(()))
        }),
    }
}

fn flag(node: Node, name: &str) -> Option<bool> {
    node.attribute(name).map(|v| v.eq_ignore_ascii_case("true"))
}

fn string(node: Node, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_string)
}

/// Like [`string`], but a blank value counts as absent.
fn non_blank(node: Node, name: &str) -> Option<String> {
    node.attribute(name)
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

fn colour(node: Node, name: &str) -> Option<Colour> {
    node.attribute(name).map(Colour::parse_or_black)
}

fn size(node: Node) -> Result<Option<f32>> {
    node.attribute("size")
        .map(|value| {
            value
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|size| size.is_finite())
                .ok_or_else(|| Error::InvalidAttribute {
                    name: "size".into(),
                    value: value.into(),
                })
        })
        .transpose()
}

fn start_number(node: Node) -> Result<Option<i32>> {
    node.attribute("start")
        .map(|value| {
            value.parse().map_err(|_| Error::InvalidAttribute {
                name: "start".into(),
                value: value.into(),
            })
        })
        .transpose()
}

fn style_attributes(node: Node) -> Result<AttributeSet> {
    Ok(AttributeSet {
        family: string(node, "fontName"),
        weight: flag(node, "isBold").map(|b| if b { Weight::Bold } else { Weight::Regular }),
        posture: flag(node, "isItalic").map(|i| {
            if i {
                Posture::Oblique
            } else {
                Posture::Regular
            }
        }),
        underline: flag(node, "isUnderline"),
        strikethrough: flag(node, "isStrikeThrough"),
        size: size(node)?,
        pdf_font_name: string(node, "pdfFontName"),
        pdf_encoding: string(node, "pdfEncoding"),
        pdf_embedded: flag(node, "isPdfEmbedded"),
        foreground: colour(node, "forecolor"),
        background: colour(node, "backcolor"),
        ..Default::default()
    })
}

impl<'f> ParseState<'f> {
    fn new(locale: Option<&str>, fonts: &'f FontFamilies) -> ParseState<'f> {
        ParseState {
            text: StyledText::new(locale),
            lists: ListStack::new(),
            hyperlink: None,
            fonts,
            inside_li: false,
            li_start: false,
            just_closed: None,
        }
    }

    /// Add the run for an element which started at `start`.
    fn close_run(&mut self, attributes: AttributeSet, start: usize) {
        let end = self.text.len();
        self.text.add_run(Run::new(attributes, start, end));
    }

    fn mark_at_item_end(&mut self, id: ListId) {
        for run in self.text.runs_mut() {
            if let Some(path) = run.attributes.list.as_mut() {
                path.mark_at_item_end(id);
            }
        }
    }

    fn process_node<'a, 'input>(&mut self, node: Node<'a, 'input>) -> Result<ParseResult<'a, 'input, 'f>> {
        if node.is_text() {
            self.li_start = false;
            self.just_closed = None;
            self.text.append(node.text().unwrap_or(""));
            return Ok(TreeMapResult::Finished(()));
        }
        if !node.is_element() {
            // Comments and processing instructions
            return Ok(TreeMapResult::Nothing);
        }

        let name = node.tag_name();
        let tag = match name.namespace() {
            None => Tag::from_name(name.name()),
            Some(_) => None,
        }
        .ok_or_else(|| Error::UnknownTag(name.name().to_string()))?;
        markup_trace!("element <{}> at {}", name.name(), self.text.len());

        let start = self.text.len();
        let result = match tag {
            Tag::Style => {
                let attrs = style_attributes(node)?;
                pending(node, move |state| {
                    state.close_run(attrs, start);
                    Ok(())
                })
            }
            Tag::Bold | Tag::Italic | Tag::Underline | Tag::Sup | Tag::Sub => {
                let attrs = match tag {
                    Tag::Bold => AttributeSet::new().with_weight(Weight::Bold),
                    Tag::Italic => AttributeSet::new().with_posture(Posture::Oblique),
                    Tag::Underline => AttributeSet {
                        underline: Some(true),
                        ..Default::default()
                    },
                    Tag::Sup => AttributeSet {
                        script: Some(Script::Super),
                        ..Default::default()
                    },
                    _ => AttributeSet {
                        script: Some(Script::Sub),
                        ..Default::default()
                    },
                };
                pending(node, move |state| {
                    state.close_run(attrs, start);
                    Ok(())
                })
            }
            Tag::Font => {
                let attrs = AttributeSet {
                    size: size(node)?,
                    foreground: colour(node, "color"),
                    family: node
                        .attribute("face")
                        .and_then(|faces| self.fonts.first_available(faces))
                        .map(str::to_string),
                    ..Default::default()
                };
                pending(node, move |state| {
                    state.close_run(attrs, start);
                    Ok(())
                })
            }
            Tag::Br => {
                self.text.append("\n");
                let start = self.text.len();
                self.text.resize_runs(start, 1);
                pending(node, move |state| {
                    state.close_run(AttributeSet::new(), start);
                    if start < state.text.len() {
                        state.text.append("\n");
                        state.text.resize_runs(start, 1);
                    }
                    Ok(())
                })
            }
            Tag::Ul | Tag::Ol => {
                let ordered = tag == Tag::Ol;
                let (numbering, start_number) = if ordered {
                    (string(node, "type"), start_number(node)?)
                } else {
                    (None, None)
                };
                let id = self.lists.next_id();
                let mut info = ListInfo::new(id, ordered, numbering, start_number, self.inside_li);
                info.at_item_start = self.li_start;
                self.lists.push(info);
                let was_inside_li = self.inside_li;
                self.inside_li = false;
                pending(node, move |state| {
                    let attrs = AttributeSet {
                        list: Some(state.lists.snapshot()),
                        ..Default::default()
                    };
                    state.close_run(attrs, start);
                    state.lists.pop();
                    state.just_closed = Some(id);
                    state.inside_li = was_inside_li;
                    Ok(())
                })
            }
            Tag::Li => {
                let no_bullet = flag(node, "noBullet").unwrap_or(false);
                let (item, implicit) = self.lists.begin_item(no_bullet);
                self.inside_li = true;
                self.li_start = true;
                self.just_closed = None;
                pending(node, move |state| {
                    let attrs = AttributeSet {
                        list: Some(state.lists.snapshot()),
                        list_item: Some(item),
                        ..Default::default()
                    };
                    state.close_run(attrs, start);
                    state.inside_li = false;
                    state.li_start = false;
                    if let Some(id) = state.just_closed {
                        state.mark_at_item_end(id);
                    }
                    if implicit {
                        state.lists.pop();
                    }
                    Ok(())
                })
            }
            Tag::A => {
                if self.hyperlink.is_some() {
                    return Err(Error::NestedHyperlink);
                }
                self.hyperlink = Some(Hyperlink {
                    reference: non_blank(node, "href"),
                    link_type: non_blank(node, "type"),
                    link_target: non_blank(node, "target"),
                    ..Default::default()
                });
                pending(node, move |state| {
                    let attrs = AttributeSet {
                        hyperlink: state.hyperlink.take(),
                        ..Default::default()
                    };
                    state.close_run(attrs, start);
                    Ok(())
                })
            }
            Tag::Param => {
                let link = self.hyperlink.as_mut().ok_or(Error::ParamOutsideHyperlink)?;
                let body: String = node
                    .descendants()
                    .filter(|n| n.is_text())
                    .filter_map(|n| n.text())
                    .collect();
                link.add_parameter(HyperlinkParameter::decode(
                    string(node, "name"),
                    string(node, "valueClass"),
                    &body,
                )?);
                TreeMapResult::Nothing
            }
        };
        Ok(result)
    }
}
