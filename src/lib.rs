//! Parse and write styled-text markup.
//!
//! Styled text is a small XML-like markup used inside report text fields:
//!
//! ```text
//! <b>Total:</b> <style forecolor="#FF0000" size="12">-42</style><br/>
//! <ol><li>first</li><li>second</li></ol>
//! <a href="https://example.com"><param name="id" valueClass="java.lang.Integer">7</param>link</a>
//! ```
//!
//! Parsing produces a [`StyledText`]: the plain text plus a list of
//! [`Run`]s, each applying an [`AttributeSet`] to a range of the text.
//! Writing goes the other way and produces equivalent markup from a styled
//! text, including one that was cut down to a range.
//!
//! # Examples
//!
//! ```rust
//! # use styledtext::{parse, write, AttributeSet};
//! let text = parse(&AttributeSet::new(), "<b>bold</b> and <i>italic</i>", None).unwrap();
//! assert_eq!(text.text(), "bold and italic");
//! assert_eq!(text.runs().len(), 2);
//! assert_eq!(write(&text), "<style isBold=\"true\">bold</style> and <style isItalic=\"true\">italic</style>");
//! ```
//!
//! Text which may or may not be markup goes through [`parse_or_wrap`],
//! which never fails:
//!
//! ```rust
//! # use styledtext::{parse_or_wrap, AttributeSet};
//! let text = parse_or_wrap(&AttributeSet::new(), "Fish & chips", true, None);
//! assert_eq!(text.text(), "Fish & chips");
//! assert!(text.runs().is_empty());
//! ```
//!
//! ### styled2markup
//!
//! A small demonstration program reads markup on stdin and prints the plain
//! text, the runs, or the rewritten markup:
//!
//! ```sh
//! $ echo '<b>x</b>y' | cargo run --example styled2markup -- --runs
//! [...]
//! ```

#![deny(missing_docs)]

#[macro_use]
mod macros;

pub mod attributes;
pub mod colour;
pub mod fonts;
pub mod hyperlink;
pub mod list;
pub mod parser;
pub mod styled_text;
pub mod writer;

pub use attributes::AttributeSet;
pub use styled_text::{Run, StyledText};

use thiserror::Error;

/// Errors from parsing or writing styled text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The markup is not well-formed.
    #[error("Malformed markup: {0}")]
    MalformedMarkup(#[from] roxmltree::Error),
    /// An element which isn't part of the markup vocabulary.
    #[error("Tag <{0}> is not a valid styled text tag")]
    UnknownTag(String),
    /// An `<a>` inside another `<a>`.
    #[error("Hyperlink <a> tags cannot be nested")]
    NestedHyperlink,
    /// A `<param>` outside of any `<a>`.
    #[error("Hyperlink <param> tags must appear inside an <a> tag only")]
    ParamOutsideHyperlink,
    /// A numeric attribute couldn't be parsed.
    #[error("Invalid value {value:?} for attribute {name}")]
    InvalidAttribute {
        /// Attribute name
        name: String,
        /// The value found
        value: String,
    },
    /// A hyperlink parameter couldn't be decoded as its value class.
    #[error("Invalid {class} parameter value {value:?}")]
    InvalidParameterValue {
        /// The declared value class
        class: String,
        /// The serialized value
        value: String,
    },
    /// A range which isn't inside the text, or splits a character.
    #[error("Invalid range {start}..{end} for text of length {len}")]
    InvalidRange {
        /// Start offset
        start: usize,
        /// End offset
        end: usize,
        /// Length of the text
        len: usize,
    },
    /// The process-wide font families were already set or read.
    #[error("Font families are already initialised")]
    FontFamiliesInitialized,
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

type ResultReducer<'a, C, R> = dyn FnOnce(&mut C, Vec<R>) -> Result<Option<R>> + 'a;

/// The result of processing one node of a tree.
enum TreeMapResult<'a, C, N, R> {
    /// A completed result.
    Finished(R),
    /// Deferred completion - can be turned into a result
    /// once the vector of children are processed.
    PendingChildren {
        children: Vec<N>,
        cons: Box<ResultReducer<'a, C, R>>,
    },
    /// Nothing (e.g. a comment or other ignored node).
    Nothing,
}

/// Walk the tree under `top` without recursion, calling `process_node` on
/// each node before its children and the node's reducer after them.
/// The first error aborts the walk.
fn tree_map_reduce<'a, C, N, R, M>(context: &mut C, top: N, mut process_node: M) -> Result<Option<R>>
where
    M: for<'c> FnMut(&'c mut C, N) -> Result<TreeMapResult<'a, C, N, R>>,
{
    /// A node partially processed, waiting for its children.
    struct PendingNode<'a, C, R, N> {
        /// How to make the node once finished
        construct: Box<ResultReducer<'a, C, R>>,
        /// Children already processed
        children: Vec<R>,
        /// Iterator of child nodes not yet processed
        to_process: std::vec::IntoIter<N>,
    }

    let mut pending_stack = vec![PendingNode {
        // We only expect one child, which we'll just return.
        construct: Box::new(|_: &mut C, mut cs: Vec<R>| Ok(cs.pop())),
        children: Vec::new(),
        to_process: vec![top].into_iter(),
    }];
    loop {
        let Some(pending) = pending_stack.last_mut() else {
            break Ok(None);
        };
        if let Some(node) = pending.to_process.next() {
            match process_node(context, node)? {
                TreeMapResult::Finished(result) => pending.children.push(result),
                TreeMapResult::PendingChildren { children, cons } => {
                    pending_stack.push(PendingNode {
                        construct: cons,
                        children: Vec::new(),
                        to_process: children.into_iter(),
                    });
                }
                TreeMapResult::Nothing => {}
            }
        } else if let Some(completed) = pending_stack.pop() {
            // No more children, so finally construct the parent.
            let reduced = (completed.construct)(context, completed.children)?;
            match (reduced, pending_stack.last_mut()) {
                (Some(node), Some(parent)) => parent.children.push(node),
                // Finished the whole stack!
                (Some(node), None) => break Ok(Some(node)),
                (None, None) => break Ok(None),
                (None, Some(_)) => {}
            }
        }
    }
}

pub mod config {
    //! Configure parsing using the [`Config`] type, constructed with
    //! [`new`].

    use std::sync::Arc;

    use crate::attributes::AttributeSet;
    use crate::fonts::FontFamilies;
    use crate::parser::Parser;
    use crate::styled_text::StyledText;
    use crate::Result;

    /// Settings for turning markup into styled text.
    #[derive(Debug, Clone, Default)]
    pub struct Config {
        global: AttributeSet,
        locale: Option<String>,
        fonts: Option<Arc<FontFamilies>>,
    }

    impl Config {
        /// Set the attributes applying to the whole text.
        pub fn global_attributes(mut self, global: AttributeSet) -> Config {
            self.global = global;
            self
        }

        /// Set the locale carried by the parsed text.
        pub fn locale(mut self, locale: impl Into<String>) -> Config {
            self.locale = Some(locale.into());
            self
        }

        /// Resolve `<font face>` against `fonts` instead of the process-wide
        /// font families.
        pub fn font_families(mut self, fonts: Arc<FontFamilies>) -> Config {
            self.fonts = Some(fonts);
            self
        }

        fn parser(&self) -> Parser {
            match &self.fonts {
                Some(fonts) => Parser::with_font_families(fonts.clone()),
                None => Parser::new(),
            }
        }

        /// Parse `markup`.
        pub fn parse(&self, markup: &str) -> Result<StyledText> {
            self.parser().parse(&self.global, markup, self.locale.as_deref())
        }

        /// Make a styled text from `text`.  If `is_markup` is set and the
        /// text looks like markup (it contains `<` or `&`) it is parsed;
        /// otherwise, or if parsing fails, the text is used as is.
        pub fn styled_text(&self, text: &str, is_markup: bool) -> StyledText {
            if is_markup && text.contains(&['<', '&'][..]) {
                match self.parse(text) {
                    Ok(styled) => return styled,
                    Err(_err) => {
                        markup_trace!("not parsed as markup: {}", _err);
                    }
                }
            }
            StyledText::plain(text, self.global.clone(), self.locale.as_deref())
        }
    }

    /// Return a Config with no global attributes, no locale and the
    /// process-wide font families.
    pub fn new() -> Config {
        Default::default()
    }
}

/// Parse `markup`, with `global` as the global attributes.
pub fn parse(global: &AttributeSet, markup: &str, locale: Option<&str>) -> Result<StyledText> {
    parser::Parser::new().parse(global, markup, locale)
}

/// Make a styled text from `text`, parsing it as markup if `is_markup` is
/// set and it looks like markup.  Text which fails to parse is wrapped
/// unstyled instead.
pub fn parse_or_wrap(
    global: &AttributeSet,
    text: &str,
    is_markup: bool,
    locale: Option<&str>,
) -> StyledText {
    let config = config::new().global_attributes(global.clone());
    match locale {
        Some(locale) => config.locale(locale),
        None => config,
    }
    .styled_text(text, is_markup)
}

/// Write `text` as markup.
pub fn write(text: &StyledText) -> String {
    writer::markup::write(text)
}

/// Write the byte range `start..end` of `text` as markup.
pub fn write_range(text: &StyledText, start: usize, end: usize) -> Result<String> {
    writer::markup::write_range(text, start, end)
}

#[cfg(test)]
mod tests;
