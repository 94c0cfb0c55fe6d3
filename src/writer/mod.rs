//! Turning a [`StyledText`](crate::styled_text::StyledText) back into
//! markup.
//!
//! The list structure of a styled text is only recorded as list paths and
//! list items on its runs.  [`WriteContext`] rebuilds the list nesting from
//! them, segment by segment, and drives a [`ListWriter`] to open and close
//! lists and items; [`markup`] uses it to produce the markup dialect.

use crate::attributes::AttributeSet;
use crate::list::{ListId, ListItem, ListPath};

pub mod markup;

/// Receives the list structure found by a [`WriteContext`].
pub trait ListWriter {
    /// Open an unordered list.
    fn start_ul(&mut self);
    /// Close an unordered list.
    fn end_ul(&mut self);
    /// Open an ordered list whose first written item is numbered `first`.
    fn start_ol(&mut self, numbering: Option<&str>, first: i64);
    /// Close an ordered list.
    fn end_ol(&mut self);
    /// Open a list item.
    fn start_li(&mut self, no_bullet: bool);
    /// Close a list item.
    fn end_li(&mut self);
}

/// A list which has been opened by the writer.
#[derive(Debug, Clone)]
struct OpenList {
    id: ListId,
    ordered: bool,
    /// Index of the open item, if any
    item: Option<usize>,
    /// Index the next written item will get when read back
    next_index: usize,
}

/// Tracks the lists and items opened so far while writing segments.
#[derive(Debug, Default)]
pub struct WriteContext {
    open: Vec<OpenList>,
    path: ListPath,
    item: Option<ListItem>,
}

impl WriteContext {
    /// Create a context with no open lists.
    pub fn new() -> WriteContext {
        Default::default()
    }

    /// Move on to a segment with the given resolved attributes; `None`
    /// after the last segment.
    pub fn next(&mut self, attributes: Option<&AttributeSet>) {
        self.path = attributes.and_then(|a| a.list.clone()).unwrap_or_default();
        self.item = attributes.and_then(|a| a.list_item);
    }

    /// Number of lists currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// The item of the list at `depth` the current segment is in.
    fn wanted_item(&self, depth: usize) -> Option<usize> {
        let info = &self.path[depth];
        match self.item {
            Some(item) if item.list == info.id => Some(item.index),
            _ => match self.path.get(depth + 1) {
                Some(child) if child.began_inside_item => info.item_count.checked_sub(1),
                _ => None,
            },
        }
    }

    fn close_lists<W: ListWriter + ?Sized>(&mut self, depth: usize, writer: &mut W) {
        let closed = self.open.split_off(depth.min(self.open.len()));
        for list in closed.into_iter().rev() {
            markup_trace!("close list {:?}", list.id);
            if list.item.is_some() {
                writer.end_li();
            }
            if list.ordered {
                writer.end_ol();
            } else {
                writer.end_ul();
            }
        }
    }

    /// Emit the list and item changes needed before the current segment.
    pub fn write_lists<W: ListWriter + ?Sized>(&mut self, writer: &mut W) {
        let common = self.path.common_prefix(self.open.iter().map(|list| list.id));
        self.close_lists(common, writer);

        for depth in 0..self.path.len() {
            let wanted = self.wanted_item(depth);
            if depth == self.open.len() {
                let info = &self.path[depth];
                markup_trace!("open list {:?} at depth {}", info.id, depth);
                if info.ordered {
                    writer.start_ol(info.numbering.as_deref(), info.number_of(wanted.unwrap_or(0)));
                } else {
                    writer.start_ul();
                }
                self.open.push(OpenList {
                    id: info.id,
                    ordered: info.ordered,
                    item: None,
                    next_index: wanted.unwrap_or(0),
                });
            }
            if self.open[depth].item != wanted {
                self.close_lists(depth + 1, writer);
                if self.open[depth].item.take().is_some() {
                    writer.end_li();
                }
                if let Some(index) = wanted {
                    let no_bullet = match self.item {
                        Some(item) if item.list == self.path[depth].id => item.no_bullet,
                        _ => false,
                    };
                    let open = &mut self.open[depth];
                    // Items with no text still count towards the numbering.
                    for _ in open.next_index..index {
                        writer.start_li(false);
                        writer.end_li();
                    }
                    writer.start_li(no_bullet);
                    open.item = Some(index);
                    open.next_index = index + 1;
                }
            }
        }
    }
}
