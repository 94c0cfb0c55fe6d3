//! List contexts: the state kept for `<ul>`/`<ol>`/`<li>` while parsing
//! and the snapshots of it attached to runs.

use std::ops::Deref;

/// Identity of one list within a parsed text.
///
/// Two snapshots of the same list compare equal by id even if their item
/// counts differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListId(pub(crate) usize);

/// State of one (possibly nested) list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListInfo {
    /// Identity of the list
    pub id: ListId,
    /// `<ol>` rather than `<ul>`
    pub ordered: bool,
    /// Numbering kind from `<ol type>`
    pub numbering: Option<String>,
    /// First number from `<ol start>`
    pub start: Option<i32>,
    /// Number of `<li>` seen so far in this list
    pub item_count: usize,
    /// The list was opened inside an `<li>` of its parent list
    pub began_inside_item: bool,
    /// The list was the first content of the enclosing `<li>`
    pub at_item_start: bool,
    /// Nothing followed the list inside the enclosing `<li>`
    pub at_item_end: bool,
}

impl ListInfo {
    pub(crate) fn new(
        id: ListId,
        ordered: bool,
        numbering: Option<String>,
        start: Option<i32>,
        began_inside_item: bool,
    ) -> ListInfo {
        ListInfo {
            id,
            ordered,
            numbering,
            start,
            item_count: 0,
            began_inside_item,
            at_item_start: false,
            at_item_end: false,
        }
    }

    /// The number shown for the item with index `index` (ordered lists).
    pub fn number_of(&self, index: usize) -> i64 {
        i64::from(self.start.unwrap_or(1)) + index as i64
    }
}

/// Snapshot of the enclosing lists, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListPath(Vec<ListInfo>);

impl ListPath {
    /// Build a path from a list of contexts, outermost first.
    pub fn new(lists: Vec<ListInfo>) -> ListPath {
        ListPath(lists)
    }

    /// Number of leading lists shared with the lists identified by `other`
    /// (outermost first).
    pub fn common_prefix<I>(&self, other: I) -> usize
    where
        I: IntoIterator<Item = ListId>,
    {
        self.0
            .iter()
            .zip(other)
            .take_while(|(info, id)| info.id == *id)
            .count()
    }

    pub(crate) fn mark_at_item_end(&mut self, id: ListId) {
        for info in &mut self.0 {
            if info.id == id {
                info.at_item_end = true;
            }
        }
    }
}

impl Deref for ListPath {
    type Target = [ListInfo];

    fn deref(&self) -> &[ListInfo] {
        &self.0
    }
}

/// Descriptor attached to the run covering one `<li>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListItem {
    /// The list this item belongs to
    pub list: ListId,
    /// Zero-based position of the item in its list
    pub index: usize,
    /// `<li noBullet="true">`
    pub no_bullet: bool,
}

/// The stack of open lists during parsing.
#[derive(Debug, Default)]
pub(crate) struct ListStack {
    lists: Vec<ListInfo>,
    next_id: usize,
}

impl ListStack {
    pub fn new() -> ListStack {
        Default::default()
    }

    /// Allocate the identity for a new list.
    pub fn next_id(&mut self) -> ListId {
        let id = ListId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn push(&mut self, info: ListInfo) {
        markup_trace!("list push {:?} depth={}", info.id, self.lists.len() + 1);
        self.lists.push(info);
    }

    pub fn pop(&mut self) -> Option<ListInfo> {
        let popped = self.lists.pop();
        markup_trace!("list pop {:?}", popped.as_ref().map(|l| l.id));
        popped
    }

    /// Count a new `<li>` in the innermost list.  With no list open an
    /// implicit unordered one is pushed first; the returned flag says so,
    /// and the caller pops it when the item closes.
    pub fn begin_item(&mut self, no_bullet: bool) -> (ListItem, bool) {
        let (mut list, implicit) = match self.lists.pop() {
            Some(list) => (list, false),
            None => {
                let id = self.next_id();
                markup_trace!("implicit list {:?} for bare <li>", id);
                (ListInfo::new(id, false, None, None, false), true)
            }
        };
        list.item_count += 1;
        let item = ListItem {
            list: list.id,
            index: list.item_count - 1,
            no_bullet,
        };
        self.lists.push(list);
        (item, implicit)
    }

    /// Copy of the whole stack, outermost first.
    pub fn snapshot(&self) -> ListPath {
        ListPath(self.lists.clone())
    }
}
