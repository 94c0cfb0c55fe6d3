//! A text buffer with attribute runs layered over it.

use std::ops::Range;

use crate::attributes::AttributeSet;
use crate::{Error, Result};

/// An attribute set applied to the byte range `start..end` of a text.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// The attributes
    pub attributes: AttributeSet,
    /// Start offset (bytes)
    pub start: usize,
    /// End offset (bytes, exclusive)
    pub end: usize,
}

impl Run {
    /// Create a run.
    pub fn new(attributes: AttributeSet, start: usize, end: usize) -> Run {
        Run {
            attributes,
            start,
            end,
        }
    }

    /// The range covered by the run.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Return true if the run covers no text.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    fn covers(&self, range: &Range<usize>) -> bool {
        self.start <= range.start && range.end <= self.end
    }
}

/// A maximal piece of text over which the resolved attributes don't change.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// The byte range of the segment
    pub range: Range<usize>,
    /// The resolved attributes, including the global ones
    pub attributes: AttributeSet,
}

/// Text with global attributes and a collection of runs.
///
/// Runs are kept in the order their elements were closed: a run covering
/// an element comes after the runs of everything inside it. When several
/// runs covering a position set the same attribute, the innermost (earliest)
/// one wins.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledText {
    text: String,
    runs: Vec<Run>,
    global: AttributeSet,
    locale: Option<String>,
}

impl StyledText {
    /// Create an empty styled text.
    pub fn new(locale: Option<&str>) -> StyledText {
        StyledText {
            locale: locale.map(str::to_string),
            ..Default::default()
        }
    }

    /// Wrap plain text, styled only by the global attributes.
    pub fn plain(text: &str, global: AttributeSet, locale: Option<&str>) -> StyledText {
        StyledText {
            text: text.to_string(),
            runs: Vec::new(),
            global,
            locale: locale.map(str::to_string),
        }
    }

    /// The plain text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Return true if there is no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The runs, in the order they were added.
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// The attributes applying to the whole text.
    pub fn global_attributes(&self) -> &AttributeSet {
        &self.global
    }

    /// Replace the global attributes.
    pub fn set_global_attributes(&mut self, global: AttributeSet) {
        self.global = global;
    }

    /// The locale the text is associated with.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Append some text.
    pub fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append a run.
    pub fn add_run(&mut self, run: Run) {
        debug_assert!(run.start <= run.end && run.end <= self.text.len());
        markup_trace!("add_run {}..{} {:?}", run.start, run.end, run.attributes);
        self.runs.push(run);
    }

    pub(crate) fn runs_mut(&mut self) -> &mut [Run] {
        &mut self.runs
    }

    /// Widen the runs affected by `count` bytes having been inserted just
    /// before `offset`: every run starting at or before `offset` and ending
    /// after `offset - count` grows by `count`.
    pub fn resize_runs(&mut self, offset: usize, count: usize) {
        resize_runs(&mut self.runs, offset, count);
    }

    /// The resolved attributes at byte `offset`.
    pub fn attributes_at(&self, offset: usize) -> AttributeSet {
        self.resolve(&(offset..offset + 1))
    }

    fn resolve(&self, range: &Range<usize>) -> AttributeSet {
        let mut attrs = self.global.clone();
        for run in self.runs.iter().rev() {
            if !run.is_empty() && run.covers(range) {
                attrs.overlay(&run.attributes);
            }
        }
        attrs
    }

    /// Split the text into maximal segments of constant attributes.
    pub fn segments(&self) -> Vec<Segment> {
        let len = self.text.len();
        let mut boundaries = vec![0, len];
        for run in &self.runs {
            if !run.is_empty() {
                boundaries.push(run.start.min(len));
                boundaries.push(run.end.min(len));
            }
        }
        boundaries.sort_unstable();
        boundaries.dedup();

        let mut segments: Vec<Segment> = Vec::new();
        for pair in boundaries.windows(2) {
            let range = pair[0]..pair[1];
            let attributes = self.resolve(&range);
            match segments.last_mut() {
                Some(last) if last.attributes == attributes => last.range.end = range.end,
                _ => segments.push(Segment { range, attributes }),
            }
        }
        segments
    }

    /// Copy the part of the text in `range`, keeping the attributes in
    /// effect there.
    pub fn slice(&self, range: Range<usize>) -> Result<StyledText> {
        let len = self.text.len();
        if range.start > range.end
            || range.end > len
            || !self.text.is_char_boundary(range.start)
            || !self.text.is_char_boundary(range.end)
        {
            return Err(Error::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        let runs = self
            .runs
            .iter()
            .filter(|run| run.start < range.end && run.end > range.start)
            .map(|run| {
                Run::new(
                    run.attributes.clone(),
                    run.start.max(range.start) - range.start,
                    run.end.min(range.end) - range.start,
                )
            })
            .collect();
        Ok(StyledText {
            text: self.text[range].to_string(),
            runs,
            global: self.global.clone(),
            locale: self.locale.clone(),
        })
    }
}

/// See [`StyledText::resize_runs`].
pub(crate) fn resize_runs(runs: &mut [Run], offset: usize, count: usize) {
    let low = offset.saturating_sub(count);
    for run in runs.iter_mut() {
        if run.start <= offset && run.end > low {
            run.end += count;
        }
    }
}
