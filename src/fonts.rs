//! The set of font family names that `<font face="...">` may resolve to.
//!
//! A process-wide registry is initialised once by the embedding
//! application (from its font extensions and the platform's installed
//! families) and then only read, so any number of parsers on any number of
//! threads may consult it.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use crate::{Error, Result};

static FONT_FAMILIES: OnceLock<Arc<FontFamilies>> = OnceLock::new();

/// An immutable set of available font family names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontFamilies {
    names: HashSet<String>,
}

impl FontFamilies {
    /// Build a set from family names.
    pub fn new<I, S>(names: I) -> FontFamilies
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FontFamilies {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Return true if `name` is a known family.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of known families.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Return true if no family is known.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Pick the first available family from a comma separated fallback
    /// list such as `"Corporate Sans, Arial, sans"`.
    pub fn first_available<'a>(&self, faces: &'a str) -> Option<&'a str> {
        faces
            .split(',')
            .map(str::trim)
            .find(|face| self.contains(face))
    }
}

/// Install the process-wide font families.
///
/// This can only happen once, and only before the registry was first read
/// through [`font_families`].
pub fn init_font_families(families: FontFamilies) -> Result<()> {
    FONT_FAMILIES
        .set(Arc::new(families))
        .map_err(|_| Error::FontFamiliesInitialized)
}

/// The process-wide font families; empty if never initialised.
pub fn font_families() -> Arc<FontFamilies> {
    FONT_FAMILIES.get_or_init(Default::default).clone()
}
