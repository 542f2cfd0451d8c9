//! Menu applicability context.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Where a menu applies: the whole page, the current selection, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuContext {
    /// The menu acts on the whole page.
    Page,
    /// The menu acts on the selected text.
    Selection,
    /// The menu is offered for both pages and selections.
    #[default]
    Both,
}

impl MenuContext {
    /// Returns all contexts in interchange order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Page, Self::Selection, Self::Both]
    }

    /// Returns the interchange spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Selection => "selection",
            Self::Both => "both",
        }
    }

    /// Parses an interchange value.
    ///
    /// Matching is exact; `"Page"` or `" page"` are not recognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "page" => Some(Self::Page),
            "selection" => Some(Self::Selection),
            "both" => Some(Self::Both),
            _ => None,
        }
    }
}

impl fmt::Display for MenuContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuContext {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            Error::InvalidInput(format!(
                "unknown context '{s}' (expected page, selection or both)"
            ))
        })
    }
}
