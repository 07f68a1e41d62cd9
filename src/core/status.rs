//! Status enums and their presentation lookup tables

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

/// Visual variant of a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
    Default,
    Secondary,
    Success,
    Warning,
    Destructive,
    Outline,
}

/// One row of a domain's status presentation table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPresentation {
    /// Human-readable label (e.g. "Out of stock")
    pub label: &'static str,

    /// Icon name understood by the front end
    pub icon: &'static str,

    pub variant: BadgeVariant,
}

/// A closed set of status tags for one domain.
///
/// Implementations are generated by [`status_enum!`](crate::status_enum), which
/// also produces the presentation table consulted by [`Status::presentation`].
pub trait Status:
    Copy
    + Eq
    + Hash
    + Ord
    + Debug
    + Display
    + FromStr
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Every member of the enum, in declaration order
    fn all() -> &'static [Self];

    /// Wire name (snake_case)
    fn as_str(&self) -> &'static str;

    /// Badge lookup for this status
    fn presentation(&self) -> StatusPresentation;

    /// Parse a wire name, returning `None` for strings outside the enum
    fn parse(value: &str) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.as_str() == value)
    }
}

/// Render-ready badge for a status, shared by every domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub status: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub variant: BadgeVariant,
}

impl StatusBadge {
    pub fn of<S: Status>(status: S) -> Self {
        let presentation = status.presentation();
        Self {
            status: status.as_str(),
            label: presentation.label,
            icon: presentation.icon,
            variant: presentation.variant,
        }
    }
}

/// Error returned by the generated `FromStr` implementations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
}
