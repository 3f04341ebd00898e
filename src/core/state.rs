//! Case-insensitive state names.
//!
//! Every state and transition endpoint is addressed by a `StateName`. Names
//! are normalized to lower case when they are built, so `"Start"`, `"START"`
//! and `"start"` all address the same registry entry.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Name of the mandatory entry state.
pub const START: &str = "start";

/// Name of the mandatory terminal state.
pub const END: &str = "end";

/// Normalized, case-insensitive state identifier.
///
/// # Example
///
/// ```rust
/// use stepwise::core::StateName;
///
/// let name = StateName::new("Validate-Request");
/// assert_eq!(name.as_str(), "validate-request");
/// assert_eq!(name, StateName::new("VALIDATE-REQUEST"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct StateName(String);

impl StateName {
    /// Build a name, normalizing it to lower case.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().to_lowercase())
    }

    /// The reserved entry state.
    pub fn start() -> Self {
        Self(START.to_string())
    }

    /// The reserved terminal state.
    pub fn end() -> Self {
        Self(END.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_start(&self) -> bool {
        self.0 == START
    }

    pub fn is_end(&self) -> bool {
        self.0 == END
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<&str> for StateName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for StateName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<StateName> for String {
    fn from(name: StateName) -> Self {
        name.0
    }
}

impl AsRef<str> for StateName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StateName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Render an optional state name for messages; the entry of a run has none.
pub(crate) fn display_optional(name: Option<&StateName>) -> String {
    match name {
        Some(name) => name.to_string(),
        None => "<none>".to_string(),
    }
}
