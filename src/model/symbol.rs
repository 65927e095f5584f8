//! Symbol identity.
//!
//! The core never synthesizes symbols; it only composes the ones the
//! collaborator hands it into `Place`s. A `Symbol` carries a durable
//! identifier (used for cross-call and cross-process equality, and as the
//! basis of `Place::to_key`), a display name for summaries, and a kind tag.
//! Equality, hashing and ordering are defined over the durable identifier
//! alone — the display name is presentation and never affects identity.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum SymbolKind {
    Local,
    Parameter,
    Field,
    Property,
    Event,
    Method,
    Other,
}

#[derive(Clone, Debug)]
pub struct Symbol {
    id: Arc<str>,
    display_name: Arc<str>,
    kind: SymbolKind,
    /// True for `ref`/`out`/`in` parameters: referencing this symbol's value
    /// elsewhere is itself alias-inducing (`spec.md §4.D`).
    by_ref: bool,
}

impl Symbol {
    pub fn new(id: impl Into<Arc<str>>, display_name: impl Into<Arc<str>>, kind: SymbolKind) -> Self {
        Symbol {
            id: id.into(),
            display_name: display_name.into(),
            kind,
            by_ref: false,
        }
    }

    pub fn with_by_ref(mut self, by_ref: bool) -> Self {
        self.by_ref = by_ref;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn is_by_ref(&self) -> bool {
        self.by_ref
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}
