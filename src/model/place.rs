//! Places: a base symbol plus an ordered projection path of member symbols.

use super::symbol::Symbol;
use std::sync::Arc;

/// A stable, presentation-free string identity for a `Place`, suitable as a
/// map key and safe to persist across calls (`spec.md §6`'s cache-key
/// format). Built from the durable ids of the base symbol and every
/// projection member, joined by a separator that cannot appear in a symbol
/// id produced by a well-behaved collaborator.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct PlaceKey(Arc<str>);

impl PlaceKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Place {
    base: Symbol,
    projection: Vec<Symbol>,
}

impl Place {
    pub fn new(base: Symbol) -> Self {
        Place { base, projection: Vec::new() }
    }

    pub fn with_projection(base: Symbol, projection: Vec<Symbol>) -> Self {
        Place { base, projection }
    }

    /// Returns a new place extending this one with one more projection
    /// member (`field/property/event access on an existing place`).
    pub fn project(&self, member: Symbol) -> Self {
        let mut projection = self.projection.clone();
        projection.push(member);
        Place { base: self.base.clone(), projection }
    }

    /// Returns a new place that shares this place's base and this place's
    /// projection, extended by `suffix`. Used by the alias analyzer to
    /// project a tracked alias relation of a prefix forward onto a deeper
    /// place (`spec.md §4.D` step 2).
    pub fn extend(&self, suffix: &[Symbol]) -> Self {
        let mut projection = self.projection.clone();
        projection.extend_from_slice(suffix);
        Place { base: self.base.clone(), projection }
    }

    pub fn base(&self) -> &Symbol {
        &self.base
    }

    pub fn projection(&self) -> &[Symbol] {
        &self.projection
    }

    pub fn depth(&self) -> usize {
        self.projection.len()
    }

    /// `other` is a strict projection of `self`: same base, and `other`'s
    /// path is a proper prefix of `self`'s path.
    pub fn is_strict_projection_of(&self, other: &Place) -> bool {
        self.base == other.base
            && other.projection.len() < self.projection.len()
            && self.projection[..other.projection.len()] == other.projection[..]
    }

    pub fn shares_base_with(&self, other: &Place) -> bool {
        self.base == other.base
    }

    pub fn to_key(&self) -> PlaceKey {
        let mut s = String::from(self.base.id());
        for member in &self.projection {
            s.push('|');
            s.push_str(member.id());
        }
        PlaceKey(Arc::from(s))
    }

    /// Display form for slice summaries, e.g. `total.sum` or `widget`.
    pub fn display(&self) -> String {
        let mut s = String::from(self.base.display_name());
        for member in &self.projection {
            s.push('.');
            s.push_str(member.display_name());
        }
        s
    }
}

impl PartialOrd for Place {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Place {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_key().cmp(&other.to_key())
    }
}
