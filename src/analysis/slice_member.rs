//! Shared slice-result types produced by both extractors (`spec.md §4.I`/`§4.J`).

use crate::model::{Place, ProgramLocation, Span};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SliceRelation {
    /// A place this slice bottoms out at: nothing upstream contributed to it.
    Source,
    /// An intermediate step; `targets` names what it flows into (forward
    /// slices only — empty for backward members).
    Transform { targets: Vec<Place> },
    /// A terminal consumer of the seed (forward slices only).
    Sink,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SliceMember {
    pub location: ProgramLocation,
    pub place: Place,
    pub relation: SliceRelation,
    pub span: Span,
    pub summary: String,
}

/// Formats a place list for a summary line, capping how many names are
/// spelled out before falling back to a count (`spec.md §4.J`).
pub fn format_place_list(places: &[Place], cap: usize) -> String {
    if places.is_empty() {
        return String::new();
    }
    if places.len() <= cap {
        places.iter().map(|p| p.display()).collect::<Vec<_>>().join(", ")
    } else {
        let named: Vec<String> = places[..cap].iter().map(|p| p.display()).collect();
        format!("{} and {} more", named.join(", "), places.len() - cap)
    }
}
