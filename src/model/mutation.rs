//! Mutations: a target place written at a location, tagged with the shape of
//! write that produced it.

use super::location::ProgramLocation;
use super::place::Place;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum MutationKind {
    Assignment,
    CompoundAssignment,
    Initialization,
    Increment,
    Decrement,
    RefArgument,
    OutArgument,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mutation {
    pub target: Place,
    pub location: ProgramLocation,
    pub kind: MutationKind,
    /// Whether the target was written through an array-element access
    /// (`values[i] = x`) before the Place Extractor's index-insensitive
    /// collapse dropped the index. A simple, unprojected `Place` can still
    /// be an indexed write, so eligibility for a strong update (`spec.md
    /// §4.F` step 5) needs this in addition to `target.depth() == 0`.
    pub is_indexed: bool,
}

impl Mutation {
    pub fn new(target: Place, location: ProgramLocation, kind: MutationKind) -> Self {
        Mutation { target, location, kind, is_indexed: false }
    }

    pub fn indexed(target: Place, location: ProgramLocation, kind: MutationKind) -> Self {
        Mutation { target, location, kind, is_indexed: true }
    }
}
