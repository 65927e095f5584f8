//! The dataflow lattice: `Place -> Set<ProgramLocation>`.

use super::location::ProgramLocation;
use super::place::Place;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

/// A partial map from places to the set of locations that may have
/// contributed to their current value. Bottom is the empty map. Join is
/// pointwise set union, which is monotone and forms a finite-height lattice
/// over any single function's finite place/location universe
/// (`spec.md §3`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowDomain {
    deps: FxHashMap<Place, FxHashSet<ProgramLocation>>,
}

impl FlowDomain {
    pub fn bottom() -> Self {
        FlowDomain::default()
    }

    pub fn is_bottom(&self) -> bool {
        self.deps.is_empty()
    }

    pub fn get(&self, place: &Place) -> Option<&FxHashSet<ProgramLocation>> {
        self.deps.get(place)
    }

    /// Strong update: replace the dependency set for `place` outright.
    pub fn set(&mut self, place: Place, locations: FxHashSet<ProgramLocation>) {
        self.deps.insert(place, locations);
    }

    /// Weak update: union `locations` into `place`'s existing dependency set.
    pub fn union_into(&mut self, place: &Place, locations: &FxHashSet<ProgramLocation>) {
        self.deps
            .entry(place.clone())
            .or_default()
            .extend(locations.iter().copied());
    }

    pub fn remove(&mut self, place: &Place) {
        self.deps.remove(place);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Place, &FxHashSet<ProgramLocation>)> {
        self.deps.iter()
    }

    /// Join with `other` in place: pointwise set union over every tracked
    /// place.
    pub fn join(&mut self, other: &FlowDomain) {
        for (place, locations) in &other.deps {
            self.deps
                .entry(place.clone())
                .or_default()
                .extend(locations.iter().copied());
        }
    }

    pub fn joined(mut self, other: &FlowDomain) -> Self {
        self.join(other);
        self
    }
}

/// The stable result of a completed fixpoint run: the `FlowDomain` observed
/// at every program location reached by the analysis.
#[derive(Clone, Debug, Default)]
pub struct FlowAnalysisResults {
    states: FxHashMap<ProgramLocation, FlowDomain>,
}

impl FlowAnalysisResults {
    pub fn new() -> Self {
        FlowAnalysisResults::default()
    }

    pub fn record(&mut self, location: ProgramLocation, state: FlowDomain) {
        self.states.insert(location, state);
    }

    pub fn state_at(&self, location: ProgramLocation) -> Option<&FlowDomain> {
        self.states.get(&location)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProgramLocation, &FlowDomain)> {
        self.states.iter()
    }
}
