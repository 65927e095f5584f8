//! Cache Entry Builder (`spec.md §4.H`).
//!
//! Derives the five queryable tables a slice extractor needs from a
//! completed fixpoint run plus the side tables that fed it: `dependencies`
//! (the union, over every location a place was live at, of its dependency
//! set), `reads`, `aliases` (the full alias closure for every place the
//! entry mentions), and `mutation_targets`.

use crate::analysis::alias::AliasAnalysis;
use crate::analysis::mutation_detector::mutations_by_location;
use crate::analysis::reads::ReadsTable;
use crate::model::{FlowAnalysisResults, Mutation, Place, PlaceKey, ProgramLocation};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Clone, Debug, Default)]
pub struct CacheEntry {
    pub dependencies: FxHashMap<PlaceKey, Vec<ProgramLocation>>,
    pub reads: FxHashMap<PlaceKey, Vec<ProgramLocation>>,
    pub aliases: FxHashMap<PlaceKey, Vec<Place>>,
    pub mutation_targets: FxHashMap<ProgramLocation, Vec<Place>>,
    /// Canonical `Place` value for every key this entry mentions, so
    /// extractors can go from a key back to a displayable place.
    pub places: FxHashMap<PlaceKey, Place>,
}

impl CacheEntry {
    pub fn build(results: &FlowAnalysisResults, reads: &ReadsTable, mutations: &[Mutation], aliases: &AliasAnalysis) -> Self {
        let mut dependencies: FxHashMap<PlaceKey, FxHashSet<ProgramLocation>> = FxHashMap::default();
        let mut places: FxHashMap<PlaceKey, Place> = FxHashMap::default();

        for (_loc, domain) in results.iter() {
            for (place, locs) in domain.iter() {
                let key = place.to_key();
                places.entry(key.clone()).or_insert_with(|| place.clone());
                dependencies.entry(key).or_default().extend(locs.iter().copied());
            }
        }

        let mut reads_table: FxHashMap<PlaceKey, FxHashSet<ProgramLocation>> = FxHashMap::default();
        for (loc, places_read) in reads.iter() {
            for place in places_read {
                let key = place.to_key();
                places.entry(key.clone()).or_insert_with(|| place.clone());
                reads_table.entry(key).or_default().insert(*loc);
            }
        }

        let by_location = mutations_by_location(mutations);
        let mut mutation_targets: FxHashMap<ProgramLocation, Vec<Place>> = FxHashMap::default();
        for (loc, muts) in &by_location {
            let mut targets: Vec<Place> = muts.iter().map(|m| m.target.clone()).collect();
            for target in &targets {
                places.entry(target.to_key()).or_insert_with(|| target.clone());
            }
            targets.sort();
            targets.dedup();
            mutation_targets.insert(*loc, targets);
        }

        let mut alias_table: FxHashMap<PlaceKey, Vec<Place>> = FxHashMap::default();
        for (key, place) in &places {
            let mut closure: Vec<Place> = aliases.aliases(place).into_iter().collect();
            closure.sort();
            alias_table.insert(key.clone(), closure);
        }

        CacheEntry {
            dependencies: sort_map(dependencies),
            reads: sort_map(reads_table),
            aliases: alias_table,
            mutation_targets: sort_targets(mutation_targets),
            places,
        }
    }

    pub fn dependencies_of(&self, key: &PlaceKey) -> &[ProgramLocation] {
        self.dependencies.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn reads_of(&self, key: &PlaceKey) -> &[ProgramLocation] {
        self.reads.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn aliases_of(&self, key: &PlaceKey) -> &[Place] {
        self.aliases.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn mutations_at(&self, loc: ProgramLocation) -> &[Place] {
        self.mutation_targets.get(&loc).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

fn sort_map(map: FxHashMap<PlaceKey, FxHashSet<ProgramLocation>>) -> FxHashMap<PlaceKey, Vec<ProgramLocation>> {
    map.into_iter()
        .map(|(k, set)| {
            let mut v: Vec<ProgramLocation> = set.into_iter().collect();
            v.sort();
            (k, v)
        })
        .collect()
}

fn sort_targets(mut map: FxHashMap<ProgramLocation, Vec<Place>>) -> FxHashMap<ProgramLocation, Vec<Place>> {
    for v in map.values_mut() {
        v.sort();
    }
    map
}
