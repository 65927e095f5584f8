//! Forward Slice Extractor (`spec.md §4.J`).
//!
//! A worklist over places: for the current place, every location recorded
//! in its `reads` table entry is a downstream consumer. If that location is
//! itself a mutation site, the written target(s) — and their full alias
//! closure — are queued to keep following the flow; otherwise the location
//! is a sink.

use crate::analysis::cache_entry::CacheEntry;
use crate::analysis::slice_member::{format_place_list, SliceMember, SliceRelation};
use crate::engine::CancellationToken;
use crate::error::SliceError;
use crate::model::{Cfg, Place, PlaceKey, ProgramLocation, Span};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

pub fn compute_forward_slice(cache: &CacheEntry, cfg: &Cfg, seed: &Place, cancel: &CancellationToken) -> Result<Vec<SliceMember>, SliceError> {
    let mut visited_places: FxHashSet<PlaceKey> = FxHashSet::default();
    let mut visited_locations: FxHashSet<ProgramLocation> = FxHashSet::default();
    visited_places.insert(seed.to_key());

    let mut queue: VecDeque<Place> = VecDeque::new();
    queue.push_back(seed.clone());

    let mut members = Vec::new();
    while let Some(place) = queue.pop_front() {
        let key = place.to_key();
        // spec.md §4.J step 2: "for every a ∈ aliases(p), look up reads[key(a)]"
        // — the popped place's own reads alone would miss a sink reached only
        // through one of its aliases (e.g. `y = x; foo(x);` seeded on `y`).
        let mut locations: Vec<ProgramLocation> = cache.aliases_of(&key).iter().flat_map(|a| cache.reads_of(&a.to_key()).iter().copied()).collect();
        locations.sort();
        locations.dedup();
        for location in locations {
            if cancel.is_cancelled() {
                return Err(SliceError::Cancelled);
            }
            if !visited_locations.insert(location) {
                continue;
            }
            let Some(op_id) = cfg.operation_at(location) else {
                continue;
            };
            let span = cfg.operation(op_id).display_span().unwrap_or(Span::new(0, 0));
            let targets = cache.mutations_at(location);

            if targets.is_empty() {
                members.push(SliceMember {
                    location,
                    place: place.clone(),
                    relation: SliceRelation::Sink,
                    span,
                    summary: format!("{} is consumed here", place.display()),
                });
                continue;
            }

            members.push(SliceMember {
                location,
                place: place.clone(),
                relation: SliceRelation::Transform { targets: targets.to_vec() },
                span,
                summary: format!("{} propagates into {}", place.display(), format_place_list(targets, 3)),
            });

            for target in targets {
                for aliased in cache.aliases_of(&target.to_key()) {
                    if visited_places.insert(aliased.to_key()) {
                        queue.push_back(aliased.clone());
                    }
                }
            }
        }
    }

    members.sort_by_key(|m| m.location);
    Ok(members)
}
