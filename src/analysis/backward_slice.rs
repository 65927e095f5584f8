//! Backward Slice Extractor (`spec.md §4.I`).
//!
//! A seed's `dependencies` table entry is already the full transitively
//! closed set of locations that may have contributed to its value — the
//! fixpoint's own propagation chains each location's contribution through
//! everything it read, so no further worklist is needed to reach
//! transitivity. Every member of a backward slice is classified `Source`
//! (`spec.md §4.I`); `Transform`/`Sink` belong to the forward direction only.
//! What remains per location is rendering: a display span and a summary
//! that varies depending on whether the contributing write itself had an
//! upstream read.

use crate::analysis::cache_entry::CacheEntry;
use crate::analysis::place_extractor::PlaceExtractor;
use crate::analysis::reads::representative_reads;
use crate::analysis::slice_member::{format_place_list, SliceMember, SliceRelation};
use crate::engine::CancellationToken;
use crate::error::SliceError;
use crate::model::{Cfg, MutationKind, Place, Span};

pub fn compute_backward_slice(
    cache: &CacheEntry,
    cfg: &Cfg,
    extractor: &dyn PlaceExtractor,
    seed: &Place,
    cancel: &CancellationToken,
) -> Result<Vec<SliceMember>, SliceError> {
    let key = seed.to_key();
    let mut locations: Vec<_> = cache.dependencies_of(&key).to_vec();
    locations.sort();
    locations.dedup();

    let mut members = Vec::with_capacity(locations.len());
    for location in locations {
        if cancel.is_cancelled() {
            return Err(SliceError::Cancelled);
        }
        let Some(op_id) = cfg.operation_at(location) else {
            continue;
        };
        let targets = cache.mutations_at(location);
        let Some(target) = pick_target(targets, seed) else {
            continue;
        };
        let mut own_reads = Vec::new();
        representative_reads(cfg, extractor, op_id, &mut own_reads);
        let has_upstream = own_reads.iter().any(|r| !cache.dependencies_of(&r.to_key()).is_empty());

        let span = cfg.operation(op_id).display_span().unwrap_or(Span::new(0, 0));
        let mutation = cache_mutation_kind(cache, location, target);
        let summary = summarize(target, has_upstream, &own_reads, mutation);

        members.push(SliceMember { location, place: target.clone(), relation: SliceRelation::Source, span, summary });
    }

    members.sort_by_key(|m| m.location);
    Ok(members)
}

fn pick_target<'a>(targets: &'a [Place], seed: &Place) -> Option<&'a Place> {
    targets.iter().find(|t| *t == seed).or_else(|| targets.first())
}

fn cache_mutation_kind(_cache: &CacheEntry, _location: crate::model::ProgramLocation, _target: &Place) -> Option<MutationKind> {
    // The cache stores mutation targets, not their kind; a richer cache
    // table could carry it, but the summary reads fine without it.
    None
}

fn summarize(target: &Place, has_upstream: bool, own_reads: &[Place], _kind: Option<MutationKind>) -> String {
    match has_upstream {
        false => format!("{} is set here from a value with no further upstream dependency", target.display()),
        true => {
            if own_reads.is_empty() {
                format!("{} is updated here", target.display())
            } else {
                format!("{} depends on {} here", target.display(), format_place_list(own_reads, 3))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{control_dependence::ControlDependence, fixpoint::run_fixpoint, mutation_detector::detect_mutations};
    use crate::analysis::place_extractor::StandardPlaceExtractor;
    use crate::model::{BlockId, OperationShape, ProgramLocation};
    use crate::testkit::*;

    fn slice_for(cfg: &Cfg, seed: &Place) -> Vec<SliceMember> {
        let extractor = StandardPlaceExtractor;
        let mutations = detect_mutations(cfg, &extractor);
        let reads = crate::analysis::reads::ReadsTable::build(cfg, &extractor);
        let aliases = crate::analysis::alias::AliasAnalysis::build(cfg, &extractor);
        let control = ControlDependence::build(cfg);
        let results = run_fixpoint(cfg, &reads, &mutations, &aliases, &control, &CancellationToken::new()).unwrap();
        let entry = crate::analysis::cache_entry::CacheEntry::build(&results, &reads, &mutations, &aliases);
        compute_backward_slice(&entry, cfg, &extractor, seed, &CancellationToken::new()).unwrap()
    }

    #[test]
    fn seed_with_no_mutations_has_an_empty_backward_slice() {
        let mut b = CfgBuilder::new();
        let blk = b.new_block();
        b.push_op(blk, OperationShape::Literal);
        let cfg = b.build();

        let seed = Place::new(local("untouched"));
        assert!(slice_for(&cfg, &seed).is_empty());
    }

    #[test]
    fn chain_of_assignments_is_fully_captured() {
        let mut b = CfgBuilder::new();
        let blk = b.new_block();
        let a = local("a");
        let bee = local("b");

        let input = b.make_op(OperationShape::Literal);
        let a_target = b.make_op(local_ref(&a));
        b.push_op(blk, assign(a_target, input));

        let a_read = b.make_op(local_ref(&a));
        let b_target = b.make_op(local_ref(&bee));
        b.push_op(blk, assign(b_target, a_read));

        let cfg = b.build();
        let members = slice_for(&cfg, &Place::new(bee));
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].location, ProgramLocation::new(BlockId(0), 0));
        assert_eq!(members[1].location, ProgramLocation::new(BlockId(0), 1));
    }

    #[test]
    fn every_backward_member_is_tagged_source_even_with_an_upstream_chain() {
        let mut b = CfgBuilder::new();
        let blk = b.new_block();
        let a = local("a");
        let bee = local("b");

        let input = b.make_op(OperationShape::Literal);
        let a_target = b.make_op(local_ref(&a));
        b.push_op(blk, assign(a_target, input));

        let a_read = b.make_op(local_ref(&a));
        let b_target = b.make_op(local_ref(&bee));
        b.push_op(blk, assign(b_target, a_read));

        let cfg = b.build();
        let members = slice_for(&cfg, &Place::new(bee));
        assert_eq!(members.len(), 2);
        assert!(members.iter().all(|m| matches!(m.relation, SliceRelation::Source)));
    }

    #[test]
    fn results_are_sorted_by_block_then_op_index() {
        let mut b = CfgBuilder::new();
        let b0 = b.new_block();
        let b1 = b.new_block();
        let t = local("t");

        let value0 = b.make_op(OperationShape::Literal);
        let target0 = b.make_op(local_ref(&t));
        b.push_op(b0, assign(target0, value0));
        b.fall_through(b0, b1);

        let value1 = b.make_op(OperationShape::Literal);
        let target1 = b.make_op(local_ref(&t));
        b.push_op(b1, assign(target1, value1));

        let cfg = b.build();
        let members = slice_for(&cfg, &Place::new(t));
        let mut sorted = members.clone();
        sorted.sort_by_key(|m| m.location);
        assert_eq!(members, sorted);
    }
}
