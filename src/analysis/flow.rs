//! Flow Domain & Transfer Function (`spec.md §4.F`).
//!
//! `apply` is a pure function of its inputs: the incoming state, the reads
//! and mutations at this location (both precomputed, since they don't
//! depend on flow state), the alias analysis, and the control dependencies
//! of this location's block. The fixpoint engine is the only caller, but
//! purity here means `apply` can safely be invoked more than once per
//! location across iterations without side effects leaking between calls.

use crate::analysis::alias::AliasAnalysis;
use crate::model::{FlowDomain, Mutation, Place, ProgramLocation};
use rustc_hash::FxHashSet;

pub fn apply(
    input: &FlowDomain,
    location: ProgramLocation,
    reads: &[Place],
    mutations: &[Mutation],
    aliases: &AliasAnalysis,
    control_dependencies: &[ProgramLocation],
) -> FlowDomain {
    if mutations.is_empty() {
        return input.clone();
    }

    let mut state = input.clone();

    // Step: the dependency set contributed by this location's own reads,
    // joined with this location's control dependencies — a mutation whose
    // value was computed under a branch depends on that branch's condition
    // too.
    let mut contributed: FxHashSet<ProgramLocation> = FxHashSet::default();
    contributed.insert(location);
    for read in reads {
        if let Some(set) = input.get(read) {
            contributed.extend(set.iter().copied());
        }
    }
    contributed.extend(control_dependencies.iter().copied());

    for mutation in mutations {
        let target = &mutation.target;
        let has_tracked_aliases = !aliases.aliases(target).iter().all(|a| a == target);
        let is_simple_non_projected = target.depth() == 0;
        let strong_update = is_simple_non_projected && !has_tracked_aliases && !mutation.is_indexed;

        if strong_update {
            state.set(target.clone(), contributed.clone());
        } else {
            for aliased in aliases.aliases(target) {
                state.union_into(&aliased, &contributed);
            }
        }
    }

    state
}
