//! Fixpoint Engine (`spec.md §4.G`).
//!
//! A forward worklist over blocks, modeled directly on the teacher's
//! `BorrowChecker::analyze_function` loop: a FIFO queue of blocks to
//! (re)process, an `exit_states` map recording each block's state after its
//! last operation, join at predecessors for the incoming state, and
//! re-enqueue of successors whenever a block's exit state changes.

use crate::analysis::alias::AliasAnalysis;
use crate::analysis::control_dependence::ControlDependence;
use crate::analysis::mutation_detector::mutations_by_location;
use crate::analysis::reads::ReadsTable;
use crate::engine::CancellationToken;
use crate::model::{BlockId, Cfg, FlowAnalysisResults, FlowDomain, Mutation, ProgramLocation};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

pub fn run_fixpoint(
    cfg: &Cfg,
    reads: &ReadsTable,
    mutations: &[Mutation],
    aliases: &AliasAnalysis,
    control_deps: &ControlDependence,
    cancel: &CancellationToken,
) -> Option<FlowAnalysisResults> {
    let by_location = mutations_by_location(mutations);
    let mut exit_states: FxHashMap<BlockId, FlowDomain> = cfg.block_ids().map(|b| (b, FlowDomain::bottom())).collect();
    let mut results = FlowAnalysisResults::new();

    let mut queue: VecDeque<BlockId> = cfg.block_ids().collect();
    let mut in_queue: FxHashMap<BlockId, bool> = cfg.block_ids().map(|b| (b, true)).collect();

    let mut iterations: u64 = 0;
    while let Some(block_id) = queue.pop_front() {
        if cancel.is_cancelled() {
            return None;
        }
        in_queue.insert(block_id, false);
        iterations += 1;

        let block = cfg.block(block_id);
        let mut state = FlowDomain::bottom();
        for &pred in &block.predecessors {
            if let Some(pred_exit) = exit_states.get(&pred) {
                state.join(pred_exit);
            }
        }

        for (idx, _op) in block.operations.iter().enumerate() {
            let loc = ProgramLocation::new(block_id, idx as u32);
            let loc_reads = reads.at(loc);
            let loc_muts = by_location.get(&loc).map(|v| v.as_slice()).unwrap_or(&[]);
            let control = control_deps.control_dependencies(cfg, block_id);
            state = crate::analysis::flow::apply(&state, loc, loc_reads, loc_muts, aliases, &control);
            results.record(loc, state.clone());
        }
        if block.branch_value.is_some() {
            let loc = ProgramLocation::new(block_id, block.exit_op_index());
            let loc_reads = reads.at(loc);
            let loc_muts = by_location.get(&loc).map(|v| v.as_slice()).unwrap_or(&[]);
            let control = control_deps.control_dependencies(cfg, block_id);
            state = crate::analysis::flow::apply(&state, loc, loc_reads, loc_muts, aliases, &control);
            results.record(loc, state.clone());
        }

        let changed = exit_states.get(&block_id).is_none_or(|prev| *prev != state);
        if changed {
            exit_states.insert(block_id, state);
            for succ in block.successors() {
                if !*in_queue.get(&succ).unwrap_or(&false) {
                    queue.push_back(succ);
                    in_queue.insert(succ, true);
                }
            }
        }
    }

    crate::slice_log!("fixpoint converged in {} block visits", iterations);
    Some(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::place_extractor::StandardPlaceExtractor;
    use crate::analysis::{mutation_detector::detect_mutations, reads::ReadsTable};
    use crate::model::{OperationShape, Place};
    use crate::testkit::*;

    fn run(cfg: &Cfg) -> FlowAnalysisResults {
        let extractor = StandardPlaceExtractor;
        let mutations = detect_mutations(cfg, &extractor);
        let reads = ReadsTable::build(cfg, &extractor);
        let aliases = AliasAnalysis::build(cfg, &extractor);
        let control = ControlDependence::build(cfg);
        run_fixpoint(cfg, &reads, &mutations, &aliases, &control, &CancellationToken::new()).unwrap()
    }

    /// `a = input; b = a + 1; c = b * 2;` (scenario S1 in `spec.md §8`).
    #[test]
    fn straight_line_chain_threads_dependencies_forward() {
        let mut b = CfgBuilder::new();
        let blk = b.new_block();
        let a = local("a");
        let bee = local("b");
        let c = local("c");

        let input = b.make_op(OperationShape::Literal);
        let a_target = b.make_op(local_ref(&a));
        b.push_op(blk, assign(a_target, input));

        let a_read = b.make_op(local_ref(&a));
        let one = b.make_op(OperationShape::Literal);
        let sum = b.make_op(OperationShape::BinaryOp { left: a_read, right: one });
        let b_target = b.make_op(local_ref(&bee));
        b.push_op(blk, assign(b_target, sum));

        let b_read = b.make_op(local_ref(&bee));
        let two = b.make_op(OperationShape::Literal);
        let product = b.make_op(OperationShape::BinaryOp { left: b_read, right: two });
        let c_target = b.make_op(local_ref(&c));
        b.push_op(blk, assign(c_target, product));

        let cfg = b.build();
        let results = run(&cfg);
        let final_state = results.state_at(ProgramLocation::new(BlockId(0), 2)).unwrap();
        let c_deps = final_state.get(&Place::new(c)).unwrap();
        // c's write depends on itself, b's write, and a's write.
        assert!(c_deps.contains(&ProgramLocation::new(BlockId(0), 2)));
        assert!(c_deps.contains(&ProgramLocation::new(BlockId(0), 1)));
        assert!(c_deps.contains(&ProgramLocation::new(BlockId(0), 0)));
    }

    /// `total = 0; for (...) { total = total + values[i]; }` (scenario S5).
    #[test]
    fn loop_back_edge_reaches_a_fixpoint() {
        let mut b = CfgBuilder::new();
        let preheader = b.new_block();
        let header = b.new_block();
        let body = b.new_block();
        let exit_blk = b.new_block();

        let total = local("total");
        let values = local("values");

        let zero = b.make_op(OperationShape::Literal);
        let total_init = b.make_op(local_ref(&total));
        b.push_op(preheader, assign(total_init, zero));
        b.fall_through(preheader, header);

        let cond = b.make_op(OperationShape::Literal);
        b.set_branch_value(header, OperationShape::UnaryOp { operand: cond });
        b.conditional(header, body);
        b.fall_through(header, exit_blk);

        let total_read = b.make_op(local_ref(&total));
        let values_read = b.make_op(local_ref(&values));
        let idx = b.make_op(OperationShape::Literal);
        let elem = b.make_op(OperationShape::ArrayElementRef { array: values_read, index: idx });
        let sum = b.make_op(OperationShape::BinaryOp { left: total_read, right: elem });
        let total_target = b.make_op(local_ref(&total));
        b.push_op(body, assign(total_target, sum));
        b.fall_through(body, header);

        let cfg = b.build();
        let results = run(&cfg);

        let loop_write = results.state_at(ProgramLocation::new(body, 0)).unwrap();
        let deps = loop_write.get(&Place::new(total.clone())).unwrap();
        // The write in the loop body depends on both the initial zero and
        // its own prior iteration once the fixpoint has converged.
        assert!(deps.contains(&ProgramLocation::new(preheader, 0)));
        assert!(deps.contains(&ProgramLocation::new(body, 0)));
    }

    #[test]
    fn seed_with_no_reads_or_mutations_has_empty_state() {
        let mut b = CfgBuilder::new();
        let blk = b.new_block();
        b.push_op(blk, OperationShape::Literal);
        let cfg = b.build();
        let results = run(&cfg);
        let state = results.state_at(ProgramLocation::new(blk, 0)).unwrap();
        assert!(state.is_bottom());
    }
}
