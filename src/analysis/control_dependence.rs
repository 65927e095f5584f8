//! Control-Dependence Analyzer (`spec.md §4.E`).
//!
//! Computes post-dominators by an iterative fixpoint starting from the exit
//! block (last-ordinal block), selects each block's immediate post-dominator,
//! then derives control dependence by, for each block with more than one
//! successor, walking forward from each successor until hitting that block's
//! immediate post-dominator or the branch block itself (a loop whose body
//! falls back through to its own header must not mark the header
//! control-dependent on itself) and marking every block visited along the
//! way as control-dependent on the branch.

use crate::model::{BlockId, Cfg, ProgramLocation};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Clone, Debug, Default)]
pub struct ControlDependence {
    /// block -> the blocks whose branch decision it is control-dependent on.
    dependent_on: FxHashMap<BlockId, FxHashSet<BlockId>>,
}

impl ControlDependence {
    pub fn build(cfg: &Cfg) -> Self {
        let all_blocks: Vec<BlockId> = cfg.block_ids().collect();
        if all_blocks.is_empty() {
            return ControlDependence::default();
        }

        let predecessors: FxHashMap<BlockId, Vec<BlockId>> = all_blocks
            .iter()
            .map(|&b| (b, cfg.block(b).predecessors.clone()))
            .collect();
        let successors: FxHashMap<BlockId, Vec<BlockId>> = all_blocks
            .iter()
            .map(|&b| (b, cfg.block(b).successors()))
            .collect();

        let exit = cfg.exit();
        // Post-dominance walks backwards from the exit block: in that
        // direction a block's "predecessors" are its ordinary CFG
        // successors.
        let post_dom = fixpoint_dominance(&all_blocks, exit, &successors);
        let ipdom = immediate_dominators(&all_blocks, exit, &post_dom);

        let mut dependent_on: FxHashMap<BlockId, FxHashSet<BlockId>> = FxHashMap::default();
        for &branch in &all_blocks {
            let succs = &successors[&branch];
            if succs.len() < 2 {
                continue;
            }
            let stop_at = ipdom.get(&branch).copied();
            for &succ in succs {
                let mut visited = FxHashSet::default();
                let mut stack = vec![succ];
                while let Some(b) = stack.pop() {
                    if !visited.insert(b) {
                        continue;
                    }
                    if Some(b) == stop_at || b == branch {
                        continue;
                    }
                    dependent_on.entry(b).or_default().insert(branch);
                    for &next in &successors[&b] {
                        if !visited.contains(&next) {
                            stack.push(next);
                        }
                    }
                }
            }
        }

        ControlDependence { dependent_on }
    }

    /// One branch location per controlling block: the block's branch value
    /// if it has one, otherwise its last straight-line operation.
    pub fn control_dependencies(&self, cfg: &Cfg, block: BlockId) -> Vec<ProgramLocation> {
        let Some(controllers) = self.dependent_on.get(&block) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for &controller in controllers {
            let b = cfg.block(controller);
            if b.branch_value.is_some() {
                out.push(ProgramLocation::new(controller, b.exit_op_index()));
            } else if !b.operations.is_empty() {
                out.push(ProgramLocation::new(controller, (b.operations.len() - 1) as u32));
            }
        }
        out.sort();
        out
    }
}

/// Standard dominance fixpoint: `dom[start] = {start}`,
/// `dom[b] = {b} ∪ ⋂ dom[p]` over `b`'s predecessors `p` (in whatever
/// direction `predecessors_of` supplies), iterated to a fixpoint. Passing
/// ordinary CFG predecessors computes dominance from the entry block;
/// passing ordinary CFG successors (as this module does, walking from the
/// exit block) computes post-dominance.
fn fixpoint_dominance(
    all_blocks: &[BlockId],
    start: BlockId,
    predecessors_of: &FxHashMap<BlockId, Vec<BlockId>>,
) -> FxHashMap<BlockId, FxHashSet<BlockId>> {
    let universe: FxHashSet<BlockId> = all_blocks.iter().copied().collect();
    let mut dom: FxHashMap<BlockId, FxHashSet<BlockId>> = all_blocks
        .iter()
        .map(|&b| {
            if b == start {
                let mut s = FxHashSet::default();
                s.insert(b);
                (b, s)
            } else {
                (b, universe.clone())
            }
        })
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for &b in all_blocks {
            if b == start {
                continue;
            }
            let preds = &predecessors_of[&b];
            let mut new_set = if preds.is_empty() {
                FxHashSet::default()
            } else {
                let mut iter = preds.iter();
                let first = dom[iter.next().unwrap()].clone();
                iter.fold(first, |acc, p| acc.intersection(&dom[p]).copied().collect())
            };
            new_set.insert(b);
            if new_set != dom[&b] {
                dom.insert(b, new_set);
                changed = true;
            }
        }
    }
    dom
}

/// Each block's immediate (post-)dominator: the element of its dominance set
/// (excluding itself) with the smallest dominance set, i.e. the closest one.
fn immediate_dominators(all_blocks: &[BlockId], start: BlockId, dom: &FxHashMap<BlockId, FxHashSet<BlockId>>) -> FxHashMap<BlockId, BlockId> {
    let mut out = FxHashMap::default();
    for &b in all_blocks {
        if b == start {
            continue;
        }
        let candidates: Vec<BlockId> = dom[&b].iter().copied().filter(|&d| d != b).collect();
        if let Some(&closest) = candidates.iter().min_by_key(|&&d| dom[&d].len()) {
            out.insert(b, closest);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OperationShape;
    use crate::testkit::*;

    /// b0 (branch) -> b1 (then), b0 -> b2 (else); b1 -> b3, b2 -> b3 (join/exit).
    fn diamond() -> Cfg {
        let mut b = CfgBuilder::new();
        let entry = b.new_block();
        let then_blk = b.new_block();
        let else_blk = b.new_block();
        let join = b.new_block();

        let cond = b.make_op(OperationShape::Literal);
        b.set_branch_value(entry, OperationShape::UnaryOp { operand: cond });
        b.conditional(entry, then_blk);
        b.fall_through(entry, else_blk);

        b.fall_through(then_blk, join);
        b.fall_through(else_blk, join);

        b.build()
    }

    #[test]
    fn join_block_has_no_control_dependence() {
        let cfg = diamond();
        let cd = ControlDependence::build(&cfg);
        assert!(cd.control_dependencies(&cfg, BlockId(3)).is_empty());
    }

    #[test]
    fn branch_arms_are_control_dependent_on_entry() {
        let cfg = diamond();
        let cd = ControlDependence::build(&cfg);
        let then_deps = cd.control_dependencies(&cfg, BlockId(1));
        let else_deps = cd.control_dependencies(&cfg, BlockId(2));
        assert_eq!(then_deps.len(), 1);
        assert_eq!(then_deps[0].block, BlockId(0));
        assert_eq!(else_deps, then_deps);
    }

    #[test]
    fn straight_line_cfg_has_no_control_dependence() {
        let mut b = CfgBuilder::new();
        let b0 = b.new_block();
        let b1 = b.new_block();
        b.push_op(b0, OperationShape::Literal);
        b.fall_through(b0, b1);
        b.push_op(b1, OperationShape::Literal);
        let cfg = b.build();

        let cd = ControlDependence::build(&cfg);
        assert!(cd.control_dependencies(&cfg, b0).is_empty());
        assert!(cd.control_dependencies(&cfg, b1).is_empty());
    }

    /// `preheader -> header -(cond)-> body -> header` (back edge), `header
    /// -> exit`. The header has two successors (`body`, `exit`), so the DFS
    /// from `body` must stop at the header itself via the back edge rather
    /// than marking the header control-dependent on its own branch.
    #[test]
    fn loop_header_is_not_control_dependent_on_itself() {
        let mut b = CfgBuilder::new();
        let preheader = b.new_block();
        let header = b.new_block();
        let body = b.new_block();
        let exit_blk = b.new_block();

        b.push_op(preheader, OperationShape::Literal);
        b.fall_through(preheader, header);

        let cond = b.make_op(OperationShape::Literal);
        b.set_branch_value(header, OperationShape::UnaryOp { operand: cond });
        b.conditional(header, body);
        b.fall_through(header, exit_blk);

        b.push_op(body, OperationShape::Literal);
        b.fall_through(body, header);

        let cfg = b.build();
        let cd = ControlDependence::build(&cfg);

        let header_deps = cd.control_dependencies(&cfg, header);
        assert!(header_deps.is_empty());

        let body_deps = cd.control_dependencies(&cfg, body);
        assert_eq!(body_deps.len(), 1);
        assert_eq!(body_deps[0].block, header);
    }

    #[test]
    fn empty_cfg_does_not_panic() {
        let cfg = Cfg::default();
        let cd = ControlDependence::build(&cfg);
        assert!(cd.dependent_on.is_empty());
    }
}
