//! Mutation Detector (`spec.md §4.C`).
//!
//! Classifies the top-level shape of each statement as a mutation (plain
//! assignment, compound assignment, increment/decrement, or a declarator
//! with an initializer), then separately recurses into every subexpression
//! of the statement — including the value/initializer of the top-level
//! mutation itself — looking for call sites, since a `ref`/`out` argument at
//! any nesting depth is its own mutation.

use crate::analysis::place_extractor::{is_indexed_target, PlaceExtractor};
use crate::model::{ArgumentBinding, Cfg, Mutation, MutationKind, OperationId, OperationShape, ProgramLocation};
use rustc_hash::FxHashMap;

fn make_mutation(cfg: &Cfg, target_op: OperationId, place: crate::model::Place, loc: ProgramLocation, kind: MutationKind) -> Mutation {
    if is_indexed_target(cfg, target_op) {
        Mutation::indexed(place, loc, kind)
    } else {
        Mutation::new(place, loc, kind)
    }
}

pub fn detect_mutations(cfg: &Cfg, extractor: &dyn PlaceExtractor) -> Vec<Mutation> {
    let mut out = Vec::new();
    for block in &cfg.blocks {
        for (idx, op) in block.operations.iter().enumerate() {
            let loc = ProgramLocation::new(block.id, idx as u32);
            detect_in_statement(cfg, extractor, loc, *op, &mut out);
        }
        if let Some(op) = block.branch_value {
            let loc = ProgramLocation::new(block.id, block.exit_op_index());
            detect_in_statement(cfg, extractor, loc, op, &mut out);
        }
    }
    out
}

fn detect_in_statement(cfg: &Cfg, extractor: &dyn PlaceExtractor, loc: ProgramLocation, op: OperationId, out: &mut Vec<Mutation>) {
    let top = unwrap_statement(cfg, op);
    match &cfg.operation(top).shape {
        OperationShape::SimpleAssign { target, .. } => {
            if let Some(place) = extractor.try_create(cfg, *target) {
                out.push(make_mutation(cfg, *target, place, loc, MutationKind::Assignment));
            }
        }
        OperationShape::CompoundAssign { target, .. } => {
            if let Some(place) = extractor.try_create(cfg, *target) {
                out.push(make_mutation(cfg, *target, place, loc, MutationKind::CompoundAssignment));
            }
        }
        OperationShape::Increment(target) => {
            if let Some(place) = extractor.try_create(cfg, *target) {
                out.push(make_mutation(cfg, *target, place, loc, MutationKind::Increment));
            }
        }
        OperationShape::Decrement(target) => {
            if let Some(place) = extractor.try_create(cfg, *target) {
                out.push(make_mutation(cfg, *target, place, loc, MutationKind::Decrement));
            }
        }
        OperationShape::VariableDeclarator { declared, initializer } if initializer.is_some() => {
            out.push(Mutation::new(crate::model::Place::new(declared.clone()), loc, MutationKind::Initialization));
        }
        _ => {}
    }
    collect_calls(cfg, extractor, top, loc, out);
}

/// Strips transparent statement-wrapper shapes to reach the expression a
/// statement actually performs.
fn unwrap_statement(cfg: &Cfg, op: OperationId) -> OperationId {
    match &cfg.operation(op).shape {
        OperationShape::ExpressionStatement(inner) => unwrap_statement(cfg, *inner),
        _ => op,
    }
}

fn collect_calls(cfg: &Cfg, extractor: &dyn PlaceExtractor, op: OperationId, loc: ProgramLocation, out: &mut Vec<Mutation>) {
    let shape = &cfg.operation(op).shape;
    if let OperationShape::Call { receiver, arguments } = shape {
        if let Some(receiver) = receiver {
            collect_calls(cfg, extractor, *receiver, loc, out);
        }
        for arg in arguments {
            match arg.binding {
                ArgumentBinding::Ref => {
                    if let Some(place) = extractor.try_create(cfg, arg.value) {
                        out.push(make_mutation(cfg, arg.value, place, loc, MutationKind::RefArgument));
                    }
                }
                ArgumentBinding::Out => {
                    if let Some(place) = extractor.try_create(cfg, arg.value) {
                        out.push(make_mutation(cfg, arg.value, place, loc, MutationKind::OutArgument));
                    }
                }
                ArgumentBinding::ByValue | ArgumentBinding::In => {}
            }
            collect_calls(cfg, extractor, arg.value, loc, out);
        }
        return;
    }
    for child in children_of(shape) {
        collect_calls(cfg, extractor, child, loc, out);
    }
}

fn children_of(shape: &OperationShape) -> Vec<OperationId> {
    match shape {
        OperationShape::FieldRef { base, .. } | OperationShape::PropertyRef { base, .. } | OperationShape::EventRef { base, .. } => {
            base.into_iter().copied().collect()
        }
        OperationShape::ArrayElementRef { array, index } => vec![*array, *index],
        OperationShape::Conversion(inner) | OperationShape::Parenthesized(inner) | OperationShape::Await(inner) | OperationShape::ExpressionStatement(inner) => vec![*inner],
        OperationShape::ConditionalAccess { base, when_not_null } => vec![*base, *when_not_null],
        OperationShape::SimpleAssign { target, value } | OperationShape::CompoundAssign { target, value } => vec![*target, *value],
        OperationShape::Increment(op) | OperationShape::Decrement(op) => vec![*op],
        OperationShape::VariableDeclarator { initializer, .. } => initializer.into_iter().copied().collect(),
        OperationShape::BinaryOp { left, right } => vec![*left, *right],
        OperationShape::UnaryOp { operand } => vec![*operand],
        OperationShape::Call { .. } | OperationShape::LocalRef(_) | OperationShape::ParamRef(_) | OperationShape::Literal | OperationShape::Other => vec![],
    }
}

/// Groups a flat mutation list by location, as consumed by the transfer
/// function (`spec.md §4.F` step 2) and the cache entry builder
/// (`spec.md §4.H`).
pub fn mutations_by_location(mutations: &[Mutation]) -> FxHashMap<ProgramLocation, Vec<Mutation>> {
    let mut out: FxHashMap<ProgramLocation, Vec<Mutation>> = FxHashMap::default();
    for m in mutations {
        out.entry(m.location).or_default().push(m.clone());
    }
    out
}
