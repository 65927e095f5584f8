//! RepresentativeReads: the set of places an operation reads from, used by
//! the transfer function's step 1 (`spec.md §4.F`) and by the cache's reads
//! table (`spec.md §4.H`).

use crate::model::{ArgumentBinding, Cfg, OperationId, OperationShape, Place, ProgramLocation};
use crate::analysis::place_extractor::PlaceExtractor;
use rustc_hash::FxHashMap;

/// Collects every place read while evaluating `op`, recursing into
/// subexpressions that aren't themselves place-shaped. A place-shaped
/// operation (a bare local/field/property/event/array-element reference,
/// possibly under a transparent wrapper) contributes itself and is not
/// descended into further — its own base/index operands are not separately
/// "read" places, they're part of the place's identity.
pub fn representative_reads(cfg: &Cfg, extractor: &dyn PlaceExtractor, op: OperationId, out: &mut Vec<Place>) {
    if let Some(place) = extractor.try_create(cfg, op) {
        out.push(place);
        return;
    }
    match &cfg.operation(op).shape {
        OperationShape::SimpleAssign { value, .. } => representative_reads(cfg, extractor, *value, out),
        OperationShape::CompoundAssign { target, value } => {
            representative_reads(cfg, extractor, *target, out);
            representative_reads(cfg, extractor, *value, out);
        }
        OperationShape::Increment(target) | OperationShape::Decrement(target) => {
            representative_reads(cfg, extractor, *target, out);
        }
        OperationShape::VariableDeclarator { initializer, .. } => {
            if let Some(init) = initializer {
                representative_reads(cfg, extractor, *init, out);
            }
        }
        OperationShape::Call { receiver, arguments } => {
            if let Some(receiver) = receiver {
                representative_reads(cfg, extractor, *receiver, out);
            }
            for arg in arguments {
                if arg.binding != ArgumentBinding::Out {
                    representative_reads(cfg, extractor, arg.value, out);
                }
            }
        }
        OperationShape::BinaryOp { left, right } => {
            representative_reads(cfg, extractor, *left, out);
            representative_reads(cfg, extractor, *right, out);
        }
        OperationShape::UnaryOp { operand } => representative_reads(cfg, extractor, *operand, out),
        OperationShape::ArrayElementRef { array, index } => {
            representative_reads(cfg, extractor, *array, out);
            representative_reads(cfg, extractor, *index, out);
        }
        OperationShape::Conversion(inner)
        | OperationShape::Parenthesized(inner)
        | OperationShape::Await(inner)
        | OperationShape::ExpressionStatement(inner) => representative_reads(cfg, extractor, *inner, out),
        OperationShape::ConditionalAccess { base, when_not_null } => {
            representative_reads(cfg, extractor, *base, out);
            representative_reads(cfg, extractor, *when_not_null, out);
        }
        OperationShape::FieldRef { base, .. } | OperationShape::PropertyRef { base, .. } | OperationShape::EventRef { base, .. } => {
            if let Some(base) = base {
                representative_reads(cfg, extractor, *base, out);
            }
        }
        OperationShape::LocalRef(_) | OperationShape::ParamRef(_) | OperationShape::Literal | OperationShape::Other => {}
    }
}

/// Precomputed `location -> places read` table, built once per CFG before the
/// fixpoint runs — reads are a pure function of the CFG's shape, independent
/// of flow state, so there is no benefit to recomputing them per iteration.
#[derive(Clone, Debug, Default)]
pub struct ReadsTable {
    by_location: FxHashMap<ProgramLocation, Vec<Place>>,
}

impl ReadsTable {
    pub fn build(cfg: &Cfg, extractor: &dyn PlaceExtractor) -> Self {
        let mut by_location = FxHashMap::default();
        for block in &cfg.blocks {
            for (idx, op) in block.operations.iter().enumerate() {
                let loc = ProgramLocation::new(block.id, idx as u32);
                let mut reads = Vec::new();
                representative_reads(cfg, extractor, *op, &mut reads);
                by_location.insert(loc, reads);
            }
            if let Some(op) = block.branch_value {
                let loc = ProgramLocation::new(block.id, block.exit_op_index());
                let mut reads = Vec::new();
                representative_reads(cfg, extractor, op, &mut reads);
                by_location.insert(loc, reads);
            }
        }
        ReadsTable { by_location }
    }

    pub fn at(&self, location: ProgramLocation) -> &[Place] {
        self.by_location.get(&location).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProgramLocation, &Vec<Place>)> {
        self.by_location.iter()
    }
}
