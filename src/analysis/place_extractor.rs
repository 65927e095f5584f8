//! Place Extractor (`spec.md §4.B`).
//!
//! Maps an operation to the `Place` it denotes, if any. Transparent wrapper
//! shapes (conversion, parenthesization, await, the non-null branch of a
//! conditional access) recurse into their single operand; everything else
//! that isn't directly place-shaped yields `None`.

use crate::model::{Cfg, OperationId, OperationShape, Place};

/// Consumed from the collaborator per `spec.md §6`. The engine depends on
/// this trait rather than a free function so a host crate with richer
/// static knowledge (e.g. a resolved symbol table keyed differently) can
/// substitute its own extractor without touching any caller.
pub trait PlaceExtractor {
    fn try_create(&self, cfg: &Cfg, op: OperationId) -> Option<Place>;
}

/// The core's own implementation of the recognition table in `spec.md
/// §4.B`. This is what `testkit` fixtures and `SliceEngine::new` use by
/// default.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardPlaceExtractor;

impl PlaceExtractor for StandardPlaceExtractor {
    fn try_create(&self, cfg: &Cfg, op: OperationId) -> Option<Place> {
        try_create(cfg, op)
    }
}

pub fn try_create(cfg: &Cfg, op: OperationId) -> Option<Place> {
    match &cfg.operation(op).shape {
        OperationShape::LocalRef(sym) | OperationShape::ParamRef(sym) => Some(Place::new(sym.clone())),
        OperationShape::FieldRef { base, member } | OperationShape::PropertyRef { base, member } | OperationShape::EventRef { base, member } => {
            match base {
                Some(base_op) => try_create(cfg, *base_op).map(|p| p.project(member.clone())),
                None => Some(Place::new(member.clone())),
            }
        }
        OperationShape::ArrayElementRef { array, .. } => try_create(cfg, *array),
        OperationShape::Conversion(inner)
        | OperationShape::Parenthesized(inner)
        | OperationShape::Await(inner) => try_create(cfg, *inner),
        OperationShape::ConditionalAccess { when_not_null, .. } => try_create(cfg, *when_not_null),
        _ => None,
    }
}

/// Whether `op` denotes an array-element write once transparent wrappers are
/// stripped — the index-insensitive Place Extractor collapses
/// `values[i] = x` to `Place(values)` at depth 0, so strong-update
/// eligibility (`spec.md §4.F` step 5) needs this bit kept alongside the
/// `Place` itself to still treat it as indexed.
pub fn is_indexed_target(cfg: &Cfg, op: OperationId) -> bool {
    match &cfg.operation(op).shape {
        OperationShape::ArrayElementRef { .. } => true,
        OperationShape::Conversion(inner) | OperationShape::Parenthesized(inner) | OperationShape::Await(inner) => is_indexed_target(cfg, *inner),
        OperationShape::ConditionalAccess { when_not_null, .. } => is_indexed_target(cfg, *when_not_null),
        _ => false,
    }
}
