//! Collaborator traits & seed resolution (`spec.md §4.L`).
//!
//! `SemanticModel` is only ever consulted while resolving a cursor position
//! to a `Place`, never in the hot analysis path (`spec.md §6`): the engine
//! itself works purely over `Cfg`/`OperationShape`.

use crate::analysis::place_extractor::PlaceExtractor;
use crate::model::{Cfg, OperationId, Place, SymbolKind};

/// A byte offset into a document's source text, as supplied by the editor
/// front-end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePosition(pub u32);

/// Consumed from the collaborator per `spec.md §6`, used only during seed
/// resolution.
pub trait SemanticModel {
    /// The smallest operation enclosing `position`, if any.
    fn get_operation(&self, position: SourcePosition) -> Option<OperationId>;
    /// The symbol an operation refers to or declares, when known statically.
    fn get_symbol_info(&self, operation: OperationId) -> Option<crate::model::Symbol>;
    fn get_declared_symbol(&self, operation: OperationId) -> Option<crate::model::Symbol>;
}

/// What a cursor position resolved to.
pub enum SeedResolution {
    /// A place the core can slice on directly.
    Place(Place),
    /// The cursor landed on a field's own declaration rather than a usage
    /// within a method body. Per `spec.md §9`, field seeds bypass the CFG
    /// core entirely — the caller should route this to the external
    /// class-summary collaborator instead of calling `compute_slice`.
    FieldDeclaration(crate::model::Symbol),
}

/// Maps a cursor position to a `Place`, or `None` if nothing slice-worthy is
/// at that position.
pub fn resolve_seed(model: &dyn SemanticModel, cfg: &Cfg, extractor: &dyn PlaceExtractor, position: SourcePosition) -> Option<SeedResolution> {
    let op = model.get_operation(position)?;

    if let Some(declared) = model.get_declared_symbol(op) {
        if declared.kind() == SymbolKind::Field {
            return Some(SeedResolution::FieldDeclaration(declared));
        }
    }

    if let Some(place) = extractor.try_create(cfg, op) {
        return Some(SeedResolution::Place(place));
    }

    let symbol = model.get_symbol_info(op)?;
    if symbol.kind() == SymbolKind::Field {
        return Some(SeedResolution::FieldDeclaration(symbol));
    }
    Some(SeedResolution::Place(Place::new(symbol)))
}
