//! The collaborator-supplied control-flow graph.
//!
//! `Cfg` is the boundary value the host crate builds from its own IR and
//! hands to the engine (`spec.md §6`'s "collaborator interfaces", realized
//! here as a concrete arena rather than a trait object hierarchy — see
//! `DESIGN.md` for why). Blocks hold operation ids in program order;
//! operations are a closed `OperationShape` enum so the Place Extractor and
//! Mutation Detector can exhaustively match on them instead of reflecting
//! over an open trait.

use super::symbol::Symbol;
use super::span::Span;
use super::location::BlockId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OperationId(pub u32);

/// How an argument at a call site is bound to its parameter. Only `Ref`/
/// `Out`/`In` are alias-inducing and mutation-relevant (`spec.md §4.C`,
/// `§4.D`); `ByValue` arguments are plain reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArgumentBinding {
    ByValue,
    Ref,
    Out,
    In,
}

#[derive(Clone, Debug)]
pub struct CallArgument {
    pub value: OperationId,
    pub binding: ArgumentBinding,
}

/// The normalized shape of one operation, generalized from whatever
/// expression/statement tree the collaborator's front-end actually parsed.
/// `None`-valued `base` fields on member accesses mean a static member
/// (no receiver place).
#[derive(Clone, Debug)]
pub enum OperationShape {
    LocalRef(Symbol),
    ParamRef(Symbol),
    FieldRef { base: Option<OperationId>, member: Symbol },
    PropertyRef { base: Option<OperationId>, member: Symbol },
    EventRef { base: Option<OperationId>, member: Symbol },
    ArrayElementRef { array: OperationId, index: OperationId },
    Conversion(OperationId),
    Parenthesized(OperationId),
    Await(OperationId),
    ConditionalAccess { base: OperationId, when_not_null: OperationId },
    SimpleAssign { target: OperationId, value: OperationId },
    CompoundAssign { target: OperationId, value: OperationId },
    Increment(OperationId),
    Decrement(OperationId),
    VariableDeclarator { declared: Symbol, initializer: Option<OperationId> },
    Call { receiver: Option<OperationId>, arguments: Vec<CallArgument> },
    BinaryOp { left: OperationId, right: OperationId },
    UnaryOp { operand: OperationId },
    ExpressionStatement(OperationId),
    /// Whether this value's static type is a reference type, as reported by
    /// the collaborator (drives alias induction in `spec.md §4.D`).
    Literal,
    Other,
}

impl OperationShape {
    /// True when a value of this shape's static type is reference-typed, as
    /// far as the shape itself can tell. Reference-ness of a composite
    /// expression is carried on `OperationNode::is_reference_typed` instead,
    /// since it depends on the collaborator's type system, not the shape.
    pub fn is_place_shaped(&self) -> bool {
        matches!(
            self,
            OperationShape::LocalRef(_)
                | OperationShape::ParamRef(_)
                | OperationShape::FieldRef { .. }
                | OperationShape::PropertyRef { .. }
                | OperationShape::EventRef { .. }
                | OperationShape::ArrayElementRef { .. }
        )
    }
}

#[derive(Clone, Debug)]
pub struct OperationNode {
    pub id: OperationId,
    pub shape: OperationShape,
    pub span: Option<Span>,
    /// Narrower token span for slice-summary display — e.g. a declarator's
    /// name token rather than its whole `let x = ...` statement
    /// (`spec.md §4.I`/`§4.J` "precise syntactic span"). Falls back to
    /// `span` when absent.
    pub name_span: Option<Span>,
    /// True when this operation's static type is a reference type. Used by
    /// the Alias Analyzer to decide whether an assignment/initializer/
    /// argument is alias-inducing (`spec.md §4.D`).
    pub is_reference_typed: bool,
}

impl OperationNode {
    pub fn display_span(&self) -> Option<Span> {
        self.name_span.or(self.span)
    }
}

#[derive(Clone, Debug)]
pub struct Block {
    pub id: BlockId,
    /// Straight-line operations, in program order; indices `0..operations.len()`.
    pub operations: Vec<OperationId>,
    /// Reserved op_index `operations.len()`, if this block ends in a
    /// condition/selector rather than an unconditional jump or return.
    pub branch_value: Option<OperationId>,
    pub predecessors: Vec<BlockId>,
    pub conditional_successor: Option<BlockId>,
    pub fall_through_successor: Option<BlockId>,
    /// Additional edges (e.g. switch-case arms) beyond the two named above.
    pub extra_successors: Vec<BlockId>,
}

impl Block {
    /// `op_index` one past the last straight-line operation: the branch
    /// value's slot if present, otherwise `operations.len()`.
    pub fn exit_op_index(&self) -> u32 {
        self.operations.len() as u32
    }

    /// All distinct successor blocks, de-duplicated and in a stable order
    /// (conditional, then fall-through, then extras) regardless of how many
    /// named edges the collaborator's terminator actually carries
    /// (`spec.md §9` "reflection-accessed successors").
    pub fn successors(&self) -> Vec<BlockId> {
        let mut out = Vec::new();
        let mut push = |b: BlockId| {
            if !out.contains(&b) {
                out.push(b);
            }
        };
        if let Some(b) = self.conditional_successor {
            push(b);
        }
        if let Some(b) = self.fall_through_successor {
            push(b);
        }
        for b in &self.extra_successors {
            push(*b);
        }
        out
    }
}

#[derive(Clone, Debug, Default)]
pub struct Cfg {
    pub blocks: Vec<Block>,
    operations: Vec<OperationNode>,
}

impl Cfg {
    pub fn new(blocks: Vec<Block>, operations: Vec<OperationNode>) -> Self {
        Cfg { blocks, operations }
    }

    pub fn operation(&self, id: OperationId) -> &OperationNode {
        &self.operations[id.0 as usize]
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0 as usize]
    }

    pub fn entry(&self) -> BlockId {
        BlockId(0)
    }

    /// Last-ordinal block (`spec.md §3`'s convention for the exit block used
    /// by the post-dominator fixpoint).
    pub fn exit(&self) -> BlockId {
        BlockId((self.blocks.len() - 1) as u32)
    }

    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        (0..self.blocks.len()).map(|i| BlockId(i as u32))
    }

    pub fn operation_at(&self, location: crate::model::ProgramLocation) -> Option<OperationId> {
        let block = self.blocks.get(location.block.0 as usize)?;
        if (location.op_index as usize) < block.operations.len() {
            Some(block.operations[location.op_index as usize])
        } else if location.op_index == block.exit_op_index() {
            block.branch_value
        } else {
            None
        }
    }
}
