//! A minimal in-memory `Cfg` builder, standing in for a real parser/semantic
//! resolver front-end. Exercises the engine against hand-built fixtures the
//! way the teacher's borrow checker is exercised against hand-built
//! `HirModule` fixtures in its own test-support modules, rather than by
//! running a full parser pipeline.

use crate::model::{ArgumentBinding, Block, CallArgument, Cfg, OperationId, OperationNode, OperationShape, Span, Symbol, SymbolKind};
use crate::model::BlockId;

pub fn local(name: &str) -> Symbol {
    Symbol::new(format!("local:{name}"), name, SymbolKind::Local)
}

pub fn param(name: &str) -> Symbol {
    Symbol::new(format!("param:{name}"), name, SymbolKind::Parameter)
}

pub fn by_ref_param(name: &str) -> Symbol {
    param(name).with_by_ref(true)
}

pub fn field(name: &str) -> Symbol {
    Symbol::new(format!("field:{name}"), name, SymbolKind::Field)
}

#[derive(Default)]
pub struct CfgBuilder {
    blocks: Vec<BlockDraft>,
    operations: Vec<OperationNode>,
}

struct BlockDraft {
    operations: Vec<OperationId>,
    branch_value: Option<OperationId>,
    predecessors: Vec<BlockId>,
    conditional_successor: Option<BlockId>,
    fall_through_successor: Option<BlockId>,
    extra_successors: Vec<BlockId>,
}

impl CfgBuilder {
    pub fn new() -> Self {
        CfgBuilder::default()
    }

    /// Allocates a new, initially empty block and returns its id.
    pub fn new_block(&mut self) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(BlockDraft {
            operations: Vec::new(),
            branch_value: None,
            predecessors: Vec::new(),
            conditional_successor: None,
            fall_through_successor: None,
            extra_successors: Vec::new(),
        });
        id
    }

    fn push_node(&mut self, shape: OperationShape, is_reference_typed: bool) -> OperationId {
        let id = OperationId(self.operations.len() as u32);
        let span = Some(Span::new(id.0 * 10, id.0 * 10 + 1));
        self.operations.push(OperationNode { id, shape, span, name_span: None, is_reference_typed });
        id
    }

    /// Appends a straight-line statement operation to `block`.
    pub fn push_op(&mut self, block: BlockId, shape: OperationShape) -> OperationId {
        self.push_op_typed(block, shape, false)
    }

    pub fn push_op_typed(&mut self, block: BlockId, shape: OperationShape, is_reference_typed: bool) -> OperationId {
        let id = self.push_node(shape, is_reference_typed);
        self.blocks[block.0 as usize].operations.push(id);
        id
    }

    /// Builds an operation without attaching it to any block's straight-line
    /// list — used for sub-expressions referenced by id from other shapes.
    pub fn make_op(&mut self, shape: OperationShape) -> OperationId {
        self.push_node(shape, false)
    }

    pub fn make_op_typed(&mut self, shape: OperationShape, is_reference_typed: bool) -> OperationId {
        self.push_node(shape, is_reference_typed)
    }

    pub fn set_branch_value(&mut self, block: BlockId, shape: OperationShape) -> OperationId {
        let id = self.push_node(shape, false);
        self.blocks[block.0 as usize].branch_value = Some(id);
        id
    }

    /// Connects `from` to `to` via the fall-through edge and records the
    /// reverse predecessor edge.
    pub fn fall_through(&mut self, from: BlockId, to: BlockId) {
        self.blocks[from.0 as usize].fall_through_successor = Some(to);
        self.blocks[to.0 as usize].predecessors.push(from);
    }

    /// Connects `from` to `to` via the conditional edge and records the
    /// reverse predecessor edge.
    pub fn conditional(&mut self, from: BlockId, to: BlockId) {
        self.blocks[from.0 as usize].conditional_successor = Some(to);
        self.blocks[to.0 as usize].predecessors.push(from);
    }

    pub fn extra_successor(&mut self, from: BlockId, to: BlockId) {
        self.blocks[from.0 as usize].extra_successors.push(to);
        self.blocks[to.0 as usize].predecessors.push(from);
    }

    pub fn build(self) -> Cfg {
        let blocks = self
            .blocks
            .into_iter()
            .enumerate()
            .map(|(i, draft)| Block {
                id: BlockId(i as u32),
                operations: draft.operations,
                branch_value: draft.branch_value,
                predecessors: draft.predecessors,
                conditional_successor: draft.conditional_successor,
                fall_through_successor: draft.fall_through_successor,
                extra_successors: draft.extra_successors,
            })
            .collect();
        Cfg::new(blocks, self.operations)
    }
}

pub fn local_ref(sym: &Symbol) -> OperationShape {
    OperationShape::LocalRef(sym.clone())
}

pub fn param_ref(sym: &Symbol) -> OperationShape {
    OperationShape::ParamRef(sym.clone())
}

pub fn assign(target: OperationId, value: OperationId) -> OperationShape {
    OperationShape::SimpleAssign { target, value }
}

pub fn call(receiver: Option<OperationId>, arguments: Vec<(OperationId, ArgumentBinding)>) -> OperationShape {
    OperationShape::Call {
        receiver,
        arguments: arguments.into_iter().map(|(value, binding)| CallArgument { value, binding }).collect(),
    }
}

pub fn literal() -> OperationShape {
    OperationShape::Literal
}

pub fn binary_op(left: OperationId, right: OperationId) -> OperationShape {
    OperationShape::BinaryOp { left, right }
}

pub fn unary_op(operand: OperationId) -> OperationShape {
    OperationShape::UnaryOp { operand }
}

pub fn array_elem(array: OperationId, index: OperationId) -> OperationShape {
    OperationShape::ArrayElementRef { array, index }
}

pub fn expr_statement(inner: OperationId) -> OperationShape {
    OperationShape::ExpressionStatement(inner)
}

pub fn arg_by_value() -> ArgumentBinding {
    ArgumentBinding::ByValue
}

pub fn arg_ref() -> ArgumentBinding {
    ArgumentBinding::Ref
}

/// Convenience for building a seed `Place` directly from a `testkit` symbol,
/// for callers (e.g. integration tests) that only have the public API.
pub fn place(sym: &Symbol) -> crate::model::Place {
    crate::model::Place::new(sym.clone())
}
