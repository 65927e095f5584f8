//! Program locations: a block ordinal plus an operation index within it.

/// Ordinal position of a block within a CFG. Equality and ordering are by
/// ordinal alone; two blocks from different CFG snapshots with the same
/// ordinal compare equal, which is intentional (`spec.md §3`: blocks are
/// compared by ordinal, not by identity).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct BlockId(pub u32);

impl BlockId {
    pub fn ordinal(self) -> u32 {
        self.0
    }
}

/// A location within a single block's operation list: `op_index` ranges over
/// `[0, N]` where `N` is the reserved slot for that block's branch value (a
/// terminator condition or switch selector), one past the last straight-line
/// operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct ProgramLocation {
    pub block: BlockId,
    pub op_index: u32,
}

impl ProgramLocation {
    pub fn new(block: BlockId, op_index: u32) -> Self {
        ProgramLocation { block, op_index }
    }

    pub fn branch_value(block: BlockId, straight_line_len: u32) -> Self {
        ProgramLocation { block, op_index: straight_line_len }
    }
}

impl std::fmt::Display for ProgramLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "b{}:{}", self.block.0, self.op_index)
    }
}
