//! The core data model: symbols, places, program locations, mutations, the
//! control-flow graph, and the dataflow lattice. `spec.md §3`.

mod cfg;
mod flow_domain;
mod location;
mod mutation;
mod place;
mod span;
mod symbol;

pub use cfg::{ArgumentBinding, Block, CallArgument, Cfg, OperationId, OperationNode, OperationShape};
pub use flow_domain::{FlowAnalysisResults, FlowDomain};
pub use location::{BlockId, ProgramLocation};
pub use mutation::{Mutation, MutationKind};
pub use place::{Place, PlaceKey};
pub use span::Span;
pub use symbol::{Symbol, SymbolKind};
