//! Intra-procedural dataflow slicer.
//!
//! Given a collaborator-supplied control-flow graph for a single function or
//! method and a seed `Place`, computes a backward slice (what could have
//! affected the seed's value) or a forward slice (what the seed's value
//! could affect), over a forward fixpoint dataflow analysis with alias and
//! control-dependence tracking. See `SliceEngine` for the entry point.

pub mod logging;

pub mod analysis;
pub mod cache;
pub mod engine;
pub mod error;
pub mod model;
pub mod seed;

#[doc(hidden)]
pub mod testkit;

pub use cache::{CacheStatistics, MemberId, PerMemberCache};
pub use engine::{CancellationToken, SliceDirection, SliceEngine, SliceResponse};
pub use error::SliceError;
pub use seed::{resolve_seed, SeedResolution, SemanticModel, SourcePosition};
