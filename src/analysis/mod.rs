//! The analysis pipeline: components B through J.

pub mod alias;
pub mod backward_slice;
pub mod cache_entry;
pub mod control_dependence;
pub mod fixpoint;
pub mod flow;
pub mod forward_slice;
pub mod mutation_detector;
pub mod place_extractor;
pub mod reads;
pub mod slice_member;

pub use alias::AliasAnalysis;
pub use cache_entry::CacheEntry;
pub use control_dependence::ControlDependence;
pub use place_extractor::{PlaceExtractor, StandardPlaceExtractor};
pub use reads::ReadsTable;
pub use slice_member::{SliceMember, SliceRelation};
