//! The public entry point (`spec.md §6`), grounded in the teacher's
//! `BorrowChecker::new(...).run()` shape: one engine value bundling the
//! cache, three inherent methods covering the whole external surface.

use crate::analysis::cache_entry::CacheEntry;
use crate::analysis::control_dependence::ControlDependence;
use crate::analysis::fixpoint::run_fixpoint;
use crate::analysis::mutation_detector::detect_mutations;
use crate::analysis::place_extractor::{PlaceExtractor, StandardPlaceExtractor};
use crate::analysis::reads::ReadsTable;
use crate::analysis::{alias::AliasAnalysis, backward_slice, forward_slice, SliceMember};
use crate::cache::{CacheStatistics, MemberId, PerMemberCache};
use crate::error::SliceError;
use crate::model::{Cfg, Place};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation, checked between blocks during the fixpoint and
/// between locations during slice extraction (`spec.md §4.K`/`§7`).
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SliceDirection {
    Backward,
    Forward,
}

#[derive(Clone, Debug)]
pub struct SliceResponse {
    pub seed: Place,
    pub direction: SliceDirection,
    pub members: Vec<SliceMember>,
}

pub struct SliceEngine {
    cache: PerMemberCache,
    extractor: StandardPlaceExtractor,
}

impl Default for SliceEngine {
    fn default() -> Self {
        SliceEngine::new()
    }
}

impl SliceEngine {
    pub fn new() -> Self {
        SliceEngine { cache: PerMemberCache::new(), extractor: StandardPlaceExtractor }
    }

    /// Computes a backward or forward dependency slice for `seed_place`
    /// within `member_id` of `document`, reusing a cached `CacheEntry` when
    /// one is available for this exact member.
    ///
    /// `source_text` is used only to validate that cached spans still fall
    /// within the current document; it never re-drives parsing.
    pub fn compute_slice(
        &self,
        direction: SliceDirection,
        document: &Path,
        member_id: &MemberId,
        seed_place: &Place,
        cfg: &Cfg,
        source_text: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<SliceResponse>, SliceError> {
        if cancel.is_cancelled() {
            return Err(SliceError::Cancelled);
        }
        if cfg.blocks.is_empty() {
            // spec.md §7: a missing/empty CFG degrades to "no result", not
            // an error — the public API never returns `SliceError` for an
            // ordinary can't-analyze-this situation.
            return Ok(None);
        }

        let entry = match self.cache.try_get(document, member_id) {
            Some(entry) => entry,
            None => {
                let entry = self.analyze(cfg, cancel)?;
                self.cache.store(document.to_path_buf(), member_id.clone(), entry)
            }
        };

        let members = match direction {
            SliceDirection::Backward => backward_slice::compute_backward_slice(&entry, cfg, &self.extractor, seed_place, cancel)?,
            SliceDirection::Forward => forward_slice::compute_forward_slice(&entry, cfg, seed_place, cancel)?,
        };

        let members: Vec<SliceMember> = members
            .into_iter()
            .filter(|m| m.span.fits(source_text.len()))
            .collect();

        crate::slice_log!("{:?} slice for {} produced {} members", direction, seed_place.display(), members.len());

        Ok(Some(SliceResponse { seed: seed_place.clone(), direction, members }))
    }

    fn analyze(&self, cfg: &Cfg, cancel: &CancellationToken) -> Result<CacheEntry, SliceError> {
        let mutations = detect_mutations(cfg, &self.extractor);
        let reads = ReadsTable::build(cfg, &self.extractor);
        let aliases = AliasAnalysis::build(cfg, &self.extractor);
        let control_deps = ControlDependence::build(cfg);
        let results = run_fixpoint(cfg, &reads, &mutations, &aliases, &control_deps, cancel).ok_or(SliceError::Cancelled)?;
        Ok(CacheEntry::build(&results, &reads, &mutations, &aliases))
    }

    pub fn invalidate_document(&self, document: &Path) {
        self.cache.invalidate_document(document);
    }

    pub fn cache_statistics(&self) -> CacheStatistics {
        self.cache.statistics()
    }
}
