/// A half-open byte range into a document's source text.
///
/// Spans are supplied by the collaborator (`spec.md §6`) and are opaque to
/// the core beyond their offsets; the core never re-lexes or re-parses them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start must not be after end");
        Span { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when this span still falls within a document of `source_len`
    /// bytes. Cached spans from a stale snapshot that no longer fit are
    /// dropped rather than trusted (`spec.md §7`).
    pub fn fits(&self, source_len: usize) -> bool {
        (self.end as usize) <= source_len
    }
}
