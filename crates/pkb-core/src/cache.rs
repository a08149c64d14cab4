//! Freshness flag for the rendered note list.

/// Single-bit cache validity for the note list.
///
/// Starts stale. Marked fresh once a fetched list (possibly empty) has been
/// rendered; invalidated by every successful note creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotesFreshness {
    fresh: bool,
}

impl NotesFreshness {
    pub const fn new() -> Self {
        Self { fresh: false }
    }

    pub fn mark_fresh(&mut self) {
        self.fresh = true;
    }

    pub fn invalidate(&mut self) {
        self.fresh = false;
    }

    pub const fn is_fresh(&self) -> bool {
        self.fresh
    }
}
