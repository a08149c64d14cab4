//! Tag entry for the create-note form.

use std::time::{Duration, Instant};

/// Window after a successful add during which further adds are ignored.
pub const TAG_DEBOUNCE: Duration = Duration::from_millis(300);

const TAG_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagAddOutcome {
    /// Tag appended; carries the new buffer value.
    Added(String),
    /// Empty, duplicate, or comma-containing tag; the input was cleared.
    Rejected,
    /// Add control is still disabled from the previous add.
    Debounced,
}

/// Accumulates tags into the composite tag field.
#[derive(Debug, Clone, Default)]
pub struct TagEditor {
    buffer: String,
    input: String,
    locked_until: Option<Instant>,
}

impl TagEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composite tag field value, e.g. `"work, ideas"`.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Pending single-tag input.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// Overwrite the composite field directly. No deduplication is applied.
    pub fn set_buffer(&mut self, value: impl Into<String>) {
        self.buffer = value.into();
    }

    /// Tags currently in the buffer, split on commas and trimmed.
    pub fn tags(&self) -> Vec<&str> {
        self.buffer
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .collect()
    }

    /// Whether the add control is disabled at `now`.
    pub fn is_locked(&self, now: Instant) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    /// Add the pending input as a tag.
    pub fn add_tag(&mut self) -> TagAddOutcome {
        self.add_tag_at(Instant::now())
    }

    pub fn add_tag_at(&mut self, now: Instant) -> TagAddOutcome {
        if self.is_locked(now) {
            return TagAddOutcome::Debounced;
        }
        let raw = std::mem::take(&mut self.input);
        self.add_raw_at(&raw, now)
    }

    /// Add `raw` as a tag, as if typed into the input and submitted at `now`.
    pub fn add_raw_at(&mut self, raw: &str, now: Instant) -> TagAddOutcome {
        if self.is_locked(now) {
            return TagAddOutcome::Debounced;
        }
        self.input.clear();

        let tag = raw.trim();
        // A comma would split into extra tokens once the buffer is re-read.
        if tag.is_empty() || tag.contains(',') || self.tags().contains(&tag) {
            return TagAddOutcome::Rejected;
        }

        if !self.buffer.is_empty() {
            self.buffer.push_str(TAG_SEPARATOR);
        }
        self.buffer.push_str(tag);
        self.locked_until = Some(now + TAG_DEBOUNCE);
        TagAddOutcome::Added(self.buffer.clone())
    }

    /// Reset after a successful note submission.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.input.clear();
    }
}
