use crate::config::CHANNEL_SEARCH_MIN_CHARS;
use std::cell::Cell;
use std::rc::Rc;

/// Generation counter behind the channel lookup debounce. Every keystroke
/// arms a new generation; a timer only fires if its generation is still the
/// latest when it wakes up.
#[derive(Debug, Clone, Default)]
pub struct DebounceGate {
    generation: Rc<Cell<u64>>,
}

impl DebounceGate {
    pub fn arm(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }

    pub fn should_fire(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    /// Invalidates any pending timer.
    pub fn cancel(&self) {
        self.arm();
    }
}

/// Trimmed lookup text, or `None` if it is too short to search for.
pub fn channel_query(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.chars().count() < CHANNEL_SEARCH_MIN_CHARS {
        None
    } else {
        Some(trimmed.to_string())
    }
}
