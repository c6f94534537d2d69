use std::cell::Cell;

/// Identifies one request among a sequence of superseding requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

/// Hands out increasing generations; only the latest one is current.
#[derive(Debug, Default)]
pub struct GenerationCounter(Cell<u64>);

impl GenerationCounter {
    pub fn advance(&self) -> Generation {
        let next = self.0.get().wrapping_add(1);
        self.0.set(next);
        Generation(next)
    }

    pub fn current(&self) -> Generation {
        Generation(self.0.get())
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.current() == generation
    }
}
