//! Last-write-wins result slot.
//!
//! Each new input calls [`LatestSlot::begin`]; a result is only kept if its
//! ticket is still the newest when it is published. Older results are
//! dropped, never queued.

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug)]
struct SlotState<T> {
    generation: u64,
    value: Option<T>,
}

#[derive(Debug)]
pub struct LatestSlot<T> {
    state: Mutex<SlotState<T>>,
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestSlot<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                generation: 0,
                value: None,
            }),
        }
    }

    /// Start a new cycle. Any unconsumed result from an earlier cycle is
    /// discarded.
    pub fn begin(&self) -> Ticket {
        let mut state = self.state.lock();
        state.generation += 1;
        state.value = None;
        Ticket(state.generation)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.state.lock().generation == ticket.0
    }

    /// Store `value` if `ticket` is still the newest; returns whether it was
    /// kept.
    pub fn publish(&self, ticket: Ticket, value: T) -> bool {
        let mut state = self.state.lock();
        if state.generation != ticket.0 {
            tracing::debug!(
                stale = ticket.0,
                current = state.generation,
                "dropping stale result"
            );
            return false;
        }
        state.value = Some(value);
        true
    }

    pub fn take(&self) -> Option<T> {
        self.state.lock().value.take()
    }
}
