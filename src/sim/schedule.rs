//! Deferred one-shot actions on a logical clock
//!
//! The clock only moves when the render loop ticks, so a paused or stopped
//! run never fires anything. Actions carry no authority of their own: the
//! controller re-checks its state before applying each one.

/// Something to do later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Hide the message with this id, if it is still the one showing
    HideMessage { id: u32 },
    /// Finish a level-up transition
    EnterNextLevel,
    /// Show the end-of-run summary
    RevealSummary,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due_ms: f64,
    action: Deferred,
}

/// Pending actions ordered by due time
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    now_ms: f64,
    pending: Vec<Pending>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule `action` to fire `delay_ms` from now
    pub fn after(&mut self, delay_ms: f64, action: Deferred) {
        let due_ms = self.now_ms + delay_ms.max(0.0);
        // Insert after everything due at or before, so equal times fire in order
        let idx = self.pending.partition_point(|p| p.due_ms <= due_ms);
        self.pending.insert(idx, Pending { due_ms, action });
    }

    /// Move the clock forward and return the actions that became due, oldest first
    pub fn advance(&mut self, elapsed_ms: f64) -> Vec<Deferred> {
        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.now_ms += elapsed_ms;
        }
        let due = self.pending.partition_point(|p| p.due_ms <= self.now_ms);
        self.pending.drain(..due).map(|p| p.action).collect()
    }

    /// Whether an action of this kind is waiting
    pub fn contains(&self, action: Deferred) -> bool {
        self.pending.iter().any(|p| p.action == action)
    }

    /// Drop every pending action and rewind the clock
    pub fn reset(&mut self) {
        self.pending.clear();
        self.now_ms = 0.0;
    }
}
