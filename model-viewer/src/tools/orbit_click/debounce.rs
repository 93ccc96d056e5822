use bevy::prelude::*;
use constants::interaction::CLICK_DRAG_TOLERANCE_PX;
use std::time::Duration;

/// What a resolved click burst asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickAction {
    /// Retarget the orbit center.
    Single(Vec2),
    /// Retarget and move the camera towards the hit.
    Double(Vec2),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingClick {
    cursor: Vec2,
    elapsed: Duration,
}

/// Holds a single click for a grace period so a following click can turn
/// the burst into a double click. Exactly one action fires per burst.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickDebouncer {
    grace: Duration,
    pending: Option<PendingClick>,
}

impl ClickDebouncer {
    pub fn new(grace: Duration) -> Self {
        Self {
            grace,
            pending: None,
        }
    }

    pub fn set_grace(&mut self, grace: Duration) {
        self.grace = grace;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Register a click. A click landing inside the grace window of a pending
    /// one cancels it and resolves immediately as a double click.
    pub fn click(&mut self, cursor: Vec2) -> Option<ClickAction> {
        match self.pending.take() {
            Some(pending) if pending.elapsed <= self.grace => Some(ClickAction::Double(cursor)),
            _ => {
                self.pending = Some(PendingClick {
                    cursor,
                    elapsed: Duration::ZERO,
                });
                None
            }
        }
    }

    /// Advance time. Fires the pending single click once its window closes.
    pub fn tick(&mut self, delta: Duration) -> Option<ClickAction> {
        let pending = self.pending.as_mut()?;
        pending.elapsed += delta;
        if pending.elapsed < self.grace {
            return None;
        }
        self.pending
            .take()
            .map(|pending| ClickAction::Single(pending.cursor))
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Whether a press and release are close enough to count as a click rather
/// than the end of a drag.
pub fn is_click(press: Vec2, release: Vec2) -> bool {
    press.distance(release) <= CLICK_DRAG_TOLERANCE_PX
}
