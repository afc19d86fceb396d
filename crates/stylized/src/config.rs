//! Process-wide resolution settings.
//!
//! References may point at anything, including back at themselves, so every
//! time the engine follows one it takes a [`ReferenceGuard`]. Guards nest on
//! a per-thread counter; once the counter would pass
//! [`max_reference_depth`], following fails with
//! [`StyleError::ReferenceDepthExceeded`] instead of recursing forever.
//!
//! Tripping the limit poisons the rest of the operation on that thread:
//! every later follow fails at once and lookups stop falling back to
//! enclosing scopes, until the outermost guard or lookup is released. A
//! cycle reached through several routes is cut off once instead of being
//! retried along each of them.
//!
//! `resolve` and `get_or_none` report a tripped limit as "not found". Reads
//! that return a `Result` report the error itself.

use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, StyleError};
use crate::style::{Reference, Style};

/// Default limit for nested reference following.
pub const DEFAULT_MAX_REFERENCE_DEPTH: usize = 64;

static MAX_REFERENCE_DEPTH: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_REFERENCE_DEPTH);

#[derive(Default)]
struct FollowState {
    depth: usize,
    lookups: usize,
    exceeded: Option<StyleError>,
}

impl FollowState {
    fn settle(&mut self) {
        if self.depth == 0 && self.lookups == 0 {
            self.exceeded = None;
        }
    }
}

thread_local! {
    static STATE: RefCell<FollowState> = RefCell::new(FollowState::default());
}

/// Overrides the maximum number of references followed within one another.
///
/// Values below 1 are raised to 1. The setting is global; tests that lower
/// it should run serially.
pub fn set_max_reference_depth(limit: usize) {
    MAX_REFERENCE_DEPTH.store(limit.max(1), Ordering::Relaxed);
}

/// Current reference depth limit.
pub fn max_reference_depth() -> usize {
    MAX_REFERENCE_DEPTH.load(Ordering::Relaxed)
}

/// Whether the depth limit has tripped during the current operation.
pub(crate) fn depth_exceeded() -> bool {
    STATE.with(|state| state.borrow().exceeded.is_some())
}

/// Marks one reference being followed on the current thread.
pub(crate) struct ReferenceGuard(());

impl ReferenceGuard {
    pub(crate) fn enter(reference: &Arc<dyn Reference>) -> Result<Self> {
        let limit = max_reference_depth();
        let mut tripped = false;
        let entered = STATE.with(|state| {
            let mut state = state.borrow_mut();
            if let Some(error) = &state.exceeded {
                return Err(error.clone());
            }
            if state.depth + 1 > limit {
                let error = StyleError::ReferenceDepthExceeded {
                    reference: Style::Reference(reference.clone()),
                    limit,
                };
                state.exceeded = Some(error.clone());
                tripped = true;
                return Err(error);
            }
            state.depth += 1;
            Ok(ReferenceGuard(()))
        });
        if tripped {
            debug!(reference = ?reference, limit, "reference depth exceeded");
        }
        entered
    }
}

impl Drop for ReferenceGuard {
    fn drop(&mut self) {
        STATE.with(|state| {
            let mut state = state.borrow_mut();
            state.depth = state.depth.saturating_sub(1);
            state.settle();
        });
    }
}

/// Spans one path lookup, so a limit tripped anywhere below it is reported
/// by [`LookupScope::finish`] rather than read as a plain miss.
pub(crate) struct LookupScope(());

impl LookupScope {
    pub(crate) fn begin() -> Self {
        STATE.with(|state| state.borrow_mut().lookups += 1);
        LookupScope(())
    }

    pub(crate) fn finish<T>(self, found: T) -> Result<T> {
        let exceeded = STATE.with(|state| state.borrow().exceeded.clone());
        match exceeded {
            Some(error) => Err(error),
            None => Ok(found),
        }
    }
}

impl Drop for LookupScope {
    fn drop(&mut self) {
        STATE.with(|state| {
            let mut state = state.borrow_mut();
            state.lookups = state.lookups.saturating_sub(1);
            state.settle();
        });
    }
}

#[cfg(test)]
pub(crate) fn current_depth() -> usize {
    STATE.with(|state| state.borrow().depth)
}
