//! Action scheduler
//!
//! Polls time-driven callbacks once per frame. Actions fire in insertion
//! order, at most once per `update`. Actions scheduled while an `update` is
//! running (from inside a callback, through an [`ActionQueue`]) are parked
//! and only join the live set at the start of the next `update`.

use super::action::{Action, ActionHandle, IntoActionStatus, TickOutcome};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

#[derive(Default)]
struct QueueState {
    pending: RefCell<Vec<Action>>,
    closed: Cell<bool>,
}

/// Cloneable entry point for scheduling actions.
///
/// Callbacks capture a queue to schedule follow-up work without borrowing
/// the scheduler that is currently running them. Once the scheduler is
/// cleared the queue is closed and refuses new actions.
#[derive(Clone, Default)]
pub struct ActionQueue {
    state: Rc<QueueState>,
}

impl ActionQueue {
    /// Schedule `callback` to run once `delay` has elapsed, then every frame
    /// until it reports done (`()`/`true`) or is cancelled
    pub fn add<F, R>(&self, callback: F, delay: f32) -> ActionHandle
    where
        F: FnMut(f32) -> R + 'static,
        R: IntoActionStatus,
    {
        self.push(Action::new(callback, delay, None))
    }

    /// Schedule `callback` every `interval`, starting one interval from now
    pub fn add_repeating<F, R>(&self, callback: F, interval: f32) -> ActionHandle
    where
        F: FnMut(f32) -> R + 'static,
        R: IntoActionStatus,
    {
        self.add_repeating_after(callback, interval, interval)
    }

    /// Schedule `callback` first after `delay`, then every `interval`
    pub fn add_repeating_after<F, R>(&self, callback: F, delay: f32, interval: f32) -> ActionHandle
    where
        F: FnMut(f32) -> R + 'static,
        R: IntoActionStatus,
    {
        if interval > 0.0 {
            self.push(Action::new(callback, delay, Some(interval)))
        } else {
            log::warn!("Non-positive repeat interval {interval}, scheduling as per-frame action");
            self.push(Action::new(callback, delay, None))
        }
    }

    /// Whether the owning scheduler has been cleared
    pub fn is_closed(&self) -> bool {
        self.state.closed.get()
    }

    fn push(&self, action: Action) -> ActionHandle {
        if self.is_closed() {
            log::warn!("Action scheduled on a closed queue, ignoring it");
            return ActionHandle::inert();
        }
        let handle = action.handle();
        self.state.pending.borrow_mut().push(action);
        handle
    }

    fn take_pending(&self) -> Vec<Action> {
        std::mem::take(&mut *self.state.pending.borrow_mut())
    }

    fn pending_count(&self) -> usize {
        self.state.pending.borrow().iter().filter(|a| !a.is_cancelled()).count()
    }

    fn close(&self) {
        self.state.closed.set(true);
        for action in self.take_pending() {
            action.cancel();
        }
    }
}

impl fmt::Debug for ActionQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionQueue")
            .field("pending", &self.pending_count())
            .finish()
    }
}

/// Counters for one `update` pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Callbacks invoked
    pub fired: usize,
    /// Callbacks that failed and were removed
    pub failed: usize,
}

/// Owns a set of live actions and polls them every frame
#[derive(Default)]
pub struct ActionScheduler {
    live: Vec<Action>,
    queue: ActionQueue,
}

impl ActionScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue handle sharing this scheduler's pending list
    pub fn queue(&self) -> ActionQueue {
        self.queue.clone()
    }

    /// See [`ActionQueue::add`]. Never fires synchronously, even with zero delay.
    pub fn add<F, R>(&mut self, callback: F, delay: f32) -> ActionHandle
    where
        F: FnMut(f32) -> R + 'static,
        R: IntoActionStatus,
    {
        self.queue.add(callback, delay)
    }

    /// See [`ActionQueue::add_repeating`]
    pub fn add_repeating<F, R>(&mut self, callback: F, interval: f32) -> ActionHandle
    where
        F: FnMut(f32) -> R + 'static,
        R: IntoActionStatus,
    {
        self.queue.add_repeating(callback, interval)
    }

    /// See [`ActionQueue::add_repeating_after`]
    pub fn add_repeating_after<F, R>(&mut self, callback: F, delay: f32, interval: f32) -> ActionHandle
    where
        F: FnMut(f32) -> R + 'static,
        R: IntoActionStatus,
    {
        self.queue.add_repeating_after(callback, delay, interval)
    }

    /// Advance every live action by `delta_time` and fire the due ones
    pub fn update(&mut self, delta_time: f32) -> UpdateReport {
        let mut pending = self.queue.take_pending();
        self.live.append(&mut pending);

        let mut report = UpdateReport::default();
        self.live.retain_mut(|action| match action.tick(delta_time) {
            TickOutcome::Alive { fired } => {
                report.fired += usize::from(fired);
                true
            }
            TickOutcome::Remove { fired, failed } => {
                report.fired += usize::from(fired);
                report.failed += usize::from(failed);
                false
            }
        });

        if report.failed > 0 {
            log::warn!("{} action(s) failed during this update", report.failed);
        }
        report
    }

    /// Number of scheduled, non-cancelled actions (including pending ones)
    pub fn live_count(&self) -> usize {
        self.live.iter().filter(|a| !a.is_cancelled()).count() + self.queue.pending_count()
    }

    /// Whether nothing is scheduled
    pub fn is_empty(&self) -> bool {
        self.live_count() == 0
    }

    /// Cancel and drop every action, pending ones included.
    ///
    /// Queues handed out earlier are closed; the scheduler itself stays
    /// usable and hands out a fresh queue from now on.
    pub fn clear(&mut self) {
        for action in self.live.drain(..) {
            action.cancel();
        }
        self.queue.close();
        self.queue = ActionQueue::default();
    }
}

impl fmt::Debug for ActionScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionScheduler")
            .field("live", &self.live.len())
            .field("pending", &self.queue.pending_count())
            .finish()
    }
}

impl Drop for ActionScheduler {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionStatus;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() -> u32) {
        let count = Rc::new(Cell::new(0));
        let reader = count.clone();
        (count, move || reader.get())
    }

    #[test]
    fn test_zero_delay_fires_on_next_update() {
        let mut scheduler = ActionScheduler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        scheduler.add(move |dt| sink.borrow_mut().push(dt), 0.0);

        assert!(seen.borrow().is_empty());
        scheduler.update(16.0);
        assert_eq!(*seen.borrow(), vec![16.0]);
        scheduler.update(16.0);
        assert_eq!(seen.borrow().len(), 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_delayed_action() {
        let mut scheduler = ActionScheduler::new();
        let (count, fired) = counter();
        scheduler.add(move |_| count.set(count.get() + 1), 100.0);

        scheduler.update(60.0);
        assert_eq!(fired(), 0);
        scheduler.update(60.0);
        assert_eq!(fired(), 1);
    }

    #[test]
    fn test_repeating_keeps_overshoot() {
        let mut scheduler = ActionScheduler::new();
        let (count, fired) = counter();
        scheduler.add_repeating(
            move |_| {
                count.set(count.get() + 1);
                false
            },
            50.0,
        );

        scheduler.update(30.0);
        assert_eq!(fired(), 0);
        scheduler.update(30.0);
        assert_eq!(fired(), 1);
        scheduler.update(30.0);
        assert_eq!(fired(), 1);
        scheduler.update(30.0);
        assert_eq!(fired(), 2);
        // overshoot 20 + 30 = 50; resetting to zero on fire would leave this at 2
        scheduler.update(30.0);
        assert_eq!(fired(), 3);
    }

    #[test]
    fn test_repeating_fire_count_matches_schedule() {
        // delay d = 20, interval r = 25, dt = 10 for 12 frames: total 120
        // expected floor((120 - 20) / 25) + 1 = 5
        let mut scheduler = ActionScheduler::new();
        let (count, fired) = counter();
        scheduler.add_repeating_after(
            move |_| {
                count.set(count.get() + 1);
                ActionStatus::Continue
            },
            20.0,
            25.0,
        );
        for _ in 0..12 {
            scheduler.update(10.0);
        }
        assert_eq!(fired(), 5);
    }

    #[test]
    fn test_fires_at_most_once_per_update() {
        let mut scheduler = ActionScheduler::new();
        let (count, fired) = counter();
        scheduler.add_repeating(
            move |_| {
                count.set(count.get() + 1);
                false
            },
            10.0,
        );
        scheduler.update(100.0);
        assert_eq!(fired(), 1);
    }

    #[test]
    fn test_per_frame_action_until_done() {
        let mut scheduler = ActionScheduler::new();
        let (count, fired) = counter();
        scheduler.add(
            move |_| {
                count.set(count.get() + 1);
                count.get() == 3
            },
            0.0,
        );
        for _ in 0..5 {
            scheduler.update(1.0);
        }
        assert_eq!(fired(), 3);
        assert_eq!(scheduler.live_count(), 0);
    }

    #[test]
    fn test_cancel_before_update() {
        let mut scheduler = ActionScheduler::new();
        let (count, fired) = counter();
        let handle = scheduler.add(move |_| count.set(count.get() + 1), 0.0);
        handle.cancel();
        scheduler.update(16.0);
        scheduler.update(16.0);
        assert_eq!(fired(), 0);
        assert_eq!(scheduler.live_count(), 0);
        handle.cancel();
    }

    #[test]
    fn test_cancel_from_earlier_callback_in_same_pass() {
        let mut scheduler = ActionScheduler::new();
        let (count, fired) = counter();
        let victim = Rc::new(RefCell::new(ActionHandle::inert()));

        let target = victim.clone();
        scheduler.add(move |_| target.borrow().cancel(), 0.0);
        *victim.borrow_mut() = scheduler.add(move |_| count.set(count.get() + 1), 0.0);

        scheduler.update(16.0);
        assert_eq!(fired(), 0);
        assert!(!victim.borrow().is_active());
    }

    #[test]
    fn test_insertion_order() {
        let mut scheduler = ActionScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for (name, delay) in [("a", 30.0), ("b", 10.0), ("c", 20.0)] {
            let order = order.clone();
            scheduler.add(move |_| order.borrow_mut().push(name), delay);
        }
        scheduler.update(50.0);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_added_during_update_waits_for_next_pass() {
        let mut scheduler = ActionScheduler::new();
        let queue = scheduler.queue();
        let (count, fired) = counter();
        let inner_count = count.clone();
        scheduler.add(
            move |_| {
                let inner_count = inner_count.clone();
                queue.add(move |_| inner_count.set(inner_count.get() + 10), 0.0);
            },
            0.0,
        );
        scheduler.update(16.0);
        assert_eq!(fired(), 0);
        assert_eq!(scheduler.live_count(), 1);
        scheduler.update(16.0);
        assert_eq!(fired(), 10);
        drop(count);
    }

    #[test]
    fn test_failing_action_is_isolated() {
        #[derive(Debug, thiserror::Error)]
        #[error("bad callback")]
        struct Bad;

        let mut scheduler = ActionScheduler::new();
        let (count, fired) = counter();
        scheduler.add(|_| -> Result<bool, Bad> { Err(Bad) }, 0.0);
        scheduler.add(move |_| count.set(count.get() + 1), 0.0);

        let report = scheduler.update(16.0);
        assert_eq!(report, UpdateReport { fired: 2, failed: 1 });
        assert_eq!(fired(), 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_self_cancel_while_continuing() {
        let mut scheduler = ActionScheduler::new();
        let me = Rc::new(RefCell::new(ActionHandle::inert()));
        let (count, fired) = counter();
        let handle_cell = me.clone();
        *me.borrow_mut() = scheduler.add(
            move |_| {
                count.set(count.get() + 1);
                handle_cell.borrow().cancel();
                false
            },
            0.0,
        );
        scheduler.update(1.0);
        scheduler.update(1.0);
        assert_eq!(fired(), 1);
        assert_eq!(scheduler.live_count(), 0);
    }

    #[test]
    fn test_clear_cancels_everything() {
        let mut scheduler = ActionScheduler::new();
        let live = scheduler.add(|_| false, 0.0);
        scheduler.update(1.0);
        let pending = scheduler.add(|_| (), 5.0);
        assert_eq!(scheduler.live_count(), 2);

        scheduler.clear();
        assert_eq!(scheduler.live_count(), 0);
        assert!(!live.is_active());
        assert!(!pending.is_active());
    }

    #[test]
    fn test_queue_closed_by_clear() {
        let mut scheduler = ActionScheduler::new();
        let stale = scheduler.queue();
        scheduler.clear();

        let (count, fired) = counter();
        let late = count.clone();
        let handle = stale.add(move |_| late.set(late.get() + 1), 0.0);
        assert!(stale.is_closed());
        assert!(!handle.is_active());
        assert_eq!(format!("{stale:?}"), "ActionQueue { pending: 0 }");

        let fresh = scheduler.add(move |_| count.set(count.get() + 10), 0.0);
        assert!(fresh.is_active());
        assert!(!scheduler.queue().is_closed());
        scheduler.update(1.0);
        assert_eq!(fired(), 10);
    }
}
