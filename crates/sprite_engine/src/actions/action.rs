//! A single scheduled action and the handle used to cancel it

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Boxed error type accepted from fallible action callbacks
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while running action callbacks
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The callback returned an error; the action has been removed
    #[error("action callback failed: {0}")]
    Callback(BoxedError),
}

/// What an action wants after a callback invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// Keep the action alive (fire again next frame or next interval)
    Continue,
    /// Remove the action
    Done,
}

/// Conversion from callback return values into an [`ActionStatus`].
///
/// - `()` and `true` mean done
/// - `false` means continue
/// - `Result::Err` is a callback failure
pub trait IntoActionStatus {
    /// Convert into a status, or an error when the callback failed
    fn into_status(self) -> Result<ActionStatus, ActionError>;
}

impl IntoActionStatus for ActionStatus {
    fn into_status(self) -> Result<ActionStatus, ActionError> {
        Ok(self)
    }
}

impl IntoActionStatus for () {
    fn into_status(self) -> Result<ActionStatus, ActionError> {
        Ok(ActionStatus::Done)
    }
}

impl IntoActionStatus for bool {
    fn into_status(self) -> Result<ActionStatus, ActionError> {
        Ok(if self {
            ActionStatus::Done
        } else {
            ActionStatus::Continue
        })
    }
}

impl<T, E> IntoActionStatus for Result<T, E>
where
    T: IntoActionStatus,
    E: Into<BoxedError>,
{
    fn into_status(self) -> Result<ActionStatus, ActionError> {
        match self {
            Ok(value) => value.into_status(),
            Err(error) => Err(ActionError::Callback(error.into())),
        }
    }
}

/// State shared between an action and its handles
#[derive(Debug, Default)]
pub(crate) struct ActionState {
    cancelled: Cell<bool>,
}

impl ActionState {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    pub(crate) fn cancel(&self) {
        self.cancelled.set(true);
    }
}

type Callback = Box<dyn FnMut(f32) -> Result<ActionStatus, ActionError>>;

/// Outcome of ticking one action
pub(crate) enum TickOutcome {
    /// Not due yet, or fired and still alive
    Alive { fired: bool },
    /// Finished, cancelled, or failed; drop it
    Remove { fired: bool, failed: bool },
}

/// One scheduled unit of work, owned by exactly one scheduler
pub(crate) struct Action {
    callback: Callback,
    elapsed: f32,
    due: f32,
    interval: Option<f32>,
    state: Rc<ActionState>,
}

impl Action {
    pub(crate) fn new<F, R>(mut callback: F, delay: f32, interval: Option<f32>) -> Self
    where
        F: FnMut(f32) -> R + 'static,
        R: IntoActionStatus,
    {
        Self {
            callback: Box::new(move |dt| callback(dt).into_status()),
            elapsed: 0.0,
            due: delay.max(0.0),
            interval,
            state: Rc::new(ActionState::default()),
        }
    }

    pub(crate) fn handle(&self) -> ActionHandle {
        ActionHandle {
            state: Rc::downgrade(&self.state),
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.state.is_cancelled()
    }

    pub(crate) fn cancel(&self) {
        self.state.cancel();
    }

    /// Advance by `dt` and fire if due
    pub(crate) fn tick(&mut self, dt: f32) -> TickOutcome {
        if self.state.is_cancelled() {
            return TickOutcome::Remove {
                fired: false,
                failed: false,
            };
        }

        self.elapsed += dt;
        if self.elapsed < self.due {
            return TickOutcome::Alive { fired: false };
        }

        match (self.callback)(dt) {
            Ok(ActionStatus::Done) => TickOutcome::Remove {
                fired: true,
                failed: false,
            },
            Ok(ActionStatus::Continue) => {
                match self.interval {
                    Some(interval) => {
                        // keep the overshoot so the cadence does not drift
                        self.elapsed -= self.due;
                        self.due = interval;
                    }
                    None => self.elapsed = self.due,
                }
                if self.state.is_cancelled() {
                    TickOutcome::Remove {
                        fired: true,
                        failed: false,
                    }
                } else {
                    TickOutcome::Alive { fired: true }
                }
            }
            Err(error) => {
                log::error!("Removing failed action: {error}");
                TickOutcome::Remove {
                    fired: true,
                    failed: true,
                }
            }
        }
    }
}

/// Non-owning handle to a scheduled action.
///
/// Cancelling is idempotent and becomes a no-op once the scheduler has
/// dropped the action. A default handle refers to nothing.
#[derive(Clone, Default)]
pub struct ActionHandle {
    state: Weak<ActionState>,
}

impl ActionHandle {
    /// Handle that refers to no action
    pub fn inert() -> Self {
        Self::default()
    }

    /// Stop the action; it will never fire again
    pub fn cancel(&self) {
        if let Some(state) = self.state.upgrade() {
            state.cancel();
        }
    }

    /// Alias of [`cancel`](Self::cancel)
    pub fn deactivate(&self) {
        self.cancel();
    }

    /// Whether the action is still scheduled and not cancelled
    pub fn is_active(&self) -> bool {
        self.state.upgrade().is_some_and(|state| !state.is_cancelled())
    }
}

impl fmt::Debug for ActionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHandle")
            .field("active", &self.is_active())
            .finish()
    }
}
