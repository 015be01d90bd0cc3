//! Action scheduling
//!
//! Time-driven callbacks polled once per frame:
//! - One-shot delays and per-frame actions
//! - Repeating actions with drift-free intervals
//! - Cancellation through non-owning handles
//! - Tweens built on top of the scheduler

mod action;
mod scheduler;
pub mod tween;

pub use action::{ActionError, ActionHandle, ActionStatus, BoxedError, IntoActionStatus};
pub use scheduler::{ActionQueue, ActionScheduler, UpdateReport};
pub use tween::{start_tween, Tween, TweenOptions, TweenStyle};
