//! Tweens: interpolate a value over time through the action scheduler

use super::{ActionHandle, ActionQueue, ActionStatus};
use crate::foundation::math::utils::lerp;
use std::cell::{Cell, RefCell};
use std::f32::consts::PI;
use std::rc::Rc;

/// Easing curve applied to normalised tween time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenStyle {
    /// Constant speed
    #[default]
    Linear,
    /// Quadratic, slow start
    EaseIn,
    /// Quadratic, slow finish
    EaseOut,
    /// Quadratic on both ends
    EaseInOut,
    /// Bounces against the finish value
    Bounce,
    /// Overshoots and springs back
    Elastic,
}

impl TweenStyle {
    /// Map `t` in `[0, 1]` to eased progress (0 at 0, 1 at 1)
    pub fn ease(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::Bounce => bounce_out(t),
            Self::Elastic => {
                if t <= 0.0 || t >= 1.0 {
                    t
                } else {
                    2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * (2.0 * PI / 3.0)).sin() + 1.0
                }
            }
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984_375
    }
}

/// Tween parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenOptions {
    /// Easing curve
    pub style: TweenStyle,
    /// Value at the start
    pub start: f32,
    /// Value at the end
    pub finish: f32,
    /// Length of the tween, in scheduler time units
    pub duration: f32,
    /// Wait before the first step
    pub pause_on_start: f32,
}

impl Default for TweenOptions {
    fn default() -> Self {
        Self {
            style: TweenStyle::Linear,
            start: 0.0,
            finish: 1.0,
            duration: 1.0,
            pause_on_start: 0.0,
        }
    }
}

type Continuation = Box<dyn FnOnce()>;

#[derive(Default)]
struct TweenState {
    finished: Cell<bool>,
    continuations: RefCell<Vec<Continuation>>,
}

impl TweenState {
    fn complete(&self) {
        self.finished.set(true);
        let continuations = std::mem::take(&mut *self.continuations.borrow_mut());
        for continuation in continuations {
            continuation();
        }
    }
}

/// A running tween
#[derive(Clone)]
pub struct Tween {
    handle: ActionHandle,
    state: Rc<TweenState>,
}

impl Tween {
    /// Whether the tween reached its finish value
    pub fn is_finished(&self) -> bool {
        self.state.finished.get()
    }

    /// Stop the tween where it is. Continuations never run.
    pub fn cancel(&self) {
        self.handle.cancel();
        self.state.continuations.borrow_mut().clear();
    }

    /// Whether the tween is still scheduled
    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    /// Run `continuation` once the tween has finished (immediately if it
    /// already has). Continuations run in registration order.
    pub fn then(&self, continuation: impl FnOnce() + 'static) -> &Self {
        if self.is_finished() {
            continuation();
        } else {
            self.state.continuations.borrow_mut().push(Box::new(continuation));
        }
        self
    }
}

/// Start a tween that feeds interpolated values to `setter` every frame.
///
/// The first value is produced on the first update after `pause_on_start`
/// has elapsed; the last call always receives exactly `options.finish`.
pub fn start_tween(queue: &ActionQueue, mut setter: impl FnMut(f32) + 'static, options: TweenOptions) -> Tween {
    let state = Rc::new(TweenState::default());
    let action_state = state.clone();
    let mut elapsed = 0.0_f32;

    let handle = queue.add(
        move |dt| {
            elapsed += dt;
            let t = if options.duration > 0.0 {
                (elapsed / options.duration).min(1.0)
            } else {
                1.0
            };

            if t >= 1.0 {
                setter(options.finish);
                action_state.complete();
                ActionStatus::Done
            } else {
                setter(lerp(options.start, options.finish, options.style.ease(t)));
                ActionStatus::Continue
            }
        },
        options.pause_on_start,
    );

    Tween { handle, state }
}

impl ActionQueue {
    /// Shorthand for [`start_tween`] on this queue
    pub fn tween(&self, setter: impl FnMut(f32) + 'static, options: TweenOptions) -> Tween {
        start_tween(self, setter, options)
    }
}
