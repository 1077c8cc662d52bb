// Tally STORY-002: Trickling score display
// Steps a displayed score toward the real one in coarse-to-fine unit steps
// (thousands, then hundreds, then tens, then the remainder).

use log::{debug, trace};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tally_core::notifications::{NotificationBus, Observer, ScoreSource, SubscriptionId};
use tally_core::sound::{SilentPlayer, SoundCue, SoundCuePlayer};
use tally_utils::config::TrickleConfig;
use tally_utils::errors::TallyResult;
use tally_utils::notification::CounterEvent;

use super::engine::Scheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrickleState {
    /// Displayed value equals the destination
    Idle,
    /// A step is scheduled
    Stepping,
}

/// One movement of the displayed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub delta: i64,
    /// The step lands on the destination
    pub terminal: bool,
}

/// Next step from `displayed` toward `destination`.
///
/// Uses the first divisor strictly less than the remaining distance; when no
/// divisor is smaller the whole remainder is applied as a terminal step.
/// Returns `None` when there is nothing left to do.
pub fn next_step(displayed: i64, destination: i64, divisors: &[i64]) -> Option<Step> {
    let diff = destination as i128 - displayed as i128;
    if diff == 0 {
        return None;
    }
    let distance = diff.unsigned_abs();
    let sign = diff.signum() as i64;

    let step = match divisors
        .iter()
        .find(|divisor| **divisor > 0 && (**divisor as u128) < distance)
    {
        Some(divisor) => Step {
            delta: divisor * sign,
            terminal: false,
        },
        None => Step {
            delta: i64::try_from(diff).unwrap_or(if sign > 0 { i64::MAX } else { i64::MIN }),
            terminal: true,
        },
    };
    Some(step)
}

/// Displayed score that trickles toward the value of a followed source.
///
/// Shared as `Rc<RefCell<_>>`; scheduled ticks hold a weak reference, so a
/// dropped animator leaves only no-op callbacks behind. Observers of the
/// animator are called while it is mutably borrowed and must not borrow it.
pub struct TrickleAnimator {
    displayed: i64,
    destination: i64,
    divisors: Vec<i64>,
    step_delay: Duration,
    should_trickle: bool,
    enabled: bool,
    state: TrickleState,
    /// Bumped to invalidate ticks already handed to the scheduler
    generation: u64,
    scheduler: Rc<dyn Scheduler>,
    cue_player: Box<dyn SoundCuePlayer>,
    bus: NotificationBus<CounterEvent>,
    this: Weak<RefCell<TrickleAnimator>>,
}

impl TrickleAnimator {
    /// Create an idle animator displaying `initial`.
    ///
    /// Fails on empty or non-positive divisors or a negative delay.
    pub fn new(
        config: &TrickleConfig,
        initial: i64,
        scheduler: Rc<dyn Scheduler>,
    ) -> TallyResult<Rc<RefCell<Self>>> {
        config.validate()?;
        Ok(Rc::new_cyclic(|this| {
            RefCell::new(Self {
                displayed: initial,
                destination: initial,
                divisors: config.unit_divisors.clone(),
                step_delay: config.step_delay(),
                should_trickle: config.should_trickle,
                enabled: true,
                state: TrickleState::Idle,
                generation: 0,
                scheduler,
                cue_player: Box::new(SilentPlayer),
                bus: NotificationBus::new(),
                this: this.clone(),
            })
        }))
    }

    /// Start displaying `source`'s current value and follow its changes
    pub fn attach(animator: &Rc<RefCell<Self>>, source: &mut dyn ScoreSource) -> SubscriptionId {
        animator.borrow_mut().jump_to(source.current());

        let weak = Rc::downgrade(animator);
        source.subscribe(Box::new(move |event: &CounterEvent| {
            let Some(animator) = weak.upgrade() else {
                return;
            };
            let mut animator = animator.borrow_mut();
            match event {
                CounterEvent::Adjusted(adjusted) => animator.set_destination(adjusted.value),
                CounterEvent::Reset { value } => animator.snap_to(*value),
                CounterEvent::ReachedMinimum(_) | CounterEvent::ReachedMaximum(_) => {},
            }
        }))
    }

    pub fn displayed(&self) -> i64 {
        self.displayed
    }

    pub fn destination(&self) -> i64 {
        self.destination
    }

    pub fn state(&self) -> TrickleState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == TrickleState::Idle
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn should_trickle(&self) -> bool {
        self.should_trickle
    }

    pub fn set_cue_player(&mut self, player: Box<dyn SoundCuePlayer>) {
        self.cue_player = player;
    }

    /// Move the destination. Without trickling the displayed value follows
    /// immediately; otherwise stepping starts on the next scheduler turn.
    pub fn set_destination(&mut self, destination: i64) {
        self.destination = destination;

        if !self.should_trickle {
            let delta = destination.saturating_sub(self.displayed);
            self.displayed = destination;
            self.halt();
            self.bus.publish(CounterEvent::adjusted(destination, delta));
            return;
        }

        if self.enabled && self.is_idle() && self.displayed != destination {
            debug!("Trickling from {} to {}", self.displayed, destination);
            self.state = TrickleState::Stepping;
            self.schedule_tick(Duration::ZERO);
        }
    }

    /// Jump straight to `value`, dropping any pending steps
    pub fn snap_to(&mut self, value: i64) {
        self.jump_to(value);
        self.bus.publish(CounterEvent::Reset { value });
    }

    pub fn set_should_trickle(&mut self, should_trickle: bool) {
        if self.should_trickle == should_trickle {
            return;
        }
        self.should_trickle = should_trickle;
        if !should_trickle && self.displayed != self.destination {
            self.set_destination(self.destination);
        }
    }

    /// Stop stepping. Ticks already scheduled become no-ops.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.halt();
    }

    /// Resume stepping toward the destination
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        self.set_destination(self.destination);
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&CounterEvent) + 'static) -> SubscriptionId {
        self.bus.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    fn jump_to(&mut self, value: i64) {
        self.displayed = value;
        self.destination = value;
        self.halt();
    }

    fn halt(&mut self) {
        self.state = TrickleState::Idle;
        self.generation += 1;
    }

    fn schedule_tick(&self, delay: Duration) {
        let weak = self.this.clone();
        let generation = self.generation;
        self.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(animator) = weak.upgrade() {
                    animator.borrow_mut().tick(generation);
                }
            }),
        );
    }

    fn tick(&mut self, generation: u64) {
        if generation != self.generation || self.state != TrickleState::Stepping {
            trace!("Dropping stale trickle tick");
            return;
        }

        let Some(step) = next_step(self.displayed, self.destination, &self.divisors) else {
            self.state = TrickleState::Idle;
            return;
        };

        self.displayed = if step.terminal {
            self.destination
        } else {
            self.displayed + step.delta
        };
        self.cue_player.play(SoundCue::TrickleStep);
        if step.terminal {
            self.state = TrickleState::Idle;
        } else {
            self.schedule_tick(self.step_delay);
        }
        trace!("Trickle step {:+} to {}", step.delta, self.displayed);
        self.bus
            .publish(CounterEvent::adjusted(self.displayed, step.delta));
    }
}

impl ScoreSource for TrickleAnimator {
    fn current(&self) -> i64 {
        self.displayed
    }

    fn subscribe(&mut self, observer: Observer<CounterEvent>) -> SubscriptionId {
        self.bus.subscribe_boxed(observer)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }
}

impl std::fmt::Debug for TrickleAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrickleAnimator")
            .field("displayed", &self.displayed)
            .field("destination", &self.destination)
            .field("divisors", &self.divisors)
            .field("step_delay", &self.step_delay)
            .field("should_trickle", &self.should_trickle)
            .field("enabled", &self.enabled)
            .field("state", &self.state)
            .finish()
    }
}
