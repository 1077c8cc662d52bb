// Tally Counters
// STORY-001: Clamped counters
//
// Score and experience share one counter type. `adjust` clamps and reports
// boundary crossings; `set_value` writes directly.

use log::debug;
use tally_utils::config::CounterConfig;
use tally_utils::errors::{TallyError, TallyResult};
use tally_utils::notification::{BoundaryReached, CounterEvent, CounterKind};

use crate::notifications::{NotificationBus, Observer, ScoreSource, SubscriptionId};

/// Accumulating integer with optional clamping to [minimum, maximum]
#[derive(Debug)]
pub struct Counter {
    kind: CounterKind,
    value: i64,
    config: CounterConfig,
    bus: NotificationBus<CounterEvent>,
}

impl Counter {
    /// Create a counter holding the configured starting value
    pub fn new(kind: CounterKind, config: CounterConfig) -> Self {
        Self {
            kind,
            value: config.starting_value,
            config,
            bus: NotificationBus::new(),
        }
    }

    pub fn score(config: CounterConfig) -> Self {
        Self::new(CounterKind::Score, config)
    }

    pub fn experience(config: CounterConfig) -> Self {
        Self::new(CounterKind::Experience, config)
    }

    pub fn kind(&self) -> CounterKind {
        self.kind
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// Add `delta` to the value, then clamp to the minimum and the maximum
    /// (in that order, so with minimum > maximum the maximum wins).
    ///
    /// Publishes `ReachedMinimum`/`ReachedMaximum` when the value moves from
    /// strictly inside a bound to at or past it, then `Adjusted`.
    /// `ReachedMinimum.current` is the value before the maximum clamp, so with
    /// minimum > maximum it can differ from the final value.
    /// Returns the new value.
    pub fn adjust(&mut self, delta: i64) -> TallyResult<i64> {
        if delta < 0 && !self.config.can_decrease {
            return Err(TallyError::cannot_decrease(self.kind));
        }

        let previous = self.value;
        let mut value = previous.saturating_add(delta);

        let minimum = self.config.minimum;
        if self.config.clamp_to_minimum {
            value = value.max(minimum);
        }
        if previous > minimum && value <= minimum {
            self.bus.publish(CounterEvent::ReachedMinimum(BoundaryReached {
                previous,
                current: value,
                excess: distance(value, minimum),
            }));
        }

        let maximum = self.config.maximum;
        if self.config.clamp_to_maximum {
            value = value.min(maximum);
        }
        if previous < maximum && value >= maximum {
            self.bus.publish(CounterEvent::ReachedMaximum(BoundaryReached {
                previous,
                current: value,
                excess: distance(value, maximum),
            }));
        }

        self.value = value;
        debug!("{} adjusted by {} to {}", self.kind, delta, value);
        self.bus.publish(CounterEvent::adjusted(value, delta));
        Ok(value)
    }

    /// Write the value directly, skipping clamping.
    ///
    /// No-op when unchanged. Lowering the value of a counter that cannot
    /// decrease fails and leaves it untouched.
    pub fn set_value(&mut self, value: i64) -> TallyResult<()> {
        if value == self.value {
            return Ok(());
        }
        if value < self.value && !self.config.can_decrease {
            return Err(TallyError::cannot_decrease(self.kind));
        }

        let previous = self.value;
        self.value = value;
        debug!("{} set from {} to {}", self.kind, previous, value);
        self.bus
            .publish(CounterEvent::adjusted(value, value.saturating_sub(previous)));
        Ok(())
    }

    /// Restore the starting value
    pub fn reset(&mut self) {
        self.value = self.config.starting_value;
        debug!("{} reset to {}", self.kind, self.value);
        self.bus.publish(CounterEvent::Reset { value: self.value });
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&CounterEvent) + 'static) -> SubscriptionId {
        self.bus.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }
}

fn distance(value: i64, bound: i64) -> i64 {
    i64::try_from(value.abs_diff(bound)).unwrap_or(i64::MAX)
}

impl ScoreSource for Counter {
    fn current(&self) -> i64 {
        self.value
    }

    fn subscribe(&mut self, observer: Observer<CounterEvent>) -> SubscriptionId {
        self.bus.subscribe_boxed(observer)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tally_utils::notification::Adjusted;

    fn bounded(minimum: i64, maximum: i64) -> CounterConfig {
        CounterConfig {
            minimum,
            maximum,
            ..CounterConfig::default()
        }
    }

    fn record(counter: &mut Counter) -> Rc<RefCell<Vec<CounterEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        counter.subscribe(move |event: &CounterEvent| sink.borrow_mut().push(*event));
        seen
    }

    fn boundary_events(events: &[CounterEvent]) -> Vec<CounterEvent> {
        events
            .iter()
            .filter(|event| !matches!(event, CounterEvent::Adjusted(_)))
            .copied()
            .collect()
    }

    #[test]
    fn test_starts_at_starting_value() {
        let counter = Counter::score(CounterConfig {
            starting_value: 250,
            ..CounterConfig::default()
        });
        assert_eq!(counter.value(), 250);
        assert_eq!(counter.kind(), CounterKind::Score);
    }

    #[test]
    fn test_adjust_adds_and_notifies() {
        let mut counter = Counter::score(CounterConfig::default());
        let seen = record(&mut counter);

        assert_eq!(counter.adjust(25).unwrap(), 25);
        assert_eq!(counter.adjust(-5).unwrap(), 20);

        assert_eq!(
            *seen.borrow(),
            vec![CounterEvent::adjusted(25, 25), CounterEvent::adjusted(20, -5)]
        );
    }

    #[test]
    fn test_adjust_zero_is_idempotent() {
        let mut counter = Counter::score(CounterConfig {
            starting_value: 7,
            ..CounterConfig::default()
        });
        let seen = record(&mut counter);

        counter.adjust(0).unwrap();
        counter.adjust(0).unwrap();

        assert_eq!(counter.value(), 7);
        assert_eq!(
            *seen.borrow(),
            vec![CounterEvent::adjusted(7, 0), CounterEvent::adjusted(7, 0)]
        );
    }

    #[test]
    fn test_no_decrease_rejects_negative_delta() {
        let mut counter = Counter::experience(CounterConfig {
            can_decrease: false,
            starting_value: 10,
            ..CounterConfig::default()
        });
        let seen = record(&mut counter);

        let result = counter.adjust(-5);
        assert!(matches!(result, Err(TallyError::InvalidAdjustment(_))));
        assert_eq!(counter.value(), 10);
        assert!(seen.borrow().is_empty());

        // Positive adjustments still work
        assert_eq!(counter.adjust(5).unwrap(), 15);
    }

    #[test]
    fn test_clamps_to_minimum() {
        let mut counter = Counter::score(bounded(0, 100));
        counter.adjust(10).unwrap();
        assert_eq!(counter.adjust(-50).unwrap(), 0);
    }

    #[test]
    fn test_clamps_to_maximum() {
        let mut counter = Counter::score(bounded(0, 100));
        assert_eq!(counter.adjust(150).unwrap(), 100);
    }

    #[test]
    fn test_minimum_above_maximum_yields_maximum() {
        let mut counter = Counter::score(CounterConfig {
            starting_value: 0,
            minimum: 50,
            maximum: 20,
            ..CounterConfig::default()
        });
        assert_eq!(counter.adjust(1).unwrap(), 20);
    }

    #[test]
    fn test_unclamped_counter_passes_bounds() {
        let mut counter = Counter::score(CounterConfig {
            clamp_to_minimum: false,
            clamp_to_maximum: false,
            minimum: 0,
            maximum: 100,
            ..CounterConfig::default()
        });
        assert_eq!(counter.adjust(-30).unwrap(), -30);
        assert_eq!(counter.adjust(200).unwrap(), 170);
    }

    #[test]
    fn test_reached_minimum_fires_once_per_crossing() {
        let mut counter = Counter::score(CounterConfig {
            starting_value: 5,
            ..bounded(0, 100)
        });
        let seen = record(&mut counter);

        counter.adjust(-5).unwrap();
        counter.adjust(-3).unwrap();
        assert_eq!(
            boundary_events(&seen.borrow()),
            vec![CounterEvent::ReachedMinimum(BoundaryReached {
                previous: 5,
                current: 0,
                excess: 0,
            })]
        );

        // Must rise strictly above the bound before it can fire again
        counter.adjust(1).unwrap();
        counter.adjust(-1).unwrap();
        assert_eq!(boundary_events(&seen.borrow()).len(), 2);
    }

    #[test]
    fn test_reached_minimum_reports_underage_when_unclamped() {
        let mut counter = Counter::score(CounterConfig {
            starting_value: 5,
            clamp_to_minimum: false,
            ..bounded(0, 100)
        });
        let seen = record(&mut counter);

        counter.adjust(-8).unwrap();
        assert_eq!(
            boundary_events(&seen.borrow()),
            vec![CounterEvent::ReachedMinimum(BoundaryReached {
                previous: 5,
                current: -3,
                excess: 3,
            })]
        );
    }

    #[test]
    fn test_reached_maximum() {
        let mut counter = Counter::experience(CounterConfig {
            starting_value: 90,
            ..bounded(0, 100)
        });
        let seen = record(&mut counter);

        counter.adjust(25).unwrap();
        counter.adjust(5).unwrap();

        assert_eq!(
            boundary_events(&seen.borrow()),
            vec![CounterEvent::ReachedMaximum(BoundaryReached {
                previous: 90,
                current: 100,
                excess: 0,
            })]
        );
        // Boundary event precedes the adjustment it belongs to
        assert!(matches!(seen.borrow()[0], CounterEvent::ReachedMaximum(_)));
        assert_eq!(
            seen.borrow()[1],
            CounterEvent::Adjusted(Adjusted {
                value: 100,
                delta: 25
            })
        );
    }

    #[test]
    fn test_reached_maximum_fires_once_per_crossing() {
        let mut counter = Counter::score(CounterConfig {
            starting_value: 90,
            ..bounded(0, 100)
        });
        let seen = record(&mut counter);

        counter.adjust(10).unwrap();
        counter.adjust(7).unwrap();
        assert_eq!(boundary_events(&seen.borrow()).len(), 1);

        counter.adjust(-1).unwrap();
        counter.adjust(1).unwrap();
        assert_eq!(
            boundary_events(&seen.borrow()),
            vec![
                CounterEvent::ReachedMaximum(BoundaryReached {
                    previous: 90,
                    current: 100,
                    excess: 0,
                }),
                CounterEvent::ReachedMaximum(BoundaryReached {
                    previous: 99,
                    current: 100,
                    excess: 0,
                }),
            ]
        );
    }

    #[test]
    fn test_inverted_bounds_report_minimum_before_maximum_clamp() {
        let mut counter = Counter::score(CounterConfig {
            starting_value: 60,
            minimum: 50,
            maximum: 20,
            ..CounterConfig::default()
        });
        let seen = record(&mut counter);

        assert_eq!(counter.adjust(-20).unwrap(), 20);
        assert_eq!(
            boundary_events(&seen.borrow()),
            vec![CounterEvent::ReachedMinimum(BoundaryReached {
                previous: 60,
                current: 50,
                excess: 0,
            })]
        );
    }

    #[test]
    fn test_set_value_bypasses_clamping() {
        let mut counter = Counter::score(bounded(0, 100));
        let seen = record(&mut counter);

        counter.set_value(500).unwrap();
        assert_eq!(counter.value(), 500);
        assert_eq!(*seen.borrow(), vec![CounterEvent::adjusted(500, 500)]);
    }

    #[test]
    fn test_set_value_same_is_noop() {
        let mut counter = Counter::score(CounterConfig {
            starting_value: 3,
            ..CounterConfig::default()
        });
        let seen = record(&mut counter);

        counter.set_value(3).unwrap();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_set_value_respects_no_decrease() {
        let mut counter = Counter::experience(CounterConfig {
            can_decrease: false,
            starting_value: 40,
            ..CounterConfig::default()
        });

        assert!(counter.set_value(10).is_err());
        assert_eq!(counter.value(), 40);

        counter.set_value(60).unwrap();
        assert_eq!(counter.value(), 60);
    }

    #[test]
    fn test_reset() {
        let mut counter = Counter::score(CounterConfig {
            starting_value: 100,
            ..CounterConfig::default()
        });
        let seen = record(&mut counter);

        counter.adjust(50).unwrap();
        counter.reset();

        assert_eq!(counter.value(), 100);
        assert_eq!(
            seen.borrow().last().copied(),
            Some(CounterEvent::Reset { value: 100 })
        );
    }

    #[test]
    fn test_adjust_saturates() {
        let mut counter = Counter::score(CounterConfig {
            starting_value: i64::MAX - 1,
            ..CounterConfig::default()
        });
        assert_eq!(counter.adjust(10).unwrap(), i64::MAX);
    }

    #[test]
    fn test_score_source_impl() {
        let mut counter = Counter::score(CounterConfig::default());
        let seen = Rc::new(RefCell::new(0));
        let sink = seen.clone();
        let source: &mut dyn ScoreSource = &mut counter;
        let id = source.subscribe(Box::new(move |event: &CounterEvent| {
            *sink.borrow_mut() = event.value();
        }));

        counter.adjust(12).unwrap();
        assert_eq!(*seen.borrow(), 12);
        assert_eq!(ScoreSource::current(&counter), 12);
        assert!(ScoreSource::unsubscribe(&mut counter, id));
    }

    proptest! {
        #[test]
        fn prop_clamped_value_stays_in_bounds(
            minimum in -1_000i64..1_000,
            span in 0i64..5_000,
            deltas in proptest::collection::vec(-10_000i64..10_000, 1..40),
        ) {
            let maximum = minimum + span;
            let mut counter = Counter::score(CounterConfig {
                starting_value: minimum,
                ..bounded(minimum, maximum)
            });
            for delta in deltas {
                let value = counter.adjust(delta).unwrap();
                prop_assert!(value >= minimum && value <= maximum);
            }
        }
    }
}
