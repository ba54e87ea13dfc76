// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the throttle and debounce primitives.
//!
//! 1. A throttle fed calls faster than its window passes exactly one call per window.
//! 2. A debounce fires exactly once per burst, one window after the burst's last call.
//! 3. A debounce never has more than one pending timer.

use core::time::Duration;

use proptest::prelude::*;
use understory_timing::{Debounce, Throttle, Timers, Timestamp, VirtualTimers};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Slot {
    Throttle,
    Debounce,
}

/// Deliver every timer due at or before `until`, then move the clock there.
/// Returns the deadlines at which the debounce trailing edge fired.
fn run_until(
    timers: &mut VirtualTimers<Slot>,
    throttle: &mut Throttle,
    debounce: &mut Debounce,
    until: Timestamp,
) -> Vec<Timestamp> {
    let mut trailing = Vec::new();
    while let Some(expired) = timers.pop_expired(until) {
        match expired.token {
            Slot::Throttle => {
                throttle.expire(expired.id);
            }
            Slot::Debounce => {
                if debounce.expire(expired.id) {
                    trailing.push(expired.deadline);
                }
            }
        }
    }
    timers.advance_to(until);
    trailing
}

proptest! {
    #[test]
    fn throttle_passes_once_per_window(
        step in 1_u64..=250,
        per_window in 2_u64..=20,
        windows in 1_u64..=8,
    ) {
        // Calls land on every window boundary.
        let window_ms = step * per_window;
        let window = Duration::from_millis(window_ms);
        let mut timers = VirtualTimers::new();
        let mut throttle = Throttle::new(window).unwrap();
        let mut debounce = Debounce::new(window).unwrap();

        let mut passes = 0_u64;
        let mut t = 0;
        while t < window_ms * windows {
            let now = Timestamp::from_millis(t);
            run_until(&mut timers, &mut throttle, &mut debounce, now);
            if throttle.try_acquire(&mut timers, Slot::Throttle) {
                passes += 1;
            }
            t += step;
        }
        prop_assert_eq!(passes, windows);
    }

    #[test]
    fn debounce_fires_once_per_burst(
        gaps in proptest::collection::vec(0_u64..1000, 1..40),
        window_ms in 1000_u64..=3000,
    ) {
        let window = Duration::from_millis(window_ms);
        let mut timers = VirtualTimers::new();
        let mut throttle = Throttle::new(window).unwrap();
        let mut debounce = Debounce::new(window).unwrap();

        let mut t = 0;
        let mut fired = Vec::new();
        for gap in &gaps {
            t += gap;
            let now = Timestamp::from_millis(t);
            fired.extend(run_until(&mut timers, &mut throttle, &mut debounce, now));
            debounce.schedule(&mut timers, Slot::Debounce);
            prop_assert_eq!(timers.pending(), 1);
        }
        // Every gap is shorter than the window, so nothing fires mid-burst.
        prop_assert!(fired.is_empty(), "trailing edge fired mid-burst at {:?}", fired);

        let quiet = Timestamp::from_millis(t) + window * 2;
        let fired = run_until(&mut timers, &mut throttle, &mut debounce, quiet);
        prop_assert_eq!(fired, vec![Timestamp::from_millis(t) + window]);
        prop_assert_eq!(timers.pending(), 0);
        prop_assert_eq!(timers.now(), quiet);
    }
}
