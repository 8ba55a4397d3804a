use crate::model::{Action, PetState, Status};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
struct Pending {
    due: Instant,
    generation: u64,
}

/// Reverts a transient status label once its display window has passed.
///
/// There is at most one pending reversion. Scheduling again replaces it, so a
/// stale timer can never overwrite a newer label.
#[derive(Debug)]
pub(crate) struct StatusTimer {
    window: Duration,
    pending: Option<Pending>,
    generation: u64,
}

impl StatusTimer {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            generation: 0,
        }
    }

    /// Start a fresh window at `now`, dropping any earlier one. Returns the
    /// generation of the new schedule.
    pub(crate) fn schedule(&mut self, now: Instant) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(Pending {
            due: now + self.window,
            generation: self.generation,
        });
        self.generation
    }

    pub(crate) fn cancel(&mut self) {
        self.pending = None;
    }

    #[cfg(test)]
    pub(crate) fn pending_generation(&self) -> Option<u64> {
        self.pending.map(|p| p.generation)
    }

    /// If the window is over, clear it and hand back the action that puts the
    /// resting label back.
    pub(crate) fn poll(&mut self, now: Instant, st: &PetState) -> Option<Action> {
        let p = self.pending?;
        if now < p.due {
            return None;
        }
        self.pending = None;
        Some(Action::SetStatus(resting_status(st)))
    }
}

pub(crate) fn resting_status(st: &PetState) -> Status {
    if st.sleeping {
        Status::Sleeping
    } else {
        Status::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::initial_state;

    const WINDOW: Duration = Duration::from_millis(2000);

    #[test]
    fn reverts_after_window() {
        let t0 = Instant::now();
        let mut timer = StatusTimer::new(WINDOW);
        timer.schedule(t0);
        let st = initial_state();

        assert_eq!(timer.poll(t0 + Duration::from_millis(1999), &st), None);
        assert_eq!(
            timer.poll(t0 + WINDOW, &st),
            Some(Action::SetStatus(Status::Idle))
        );
        // fires once
        assert_eq!(timer.poll(t0 + WINDOW * 2, &st), None);
    }

    #[test]
    fn reverts_to_sleeping_when_asleep() {
        let t0 = Instant::now();
        let mut timer = StatusTimer::new(WINDOW);
        timer.schedule(t0);
        let st = PetState {
            sleeping: true,
            ..initial_state()
        };
        assert_eq!(
            timer.poll(t0 + WINDOW, &st),
            Some(Action::SetStatus(Status::Sleeping))
        );
    }

    #[test]
    fn rescheduling_replaces_pending() {
        let t0 = Instant::now();
        let mut timer = StatusTimer::new(WINDOW);
        let first = timer.schedule(t0);
        let second = timer.schedule(t0 + Duration::from_millis(1500));
        assert_ne!(first, second);
        assert_eq!(timer.pending_generation(), Some(second));

        let st = initial_state();
        // the first window would have ended here
        assert_eq!(timer.poll(t0 + WINDOW, &st), None);
        assert!(timer
            .poll(t0 + Duration::from_millis(3500), &st)
            .is_some());
    }

    #[test]
    fn cancel_drops_pending() {
        let t0 = Instant::now();
        let mut timer = StatusTimer::new(WINDOW);
        timer.schedule(t0);
        timer.cancel();
        assert_eq!(timer.pending_generation(), None);
        assert_eq!(timer.poll(t0 + WINDOW * 3, &initial_state()), None);
    }
}
